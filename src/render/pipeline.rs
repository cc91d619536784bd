use rayon::prelude::*;

use crate::{
    foundation::error::{LabelError, LabelResult},
    layout::grid::{GridPlan, LabelGridPlanner},
    request::RawRequest,
};

/// Plan many independent sheets in parallel.
///
/// Planning reads the filesystem but never writes it, so requests share nothing and need no
/// locking. Results keep the order of `requests`.
#[tracing::instrument(skip(planner, requests), fields(requests = requests.len()))]
pub fn plan_batch(
    planner: &LabelGridPlanner,
    requests: &[RawRequest],
    threads: Option<usize>,
) -> LabelResult<Vec<GridPlan>> {
    let pool = build_thread_pool(threads)?;
    Ok(pool.install(|| {
        requests
            .par_iter()
            .map(|req| planner.build_plan(req))
            .collect()
    }))
}

fn build_thread_pool(threads: Option<usize>) -> LabelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LabelError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LabelError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
