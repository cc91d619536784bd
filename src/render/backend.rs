use crate::{
    foundation::core::{Rect, Size},
    foundation::error::{LabelResult, SlotErrorKind},
    layout::grid::{GridPlan, PlacementPlan, SlotPlan},
};

/// Drawing surface for a planned sheet.
///
/// Implementations only draw; every placement decision has already been made by
/// [`LabelGridPlanner`](crate::LabelGridPlanner). Rectangles are page-space millimeters.
pub trait Renderer {
    /// Called once before any slot is drawn.
    fn begin_page(&mut self, _page: Size) -> LabelResult<()> {
        Ok(())
    }

    /// Draw `plan.image` into [`PlacementPlan::draw_rect`].
    fn draw_image(&mut self, plan: &PlacementPlan) -> LabelResult<()>;

    /// Draw an error box of class `kind` covering `slot` with `message` inside.
    fn draw_error(&mut self, slot: Rect, kind: SlotErrorKind, message: &str) -> LabelResult<()>;
}

/// Counters from one [`render_sheet`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Slots drawn as images.
    pub images: usize,
    /// Slots drawn as error boxes, including fallbacks.
    pub errors: usize,
    /// Image slots the renderer could not draw and replaced with an error box.
    pub fallbacks: usize,
}

/// Dispatch every planned slot to `renderer` in position order.
///
/// A failing [`Renderer::draw_image`] degrades that slot to an error box; only a failing
/// [`Renderer::draw_error`] or [`Renderer::begin_page`] aborts the sheet.
#[tracing::instrument(skip_all, fields(slots = plan.entries.len()))]
pub fn render_sheet(plan: &GridPlan, renderer: &mut dyn Renderer) -> LabelResult<RenderStats> {
    let mut stats = RenderStats::default();
    renderer.begin_page(plan.page)?;

    for entry in &plan.entries {
        match &entry.plan {
            SlotPlan::Image(p) => match renderer.draw_image(p) {
                Ok(()) => stats.images += 1,
                Err(err) => {
                    tracing::warn!(position = %entry.position, error = %err, "image draw failed; drawing error box");
                    let message = format!("{}: {err}", SlotErrorKind::ProcessingError);
                    renderer.draw_error(p.slot, SlotErrorKind::ProcessingError, &message)?;
                    stats.errors += 1;
                    stats.fallbacks += 1;
                }
            },
            SlotPlan::Error(e) => {
                renderer.draw_error(e.slot, e.kind, &e.message)?;
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
