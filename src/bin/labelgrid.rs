use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use labelgrid::{
    GridPlan, Position, RawRequest, RejectedPathPolicy, SheetConfig, plan_batch, render_png,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "labelgrid", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a sheet and print the plan as JSON.
    Plan(PlanArgs),
    /// Plan a sheet and write it as a PNG.
    Render(RenderArgs),
    /// Plan and render many sheets from a JSON array of requests.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct SheetArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory every image must live under (overrides the config file).
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Raster resolution (overrides the config file).
    #[arg(long)]
    dpi: Option<u32>,

    /// Draw an error box for rejected paths instead of leaving the slot empty.
    #[arg(long)]
    surface_rejected: bool,
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// JSON request file keyed by position name; flags below override it.
    #[arg(long)]
    request: Option<PathBuf>,

    /// Image for the top-left label.
    #[arg(long)]
    top_left: Option<String>,

    /// Image for the top-right label.
    #[arg(long)]
    top_right: Option<String>,

    /// Image for the bottom-left label.
    #[arg(long)]
    bottom_left: Option<String>,

    /// Image for the bottom-right label.
    #[arg(long)]
    bottom_right: Option<String>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    #[command(flatten)]
    request: RequestArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    #[command(flatten)]
    request: RequestArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct BatchArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// JSON array of requests.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory; sheets are written as `sheet-0001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Worker threads (overrides the config file).
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("labelgrid=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &SheetArgs) -> anyhow::Result<SheetConfig> {
    let mut cfg = match (&args.config, &args.base_dir) {
        (Some(path), _) => SheetConfig::from_path(path)?,
        (None, Some(base)) => SheetConfig::new(base),
        (None, None) => anyhow::bail!("either --config or --base-dir is required"),
    };
    if let Some(base) = &args.base_dir {
        cfg.base_dir = base.clone();
    }
    if let Some(dpi) = args.dpi {
        cfg.dpi = dpi;
    }
    if args.surface_rejected {
        cfg.rejected_paths = RejectedPathPolicy::Surface;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_request(args: &RequestArgs) -> anyhow::Result<RawRequest> {
    let mut req = match &args.request {
        Some(path) => RawRequest::from_path(path)?,
        None => RawRequest::new(),
    };
    let flags = [
        (Position::TopLeft, &args.top_left),
        (Position::TopRight, &args.top_right),
        (Position::BottomLeft, &args.bottom_left),
        (Position::BottomRight, &args.bottom_right),
    ];
    for (pos, value) in flags {
        if let Some(v) = value {
            req.set(pos, v.clone());
        }
    }
    Ok(req)
}

fn ensure_parent_dir(path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.sheet)?;
    let req = load_request(&args.request)?;
    let plan = cfg.planner().build_plan(&req);
    let json = serde_json::to_string_pretty(&plan).context("serialize plan")?;
    println!("{json}");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.sheet)?;
    let req = load_request(&args.request)?;
    let plan = cfg.planner().build_plan(&req);

    ensure_parent_dir(&args.out)?;
    render_png(&plan, cfg.dpi, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.sheet)?;
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }
    cfg.validate()?;

    let raw = std::fs::read(&args.in_path)
        .with_context(|| format!("read requests '{}'", args.in_path.display()))?;
    let requests: Vec<RawRequest> =
        serde_json::from_slice(&raw).context("parse requests JSON array")?;

    let plans: Vec<GridPlan> = plan_batch(&cfg.planner(), &requests, cfg.threads)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (i, plan) in plans.iter().enumerate() {
        let out = args.out_dir.join(format!("sheet-{:04}.png", i + 1));
        render_png(plan, cfg.dpi, &out)?;
    }
    eprintln!("wrote {} sheets to {}", plans.len(), args.out_dir.display());
    Ok(())
}
