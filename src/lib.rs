//! labelgrid plans and renders up to four images onto a 2x2 grid of 4in x 5in labels on US
//! letter stock.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: untrusted relative path -> canonical path inside the base directory
//!    ([`PathResolver`])
//! 2. **Validate**: canonical path -> dimensions and format of a JPEG/PNG/GIF
//!    ([`validate_asset`])
//! 3. **Fit**: source size + slot size -> orientation, scale and centering ([`plan_fit`])
//! 4. **Plan**: [`RawRequest`] -> [`GridPlan`] with one [`SlotPlan`] per occupied slot
//!    ([`LabelGridPlanner`])
//! 5. **Render**: [`GridPlan`] -> any [`Renderer`] ([`render_sheet`])
//!
//! Failures stay inside their slot. A rejected path is treated like an unset position unless
//! [`RejectedPathPolicy::Surface`] is selected; every other failure becomes an error box.
//! Nothing in the pipeline writes to the base directory: rotated images are re-encoded in memory.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod foundation;
mod layout;
mod render;
mod request;

pub use assets::orient::{OrientedImage, RotatedImage, orient};
pub use assets::resolve::{PathResolver, normalize_rel_path, resolve};
pub use assets::validate::{ImageInfo, ImageKind, ResolvedAsset, validate_asset};
pub use config::{DEFAULT_DPI, SheetConfig};
pub use foundation::core::{
    LETTER_HEIGHT_MM, LETTER_WIDTH_MM, MM_PER_INCH, Point, Rect, SLOT_HEIGHT_MM, SLOT_WIDTH_MM,
    Size, Vec2, mm_to_px,
};
pub use foundation::error::{
    AssetError, LabelError, LabelResult, PathRejection, SlotErrorKind,
};
pub use layout::fit::{Fit, plan_fit};
pub use layout::grid::{
    ErrorPlan, GridPlan, LabelGridPlanner, PlacementPlan, PlanEntry, RejectedPathPolicy,
    SheetLayout, SlotPlan, build_plan,
};
pub use render::backend::{RenderStats, Renderer, render_sheet};
pub use render::pipeline::plan_batch;
pub use render::raster::{MAX_DPI, RasterRenderer, render_png};
pub use render::record::{DrawCommand, RecordingRenderer};
pub use request::{Position, RawRequest};
