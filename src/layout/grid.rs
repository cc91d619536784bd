use std::path::{Path, PathBuf};

use crate::{
    assets::orient::{OrientedImage, orient},
    assets::resolve::PathResolver,
    assets::validate::{ImageKind, ResolvedAsset},
    foundation::core::{
        LETTER_HEIGHT_MM, LETTER_WIDTH_MM, Point, Rect, SLOT_HEIGHT_MM, SLOT_WIDTH_MM, Size, Vec2,
    },
    foundation::error::{AssetError, SlotErrorKind},
    layout::fit::plan_fit,
    request::{Position, RawRequest},
};

/// Fixed page geometry: one page, two columns, two rows, all in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetLayout {
    page: Size,
    slot: Size,
    columns: [f64; 2],
    rows: [f64; 2],
}

impl SheetLayout {
    /// US letter with four 4in x 5in labels, grid centered on the page.
    pub const LETTER_2X2: SheetLayout = SheetLayout {
        page: Size::new(LETTER_WIDTH_MM, LETTER_HEIGHT_MM),
        slot: Size::new(SLOT_WIDTH_MM, SLOT_HEIGHT_MM),
        columns: [6.35, 6.35 + SLOT_WIDTH_MM],
        rows: [12.7, 12.7 + SLOT_HEIGHT_MM],
    };

    /// Page size.
    pub fn page(&self) -> Size {
        self.page
    }

    /// Size shared by all slots.
    pub fn slot_size(&self) -> Size {
        self.slot
    }

    /// Page-space rectangle of the slot at `pos`.
    pub fn slot_rect(&self, pos: Position) -> Rect {
        let (row, col) = pos.grid_index();
        Rect::from_origin_size(Point::new(self.columns[col], self.rows[row]), self.slot)
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::LETTER_2X2
    }
}

/// What to do with a slot whose path the resolver refused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectedPathPolicy {
    /// Treat the slot as unset: no plan, no box.
    #[default]
    Skip,
    /// Emit an error plan of kind [`SlotErrorKind::PathRejected`].
    Surface,
}

/// Draw instruction for a slot holding an image.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlacementPlan {
    /// Page-space slot rectangle.
    pub slot: Rect,
    /// Whether the image is drawn turned 90° clockwise.
    pub rotated: bool,
    /// Drawn size, never larger than the slot.
    pub draw: Size,
    /// Offset of the drawn image from the slot origin; centers it exactly.
    pub offset: Vec2,
    /// Canonical source file.
    pub source_path: PathBuf,
    /// Detected source format.
    pub format: ImageKind,
    /// Pixels to draw, already oriented.
    #[serde(skip)]
    pub image: OrientedImage,
}

impl PlacementPlan {
    /// Page-space rectangle the image occupies.
    pub fn draw_rect(&self) -> Rect {
        Rect::from_origin_size(self.slot.origin() + self.offset, self.draw)
    }
}

/// Draw instruction for a slot that failed.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ErrorPlan {
    /// Page-space slot rectangle.
    pub slot: Rect,
    /// Failure class.
    pub kind: SlotErrorKind,
    /// Message to print inside the box.
    pub message: String,
}

impl ErrorPlan {
    fn from_asset_error(slot: Rect, err: &AssetError) -> Self {
        Self {
            slot,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Instruction for one occupied slot.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum SlotPlan {
    /// Draw an image.
    Image(PlacementPlan),
    /// Draw an error box.
    Error(ErrorPlan),
}

impl SlotPlan {
    /// Page-space slot rectangle.
    pub fn slot(&self) -> Rect {
        match self {
            Self::Image(p) => p.slot,
            Self::Error(e) => e.slot,
        }
    }
}

/// One planned slot.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlanEntry {
    /// Which slot.
    pub position: Position,
    /// What to draw there.
    #[serde(flatten)]
    pub plan: SlotPlan,
}

/// Plans for all occupied slots of one sheet, in position order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct GridPlan {
    /// Page size in millimeters.
    pub page: Size,
    /// Planned slots. Unoccupied and skipped positions have no entry.
    pub entries: Vec<PlanEntry>,
}

impl GridPlan {
    /// Plan for `pos`, if the slot is drawn at all.
    pub fn get(&self, pos: Position) -> Option<&SlotPlan> {
        self.entries
            .iter()
            .find(|e| e.position == pos)
            .map(|e| &e.plan)
    }

    /// Number of slots drawing an error box.
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.plan, SlotPlan::Error(_)))
            .count()
    }

    /// True when nothing will be drawn.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turns a [`RawRequest`] into per-slot draw instructions.
///
/// Planning never fails as a whole: every problem is confined to its slot.
#[derive(Clone, Debug)]
pub struct LabelGridPlanner {
    resolver: PathResolver,
    layout: SheetLayout,
    rejected_paths: RejectedPathPolicy,
}

impl LabelGridPlanner {
    /// Planner confined to `base_dir` on the letter 2x2 sheet.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self::with_resolver(PathResolver::new(base_dir))
    }

    /// Planner using an already-built resolver.
    pub fn with_resolver(resolver: PathResolver) -> Self {
        Self {
            resolver,
            layout: SheetLayout::LETTER_2X2,
            rejected_paths: RejectedPathPolicy::default(),
        }
    }

    /// Set how rejected paths are reported.
    pub fn rejected_paths(mut self, policy: RejectedPathPolicy) -> Self {
        self.rejected_paths = policy;
        self
    }

    /// Sheet geometry in use.
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Resolver in use.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Plan all four positions in order: top-left, top-right, bottom-left, bottom-right.
    #[tracing::instrument(skip_all, fields(occupied = request.occupied().count()))]
    pub fn build_plan(&self, request: &RawRequest) -> GridPlan {
        let entries = request
            .occupied()
            .filter_map(|(position, raw)| {
                self.plan_slot(position, raw)
                    .map(|plan| PlanEntry { position, plan })
            })
            .collect::<Vec<_>>();

        tracing::debug!(planned = entries.len(), "grid planned");
        GridPlan {
            page: self.layout.page(),
            entries,
        }
    }

    fn plan_slot(&self, position: Position, raw: &str) -> Option<SlotPlan> {
        let slot = self.layout.slot_rect(position);

        let path = match self.resolver.resolve(raw) {
            Ok(path) => path,
            Err(reason) => {
                tracing::warn!(%position, input = %log_safe(raw), %reason, "rejected asset path");
                return match self.rejected_paths {
                    RejectedPathPolicy::Skip => None,
                    RejectedPathPolicy::Surface => Some(SlotPlan::Error(ErrorPlan {
                        slot,
                        kind: SlotErrorKind::PathRejected,
                        message: format!("{}: {reason}", SlotErrorKind::PathRejected),
                    })),
                };
            }
        };

        match place(slot, path) {
            Ok(plan) => Some(SlotPlan::Image(plan)),
            Err(err) => {
                tracing::debug!(%position, error = %err, "slot failed");
                Some(SlotPlan::Error(ErrorPlan::from_asset_error(slot, &err)))
            }
        }
    }
}

/// One-shot planning against `base_dir` with default settings.
pub fn build_plan(request: &RawRequest, base_dir: impl AsRef<Path>) -> GridPlan {
    LabelGridPlanner::new(base_dir).build_plan(request)
}

fn place(slot: Rect, path: PathBuf) -> Result<PlacementPlan, AssetError> {
    let asset = ResolvedAsset::validate(path)?;
    let fit = plan_fit(
        Size::new(f64::from(asset.pixel_width), f64::from(asset.pixel_height)),
        slot.size(),
    )?;
    let image = orient(&asset, fit.rotated)?;

    Ok(PlacementPlan {
        slot,
        rotated: fit.rotated,
        draw: fit.draw,
        offset: fit.offset,
        source_path: asset.absolute_path,
        format: asset.format,
        image,
    })
}

fn log_safe(raw: &str) -> String {
    const MAX: usize = 64;
    let mut out: String = raw.chars().take(MAX).flat_map(char::escape_debug).collect();
    if raw.chars().count() > MAX {
        out.push('…');
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
