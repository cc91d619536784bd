use std::path::PathBuf;

use crate::{
    foundation::core::{Rect, Size},
    foundation::error::{LabelResult, SlotErrorKind},
    layout::grid::PlacementPlan,
    render::backend::Renderer,
};

/// A single recorded draw call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Image drawn at `rect`.
    Image {
        /// Page-space slot.
        slot: Rect,
        /// Page-space image rectangle.
        rect: Rect,
        /// Whether a rotated copy is drawn.
        rotated: bool,
        /// Source file the pixels come from.
        source: PathBuf,
    },
    /// Error box covering `slot`.
    Error {
        /// Page-space slot.
        slot: Rect,
        /// Failure class.
        kind: SlotErrorKind,
        /// Printed message.
        message: String,
    },
}

/// Renderer that records draw calls instead of producing pixels.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct RecordingRenderer {
    /// Page size passed to `begin_page`.
    pub page: Option<Size>,
    /// Draw calls in order.
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls as pretty JSON.
    pub fn to_json(&self) -> LabelResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::LabelError::render(format!("serialize draw commands: {e}")))
    }
}

impl Renderer for RecordingRenderer {
    fn begin_page(&mut self, page: Size) -> LabelResult<()> {
        self.page = Some(page);
        Ok(())
    }

    fn draw_image(&mut self, plan: &PlacementPlan) -> LabelResult<()> {
        self.commands.push(DrawCommand::Image {
            slot: plan.slot,
            rect: plan.draw_rect(),
            rotated: plan.rotated,
            source: plan.source_path.clone(),
        });
        Ok(())
    }

    fn draw_error(&mut self, slot: Rect, kind: SlotErrorKind, message: &str) -> LabelResult<()> {
        self.commands.push(DrawCommand::Error {
            slot,
            kind,
            message: message.to_string(),
        });
        Ok(())
    }
}
