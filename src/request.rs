use std::{fmt, io::Read, path::Path, str::FromStr};

use crate::foundation::error::{LabelError, LabelResult};

/// One of the four fixed label slots on a sheet.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    /// Row 0, column 0.
    TopLeft,
    /// Row 0, column 1.
    TopRight,
    /// Row 1, column 0.
    BottomLeft,
    /// Row 1, column 1.
    BottomRight,
}

impl Position {
    /// All positions in planning order.
    pub const ALL: [Position; 4] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
    ];

    /// `(row, column)` of this slot, each in `{0, 1}`.
    pub fn grid_index(self) -> (usize, usize) {
        match self {
            Self::TopLeft => (0, 0),
            Self::TopRight => (0, 1),
            Self::BottomLeft => (1, 0),
            Self::BottomRight => (1, 1),
        }
    }

    /// Kebab-case name as used by request parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    fn slot(self) -> usize {
        let (row, col) = self.grid_index();
        row * 2 + col
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| LabelError::validation(format!("unknown label position '{s}'")))
    }
}

/// Untrusted per-position path strings for one sheet.
///
/// An absent or empty value means the position is not rendered at all. Deserializes from a JSON
/// object keyed by kebab-case position names.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(from = "RawRequestDef")]
pub struct RawRequest {
    values: [Option<String>; 4],
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawRequestDef {
    #[serde(default)]
    top_left: Option<String>,
    #[serde(default)]
    top_right: Option<String>,
    #[serde(default)]
    bottom_left: Option<String>,
    #[serde(default)]
    bottom_right: Option<String>,
}

impl From<RawRequestDef> for RawRequest {
    fn from(def: RawRequestDef) -> Self {
        Self {
            values: [def.top_left, def.top_right, def.bottom_left, def.bottom_right],
        }
    }
}

impl RawRequest {
    /// Empty request; plans to an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`RawRequest::set`].
    pub fn with(mut self, pos: Position, value: impl Into<String>) -> Self {
        self.set(pos, value);
        self
    }

    /// Set the raw value for `pos`, replacing any previous value.
    pub fn set(&mut self, pos: Position, value: impl Into<String>) {
        self.values[pos.slot()] = Some(value.into());
    }

    /// Remove the value for `pos`.
    pub fn clear(&mut self, pos: Position) {
        self.values[pos.slot()] = None;
    }

    /// Raw value for `pos`, or `None` when absent or empty.
    pub fn get(&self, pos: Position) -> Option<&str> {
        self.values[pos.slot()]
            .as_deref()
            .filter(|v| !v.is_empty())
    }

    /// Positions that carry a non-empty value, in planning order.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &str)> + '_ {
        Position::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|v| (p, v)))
    }

    /// Build from `(position, value)` pairs; later pairs win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Position, S)>,
        S: Into<String>,
    {
        let mut out = Self::new();
        for (pos, value) in pairs {
            out.set(pos, value);
        }
        out
    }

    /// Parse a JSON object keyed by kebab-case position names.
    pub fn from_reader<R: Read>(r: R) -> LabelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LabelError::validation(format!("parse request JSON: {e}")))
    }

    /// Parse a JSON request from a file.
    pub fn from_path(path: impl AsRef<Path>) -> LabelResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            LabelError::validation(format!("open request JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../tests/unit/request.rs"]
mod tests;
