use std::fmt;

/// Convenience result type used across labelgrid.
pub type LabelResult<T> = Result<T, LabelError>;

/// Top-level error taxonomy for operations that can fail as a whole.
///
/// Slot-level failures never use this type; they are carried by [`AssetError`] and surface as
/// in-document error boxes instead of aborting a render.
#[derive(thiserror::Error, Debug)]
pub enum LabelError {
    /// Invalid caller-provided data (requests, arguments).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Failures producing the output document.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LabelError {
    /// Build a [`LabelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LabelError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`LabelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

/// Why an untrusted relative path was refused by the resolver.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum PathRejection {
    /// Empty or whitespace-only input.
    #[error("path is empty")]
    Empty,
    /// Input contains a NUL byte.
    #[error("path contains a NUL byte")]
    NulByte,
    /// Input starts with a path separator.
    #[error("path is absolute")]
    Absolute,
    /// Input starts with a drive marker such as `C:`.
    #[error("path starts with a drive letter")]
    DriveLetter,
    /// A `..` segment would climb above the base directory.
    #[error("path climbs above the base directory")]
    EscapesRoot,
    /// A segment contains characters outside `[A-Za-z0-9._-]`.
    #[error("path segment '{0}' contains disallowed characters")]
    IllegalCharacter(String),
    /// Nothing is left after dropping `.` and empty segments.
    #[error("path has no file name")]
    NoFileName,
    /// The configured base directory could not be canonicalized.
    #[error("base directory is unavailable")]
    BaseUnavailable,
    /// The filesystem-resolved target lies outside the base directory.
    #[error("resolved path lies outside the base directory")]
    OutsideBase,
    /// The target exists but could not be canonicalized (e.g. a dangling symlink).
    #[error("path cannot be resolved")]
    Unresolvable,
}

/// Classification of a per-slot failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SlotErrorKind {
    /// Untrusted input failed sandboxing.
    PathRejected,
    /// The resolved file does not exist or is not a regular file.
    NotFound,
    /// The file content is not a decodable raster image.
    InvalidFormat,
    /// The file decodes but its format is outside JPEG/PNG/GIF.
    UnsupportedType,
    /// Geometry or rotation failed for an otherwise valid asset.
    ProcessingError,
}

impl SlotErrorKind {
    /// Stable name used in messages and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PathRejected => "PathRejected",
            Self::NotFound => "NotFound",
            Self::InvalidFormat => "InvalidFormat",
            Self::UnsupportedType => "UnsupportedType",
            Self::ProcessingError => "ProcessingError",
        }
    }
}

impl fmt::Display for SlotErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset-level failure for a single slot.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum AssetError {
    /// See [`SlotErrorKind::NotFound`].
    #[error("NotFound: {0}")]
    NotFound(String),
    /// See [`SlotErrorKind::InvalidFormat`].
    #[error("InvalidFormat: {0}")]
    InvalidFormat(String),
    /// See [`SlotErrorKind::UnsupportedType`].
    #[error("UnsupportedType: {0}")]
    UnsupportedType(String),
    /// See [`SlotErrorKind::ProcessingError`].
    #[error("ProcessingError: {0}")]
    Processing(String),
}

impl AssetError {
    /// Build an [`AssetError::Processing`] value.
    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    /// Classification used by plans and renderers.
    pub fn kind(&self) -> SlotErrorKind {
        match self {
            Self::NotFound(_) => SlotErrorKind::NotFound,
            Self::InvalidFormat(_) => SlotErrorKind::InvalidFormat,
            Self::UnsupportedType(_) => SlotErrorKind::UnsupportedType,
            Self::Processing(_) => SlotErrorKind::ProcessingError,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
