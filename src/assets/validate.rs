use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::foundation::error::AssetError;

/// Raster formats accepted on a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// JPEG / JFIF.
    Jpeg,
    /// PNG.
    Png,
    /// GIF (first frame).
    Gif,
}

impl ImageKind {
    /// Map a detected `image` format onto the accepted set.
    pub fn from_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }

    /// Equivalent `image` crate format.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Gif => image::ImageFormat::Gif,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
        })
    }
}

/// Header facts about a validated image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Detected format.
    pub format: ImageKind,
}

/// A sandboxed, validated image ready for planning. Lives for one planning pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Canonical absolute path inside the base directory.
    pub absolute_path: PathBuf,
    /// Width in pixels.
    pub pixel_width: u32,
    /// Height in pixels.
    pub pixel_height: u32,
    /// Detected format.
    pub format: ImageKind,
}

impl ResolvedAsset {
    /// Resolve-then-validate result for `absolute_path`.
    pub fn validate(absolute_path: PathBuf) -> Result<Self, AssetError> {
        let info = validate_asset(&absolute_path)?;
        Ok(Self {
            absolute_path,
            pixel_width: info.width,
            pixel_height: info.height,
            format: info.format,
        })
    }
}

/// Confirm `path` is a regular file holding a JPEG, PNG or GIF and read its dimensions.
///
/// The format is detected from content, never from the file extension. Only the header is
/// decoded.
pub fn validate_asset(path: &Path) -> Result<ImageInfo, AssetError> {
    let display = file_label(path);
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(AssetError::NotFound(format!("{display} is not a file"))),
        Err(_) => return Err(AssetError::NotFound(display)),
    }

    let reader = image::ImageReader::open(path)
        .map_err(|e| AssetError::NotFound(format!("{display}: {e}")))?
        .with_guessed_format()
        .map_err(|e| AssetError::InvalidFormat(format!("{display}: {e}")))?;

    let Some(detected) = reader.format() else {
        return Err(AssetError::InvalidFormat(format!(
            "{display} is not a recognized image"
        )));
    };
    let Some(kind) = ImageKind::from_format(detected) else {
        return Err(AssetError::UnsupportedType(format!(
            "{display} is {detected:?}; expected JPEG, PNG or GIF"
        )));
    };

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| AssetError::InvalidFormat(format!("{display}: {e}")))?;
    if width == 0 || height == 0 {
        return Err(AssetError::InvalidFormat(format!(
            "{display} has zero-sized dimensions"
        )));
    }

    Ok(ImageInfo {
        width,
        height,
        format: kind,
    })
}

// Messages end up printed on the sheet; keep them to the file name.
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "asset".to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/validate.rs"]
mod tests;
