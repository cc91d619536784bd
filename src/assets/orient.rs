use std::{io::Cursor, path::PathBuf, sync::Arc};

use anyhow::Context;

use crate::{
    assets::validate::ResolvedAsset,
    foundation::error::{AssetError, LabelResult},
};

/// Pixels a renderer should draw, already in display orientation.
#[derive(Clone, Debug, PartialEq)]
pub enum OrientedImage {
    /// Draw the source file unchanged.
    Source(PathBuf),
    /// Draw an in-memory copy turned 90° clockwise. The source file is untouched.
    Rotated(RotatedImage),
}

/// PNG-encoded rotated copy of a source image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotatedImage {
    /// Width in pixels after rotation.
    pub width: u32,
    /// Height in pixels after rotation.
    pub height: u32,
    /// Encoded PNG bytes.
    pub png: Arc<Vec<u8>>,
}

impl OrientedImage {
    /// Decode the pixels in display orientation.
    pub fn load(&self) -> LabelResult<image::DynamicImage> {
        let img = match self {
            Self::Source(path) => image::ImageReader::open(path)
                .with_context(|| format!("open image '{}'", path.display()))?
                .with_guessed_format()
                .context("detect image format")?
                .decode()
                .with_context(|| format!("decode image '{}'", path.display()))?,
            Self::Rotated(r) => image::load_from_memory_with_format(&r.png, image::ImageFormat::Png)
                .context("decode rotated image")?,
        };
        Ok(img)
    }

    /// Whether a rotated copy was produced.
    pub fn is_rotated(&self) -> bool {
        matches!(self, Self::Rotated(_))
    }
}

/// Produce display-oriented pixels for `asset`.
///
/// Unrotated assets are passed through by path without being read. Rotated assets are decoded,
/// turned 90° clockwise and re-encoded in memory, so concurrent or repeated requests for the same
/// file always see the original bytes.
pub fn orient(asset: &ResolvedAsset, rotated: bool) -> Result<OrientedImage, AssetError> {
    if !rotated {
        return Ok(OrientedImage::Source(asset.absolute_path.clone()));
    }
    rotate_copy(asset)
        .map(OrientedImage::Rotated)
        .map_err(|e| AssetError::processing(format!("rotate image: {e:#}")))
}

fn rotate_copy(asset: &ResolvedAsset) -> anyhow::Result<RotatedImage> {
    let name = asset
        .absolute_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let img = image::ImageReader::open(&asset.absolute_path)
        .with_context(|| format!("open '{name}'"))?
        .with_guessed_format()?
        .decode()
        .context("decode source")?;
    let turned = img.rotate90();

    let mut png = Vec::new();
    turned
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("encode rotated copy")?;

    tracing::debug!(
        path = %asset.absolute_path.display(),
        width = turned.width(),
        height = turned.height(),
        "rotated copy prepared"
    );
    Ok(RotatedImage {
        width: turned.width(),
        height: turned.height(),
        png: Arc::new(png),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/orient.rs"]
mod tests;
