use crate::{
    foundation::core::{Size, Vec2},
    foundation::error::AssetError,
};

/// Orientation, scale and centering of a source image inside a target rectangle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fit {
    /// Whether the source must be turned 90° before drawing.
    pub rotated: bool,
    /// Uniform scale applied to source pixels.
    pub scale: f64,
    /// Drawn size in target units, after rotation and scaling.
    pub draw: Size,
    /// Offset of the drawn image from the target's origin.
    pub offset: Vec2,
}

/// Choose the orientation that fills more of `target` and center the result.
///
/// Both orientations are scored by their uniform fit scale; the rotated one wins only when its
/// scale is strictly larger, so ties keep the source as-is. The drawn size never exceeds `target`.
pub fn plan_fit(source: Size, target: Size) -> Result<Fit, AssetError> {
    for (what, v) in [
        ("source width", source.width),
        ("source height", source.height),
        ("target width", target.width),
        ("target height", target.height),
    ] {
        if !v.is_finite() || v <= 0.0 {
            return Err(AssetError::processing(format!(
                "{what} must be finite and > 0, got {v}"
            )));
        }
    }

    let scale_normal = (target.width / source.width).min(target.height / source.height);
    let scale_rotated = (target.width / source.height).min(target.height / source.width);

    let rotated = scale_rotated > scale_normal;
    let (scale, oriented) = if rotated {
        (scale_rotated, Size::new(source.height, source.width))
    } else {
        (scale_normal, source)
    };

    let draw = Size::new(
        (oriented.width * scale).min(target.width),
        (oriented.height * scale).min(target.height),
    );
    let offset = Vec2::new(
        (target.width - draw.width) / 2.0,
        (target.height - draw.height) / 2.0,
    );

    Ok(Fit {
        rotated,
        scale,
        draw,
        offset,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
