use std::io::Cursor;

use super::*;

fn encode(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = if format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
    } else {
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height))
    };
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

// 2x2 24-bit BMP, written by hand so the crate needs no BMP codec.
fn bmp_2x2() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(54u32 + 16).to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&2i32.to_le_bytes());
    out.extend_from_slice(&2i32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&[0; 24]);
    out.extend_from_slice(&[0; 16]);
    out
}

fn write(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn accepts_png_jpeg_and_gif_by_content() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        ("a.png", image::ImageFormat::Png, ImageKind::Png),
        ("b.jpg", image::ImageFormat::Jpeg, ImageKind::Jpeg),
        ("c.gif", image::ImageFormat::Gif, ImageKind::Gif),
    ];
    for (name, format, kind) in cases {
        let path = write(&dir, name, &encode(7, 3, format));
        let info = validate_asset(&path).unwrap();
        assert_eq!(info, ImageInfo { width: 7, height: 3, format: kind });
    }
}

#[test]
fn detection_ignores_misleading_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "photo.gif", &encode(4, 5, image::ImageFormat::Png));
    assert_eq!(validate_asset(&path).unwrap().format, ImageKind::Png);
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = validate_asset(&dir.path().join("missing.png")).unwrap_err();
    assert_eq!(err.kind(), crate::SlotErrorKind::NotFound);
    assert!(err.to_string().contains("missing.png"));
}

#[test]
fn directory_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub.png")).unwrap();
    let err = validate_asset(&dir.path().join("sub.png")).unwrap_err();
    assert_eq!(err.kind(), crate::SlotErrorKind::NotFound);
}

#[test]
fn text_file_is_invalid_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "label.png", b"definitely not an image");
    let err = validate_asset(&path).unwrap_err();
    assert_eq!(err.kind(), crate::SlotErrorKind::InvalidFormat);
}

#[test]
fn truncated_png_is_invalid_format() {
    let dir = tempfile::tempdir().unwrap();
    let png = encode(10, 10, image::ImageFormat::Png);
    let path = write(&dir, "cut.png", &png[..12]);
    let err = validate_asset(&path).unwrap_err();
    assert_eq!(err.kind(), crate::SlotErrorKind::InvalidFormat);
}

#[test]
fn bmp_is_unsupported_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "label.png", &bmp_2x2());
    let err = validate_asset(&path).unwrap_err();
    assert_eq!(err.kind(), crate::SlotErrorKind::UnsupportedType);
}

#[test]
fn resolved_asset_carries_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "a.png", &encode(500, 250, image::ImageFormat::Png));
    let asset = ResolvedAsset::validate(path.clone()).unwrap();
    assert_eq!(asset.absolute_path, path);
    assert_eq!((asset.pixel_width, asset.pixel_height), (500, 250));
    assert_eq!(asset.format, ImageKind::Png);
}

#[test]
fn image_kind_display_names() {
    assert_eq!(ImageKind::Jpeg.to_string(), "JPEG");
    assert_eq!(
        ImageKind::from_format(image::ImageFormat::Gif),
        Some(ImageKind::Gif)
    );
    assert_eq!(ImageKind::from_format(image::ImageFormat::Bmp), None);
    assert_eq!(ImageKind::Png.image_format(), image::ImageFormat::Png);
}
