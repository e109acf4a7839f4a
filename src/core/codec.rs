//! Decode arbitrary image bytes and encode composited surfaces as PNG,
//! in memory or to a file.
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::Result;

/// Decodes an encoded image (PNG, JPEG, GIF, WebP, BMP, TIFF, ...) from
/// memory. The format is detected from the byte content, not from any
/// declared MIME type.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Encodes an RGBA surface as PNG and returns the encoded bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Writes already-encoded PNG bytes to `path`.
pub fn write_png_file(png: &[u8], path: &Path) -> Result<()> {
    std::fs::write(path, png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::Rgba;

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }

    #[test]
    fn encode_then_decode_preserves_pixels() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 255]));
        img.put_pixel(1, 0, Rgba([250, 251, 252, 255]));

        let png = encode_png(&img).unwrap();
        let back = decode_image(&png).unwrap().to_rgba8();
        assert_eq!(back, img);
    }

    #[test]
    fn write_png_file_creates_readable_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("converted.png");

        let png = encode_png(&RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]))).unwrap();
        write_png_file(&png, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(decode_image(&bytes).unwrap().to_rgba8().dimensions(), (3, 3));
    }
}
