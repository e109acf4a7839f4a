//! High-level, ergonomic library API: convert encoded image bytes or files
//! into white-matted, PNG-encoded results. Prefer these entrypoints over the
//! low-level `core` modules when embedding WHITEOUT.
use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::core::codec::{decode_image, encode_png};
use crate::core::composite::flatten_onto_white;
use crate::core::mime::{image_mime_for_path, is_image_mime, sniff_image_mime};
use crate::error::{Error, Result};

/// Result of a conversion: the composited surface plus its PNG encoding.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    pub width: u32,
    pub height: u32,
    /// Composited pixels, fully opaque.
    pub rgba: RgbaImage,
    /// PNG encoding of `rgba`, ready for saving or clipboard transfer.
    pub png: Vec<u8>,
}

/// Decodes `bytes`, composites the result onto opaque white, and PNG-encodes
/// the output. The MIME gate is the caller's job; this function decodes
/// whatever it is given and fails with [`Error::Image`] on undecodable input.
pub fn convert_image_bytes(bytes: &[u8]) -> Result<ConvertedImage> {
    let decoded = decode_image(bytes)?;
    let out = convert_decoded(decoded)?;
    debug!(
        "Converted image: {}x{}, {} PNG bytes",
        out.width,
        out.height,
        out.png.len()
    );
    Ok(out)
}

/// Converts an already-decoded RGBA surface. Used for clipboard paste, where
/// the platform hands over raw pixels rather than an encoded file.
pub fn convert_rgba(src: RgbaImage) -> Result<ConvertedImage> {
    convert_decoded(image::DynamicImage::ImageRgba8(src))
}

fn convert_decoded(decoded: image::DynamicImage) -> Result<ConvertedImage> {
    let rgba = flatten_onto_white(&decoded);
    let (width, height) = rgba.dimensions();
    let png = encode_png(&rgba)?;
    Ok(ConvertedImage { width, height, rgba, png })
}

/// Reads and converts an image file. Fails with [`Error::NotAnImage`] before
/// touching the file contents when the path's type is not `image/*`; for
/// extensionless paths the leading bytes are sniffed instead.
pub fn convert_image_file(path: &Path) -> Result<ConvertedImage> {
    let bytes = std::fs::read(path)?;
    let mime = image_mime_for_path(path).or_else(|| sniff_image_mime(&bytes));
    match mime {
        Some(mime) if is_image_mime(mime) => convert_image_bytes(&bytes),
        other => Err(Error::NotAnImage {
            mime: other.unwrap_or("unknown").to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn encoded_png(pixels: &[[u8; 4]], width: u32, height: u32) -> Vec<u8> {
        let mut img = RgbaImage::new(width, height);
        for (i, p) in pixels.iter().enumerate() {
            img.put_pixel(i as u32 % width, i as u32 / width, Rgba(*p));
        }
        encode_png(&img).unwrap()
    }

    #[test]
    fn converts_encoded_bytes_end_to_end() {
        let png = encoded_png(&[[255, 0, 0, 0], [0, 0, 255, 255]], 2, 1);
        let out = convert_image_bytes(&png).unwrap();
        assert_eq!((out.width, out.height), (2, 1));
        assert_eq!(*out.rgba.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.rgba.get_pixel(1, 0), Rgba([0, 0, 255, 255]));
        // the png field decodes back to the same surface
        let back = decode_image(&out.png).unwrap().to_rgba8();
        assert_eq!(back, out.rgba);
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert!(matches!(convert_image_bytes(b"plain text").unwrap_err(), Error::Image(_)));
    }

    #[test]
    fn file_conversion_gates_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("input.png");
        std::fs::write(&path, encoded_png(&[[0, 0, 0, 128]], 1, 1)).unwrap();
        let out = convert_image_file(&path).unwrap();
        assert_eq!((out.width, out.height), (1, 1));

        // non-image extension holding non-image bytes is rejected by sniffing,
        // never decoded
        let txt = dir.path().join("input.txt");
        std::fs::write(&txt, b"hello").unwrap();
        assert!(matches!(convert_image_file(&txt).unwrap_err(), Error::NotAnImage { .. }));
    }

    #[test]
    fn paste_surface_conversion_matches_byte_conversion() {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 64]));
        img.put_pixel(0, 1, Rgba([200, 100, 0, 255]));

        let via_rgba = convert_rgba(img.clone()).unwrap();
        let via_bytes = convert_image_bytes(&encode_png(&img).unwrap()).unwrap();
        assert_eq!(via_rgba.rgba, via_bytes.rgba);
    }
}
