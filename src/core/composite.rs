//! White-matte compositing: source-over blending of an RGBA image onto an
//! opaque white background. This is the heart of the application; everything
//! else is plumbing around it.
use image::{DynamicImage, Rgba, RgbaImage};

/// The background every converted image is matted onto.
pub const MATTE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Source-over blend of a single channel against white.
///
/// out = src * a + 255 * (1 - a), computed in integer arithmetic with
/// round-to-nearest. `a` is the source alpha in 0..=255.
#[inline]
fn blend_over_white(src: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Composites `src` onto an opaque white surface of the exact same
/// dimensions and returns the result.
///
/// Every output pixel is fully opaque: fully transparent pixels become pure
/// white, fully opaque pixels keep their color unchanged, and partially
/// transparent pixels are alpha-blended toward white. The operation is
/// idempotent on its own output since that output carries no transparency.
pub fn flatten_onto_white(src: &DynamicImage) -> RgbaImage {
    let src = src.to_rgba8();
    let (width, height) = src.dimensions();
    let mut out = RgbaImage::from_pixel(width, height, MATTE);

    for (x, y, px) in src.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *px;
        if a == 255 {
            out.put_pixel(x, y, Rgba([r, g, b, 255]));
        } else if a > 0 {
            out.put_pixel(
                x,
                y,
                Rgba([
                    blend_over_white(r, a),
                    blend_over_white(g, a),
                    blend_over_white(b, a),
                    255,
                ]),
            );
        }
        // a == 0: the white fill already is the correct result
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn rgba_image(pixels: &[[u8; 4]], width: u32, height: u32) -> DynamicImage {
        let mut img = RgbaImage::new(width, height);
        for (i, p) in pixels.iter().enumerate() {
            img.put_pixel(i as u32 % width, i as u32 / width, Rgba(*p));
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn dimensions_are_preserved() {
        let src = DynamicImage::ImageRgba8(RgbaImage::new(7, 13));
        let out = flatten_onto_white(&src);
        assert_eq!(out.dimensions(), (7, 13));
    }

    #[test]
    fn opaque_input_is_unchanged() {
        let src = rgba_image(
            &[[12, 34, 56, 255], [200, 0, 99, 255], [0, 0, 0, 255], [255, 255, 255, 255]],
            2,
            2,
        );
        let out = flatten_onto_white(&src);
        assert_eq!(DynamicImage::ImageRgba8(out), src);
    }

    #[test]
    fn fully_transparent_becomes_white() {
        let src = rgba_image(&[[255, 0, 0, 0], [0, 255, 0, 0]], 2, 1);
        let out = flatten_onto_white(&src);
        for p in out.pixels() {
            assert_eq!(*p, Rgba([255, 255, 255, 255]));
        }
    }

    #[test]
    fn partial_alpha_blends_toward_white() {
        // 50% black over white: round(0*128/255 + 255*127/255) = 127
        let src = rgba_image(&[[0, 0, 0, 128]], 1, 1);
        let out = flatten_onto_white(&src);
        let Rgba([r, g, b, a]) = *out.get_pixel(0, 0);
        assert_eq!(a, 255);
        assert_eq!((r, g, b), (127, 127, 127));
    }

    #[test]
    fn output_alpha_is_opaque_everywhere() {
        let src = rgba_image(
            &[[10, 20, 30, 0], [10, 20, 30, 1], [10, 20, 30, 254], [10, 20, 30, 255]],
            2,
            2,
        );
        for p in flatten_onto_white(&src).pixels() {
            assert_eq!(p[3], 255);
        }
    }

    #[test]
    fn idempotent_on_own_output() {
        let src = rgba_image(
            &[[200, 10, 10, 77], [0, 0, 255, 255], [30, 220, 30, 128], [9, 9, 9, 0]],
            2,
            2,
        );
        let once = flatten_onto_white(&src);
        let twice = flatten_onto_white(&DynamicImage::ImageRgba8(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn two_by_two_mixed_alpha_scenario() {
        // [transparent-red, opaque-blue, half-transparent-green, opaque-black]
        let src = rgba_image(
            &[[255, 0, 0, 0], [0, 0, 255, 255], [0, 200, 0, 128], [0, 0, 0, 255]],
            2,
            2,
        );
        let out = flatten_onto_white(&src);
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(1, 0), Rgba([0, 0, 255, 255]));
        let expected_g = blend_over_white(200, 128);
        assert_eq!(
            *out.get_pixel(0, 1),
            Rgba([blend_over_white(0, 128), expected_g, blend_over_white(0, 128), 255])
        );
        assert_eq!(*out.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
    }
}
