//! MIME gating for acquired inputs. Anything whose type does not begin with
//! `image/` is silently rejected before any decoding work happens.
use std::path::Path;

/// Returns true for MIME types of the `image/*` family.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Best-effort MIME type for a file path, derived from its extension.
/// Returns `None` for extensions we do not recognize as images.
pub fn image_mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}

/// Sniffs the MIME type from leading bytes when no path is available
/// (e.g. a drop payload delivered as raw bytes).
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    let kind = infer::get(bytes)?;
    let mime = kind.mime_type();
    is_image_mime(mime).then_some(mime)
}

/// File-picker extension filter, matching the types the decoder supports.
pub const IMAGE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "ico", "avif"];
