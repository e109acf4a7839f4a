#![doc = r#"
WHITEOUT — flatten image transparency onto an opaque white background.

This crate takes any decodable image and produces a pixel-identical copy in
which all transparent and semi-transparent regions are source-over composited
onto opaque white. It powers the WHITEOUT desktop app (drag-and-drop, file
picker, or clipboard paste in; clipboard or PNG file out) and can be embedded
in your own Rust applications through the library API.

Quick start: convert encoded bytes
----------------------------------
```rust,no_run
use whiteout::convert_image_bytes;

fn main() -> whiteout::Result<()> {
    let bytes = std::fs::read("logo.png")?;
    let converted = convert_image_bytes(&bytes)?;
    std::fs::write("converted.png", &converted.png)?;
    println!("{}x{}", converted.width, converted.height);
    Ok(())
}
```

Convert a file with MIME gating
-------------------------------
```rust,no_run
use std::path::Path;
use whiteout::{convert_image_file, Error};

fn main() {
    match convert_image_file(Path::new("sticker.webp")) {
        Ok(img) => println!("converted {}x{}", img.width, img.height),
        Err(e @ Error::NotAnImage { .. }) => eprintln!("not an image: {e}"),
        Err(other) => eprintln!("conversion failed: {other}"),
    }
}
```

Error handling
--------------
All public functions return `whiteout::Result<T>`; match on `whiteout::Error`
to distinguish rejected inputs (`NotAnImage`) from codec failures (`Image`)
and I/O errors.

Feature flags
-------------
- `gui`: builds the eframe desktop application module (on by default).
- `full`: enables the complete feature set.

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`core`] — compositing, codec, and MIME primitives.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod types;

// GUI module (only available with gui feature)
#[cfg(feature = "gui")]
pub mod gui;

// Curated public API surface
pub use api::{ConvertedImage, convert_image_bytes, convert_image_file, convert_rgba};
pub use crate::core::codec::{decode_image, encode_png, write_png_file};
pub use crate::core::composite::flatten_onto_white;
pub use crate::core::mime::{
    IMAGE_EXTENSIONS, image_mime_for_path, is_image_mime, sniff_image_mime,
};
pub use error::{Error, Result};
pub use types::{COPY_STATUS_RESET, CopyStatus};
