//! Crate-level error type and `Result` alias for stable, structured error
//! handling. Converts underlying I/O and image codec errors, and provides
//! semantic variants for rejected inputs and clipboard failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Not an image: declared type {mime:?}")]
    NotAnImage { mime: String },

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}
