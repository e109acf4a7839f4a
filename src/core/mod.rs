//! Core building blocks: white-matte compositing, PNG encode/decode helpers,
//! and MIME gating. These are internal primitives consumed by the high-level
//! `api` module and the GUI.
pub mod codec;
pub mod composite;
pub mod mime;
