use super::models::{ConvertedOutput, ImagePreview, WhiteoutGui};
use crate::core::codec::{encode_png, write_png_file};
use crate::core::composite::flatten_onto_white;
use crate::core::mime::{IMAGE_EXTENSIONS, image_mime_for_path, is_image_mime, sniff_image_mime};
use crate::types::CopyStatus;
use image::RgbaImage;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, trace, warn};

/// Progress reports from a conversion worker. The source preview arrives
/// first so the original is visible while compositing is still running.
pub enum WorkerEvent {
    SourceLoaded(ImagePreview),
    Converted {
        preview: ImagePreview,
        rgba: Arc<RgbaImage>,
        png: Arc<Vec<u8>>,
    },
    Failed {
        name: String,
        error: String,
    },
}

/// Result of a background clipboard write.
pub enum CopyOutcome {
    Success,
    Failure(crate::error::Error),
}

/// What a conversion worker starts from.
enum ConversionInput {
    /// A file on disk; read and decoded in the worker.
    Path(PathBuf),
    /// Encoded bytes handed over directly (drop payloads without a path).
    Encoded(Vec<u8>),
    /// Already-decoded pixels (clipboard paste).
    Decoded(RgbaImage),
}

impl WhiteoutGui {
    pub fn select_input_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image files", IMAGE_EXTENSIONS)
            .pick_file()
        {
            info!("Selected input file: {:?}", path);
            self.acquire_path(path);
        }
    }

    /// Entry point for all path-based acquisition. Non-image types are a
    /// silent no-op: no error is surfaced and no state changes.
    pub fn acquire_path(&mut self, path: PathBuf) {
        let Some(mime) = image_mime_for_path(&path) else {
            trace!("Ignoring non-image path: {:?}", path);
            return;
        };
        debug!("Acquiring {:?} ({})", path, mime);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        self.spawn_conversion(name, ConversionInput::Path(path));
    }

    /// Handles a drop payload. Only the first file is used; any additional
    /// files are discarded.
    pub fn handle_dropped_files(&mut self, mut files: Vec<eframe::egui::DroppedFile>) {
        if files.is_empty() {
            return;
        }
        if files.len() > 1 {
            debug!("Multi-file drop: using the first of {} files", files.len());
        }
        let file = files.swap_remove(0);

        if let Some(path) = file.path {
            self.acquire_path(path);
        } else if let Some(bytes) = file.bytes {
            // No path to inspect; gate on the declared MIME, falling back to
            // sniffing the bytes.
            let declared = if file.mime.is_empty() { None } else { Some(file.mime.as_str()) };
            let accepted = match declared {
                Some(mime) => is_image_mime(mime),
                None => sniff_image_mime(&bytes).is_some(),
            };
            if !accepted {
                trace!("Ignoring non-image drop payload: {:?}", file.name);
                return;
            }
            let name = if file.name.is_empty() { "dropped image".to_string() } else { file.name };
            self.spawn_conversion(name, ConversionInput::Encoded(bytes.to_vec()));
        }
    }

    /// Reads an image off the system clipboard, if there is one. Non-image
    /// clipboard content is a no-op.
    pub fn handle_paste(&mut self) {
        let image = arboard::Clipboard::new().and_then(|mut cb| cb.get_image());
        match image {
            Ok(img) => {
                let (width, height) = (img.width as u32, img.height as u32);
                match RgbaImage::from_raw(width, height, img.bytes.into_owned()) {
                    Some(rgba) => {
                        debug!("Pasted clipboard image: {}x{}", width, height);
                        self.spawn_conversion(
                            "clipboard image".to_string(),
                            ConversionInput::Decoded(rgba),
                        );
                    }
                    None => warn!("Clipboard image had inconsistent dimensions"),
                }
            }
            Err(e) => trace!("Paste without clipboard image: {}", e),
        }
    }

    /// Spawns a background conversion. There is no cancellation of earlier
    /// jobs: results are applied in completion order and the last one wins.
    fn spawn_conversion(&mut self, name: String, input: ConversionInput) {
        self.is_converting = true;
        self.conversion_start_time = Some(Instant::now());
        self.last_conversion_duration = None;

        let tx = self.worker_tx.clone();
        std::thread::spawn(move || {
            trace!("Conversion worker started for {:?}", name);

            let decoded = match input {
                ConversionInput::Path(path) => std::fs::read(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|bytes| {
                        crate::core::codec::decode_image(&bytes).map_err(|e| e.to_string())
                    }),
                ConversionInput::Encoded(bytes) => {
                    crate::core::codec::decode_image(&bytes).map_err(|e| e.to_string())
                }
                ConversionInput::Decoded(rgba) => Ok(image::DynamicImage::ImageRgba8(rgba)),
            };

            let decoded = match decoded {
                Ok(img) => img,
                Err(e) => {
                    error!("Failed to load {:?}: {}", name, e);
                    let _ = tx.send(WorkerEvent::Failed { name, error: e });
                    return;
                }
            };

            // Show the original right away; compositing follows.
            let source = decoded.to_rgba8();
            let _ = tx.send(WorkerEvent::SourceLoaded(ImagePreview::from_rgba(
                format!("{} (original)", name),
                &source,
            )));

            let flattened = flatten_onto_white(&decoded);
            match encode_png(&flattened) {
                Ok(png) => {
                    let preview =
                        ImagePreview::from_rgba(format!("{} (converted)", name), &flattened);
                    info!(
                        "Converted {:?}: {}x{}, {} PNG bytes",
                        name,
                        flattened.width(),
                        flattened.height(),
                        png.len()
                    );
                    let _ = tx.send(WorkerEvent::Converted {
                        preview,
                        rgba: Arc::new(flattened),
                        png: Arc::new(png),
                    });
                }
                Err(e) => {
                    error!("Failed to encode {:?}: {}", name, e);
                    let _ = tx.send(WorkerEvent::Failed {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        });
    }

    /// Drains worker events. Called once per frame; returns true if any
    /// event was applied so the caller can request a repaint.
    pub fn poll_worker_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.worker_rx.try_recv() {
            changed = true;
            match event {
                WorkerEvent::SourceLoaded(preview) => {
                    debug!("Source loaded: {}x{}", preview.width, preview.height);
                    self.original = Some(preview);
                    self.converted = None;
                    self.last_error = None;
                }
                WorkerEvent::Converted { preview, rgba, png } => {
                    if let Some(start) = self.conversion_start_time.take() {
                        let duration = start.elapsed();
                        self.last_conversion_duration = Some(duration);
                        info!("Conversion completed in {:.2?}", duration);
                    }
                    self.converted = Some(ConvertedOutput { preview, rgba, png });
                    self.is_converting = false;
                    self.last_error = None;
                }
                WorkerEvent::Failed { name, error } => {
                    self.is_converting = false;
                    self.conversion_start_time = None;
                    self.last_error = Some(format!("{}: {}", name, error));
                }
            }
        }
        changed
    }

    /// Writes the composited surface to the system clipboard in the
    /// background. The outcome lands on the copy channel.
    pub fn copy_to_clipboard(&mut self) {
        let Some(converted) = &self.converted else {
            return;
        };
        let rgba = converted.rgba.clone();
        let tx = self.copy_tx.clone();
        std::thread::spawn(move || {
            let result = arboard::Clipboard::new().and_then(|mut cb| {
                cb.set_image(arboard::ImageData {
                    width: rgba.width() as usize,
                    height: rgba.height() as usize,
                    bytes: Cow::Borrowed(rgba.as_raw()),
                })
            });
            let outcome = match result {
                Ok(()) => {
                    info!("Copied converted image to clipboard");
                    CopyOutcome::Success
                }
                Err(e) => {
                    // Stringify at the channel boundary; arboard's error type
                    // stays out of the core error surface.
                    let err = crate::error::Error::Clipboard(e.to_string());
                    error!("{}", err);
                    CopyOutcome::Failure(err)
                }
            };
            let _ = tx.send(outcome);
        });
    }

    /// Drains copy outcomes, flipping the button status and (re)scheduling
    /// its reversion to idle.
    pub fn poll_copy_outcomes(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.copy_rx.try_recv() {
            changed = true;
            let status = match outcome {
                CopyOutcome::Success => CopyStatus::Success,
                CopyOutcome::Failure(_) => CopyStatus::Error,
            };
            self.apply_copy_outcome(status, Instant::now());
        }
        changed
    }

    /// Saves the converted PNG under a user-chosen location, pre-filled with
    /// the fixed `converted.png` name.
    pub fn download(&mut self) {
        let Some(converted) = &self.converted else {
            return;
        };
        let png = converted.png.clone();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name("converted.png")
            .save_file()
        {
            match write_png_file(&png, &path) {
                Ok(()) => info!("Saved converted image to {:?}", path),
                Err(e) => {
                    error!("Failed to save {:?}: {}", path, e);
                    self.last_error = Some(format!("save failed: {}", e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::DroppedFile;
    use std::time::Duration;

    fn dropped(path: PathBuf) -> DroppedFile {
        DroppedFile {
            path: Some(path),
            ..Default::default()
        }
    }

    #[test]
    fn non_image_acquisition_is_a_silent_no_op() {
        let mut gui = WhiteoutGui::default();
        for name in ["notes.txt", "report.pdf", "archive.zip", "no_extension"] {
            gui.acquire_path(PathBuf::from(name));
        }
        assert!(!gui.is_converting);
        assert!(gui.original.is_none());
        assert!(gui.converted.is_none());
        assert!(gui.last_error.is_none());
        assert!(gui.worker_rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn multi_file_drop_processes_only_the_first() {
        let dir = tempfile::tempdir().unwrap();

        let first = dir.path().join("first.png");
        image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 0]))
            .save(&first)
            .unwrap();
        let second = dir.path().join("second.png");
        image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 255, 255]))
            .save(&second)
            .unwrap();

        let mut gui = WhiteoutGui::default();
        gui.handle_dropped_files(vec![dropped(first), dropped(second)]);

        let event = gui.worker_rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(matches!(event, WorkerEvent::SourceLoaded(_)));

        match gui.worker_rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            WorkerEvent::Converted { rgba, .. } => {
                // the transparent red pixel of the first file, matted to white
                assert_eq!(*rgba.get_pixel(0, 0), image::Rgba([255, 255, 255, 255]));
            }
            _ => panic!("expected the first file's conversion"),
        }

        // the second file produces no events at all
        assert!(gui.worker_rx.recv_timeout(Duration::from_millis(300)).is_err());
    }

    #[test]
    fn pathless_drop_with_non_image_mime_is_ignored() {
        let mut gui = WhiteoutGui::default();
        gui.handle_dropped_files(vec![DroppedFile {
            name: "snippet.txt".to_string(),
            mime: "text/plain".to_string(),
            bytes: Some(Arc::from(&b"hello clipboard"[..])),
            ..Default::default()
        }]);

        assert!(!gui.is_converting);
        assert!(gui.worker_rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn pathless_drop_without_mime_is_gated_by_sniffing() {
        let png = encode_png(&RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 128]))).unwrap();

        let mut gui = WhiteoutGui::default();

        // undeclared type, non-image bytes: rejected by the sniffer
        gui.handle_dropped_files(vec![DroppedFile {
            bytes: Some(Arc::from(&b"just some prose"[..])),
            ..Default::default()
        }]);
        assert!(gui.worker_rx.recv_timeout(Duration::from_millis(200)).is_err());

        // undeclared type, PNG bytes: sniffed and converted
        gui.handle_dropped_files(vec![DroppedFile {
            bytes: Some(Arc::from(png.as_slice())),
            ..Default::default()
        }]);
        let event = gui.worker_rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(matches!(event, WorkerEvent::SourceLoaded(_)));
        assert!(matches!(
            gui.worker_rx.recv_timeout(Duration::from_secs(10)).unwrap(),
            WorkerEvent::Converted { .. }
        ));
    }

    #[test]
    fn clipboard_failure_surfaces_as_error_status() {
        let mut gui = WhiteoutGui::default();
        gui.copy_tx
            .send(CopyOutcome::Failure(crate::error::Error::Clipboard(
                "permission denied".to_string(),
            )))
            .unwrap();

        assert!(gui.poll_copy_outcomes());
        assert_eq!(gui.copy_status, CopyStatus::Error);

        gui.copy_tx.send(CopyOutcome::Success).unwrap();
        gui.poll_copy_outcomes();
        assert_eq!(gui.copy_status, CopyStatus::Success);
    }
}
