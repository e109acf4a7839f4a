use crate::gui::logging::{GuiLogLayer, LogEntry};
use crate::gui::processing::{CopyOutcome, WorkerEvent};
use crate::types::{COPY_STATUS_RESET, CopyStatus};
use eframe::egui;
use once_cell::sync::OnceCell;
use std::fs;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

static LOGGING_INIT: OnceCell<()> = OnceCell::new();

pub fn init_gui_logging() {
    LOGGING_INIT.get_or_init(|| {
        let gui_layer = GuiLogLayer::new();

        // Keep eframe/winit internals out of the panel.
        let filter = EnvFilter::new("trace")
            .add_directive("eframe=info".parse().unwrap())
            .add_directive("winit=info".parse().unwrap());

        let subscriber = Registry::default().with(gui_layer).with(filter);
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// A displayable image: dimensions plus a lazily uploaded GPU texture.
/// The pixel data is held as an `egui::ColorImage` until the first frame
/// that needs it, then moved into the texture.
pub struct ImagePreview {
    pub name: String,
    pub width: u32,
    pub height: u32,
    image: Option<egui::ColorImage>,
    texture: Option<egui::TextureHandle>,
}

impl ImagePreview {
    pub fn new(name: String, width: u32, height: u32, image: egui::ColorImage) -> Self {
        Self {
            name,
            width,
            height,
            image: Some(image),
            texture: None,
        }
    }

    pub fn from_rgba(name: String, rgba: &image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            rgba.as_raw(),
        );
        Self::new(name, width, height, image)
    }

    pub fn size(&self) -> egui::Vec2 {
        egui::vec2(self.width as f32, self.height as f32)
    }

    /// Uploads the pixels on first use and returns the texture id.
    pub fn texture_id(&mut self, ctx: &egui::Context) -> egui::TextureId {
        if self.texture.is_none() {
            let image = self
                .image
                .take()
                .unwrap_or_else(|| egui::ColorImage::filled([1, 1], egui::Color32::WHITE));
            self.texture =
                Some(ctx.load_texture(self.name.clone(), image, egui::TextureOptions::LINEAR));
        }
        self.texture.as_ref().map(|t| t.id()).unwrap_or_default()
    }
}

/// The composited result: preview plus the surfaces the copy and download
/// actions hand to worker threads.
pub struct ConvertedOutput {
    pub preview: ImagePreview,
    pub rgba: Arc<image::RgbaImage>,
    pub png: Arc<Vec<u8>>,
}

pub struct WhiteoutGui {
    // Conversion state
    pub original: Option<ImagePreview>,
    pub converted: Option<ConvertedOutput>,
    pub is_converting: bool,
    pub conversion_start_time: Option<Instant>,
    pub last_conversion_duration: Option<Duration>,
    pub last_error: Option<String>,

    // Input state
    pub drag_hover: bool,

    // Copy action state
    pub copy_status: CopyStatus,
    copy_status_reset_at: Option<Instant>,

    // Log panel
    pub min_log_level: Level,
    pub log_messages: Arc<Mutex<Vec<LogEntry>>>,

    // Channels between the UI loop and worker threads. The receivers are
    // drained every frame; whichever conversion finishes last wins.
    pub(crate) worker_tx: Sender<WorkerEvent>,
    pub(crate) worker_rx: Receiver<WorkerEvent>,
    pub(crate) copy_tx: Sender<CopyOutcome>,
    pub(crate) copy_rx: Receiver<CopyOutcome>,

    // System monitoring
    pub cpu_usage: f32,
    pub memory_usage_mb: f64,
    pub total_memory_mb: f64,
    pub system_monitor: Option<sysinfo::System>,
    pub last_system_update: Option<Instant>,
}

impl Default for WhiteoutGui {
    fn default() -> Self {
        let (worker_tx, worker_rx) = std::sync::mpsc::channel();
        let (copy_tx, copy_rx) = std::sync::mpsc::channel();
        Self {
            original: None,
            converted: None,
            is_converting: false,
            conversion_start_time: None,
            last_conversion_duration: None,
            last_error: None,
            drag_hover: false,
            copy_status: CopyStatus::Idle,
            copy_status_reset_at: None,
            min_log_level: Level::INFO,
            log_messages: Arc::new(Mutex::new(Vec::new())),
            worker_tx,
            worker_rx,
            copy_tx,
            copy_rx,
            cpu_usage: 0.0,
            memory_usage_mb: 0.0,
            total_memory_mb: 0.0,
            system_monitor: None,
            last_system_update: None,
        }
    }
}

impl WhiteoutGui {
    /// Records a copy outcome and schedules the reversion to idle. A newer
    /// outcome supersedes any pending reset: the deadline is rescheduled,
    /// never left to a stale timer.
    pub fn apply_copy_outcome(&mut self, status: CopyStatus, now: Instant) {
        self.copy_status = status;
        self.copy_status_reset_at = match status {
            CopyStatus::Idle => None,
            CopyStatus::Success | CopyStatus::Error => Some(now + COPY_STATUS_RESET),
        };
    }

    /// Reverts the copy status to idle once its deadline has passed.
    /// Returns true while a reset is still pending, so the caller knows to
    /// keep repainting.
    pub fn poll_copy_status(&mut self, now: Instant) -> bool {
        match self.copy_status_reset_at {
            Some(at) if now >= at => {
                self.copy_status = CopyStatus::Idle;
                self.copy_status_reset_at = None;
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    pub fn save_logs_to_file(&self) -> Result<(), Box<dyn std::error::Error>> {
        let logs = self
            .log_messages
            .lock()
            .map_err(|e| format!("Failed to lock logs: {}", e))?;

        if logs.is_empty() {
            return Err("No logs to save".into());
        }

        let filtered_logs: Vec<&LogEntry> = logs
            .iter()
            .filter(|entry| {
                self.min_log_level == Level::TRACE || entry.level == self.min_log_level
            })
            .collect();

        if filtered_logs.is_empty() {
            return Err("No logs match the current filter level".into());
        }

        if let Some(save_path) = rfd::FileDialog::new()
            .add_filter("Log files", &["log"])
            .set_file_name("whiteout.log")
            .save_file()
        {
            let mut log_content = String::new();
            log_content.push_str("=== WHITEOUT Log File ===\n");
            log_content.push_str(&format!("Generated: {}\n", chrono::Utc::now().to_rfc3339()));
            log_content.push_str(&format!(
                "Filter Level: {}\n",
                match self.min_log_level {
                    Level::ERROR => "ERROR",
                    Level::WARN => "WARN",
                    Level::INFO => "INFO",
                    Level::DEBUG => "DEBUG",
                    Level::TRACE => "ALL",
                }
            ));
            log_content.push_str(&format!("Total Logs: {}\n", filtered_logs.len()));
            log_content.push_str("=========================\n\n");

            for entry in &filtered_logs {
                log_content.push_str(&format!(
                    "[{}] {} {}: {}\n",
                    entry.timestamp, entry.level, entry.target, entry.message
                ));
            }

            fs::write(&save_path, log_content)?;

            tracing::info!(
                "Filtered logs saved to: {:?} ({} entries)",
                save_path,
                filtered_logs.len()
            );

            Ok(())
        } else {
            Err("No save location selected".into())
        }
    }

    /// Update system statistics (CPU and memory usage)
    pub fn update_system_stats(&mut self) {
        // Only update every 2 seconds to avoid excessive system calls
        let now = Instant::now();
        if let Some(last_update) = self.last_system_update {
            if now.duration_since(last_update).as_secs() < 2 {
                return;
            }
        }

        if self.system_monitor.is_none() {
            self.system_monitor = Some(sysinfo::System::new_all());
        }

        if let Some(ref mut sys) = self.system_monitor {
            sys.refresh_all();
            self.cpu_usage = sys.global_cpu_usage();
            self.memory_usage_mb = sys.used_memory() as f64 / 1024.0 / 1024.0;
            self.total_memory_mb = sys.total_memory() as f64 / 1024.0 / 1024.0;
        }

        self.last_system_update = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_status_reverts_after_deadline() {
        let mut gui = WhiteoutGui::default();
        let t0 = Instant::now();

        gui.apply_copy_outcome(CopyStatus::Success, t0);
        assert_eq!(gui.copy_status, CopyStatus::Success);

        // still pending just before the deadline
        assert!(gui.poll_copy_status(t0 + COPY_STATUS_RESET - Duration::from_millis(1)));
        assert_eq!(gui.copy_status, CopyStatus::Success);

        assert!(!gui.poll_copy_status(t0 + COPY_STATUS_RESET));
        assert_eq!(gui.copy_status, CopyStatus::Idle);
    }

    #[test]
    fn newer_outcome_reschedules_the_reset() {
        let mut gui = WhiteoutGui::default();
        let t0 = Instant::now();

        gui.apply_copy_outcome(CopyStatus::Success, t0);

        // a second copy lands 1.5s later with an error
        let t1 = t0 + Duration::from_millis(1500);
        gui.apply_copy_outcome(CopyStatus::Error, t1);

        // the first deadline must no longer flip the status
        gui.poll_copy_status(t0 + COPY_STATUS_RESET);
        assert_eq!(gui.copy_status, CopyStatus::Error);

        // the rescheduled deadline does
        gui.poll_copy_status(t1 + COPY_STATUS_RESET);
        assert_eq!(gui.copy_status, CopyStatus::Idle);
    }

    #[test]
    fn idle_outcome_clears_any_pending_reset() {
        let mut gui = WhiteoutGui::default();
        let t0 = Instant::now();

        gui.apply_copy_outcome(CopyStatus::Error, t0);
        gui.apply_copy_outcome(CopyStatus::Idle, t0 + Duration::from_millis(10));
        assert!(!gui.poll_copy_status(t0 + COPY_STATUS_RESET));
        assert_eq!(gui.copy_status, CopyStatus::Idle);
    }
}
