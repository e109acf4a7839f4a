use super::components::*;
use super::models::WhiteoutGui;
use crate::gui::logging::{LogEntry, get_log_buffer};
use eframe::egui;
use std::time::{Duration, Instant};
use tracing::Level;

fn format_log_entry(entry: &LogEntry) -> egui::RichText {
    let (color, icon) = match entry.level {
        Level::ERROR => (egui::Color32::from_rgb(255, 100, 100), "❌"),
        Level::WARN => (egui::Color32::from_rgb(255, 200, 100), "⚠️"),
        Level::INFO => (egui::Color32::from_rgb(100, 200, 255), "ℹ️"),
        Level::DEBUG => (egui::Color32::from_rgb(150, 150, 150), "🔍"),
        Level::TRACE => (egui::Color32::from_rgb(100, 100, 100), "🔎"),
    };

    let formatted_text = format!(
        "[{}] {} {}: {}",
        entry.timestamp, icon, entry.level, entry.message
    );

    egui::RichText::new(formatted_text).color(color).monospace()
}

impl eframe::App for WhiteoutGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Initialize logging on first update
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            crate::gui::models::init_gui_logging();
        });

        // Dark theme
        let mut style = (*ctx.style()).clone();
        style.visuals.override_text_color = Some(egui::Color32::from_gray(220));
        style.visuals.widgets.noninteractive.bg_fill = egui::Color32::from_rgb(40, 40, 40);
        style.visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(50, 50, 50);
        style.visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(60, 60, 60);
        style.visuals.widgets.active.bg_fill = egui::Color32::from_rgb(70, 70, 70);
        style.visuals.panel_fill = egui::Color32::from_rgb(30, 30, 30);
        style.visuals.window_fill = egui::Color32::from_rgb(25, 25, 25);
        style.visuals.faint_bg_color = egui::Color32::from_rgb(45, 45, 45);
        style.visuals.extreme_bg_color = egui::Color32::from_rgb(20, 20, 20);

        ctx.set_style(style);

        // Window-level input: drag-hover highlight, drop payloads, and paste.
        // The paste listener lives exactly as long as this update loop.
        self.drag_hover = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() {
            self.handle_dropped_files(dropped);
        }
        let paste_requested = ctx.input(|i| {
            i.events
                .iter()
                .any(|e| matches!(e, egui::Event::Paste(_)))
                || (i.modifiers.command && i.key_pressed(egui::Key::V))
        });
        if paste_requested {
            self.handle_paste();
        }

        // Apply background results: conversions (last writer wins) and copy
        // outcomes, then the scheduled copy-status reversion.
        let mut needs_repaint = self.poll_worker_events();
        needs_repaint |= self.poll_copy_outcomes();
        if self.poll_copy_status(Instant::now()) {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new("WHITEOUT")
                                .size(42.0)
                                .color(egui::Color32::from_gray(220))
                                .strong(),
                        );
                        ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                            ui.label(
                                egui::RichText::new(format!("v{} ", env!("CARGO_PKG_VERSION")))
                                    .size(10.0)
                                    .color(egui::Color32::WHITE),
                            );
                            ui.label(
                                egui::RichText::new("MIT - Apache-2.0 License")
                                    .size(10.0)
                                    .color(egui::Color32::from_gray(150)),
                            );
                        });
                    });
                    ui.label(
                        egui::RichText::new("FLATTEN IMAGE TRANSPARENCY ONTO WHITE")
                            .size(12.0)
                            .color(egui::Color32::from_gray(220))
                            .strong(),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ActionsComponent::render(ui, self);
                });
            });
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            FooterComponent::render(ui, self);
        });

        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(140.0)
            .show(ctx, |ui| {
                // Handle incoming log messages
                let mut has_new_logs = false;
                let log_buffer = get_log_buffer();
                let mut new_messages = Vec::new();
                if let Ok(mut buf) = log_buffer.lock() {
                    if !buf.is_empty() {
                        new_messages.extend(buf.drain(..));
                    }
                }
                if !new_messages.is_empty() {
                    if let Ok(mut logs) = self.log_messages.lock() {
                        logs.extend(new_messages);
                        // Keep only last 1000 messages to prevent memory issues
                        let len = logs.len();
                        if len > 1000 {
                            logs.drain(0..(len - 1000));
                        }
                    }
                    has_new_logs = true;
                }

                if has_new_logs {
                    needs_repaint = true;
                }

                ui.horizontal(|ui| {
                    ui.label("Log Output");

                    // Log level filter buttons
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.selectable_value(&mut self.min_log_level, Level::ERROR, "ERROR");
                        ui.selectable_value(&mut self.min_log_level, Level::WARN, "WARN");
                        ui.selectable_value(&mut self.min_log_level, Level::INFO, "INFO");
                        ui.selectable_value(&mut self.min_log_level, Level::DEBUG, "DEBUG");
                        ui.selectable_value(&mut self.min_log_level, Level::TRACE, "ALL");
                    });
                });

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if let Ok(logs) = self.log_messages.lock() {
                            if logs.is_empty() {
                                ui.centered_and_justified(|ui| {
                                    ui.label(
                                        egui::RichText::new("No log messages")
                                            .color(egui::Color32::from_gray(120)),
                                    );
                                });
                            } else {
                                for entry in logs.iter() {
                                    if self.min_log_level == Level::TRACE
                                        || entry.level == self.min_log_level
                                    {
                                        ui.label(format_log_entry(entry));
                                    }
                                }
                            }
                        }
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            DropZoneComponent::render(ui, self);
            ui.add_space(10.0);
            if self.original.is_some() {
                PreviewComponent::render(ui, self);
            }
        });

        if needs_repaint || self.is_converting {
            ctx.request_repaint();
        }
    }
}
