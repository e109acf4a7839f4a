use super::models::WhiteoutGui;
use crate::types::CopyStatus;
use eframe::egui::{self, Align, Color32, Layout, Rect, RichText, Sense, Stroke, Ui, Vec2, pos2};

const CHECKER_CELL: f32 = 8.0;
const CHECKER_LIGHT: Color32 = Color32::from_gray(200);
const CHECKER_DARK: Color32 = Color32::from_gray(150);

/// Scales `size` down (never up) to fit inside `avail`, keeping aspect ratio.
fn fit_inside(size: Vec2, avail: Vec2) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (avail.x / size.x).min(avail.y / size.y).min(1.0);
    size * scale
}

fn paint_checkerboard(painter: &egui::Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, CHECKER_LIGHT);
    let cols = (rect.width() / CHECKER_CELL).ceil() as i32;
    let rows = (rect.height() / CHECKER_CELL).ceil() as i32;
    for row in 0..rows {
        for col in 0..cols {
            if (row + col) % 2 == 0 {
                continue;
            }
            let min = pos2(
                rect.min.x + col as f32 * CHECKER_CELL,
                rect.min.y + row as f32 * CHECKER_CELL,
            );
            let cell = Rect::from_min_size(min, Vec2::splat(CHECKER_CELL)).intersect(rect);
            painter.rect_filled(cell, 0.0, CHECKER_DARK);
        }
    }
}

pub struct DropZoneComponent;

impl DropZoneComponent {
    pub fn render(ui: &mut Ui, app: &mut WhiteoutGui) {
        let (fill, stroke) = if app.drag_hover {
            (Color32::from_rgb(40, 60, 40), Stroke::new(2.0, Color32::from_rgb(100, 200, 100)))
        } else {
            (Color32::from_rgb(35, 35, 35), Stroke::new(1.0, Color32::from_gray(80)))
        };

        egui::Frame::new()
            .fill(fill)
            .stroke(stroke)
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::same(16))
            .show(ui, |ui| {
                ui.set_min_height(70.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new("Drop an image here, or paste one from the clipboard")
                            .size(15.0)
                            .color(Color32::from_gray(200)),
                    );
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.add_space(ui.available_width() / 2.0 - 60.0);
                        if ui.button("Browse for image").clicked() {
                            app.select_input_file();
                        }
                    });
                    if let Some(err) = &app.last_error {
                        ui.add_space(6.0);
                        ui.label(
                            RichText::new(format!("Could not convert: {}", err))
                                .color(Color32::from_rgb(255, 100, 100))
                                .size(12.0),
                        );
                    }
                });
            });
    }
}

pub struct PreviewComponent;

impl PreviewComponent {
    pub fn render(ui: &mut Ui, app: &mut WhiteoutGui) {
        let ctx = ui.ctx().clone();
        let avail = ui.available_size();
        let pane = Vec2::new((avail.x - 20.0) / 2.0, avail.y - 30.0);

        ui.columns(2, |columns| {
            // Original over a checkerboard, so transparency is visible
            columns[0].vertical_centered(|ui| {
                ui.label(RichText::new("Original").strong());
                if let Some(original) = &mut app.original {
                    let size = fit_inside(original.size(), pane);
                    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
                    paint_checkerboard(ui.painter(), rect);
                    ui.painter().image(
                        original.texture_id(&ctx),
                        rect,
                        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                    ui.label(
                        RichText::new(format!("{}x{}", original.width, original.height))
                            .size(11.0)
                            .color(Color32::from_gray(120)),
                    );
                }
            });

            // Converted over the panel background; it is opaque everywhere
            columns[1].vertical_centered(|ui| {
                ui.label(RichText::new("Converted").strong());
                if let Some(converted) = &mut app.converted {
                    let size = fit_inside(converted.preview.size(), pane);
                    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
                    ui.painter().image(
                        converted.preview.texture_id(&ctx),
                        rect,
                        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                    ui.label(
                        RichText::new(format!(
                            "{}x{}",
                            converted.preview.width, converted.preview.height
                        ))
                        .size(11.0)
                        .color(Color32::from_gray(120)),
                    );
                } else if app.is_converting {
                    ui.add_space(pane.y / 2.0);
                    ui.spinner();
                }
            });
        });
    }
}

pub struct ActionsComponent;

impl ActionsComponent {
    pub fn render(ui: &mut Ui, app: &mut WhiteoutGui) {
        // Actions only exist once both previews are present
        if app.original.is_none() || app.converted.is_none() {
            return;
        }

        ui.horizontal(|ui| {
            let copy_label = match app.copy_status {
                CopyStatus::Idle => RichText::new("Copy to clipboard").color(Color32::WHITE),
                CopyStatus::Success => {
                    RichText::new("Copied!").color(Color32::from_rgb(100, 200, 100))
                }
                CopyStatus::Error => {
                    RichText::new("Copy failed").color(Color32::from_rgb(255, 100, 100))
                }
            };
            if ui.button(copy_label.size(14.0)).clicked() {
                app.copy_to_clipboard();
            }

            if ui
                .button(RichText::new("Download PNG").size(14.0).color(Color32::WHITE))
                .clicked()
            {
                app.download();
            }
        });
    }
}

pub struct FooterComponent;

impl FooterComponent {
    pub fn render(ui: &mut Ui, app: &mut WhiteoutGui) {
        // Update system statistics
        app.update_system_stats();

        ui.horizontal(|ui| {
            let status_color = if app.is_converting {
                Color32::from_rgb(255, 165, 0)
            } else {
                Color32::from_rgb(100, 200, 100)
            };

            let status_text = if app.is_converting {
                if let Some(start) = app.conversion_start_time {
                    format!("Converting: {:.2?}", start.elapsed())
                } else {
                    "Converting...".to_string()
                }
            } else if let Some(duration) = app.last_conversion_duration {
                format!("Last conversion: {:.2?}", duration)
            } else {
                "Ready".to_string()
            };

            ui.label(RichText::new(status_text).color(status_color).size(14.0));

            ui.separator();

            let cpu_color = if app.cpu_usage > 80.0 {
                Color32::from_rgb(255, 100, 100)
            } else if app.cpu_usage > 50.0 {
                Color32::from_rgb(255, 165, 0)
            } else {
                Color32::from_rgb(100, 200, 100)
            };

            ui.label(
                RichText::new(format!("CPU: {:.1}%", app.cpu_usage))
                    .color(cpu_color)
                    .size(12.0),
            );

            ui.separator();

            let memory_percent = if app.total_memory_mb > 0.0 {
                (app.memory_usage_mb / app.total_memory_mb) * 100.0
            } else {
                0.0
            };

            let memory_color = if memory_percent > 80.0 {
                Color32::from_rgb(255, 100, 100)
            } else if memory_percent > 60.0 {
                Color32::from_rgb(255, 165, 0)
            } else {
                Color32::from_rgb(100, 200, 100)
            };

            ui.label(
                RichText::new(format!(
                    "RAM: {:.1} GB / {:.1} GB ({:.1}%)",
                    app.memory_usage_mb / 1024.0,
                    app.total_memory_mb / 1024.0,
                    memory_percent
                ))
                .color(memory_color)
                .size(12.0),
            );

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("Save Logs").clicked() {
                    if let Err(e) = app.save_logs_to_file() {
                        tracing::error!("Failed to save logs: {}", e);
                    }
                }

                if ui.button("Clear").clicked() {
                    if let Ok(mut logs) = app.log_messages.lock() {
                        logs.clear();
                    }
                }

                if ui.button("Reset").clicked() {
                    *app = WhiteoutGui::default();
                }
            });
        });
    }
}
