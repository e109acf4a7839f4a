//! WHITEOUT GUI entrypoint.
//!
//! The whole application is the eframe window; there is no CLI surface.
//! For programmatic use, prefer the library API (`whiteout::api`).

#[cfg(feature = "gui")]
use eframe::{NativeOptions, egui::ViewportBuilder};
#[cfg(feature = "gui")]
use whiteout::gui::models::WhiteoutGui;

#[cfg(feature = "gui")]
fn main() -> Result<(), eframe::Error> {
    let options = NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([600.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "WHITEOUT",
        options,
        Box::new(|_cc| Ok(Box::new(WhiteoutGui::default()))),
    )
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("GUI feature is not enabled. Please build with --features gui");
    std::process::exit(1);
}
