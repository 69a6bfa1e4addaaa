use std::process;

use eframe::egui;
use eyeswap_core::Preferences;

mod app;
mod headless;

fn main() -> eframe::Result<()> {
    let (console, log_level_state) = app::setup_tracing();

    tracing::info!("Eyeswap starting");

    let args: Vec<String> = std::env::args().collect();
    match headless::maybe_run_headless(&args) {
        Ok(true) => return Ok(()),
        Ok(false) => {}
        Err(err) => {
            eprintln!("headless error: {err}");
            process::exit(1);
        }
    }

    let preferences = Preferences::load_or_default();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 600.0]),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };
    eframe::run_native(
        "Eyeswap",
        native_options,
        Box::new(|_cc| Ok(Box::new(app::EyeSwapApp::new(console, log_level_state, preferences)))),
    )
}
