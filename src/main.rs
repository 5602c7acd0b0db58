// GUI-subsystem binary on Windows: no console window is allocated.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use edinity::app::EdinityApp;

/// EdiNity photo editor.
#[derive(Parser, Debug)]
#[command(name = "edinity", about = "EdiNity photo editor")]
struct LaunchArgs {
    /// Image to open on startup.
    #[arg(value_name = "IMAGE")]
    image: Option<PathBuf>,
}

fn main() -> Result<(), eframe::Error> {
    let args = LaunchArgs::parse();

    // Initialize session log (overwrites previous session log)
    edinity::logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("EdiNity"),
        ..Default::default()
    };

    eframe::run_native(
        "EdiNity",
        options,
        Box::new(move |cc| Box::new(EdinityApp::new(cc, args.image))),
    )
}
