mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::InventoryApp;

#[derive(Parser, Debug)]
#[command(about = "Vehicle inventory desktop client")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    show_ids: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = load_settings();
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    settings.show_ids |= args.show_ids;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    backend_bridge::runtime::launch(settings.server_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Vehicle Inventory")
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    let show_ids = settings.show_ids;
    eframe::run_native(
        "Vehicle Inventory",
        options,
        Box::new(move |_cc| Ok(Box::new(InventoryApp::new(cmd_tx, ui_rx, show_ids)))),
    )
    .map_err(|err| anyhow::anyhow!("window failed: {err}"))
}
