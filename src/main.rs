mod app;
mod app_data;
mod catalog;
mod cli;
mod config;
mod geo;
mod regions;
mod state;
mod task;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::catalog::{load_catalog, Catalog};
use crate::cli::Cli;
use crate::config::Config;

/// Load the application icon from embedded PNG data
fn load_icon() -> Option<egui::IconData> {
    let icon_data = include_bytes!("../assets/icon.png");
    let image = image::load_from_memory(icon_data).ok()?.into_rgba8();
    let (width, height) = image.dimensions();
    Some(egui::IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}

/// Initialize logging. CLI runs log to stderr so stdout stays parseable.
fn init_tracing(cli_mode: bool, verbose: bool) {
    let default_filter = match (cli_mode, verbose) {
        (true, false) => "hackhere=warn,warn",
        _ => "hackhere=debug,info",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_gui(config: Config, catalog: Arc<Catalog>) -> Result<()> {
    let icon = load_icon().map(Arc::new);
    let info = &app_data::app_data().app;
    let title = &info.title;

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 800.0])
        .with_min_inner_size([900.0, 600.0])
        .with_title(title);

    let viewport = if let Some(icon) = icon {
        viewport.with_icon(icon)
    } else {
        tracing::warn!("Failed to load application icon");
        viewport
    };

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true, // Save/restore window size and position
        ..Default::default()
    };

    eframe::run_native(
        &info.name,
        native_options,
        Box::new(|cc| Ok(Box::new(app::HackHereApp::new(cc, config, catalog)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.is_some(), cli.output.verbose);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config, using defaults: {:#}", e);
            Config::default()
        }
    };
    let catalog = Arc::new(load_catalog(&config.catalog));

    match cli.command {
        Some(command) => {
            if let Err(e) = cli::run(command, &cli.output, catalog).await {
                cli::print_error(&format!("{:#}", e));
                std::process::exit(1);
            }
            Ok(())
        }
        None => {
            tracing::info!("Starting HackHere with {} events", catalog.len());
            run_gui(config, catalog)
        }
    }
}
