mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod view;

use std::path::PathBuf;

use anyhow::Result;
use app::DashboardApp;
use clap::Parser;
use config::DashboardConfig;
use eframe::egui;
use state::{Action, AppState};

/// Irrigation and soil-moisture dashboard for the sugarcane monitoring project.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Workbook (.xlsx, .xls, .ods) or directory of per-sheet files to open.
    data: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if cli.data.is_some() {
        config.data_path = cli.data;
    }
    log::debug!("Configuration: {config:?}");

    let title = config.title.clone();
    let mut state = AppState::new(config);
    if let Some(path) = state.config.data_path.clone() {
        state.apply(Action::OpenResource(path));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
