mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod view;

use std::path::PathBuf;

use app::CreatureVizApp;
use color::ColorScheme;
use config::ViewConfig;
use eframe::egui;
use state::AppState;

const DEFAULT_DATASET: &str = "pokemon_alopez247.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ViewConfig::from_env()?;
    let colors = ColorScheme::from_config(&config.colors)?;

    let dataset_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));

    let [min_w, min_h] = config.min_surface;
    let mut state = AppState::new(config, colors);
    state.start_load(&dataset_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([min_w + 40.0, min_h + 80.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Creature Viz – Linked Stat Views",
        options,
        Box::new(|_cc| Ok(Box::new(CreatureVizApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the viewer: {e}"))
}
