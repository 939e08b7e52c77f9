use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use ui::{RaffleApp, StartupConfig};

const APP_TITLE: &str = "Raffle Draw";

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for reproducible draws.
    #[arg(long)]
    seed: Option<u64>,
    /// Disable the confetti overlay.
    #[arg(long)]
    no_confetti: bool,
}

fn load_startup_config(args: &Args) -> anyhow::Result<StartupConfig> {
    let settings = raffle_core::load_settings(args.config.as_deref())?;
    settings.validate()?;
    Ok(StartupConfig {
        settings,
        seed: args.seed,
        celebrations: !args.no_confetti,
    })
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let startup = match load_startup_config(&args) {
        Ok(startup) => startup,
        Err(err) => {
            tracing::error!("failed to load raffle settings: {err:#}");
            std::process::exit(2);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([560.0, 720.0])
            .with_min_inner_size([420.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(ui::theme::visuals());
            let app = RaffleApp::new(startup)?;
            Ok(Box::new(app))
        }),
    )
}
