mod gui;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use gui::{PadmapGui, show_error};
use padmap::config::PadConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Keyboard bindings editor for virtual gamepads.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port whose tab is shown first
    #[arg(short, long, default_value_t = 0)]
    port: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let path = match args.config {
        Some(path) => path,
        None => PadConfig::default_path()?,
    };

    // Load config or create default if not exists
    let config = match PadConfig::load_or_create(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            let error_msg = format!("Failed to load configuration: {:#}", e);
            error!("{}", error_msg);
            show_error(&error_msg)?;
            return Err(e);
        }
    };

    PadmapGui::run(config, path, args.port)
}
