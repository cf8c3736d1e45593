mod app;
mod classifier;
mod config;
mod domain;
mod infrastructure;
mod mailjet;
mod state;
mod tasks;
mod web_content;

use anyhow::Result;
use clap::Parser;
use infrastructure::{directories, logging, shutdown};

/// Read-only visa appointment page monitor with e-mail alerts.
#[derive(Parser)]
#[command(name = "visa-slot-monitor", version)]
struct Cli {
    /// Send one test e-mail and exit
    #[arg(long)]
    test: bool,
    /// Run a single check cycle and exit
    #[arg(long, conflicts_with = "test")]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config)?;
    logging::init_tracing(&config.logging, &paths)?;

    let (shutdown, _) = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = app::MonitorApp::initialize(config, paths, shutdown)?;
    if cli.test {
        app.send_test().await
    } else if cli.once {
        app.run_once().await
    } else {
        app.run().await
    }
}
