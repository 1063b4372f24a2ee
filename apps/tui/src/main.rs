mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::fs::File;
use std::path::Path;

use census_map_tui::config::{debug_enabled, init_app_config};
use census_map_tui::CensusClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;

    if debug_enabled() {
        init_file_logging(&config.log_file)?;
    }

    let client = CensusClient::new(config.map.census.clone())
        .wrap_err("Failed to build HTTP client")?;

    // Check if we're running in a terminal
    if args.headless || !is_terminal() {
        return event::run_headless(&args, &config, &client).await;
    }

    let mut app = App::new(&config).map_err(|e| eyre!("Invalid map config: {e}"))?;

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app, client).await;

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    log::info!("logging to {}", path.display());
    Ok(())
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
