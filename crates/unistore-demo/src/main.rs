use anyhow::{Context, Result};
use unistore_config::DemoConfig;

mod actions;
mod app;
mod logger;
mod middleware;
mod reducers;

use reducers::AppState;

fn main() -> Result<()> {
    // a broken config file aborts with the error on stderr
    let loaded = DemoConfig::load().context("Failed to load configuration")?;
    let config = loaded.config;
    logger::init(config.level_filter()?);

    log::info!("Starting unistore-demo");
    match &loaded.source {
        Some(path) => log::info!("Loaded demo config from {}", path.display()),
        None => log::debug!("No config file found, using default demo config"),
    }

    let store = app::build_store(&config);
    println!("initial: {}", serde_json::to_string(&*store.get_state())?);

    let printer = store.subscribe_fn(|state: &AppState| match serde_json::to_string(state) {
        Ok(json) => println!("state:   {}", json),
        Err(e) => log::error!("Failed to render state: {}", e),
    });

    let summary = app::run_script(&store, &config)?;
    printer.unsubscribe();

    log::info!(
        "Dispatched {} action(s), {} rejected",
        summary.dispatched,
        summary.rejected
    );
    println!("final:   {}", serde_json::to_string_pretty(&*store.get_state())?);

    Ok(())
}
