use clap::Parser;
use page_watch::lifecycle::shutdown_signal;
use page_watch::{FirstCycle, WatchConfig, build_watcher};
use std::error::Error;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration from file if given, then apply CLI overrides
    let config = match &args.config {
        Some(path) => WatchConfig::from_file(path)?,
        None => WatchConfig::default(),
    };
    let config = args.apply(config);

    // Setup errors are fatal before anything starts
    let watcher = match build_watcher(&config, args.dry_run) {
        Ok(watcher) => watcher,
        Err(e) => {
            ::log::error!("Failed to start watcher: {}", e);
            return Err(e.into());
        }
    };

    let first_cycle = if config.check_on_start {
        FirstCycle::Immediately
    } else {
        FirstCycle::AfterInterval
    };

    let handle = watcher.start(config.poll_interval(), first_cycle);
    println!("Watching {}. Press CTRL-C to exit.", config.url);

    shutdown_signal().await;

    match handle.stop().await {
        Some(watcher) => {
            ::log::info!(
                "Stopped after {} cycles; last title {:?}",
                watcher.cycles(),
                watcher.last_signal().title
            );
        }
        None => ::log::warn!("Watcher did not shut down cleanly"),
    }

    Ok(())
}
