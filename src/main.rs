//! JobWatch - runs simulated jobs under the supervisor
//!
//! Each iteration runs a randomly chosen job that either succeeds, fails,
//! panics or ends the run. Failures are reported through the notification
//! channels enabled in the configuration.

use anyhow::Result;
use clap::Parser;
use jobwatch::{
    app::App,
    cli::Cli,
    config::Config,
    simulation::JobPicker,
};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        tracing_subscriber::fmt().init();
        error!("Failed to load configuration: {:#}", err);
        std::process::exit(1);
    });

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("JobWatch starting up...");
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Job Delay: {}ms", config.simulation.job_delay_ms);
    info!(
        "Email: {}",
        if config.email.enabled { "Enabled" } else { "Disabled" }
    );
    info!(
        "Pushover: {}",
        if config.pushover.enabled { "Enabled" } else { "Disabled" }
    );
    if let Some(seed) = cli.seed {
        info!("Seed: {}", seed);
    }
    info!("-------------------------------------------------------");

    let app = App::builder(config.clone()).build()?;

    let mut picker = match cli.seed {
        Some(seed) => JobPicker::seeded(seed),
        None => JobPicker::new(),
    };
    let delay = Duration::from_millis(config.simulation.job_delay_ms);

    let summary = app
        .supervisor()
        .run(|| picker.next_job().run(delay))
        .await;

    info!(
        "Finished after {} iterations ({} failures, {} recovered panics, {} failed notifications).",
        summary.iterations, summary.failures, summary.recovered_panics, summary.send_errors
    );
    Ok(())
}
