//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. These arguments are parsed at startup and then merged with
//! the configuration from the `jobwatch.toml` file and environment variables.

use clap::Parser;
use figment::{
    providers::Serialized,
    value::{Dict, Map},
    Error, Figment, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Runs simulated jobs under a supervisor and reports their failures.
#[derive(Parser, Debug, Default, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Logging level (overridden by RUST_LOG).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Enable or disable email notifications.
    #[arg(long, value_name = "BOOL")]
    pub email: Option<bool>,

    /// Enable or disable Pushover notifications.
    #[arg(long, value_name = "BOOL")]
    pub pushover: Option<bool>,

    /// Duration of each simulated job in milliseconds.
    #[arg(long, value_name = "MS")]
    pub job_delay_ms: Option<u64>,

    /// Seed for the job picker, for a reproducible run.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut figment = Figment::new();

        if let Some(level) = &self.log_level {
            figment = figment.merge(Serialized::default("log_level", level));
        }
        if let Some(enabled) = self.email {
            figment = figment.merge(Serialized::default("email.enabled", enabled));
        }
        if let Some(enabled) = self.pushover {
            figment = figment.merge(Serialized::default("pushover.enabled", enabled));
        }
        if let Some(delay) = self.job_delay_ms {
            figment = figment.merge(Serialized::default("simulation.job_delay_ms", delay));
        }
        // `seed` only drives the simulation and is read directly by the binary.

        figment.data()
    }
}
