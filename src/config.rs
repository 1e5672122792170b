//! Configuration management for JobWatch
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer defaults, a `jobwatch.toml` file, environment
//! variables and command-line arguments, in that order.

use crate::cli::Cli;
use crate::notification::{MailConfig, PushIdentity};
use crate::notification::pushover::PUSHOVER_API_URL;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Settings for the simulated work run by the binary.
    pub simulation: SimulationConfig,
    /// Email notification settings.
    pub email: EmailConfig,
    /// Pushover notification settings.
    pub pushover: PushoverConfig,
}

/// Settings for the simulated work run by the binary.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SimulationConfig {
    /// How long each simulated job takes, in milliseconds.
    pub job_delay_ms: u64,
}

/// Email notification settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct EmailConfig {
    /// Whether failures should be sent by email.
    pub enabled: bool,
    /// Mail server address, e.g. `smtp.example.com:587`.
    pub server: String,
    pub user: String,
    pub pass: String,
    /// The address notifications are sent to.
    pub address: String,
}

impl EmailConfig {
    pub fn mail_config(&self) -> MailConfig {
        MailConfig {
            server: self.server.clone(),
            user: self.user.clone(),
            pass: self.pass.clone(),
            address: self.address.clone(),
        }
    }
}

/// Pushover notification settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PushoverConfig {
    /// Whether failures should be sent as push notifications.
    pub enabled: bool,
    /// The Pushover application token.
    pub token: String,
    /// The Pushover user key.
    pub user: String,
    /// The messages endpoint; only changed for testing.
    pub api_url: String,
}

impl PushoverConfig {
    pub fn identity(&self) -> PushIdentity {
        PushIdentity {
            token: self.token.clone(),
            user: self.user.clone(),
        }
    }
}

impl Config {
    /// Loads the application configuration.
    ///
    /// Sources are merged in increasing priority: built-in defaults, the TOML
    /// file given by `--config` (if any), `JOBWATCH_` environment variables
    /// (`__` separates nested keys, e.g. `JOBWATCH_PUSHOVER__TOKEN`), and
    /// finally the command-line arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = &cli.config {
            anyhow::ensure!(
                path.exists(),
                "configuration file not found: {}",
                path.display()
            );
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed("JOBWATCH_").split("__"))
            .merge(cli)
            .extract()?;
        Ok(config)
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            simulation: SimulationConfig { job_delay_ms: 500 },
            email: EmailConfig::default(),
            pushover: PushoverConfig {
                enabled: false,
                token: String::new(),
                user: String::new(),
                api_url: PUSHOVER_API_URL.to_string(),
            },
        }
    }
}
