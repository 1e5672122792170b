//! Integration tests for layered configuration loading.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::write_config;
use jobwatch::cli::Cli;
use jobwatch::config::Config;
use serial_test::serial;
use std::path::PathBuf;

#[test]
#[serial]
fn test_load_full_valid_config() {
    let file = write_config(
        r#"
        log_level = "debug"
        [simulation]
        job_delay_ms = 10
        [email]
        enabled = true
        server = "smtp.example.com:587"
        user = "monitor@example.com"
        pass = "hunter2"
        address = "oncall@example.com"
        [pushover]
        enabled = true
        token = "app-token"
        user = "user-key"
        api_url = "http://127.0.0.1:9/1/messages.json"
    "#,
    );

    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.simulation.job_delay_ms, 10);
    assert!(config.email.enabled);
    assert_eq!(config.email.server, "smtp.example.com:587");
    assert_eq!(config.email.address, "oncall@example.com");
    assert!(config.email.mail_config().is_complete());
    assert!(config.pushover.enabled);
    assert_eq!(config.pushover.identity().token, "app-token");
    assert_eq!(config.pushover.identity().user, "user-key");
    assert_eq!(config.pushover.api_url, "http://127.0.0.1:9/1/messages.json");
}

#[test]
#[serial]
fn test_load_default_values() {
    let file = write_config("");

    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    let config = Config::load(&cli).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_partial_section_keeps_other_defaults() {
    let file = write_config(
        r#"
        [pushover]
        enabled = true
    "#,
    );

    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    let config = Config::load(&cli).unwrap();

    assert!(config.pushover.enabled);
    assert!(config.pushover.token.is_empty());
    assert_eq!(config.pushover.api_url, Config::default().pushover.api_url);
    assert_eq!(config.simulation.job_delay_ms, 500);
}

#[test]
#[serial]
fn test_invalid_value_type() {
    let file = write_config(
        r#"
        [simulation]
        job_delay_ms = "fast"
    "#,
    );

    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    assert!(Config::load(&cli).is_err());
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    let cli = Cli {
        config: Some(PathBuf::from("/nonexistent/jobwatch.toml")),
        ..Default::default()
    };

    let err = Config::load(&cli).unwrap_err();
    assert!(err.to_string().contains("configuration file not found"));
}

#[test]
#[serial]
fn test_env_overrides_file_and_cli_overrides_env() {
    let file = write_config(
        r#"
        [pushover]
        enabled = false
        token = "from-file"
    "#,
    );

    std::env::set_var("JOBWATCH_PUSHOVER__TOKEN", "from-env");
    std::env::set_var("JOBWATCH_PUSHOVER__ENABLED", "false");

    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        pushover: Some(true),
        job_delay_ms: Some(0),
        log_level: Some("trace".to_string()),
        ..Default::default()
    };
    let result = Config::load(&cli);

    std::env::remove_var("JOBWATCH_PUSHOVER__TOKEN");
    std::env::remove_var("JOBWATCH_PUSHOVER__ENABLED");

    let config = result.unwrap();
    assert_eq!(config.pushover.token, "from-env");
    assert!(config.pushover.enabled);
    assert_eq!(config.simulation.job_delay_ms, 0);
    assert_eq!(config.log_level, "trace");
}
