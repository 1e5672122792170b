//! JobWatch - a supervisor that turns failing and panicking work into notifications
//!
//! This library provides the supervision loop, the notification registry and
//! dispatcher, and the email and Pushover channels.
pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod notification;
pub mod simulation;
pub mod supervisor;

// Re-export core types for convenience
pub use crate::core::*;
pub use supervisor::{RunSummary, Supervisor};
