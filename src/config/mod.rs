//! Configuration layer.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`Receiver`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Sources
//!
//! The watch list, receivers and delivery tuning come only from the config
//! file. The CLI selects the file and may override `state_file`.
//!
//! # Receivers
//!
//! Each `[[receivers]]` entry may carry a `slack` table, an `email` table or
//! both; an entry with both becomes two receivers, in that order. An entry
//! with neither is skipped with a warning.

mod cli;
pub mod defaults;
mod error;
mod receiver;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use receiver::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, EmailReceiver, Receiver, SlackReceiver};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
