//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Config file read when `--config` is not given.
pub const CONFIG_FILE: &str = "config.toml";

/// Default network timeout for one delivery attempt, in seconds.
pub const TIMEOUT_SECS: u64 = 10;

/// Default maximum number of delivery attempts.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default initial retry delay in seconds.
pub const RETRY_INITIAL_DELAY_SECS: u64 = 2;

/// Default maximum retry delay in seconds.
pub const RETRY_MAX_DELAY_SECS: u64 = 30;

/// Default retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = 2.0;
