//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::detect::WatchList;
use crate::notify::{DEFAULT_TEMPLATE, DeliverySettings, MessageRenderer, RetryPolicy};
use crate::state::default_state_path;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::receiver::{EmailReceiver, Receiver, SlackReceiver, parse_smarthost};
use super::toml::{EmailSection, ReceiverSection, SlackSection, TomlConfig};

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::load`] to read the config file named by the CLI,
/// or [`ValidatedConfig::from_raw`] when the TOML is already parsed.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Interfaces eligible for notification
    pub watch_list: WatchList,

    /// Receivers in configuration order
    pub receivers: Vec<Receiver>,

    /// Path to the state file holding the previous snapshot
    pub state_file: PathBuf,

    /// Handlebars template for notification text
    pub message_template: String,

    /// Network timeout for one delivery attempt
    pub timeout: Duration,

    /// Retry policy for transient delivery failures
    pub retry_policy: RetryPolicy,

    /// Dry-run mode (log changes without notifying)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let receivers = self
            .receivers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        write!(
            f,
            "Config {{ interfaces: [{}], receivers: [{}], state_file: {}, timeout: {}s, \
             retry: {}x/{}s, dry_run: {} }}",
            self.watch_list.sorted_names().join(", "),
            receivers,
            self.state_file.display(),
            self.timeout.as_secs(),
            self.retry_policy.max_attempts,
            self.retry_policy.initial_delay.as_secs(),
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Loads the config file named by `--config` (or `config.toml`) and
    /// merges it with the CLI.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::CONFIG_FILE));
        let toml = TomlConfig::load(&path)?;

        Self::from_raw(cli, &toml)
    }

    /// Creates a validated configuration from CLI arguments and parsed TOML.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A receiver entry is empty or lacks a required field
    /// - A Slack URL or email smarthost is invalid
    /// - The message template does not compile
    /// - Timeout or retry values are out of range
    pub fn from_raw(cli: &Cli, toml: &TomlConfig) -> Result<Self, ConfigError> {
        let watch_list: WatchList = toml
            .interfaces
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();

        let receivers = Self::build_receivers(&toml.receivers)?;
        let message_template = Self::resolve_message_template(toml)?;
        let timeout = Self::resolve_timeout(toml)?;
        let retry_policy = Self::build_retry_policy(toml)?;
        let state_file = Self::resolve_state_file(cli, toml);

        Ok(Self {
            watch_list,
            receivers,
            state_file,
            message_template,
            timeout,
            retry_policy,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Settings the notifiers are built with.
    #[must_use]
    pub fn delivery_settings(&self) -> DeliverySettings {
        DeliverySettings {
            timeout: self.timeout,
            retry_policy: self.retry_policy.clone(),
            message_template: self.message_template.clone(),
        }
    }

    fn build_receivers(sections: &[ReceiverSection]) -> Result<Vec<Receiver>, ConfigError> {
        let mut receivers = Vec::with_capacity(sections.len());

        for (position, section) in sections.iter().enumerate() {
            let index = position + 1;
            if section.slack.is_none() && section.email.is_none() {
                tracing::warn!("Receiver #{index} has neither a slack nor an email section, skipping");
                continue;
            }
            if let Some(slack) = &section.slack {
                receivers.push(Receiver::Slack(build_slack(index, slack)?));
            }
            if let Some(email) = &section.email {
                receivers.push(Receiver::Email(build_email(index, email)?));
            }
        }

        Ok(receivers)
    }

    fn resolve_message_template(toml: &TomlConfig) -> Result<String, ConfigError> {
        let template = toml
            .message_template
            .clone()
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

        MessageRenderer::validate(&template)
            .map_err(|reason| ConfigError::InvalidTemplate { reason })?;

        Ok(template)
    }

    fn resolve_timeout(toml: &TomlConfig) -> Result<Duration, ConfigError> {
        let seconds = toml.timeout.unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn build_retry_policy(toml: &TomlConfig) -> Result<RetryPolicy, ConfigError> {
        let retry = &toml.retry;

        let max_attempts = retry.max_attempts.unwrap_or(defaults::RETRY_MAX_ATTEMPTS);
        let initial_delay_secs = retry
            .initial_delay
            .unwrap_or(defaults::RETRY_INITIAL_DELAY_SECS);
        let max_delay_secs = retry.max_delay.unwrap_or(defaults::RETRY_MAX_DELAY_SECS);
        let multiplier = retry.multiplier.unwrap_or(defaults::RETRY_MULTIPLIER);

        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if initial_delay_secs == 0 {
            return Err(ConfigError::InvalidRetry(
                "initial_delay must be greater than 0".to_string(),
            ));
        }

        if multiplier <= 0.0 || !multiplier.is_finite() {
            return Err(ConfigError::InvalidRetry(
                "multiplier must be a positive finite number".to_string(),
            ));
        }

        if max_delay_secs < initial_delay_secs {
            return Err(ConfigError::InvalidRetry(format!(
                "max_delay ({max_delay_secs}s) must be >= initial_delay ({initial_delay_secs}s)"
            )));
        }

        Ok(RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_secs(initial_delay_secs),
            max_delay: Duration::from_secs(max_delay_secs),
            multiplier,
        })
    }

    fn resolve_state_file(cli: &Cli, toml: &TomlConfig) -> PathBuf {
        // CLI takes precedence
        if let Some(ref path) = cli.state_file {
            return path.clone();
        }

        toml.state_file
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map_or_else(default_state_path, expand_tilde)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn build_slack(index: usize, section: &SlackSection) -> Result<SlackReceiver, ConfigError> {
    let raw = section
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ConfigError::missing(index, "slack.url"))?;

    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(SlackReceiver {
        url,
        channel: section.channel.trim().to_string(),
        username: section.username.trim().to_string(),
        icon: section.icon.trim().to_string(),
    })
}

fn build_email(index: usize, section: &EmailSection) -> Result<EmailReceiver, ConfigError> {
    let to = section.to.trim();
    if to.is_empty() {
        return Err(ConfigError::missing(index, "email.to"));
    }

    let from = section.from.trim();
    if from.is_empty() {
        return Err(ConfigError::missing(index, "email.from"));
    }

    let (host, port) =
        parse_smarthost(&section.smarthost).ok_or_else(|| ConfigError::InvalidSmarthost {
            value: section.smarthost.clone(),
        })?;

    Ok(EmailReceiver {
        to: to.to_string(),
        from: from.to_string(),
        host,
        port,
        auth_username: section.auth_username.clone(),
        auth_password: section.auth_password.clone(),
        require_tls: section.require_tls,
    })
}

/// Expands a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(path),
    };

    dirs::home_dir().map_or_else(
        || PathBuf::from(path),
        |home| {
            let rest = rest.trim_start_matches(['/', '\\']);
            if rest.is_empty() { home } else { home.join(rest) }
        },
    )
}

#[cfg(test)]
#[path = "validated_tests.rs"]
mod tests;
