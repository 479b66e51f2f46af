//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// Missing fields take their zero value; validation happens in
/// [`super::ValidatedConfig`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Interface names to watch
    #[serde(default)]
    pub interfaces: Vec<String>,

    /// Notification receivers
    #[serde(default)]
    pub receivers: Vec<ReceiverSection>,

    /// Path to the state file
    pub state_file: Option<String>,

    /// Handlebars template for the notification text
    pub message_template: Option<String>,

    /// Network timeout for one delivery attempt, in seconds
    pub timeout: Option<u64>,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,
}

/// One `[[receivers]]` entry.
///
/// Either table may be present; an entry with both yields two receivers.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiverSection {
    /// Slack incoming webhook
    pub slack: Option<SlackSection>,

    /// SMTP email
    pub email: Option<EmailSection>,
}

/// Slack receiver settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlackSection {
    /// Incoming webhook URL (required)
    pub url: Option<String>,

    /// Channel override
    pub channel: String,

    /// Username override
    pub username: String,

    /// `:emoji:` or image URL
    pub icon: String,
}

/// Email receiver settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailSection {
    /// Recipient address(es), comma separated (required)
    pub to: String,

    /// Sender address (required)
    pub from: String,

    /// SMTP server as `host[:port]`
    pub smarthost: String,

    /// SMTP username
    pub auth_username: String,

    /// SMTP password
    pub auth_password: String,

    /// Refuse to send without TLS
    pub require_tls: bool,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of delivery attempts
    pub max_attempts: Option<u32>,

    /// Initial retry delay in seconds
    pub initial_delay: Option<u64>,

    /// Maximum retry delay in seconds
    pub max_delay: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r##"# interface-notifier configuration

# Interface names to watch. Changes on other interfaces are ignored.
interfaces = ["eth0"]

# Where the previous snapshot is kept (default: <temp dir>/interface-notifier.json)
# state_file = "/var/lib/interface-notifier/state.json"

# Handlebars template for the message text
# Available variables: {{interface}}, {{addresses}}, {{reason}}
# message_template = "Interface {{interface}} addresses: {{#each addresses}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}"

# Network timeout for one delivery attempt, in seconds (default: 10)
# timeout = 10

# Slack incoming webhook
# [[receivers]]
# [receivers.slack]
# url = "https://hooks.slack.com/services/T000/B000/XXXX"
# channel = "#ops"
# username = "interface-notifier"
# icon = ":satellite:"

# Email over SMTP
# [[receivers]]
# [receivers.email]
# to = "ops@example.com"
# from = "notifier@example.com"
# smarthost = "smtp.example.com:587"
# auth_username = "notifier"
# auth_password = "secret"
# require_tls = true

[retry]
# Maximum number of delivery attempts (default: 3)
# max_attempts = 3

# Initial retry delay in seconds (default: 2)
# initial_delay = 2

# Maximum retry delay in seconds (default: 30)
# max_delay = 30

# Backoff multiplier (default: 2.0)
# multiplier = 2.0
"##
    .to_string()
}
