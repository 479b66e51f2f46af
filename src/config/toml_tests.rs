//! Tests for TOML configuration parsing.

use std::io::Write;

use tempfile::NamedTempFile;

use super::ConfigError;
use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config = TomlConfig::parse(r#"interfaces = ["eth0", "wlan0"]"#).unwrap();

        assert_eq!(config.interfaces, vec!["eth0", "wlan0"]);
        assert!(config.receivers.is_empty());
        assert!(config.state_file.is_none());
    }

    #[test]
    fn parse_empty_document() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.interfaces.is_empty());
        assert!(config.receivers.is_empty());
    }

    #[test]
    fn parse_slack_receiver() {
        let toml = r##"
            interfaces = ["eth0"]

            [[receivers]]
            [receivers.slack]
            url = "https://hooks.slack.com/services/T/B/X"
            channel = "#ops"
            username = "ipbot"
            icon = ":satellite:"
        "##;

        let config = TomlConfig::parse(toml).unwrap();
        let slack = config.receivers[0].slack.as_ref().unwrap();

        assert_eq!(
            slack.url.as_deref(),
            Some("https://hooks.slack.com/services/T/B/X")
        );
        assert_eq!(slack.channel, "#ops");
        assert_eq!(slack.username, "ipbot");
        assert_eq!(slack.icon, ":satellite:");
        assert!(config.receivers[0].email.is_none());
    }

    #[test]
    fn parse_email_receiver_with_defaults() {
        let toml = r#"
            [[receivers]]
            email = { to = "ops@example.com", from = "n@example.com" }
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let email = config.receivers[0].email.as_ref().unwrap();

        assert_eq!(email.to, "ops@example.com");
        assert_eq!(email.from, "n@example.com");
        assert!(email.smarthost.is_empty());
        assert!(email.auth_username.is_empty());
        assert!(!email.require_tls);
    }

    #[test]
    fn parse_entry_with_both_tables() {
        let toml = r#"
            [[receivers]]
            slack = { url = "https://hooks.slack.com/services/T/B/X" }
            email = { to = "ops@example.com", from = "n@example.com" }
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.receivers.len(), 1);
        assert!(config.receivers[0].slack.is_some());
        assert!(config.receivers[0].email.is_some());
    }

    #[test]
    fn parse_runtime_options() {
        let toml = r#"
            state_file = "~/notifier.json"
            message_template = "{{interface}}"
            timeout = 30

            [retry]
            max_attempts = 5
            initial_delay = 1
            max_delay = 10
            multiplier = 1.5
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.state_file.as_deref(), Some("~/notifier.json"));
        assert_eq!(config.message_template.as_deref(), Some("{{interface}}"));
        assert_eq!(config.timeout, Some(30));
        assert_eq!(config.retry.max_attempts, Some(5));
        assert_eq!(config.retry.initial_delay, Some(1));
        assert_eq!(config.retry.max_delay, Some(10));
        assert_eq!(config.retry.multiplier, Some(1.5));
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let result = TomlConfig::parse("poll_interval = 60");

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn unknown_receiver_kind_is_rejected() {
        let toml = r#"
            [[receivers]]
            pagerduty = { key = "abc" }
        "#;

        assert!(matches!(
            TomlConfig::parse(toml),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn unknown_slack_key_is_rejected() {
        let toml = r#"
            [[receivers]]
            slack = { url = "https://example.com", token = "x" }
        "#;

        assert!(matches!(
            TomlConfig::parse(toml),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(matches!(
            TomlConfig::parse(r#"interfaces = "eth0""#),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(
            TomlConfig::parse("interfaces = [\"eth0\""),
            Err(ConfigError::TomlParse(_))
        ));
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"interfaces = ["en0"]"#).unwrap();

        let config = TomlConfig::load(file.path()).unwrap();

        assert_eq!(config.interfaces, vec!["en0"]);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let result = TomlConfig::load(&path);

        match result {
            Err(ConfigError::FileRead { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected FileRead, got {other:?}"),
        }
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert_eq!(config.interfaces, vec!["eth0"]);
        assert!(config.receivers.is_empty());
    }

    #[test]
    fn default_template_documents_receivers() {
        let template = default_config_template();

        assert!(template.contains("[receivers.slack]"));
        assert!(template.contains("[receivers.email]"));
        assert!(template.contains("smarthost"));
    }

    #[test]
    fn default_template_keeps_hash_prefixed_values() {
        let template = default_config_template();

        assert!(template.contains(r##"# channel = "#ops""##));
        assert!(template.trim_end().ends_with("# multiplier = 2.0"));
    }
}
