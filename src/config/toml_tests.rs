//! Tests for TOML configuration parsing.

use super::ConfigError;
use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.transport.timeout.is_none());
        assert!(config.transport.ca_bundle.is_none());
        assert!(config.trigger.targets.is_none());
        assert!(config.trigger.env_var.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [transport]
            timeout = 10
            ca_bundle = "/etc/status-hook/ca.pem"

            [trigger]
            targets = "http://a/hook, http://b/hook"
            env_var = "HOOK_TARGETS"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.transport.timeout, Some(10));
        assert_eq!(
            config.transport.ca_bundle.as_deref(),
            Some("/etc/status-hook/ca.pem")
        );
        assert_eq!(
            config.trigger.targets.as_deref(),
            Some("http://a/hook, http://b/hook")
        );
        assert_eq!(config.trigger.env_var.as_deref(), Some("HOOK_TARGETS"));
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        let toml = r"
            [transport]
            retries = 3
        ";

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn parse_rejects_unknown_sections() {
        assert!(TomlConfig::parse("[queue]\nsize = 1\n").is_err());
    }

    #[test]
    fn parse_rejects_wrong_types() {
        assert!(TomlConfig::parse("[transport]\ntimeout = \"ten\"\n").is_err());
    }
}

mod loading {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[transport]\ntimeout = 12").unwrap();

        let config = TomlConfig::load(file.path()).unwrap();

        assert_eq!(config.transport.timeout, Some(12));
    }

    #[test]
    fn load_missing_file_is_file_read_error() {
        let result = TomlConfig::load(std::path::Path::new("/nonexistent/status-hook.toml"));

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        // Everything is commented out, so defaults apply
        assert!(config.transport.timeout.is_none());
        assert!(config.trigger.targets.is_none());
    }

    #[test]
    fn default_template_mentions_env_var() {
        assert!(default_config_template().contains("STATUS_CHANGED_TRIGGER"));
    }
}
