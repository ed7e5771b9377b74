//! Command-line overrides layered on top of the file configuration.
//!
//! Precedence is CLI > file > defaults. Validation runs once, on the merged
//! result, so a flag can repair a bad value in the file.

use crate::config::loader::ConfigError;
use crate::config::schema::ProxyConfig;
use crate::config::validation::validate_config;

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub prefix: Option<String>,
    pub upstream_base: Option<String>,
}

impl ConfigOverrides {
    /// Overwrite every field that was supplied.
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(bind) = &self.bind_address {
            config.listener.bind_address = bind.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.forwarding.prefix = prefix.clone();
        }
        if let Some(upstream) = &self.upstream_base {
            config.forwarding.upstream_base = upstream.clone();
        }
    }
}

/// Apply overrides to an unvalidated base config, then validate.
pub fn resolve_config(
    mut base: ProxyConfig,
    overrides: &ConfigOverrides,
) -> Result<ProxyConfig, ConfigError> {
    overrides.apply(&mut base);
    validate_config(&base).map_err(ConfigError::Validation)?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::ValidationError;

    fn from_file(toml: &str) -> ProxyConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_cli_wins_over_file() {
        let base = from_file(
            r#"
            [listener]
            bind_address = "127.0.0.1:7000"

            [forwarding]
            prefix = "/v1"
            upstream_base = "http://file.example/v1"
            "#,
        );
        let overrides = ConfigOverrides {
            bind_address: Some("127.0.0.1:9000".into()),
            prefix: Some("/api".into()),
            upstream_base: None,
        };

        let config = resolve_config(base, &overrides).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.forwarding.prefix, "/api");
        assert_eq!(config.forwarding.upstream_base, "http://file.example/v1");
    }

    #[test]
    fn test_file_wins_over_defaults() {
        let base = from_file("[timeouts]\nresponse_secs = 5");
        let config = resolve_config(base, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.timeouts.response_secs, 5);
        assert_eq!(config.forwarding.prefix, "/api");
    }

    #[test]
    fn test_flag_repairs_invalid_file_value() {
        let base = from_file("[forwarding]\nprefix = \"api\"");
        let overrides = ConfigOverrides {
            prefix: Some("/api".into()),
            ..Default::default()
        };
        assert!(resolve_config(base, &overrides).is_ok());
    }

    #[test]
    fn test_merged_config_is_validated() {
        let base = from_file("[forwarding]\nprefix = \"api\"");
        let overrides = ConfigOverrides {
            upstream_base: Some("not a url".into()),
            ..Default::default()
        };

        match resolve_config(base, &overrides) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.contains(&ValidationError::PrefixNotAbsolute("api".into())));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
