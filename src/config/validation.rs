//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but cannot
//! work at runtime. Every violation is reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("forwarding.prefix '{0}' must start with '/'")]
    PrefixNotAbsolute(String),

    #[error("forwarding.prefix '{0}' must not end with '/'")]
    PrefixTrailingSlash(String),

    #[error("forwarding.upstream_base '{url}': {reason}")]
    UpstreamBase { url: String, reason: &'static str },

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let prefix = &config.forwarding.prefix;
    if !prefix.starts_with('/') {
        errors.push(ValidationError::PrefixNotAbsolute(prefix.clone()));
    } else if prefix.len() > 1 && prefix.ends_with('/') {
        errors.push(ValidationError::PrefixTrailingSlash(prefix.clone()));
    }

    if let Err(reason) = check_upstream_base(&config.forwarding.upstream_base) {
        errors.push(ValidationError::UpstreamBase {
            url: config.forwarding.upstream_base.clone(),
            reason,
        });
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.response_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("response_secs"));
    }

    let level = &config.observability.log_level;
    if level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::LogLevel(level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream_base(raw: &str) -> Result<(), &'static str> {
    let url = Url::parse(raw).map_err(|_| "not an absolute URL")?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err("scheme must be http or https");
    }
    if url.host_str().is_none() {
        return Err("missing host");
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment");
    }
    // The forwarded suffix always starts with '/'.
    if raw.ends_with('/') {
        return Err("must not end with '/'");
    }

    Ok(())
}
