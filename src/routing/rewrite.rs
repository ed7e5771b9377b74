//! Path rewrite logic.
//!
//! # Responsibilities
//! - Decide whether a request path falls under the configured prefix
//! - Strip the prefix once, anchored at the start
//! - Join the remainder onto the upstream base URL
//!
//! # Design Decisions
//! - Prefix matching is case-sensitive and segment-aligned: `/api` matches
//!   `/api` and `/api/...` but not `/apiary`
//! - Dot segments (`.`, `..`, and their `%2e` forms) are resolved before
//!   matching, so the target can never climb above the upstream base
//! - Apart from that the remainder is appended verbatim (no decoding)

use url::Url;

use crate::config::ForwardingConfig;

/// Resolve dot segments in an absolute request path.
///
/// Uses the same WHATWG path rules the outbound client applies when it
/// parses the target URL, so what is matched is what is sent.
pub fn normalize_path(path: &str) -> Option<String> {
    let mut url = Url::parse("http://localhost/").ok()?;
    url.set_path(path);
    Some(url.path().to_string())
}

/// A compiled prefix-strip rule.
#[derive(Debug, Clone)]
pub struct PathRewrite {
    prefix: String,
    upstream_base: String,
    forward_query: bool,
}

impl PathRewrite {
    /// Create a new rewrite rule.
    pub fn new(prefix: impl Into<String>, upstream_base: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            upstream_base: upstream_base.into(),
            forward_query: false,
        }
    }

    /// Build the rule from the forwarding section of the config.
    pub fn from_config(config: &ForwardingConfig) -> Self {
        Self::new(config.prefix.clone(), config.upstream_base.clone())
            .with_query(config.forward_query)
    }

    /// Toggle query string forwarding.
    pub fn with_query(mut self, forward_query: bool) -> Self {
        self.forward_query = forward_query;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn upstream_base(&self) -> &str {
        &self.upstream_base
    }

    /// Return the part of `path` after the prefix, or `None` if the path is
    /// not under the prefix.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.prefix == "/" {
            return Some(path);
        }

        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Compute the outbound URL for an inbound path and query.
    ///
    /// The path is normalized first; a path that only reaches the prefix
    /// through `..` segments is not under it.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Option<String> {
        let normalized = normalize_path(path)?;
        let rest = self.strip(&normalized)?;
        let url = match query {
            Some(q) if self.forward_query => format!("{}{}?{}", self.upstream_base, rest, q),
            _ => format!("{}{}", self.upstream_base, rest),
        };
        Some(url)
    }
}
