//! Hop-by-hop header handling.
//!
//! Connection-scoped headers are dropped on both legs of the exchange; the
//! HTTP stack on each side re-establishes its own framing. Headers named in
//! a `Connection` token are connection-scoped too.

use std::collections::HashSet;

use axum::http::header::{self, HeaderMap, HeaderName};

/// Headers that never cross a proxy.
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Header names listed in `Connection`, lowercased.
fn connection_tokens(headers: &HeaderMap) -> HashSet<String> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().trim_matches('"').to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Returns true if `name` is connection-scoped in this header set.
pub fn is_hop_by_hop(name: &HeaderName, tokens: &HashSet<String>) -> bool {
    HOP_BY_HOP.contains(name) || tokens.contains(name.as_str())
}

/// Remove every hop-by-hop header in place.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let tokens = connection_tokens(headers);
    let doomed: Vec<HeaderName> = headers
        .keys()
        .filter(|name| is_hop_by_hop(name, &tokens))
        .cloned()
        .collect();

    for name in doomed {
        headers.remove(&name);
    }
}
