//! Ingestion rules for client-submitted mocks.
//!
//! Raw input is a JSON object of `path -> {method -> body}`. Paths gain a
//! leading `/` and methods are uppercased. When a rewritten key collides with
//! one that was already canonical, the canonical key wins; colliding aliases
//! resolve in sorted key order, last one wins.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::NormalizeError;
use crate::method::Method;
use crate::mock::{Endpoint, Mock};

type RawMock = BTreeMap<String, BTreeMap<String, Value>>;

/// Parse and canonicalize a raw submission.
///
/// Builds a fresh `Mock`; on any error nothing is returned, so callers never
/// see a partially normalized value.
pub fn normalize(raw: &[u8]) -> Result<Mock, NormalizeError> {
    let parsed: RawMock =
        serde_json::from_slice(raw).map_err(|e| NormalizeError::MalformedInput(e.to_string()))?;

    let (aliases, canonical): (Vec<_>, Vec<_>) =
        parsed.into_iter().partition(|(path, _)| !path.starts_with('/'));

    let mut mock = Mock::new();
    for (path, methods) in aliases.into_iter().chain(canonical) {
        let endpoint = normalize_endpoint(methods)?;
        mock.insert(canonical_path(path), endpoint);
    }
    Ok(mock)
}

fn canonical_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

fn normalize_endpoint(methods: BTreeMap<String, Value>) -> Result<Endpoint, NormalizeError> {
    let (aliases, canonical): (Vec<_>, Vec<_>) = methods
        .into_iter()
        .partition(|(key, _)| *key != key.to_ascii_uppercase());

    let mut endpoint = Endpoint::new();
    for (key, body) in aliases.into_iter().chain(canonical) {
        let method: Method = key.parse()?;
        endpoint.insert(method, body);
    }
    Ok(endpoint)
}
