use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::method::Method;

/// Canned responses of one path, keyed by HTTP method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(BTreeMap<Method, Value>);

impl Endpoint {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, method: Method, body: Value) -> Option<Value> {
        self.0.insert(method, body)
    }

    pub fn get(&self, method: Method) -> Option<&Value> {
        self.0.get(&method)
    }

    pub fn methods(&self) -> impl Iterator<Item = Method> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for the `Allow` header: `OPTIONS` followed by every registered method.
    pub fn allow_header(&self) -> String {
        std::iter::once("OPTIONS")
            .chain(self.methods().map(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<(Method, Value)> for Endpoint {
    fn from_iter<I: IntoIterator<Item = (Method, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A full mock set: URL path -> `Endpoint`.
///
/// Paths always start with `/` once they have gone through `normalize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mock(BTreeMap<String, Endpoint>);

impl Mock {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, path: String, endpoint: Endpoint) -> Option<Endpoint> {
        self.0.insert(path, endpoint)
    }

    pub fn get(&self, path: &str) -> Option<&Endpoint> {
        self.0.get(path)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Endpoint)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` on top of `self`: same paths are replaced, all others survive.
    pub fn merge(&mut self, other: Mock) {
        self.0.extend(other.0);
    }
}

impl FromIterator<(String, Endpoint)> for Mock {
    fn from_iter<I: IntoIterator<Item = (String, Endpoint)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint(method: Method, body: Value) -> Endpoint {
        [(method, body)].into_iter().collect()
    }

    #[test]
    fn merge_overwrites_same_paths_only() {
        let mut base: Mock = [
            ("/a".to_string(), endpoint(Method::Get, json!({"x": 1}))),
            ("/b".to_string(), endpoint(Method::Get, json!({"x": 2}))),
        ]
        .into_iter()
        .collect();
        let overlay: Mock = [("/b".to_string(), endpoint(Method::Post, json!({"y": 3})))]
            .into_iter()
            .collect();

        base.merge(overlay);

        assert_eq!(base.len(), 2);
        assert_eq!(base.get("/a").unwrap().get(Method::Get), Some(&json!({"x": 1})));
        let b = base.get("/b").unwrap();
        assert!(b.get(Method::Get).is_none());
        assert_eq!(b.get(Method::Post), Some(&json!({"y": 3})));
    }

    #[test]
    fn allow_header_lists_options_first() {
        let mut ep = endpoint(Method::Delete, json!(null));
        ep.insert(Method::Get, json!([]));
        assert_eq!(ep.allow_header(), "OPTIONS,GET,DELETE");
        assert_eq!(Endpoint::new().allow_header(), "OPTIONS");
    }

    #[test]
    fn serializes_as_plain_object() {
        let mock: Mock = [("/".to_string(), endpoint(Method::Get, json!({"k": "v"})))]
            .into_iter()
            .collect();
        let value = serde_json::to_value(&mock).unwrap();
        assert_eq!(value, json!({"/": {"GET": {"k": "v"}}}));
    }
}
