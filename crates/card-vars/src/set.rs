//! The variable binding set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error converting external data into a [`VariableSet`].
#[derive(Debug, thiserror::Error)]
pub enum VariableError {
    /// Input is not valid JSON.
    #[error("invalid variables JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level JSON value is not an object.
    #[error("variables must be a JSON object")]
    NotAnObject,

    /// A value cannot be represented as a string.
    #[error("variable '{0}' must be a string, number or boolean")]
    NotAString(String),

    /// `key=value` assignment without `=` or with an empty key.
    #[error("invalid variable assignment '{0}' (expected key=value)")]
    Assignment(String),
}

/// Mapping from variable name to string value.
///
/// Ordering is irrelevant to equality; the backing `BTreeMap` keeps iteration
/// deterministic so that digests over the set are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableSet(BTreeMap<String, String>);

impl VariableSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from name/value pairs.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Parse a JSON object.
    ///
    /// Strings are taken as-is, numbers and booleans are stringified. Nested
    /// values and `null` are rejected.
    pub fn from_json(text: &str) -> Result<Self, VariableError> {
        let Value::Object(map) = serde_json::from_str::<Value>(text)? else {
            return Err(VariableError::NotAnObject);
        };

        map.into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key, s)),
                Value::Number(n) => Ok((key, n.to_string())),
                Value::Bool(b) => Ok((key, b.to_string())),
                _ => Err(VariableError::NotAString(key)),
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }

    /// Parse a `key=value` assignment (value may be empty or contain `=`).
    pub fn parse_assignment(text: &str) -> Result<(String, String), VariableError> {
        match text.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_owned(), value.to_owned()))
            }
            _ => Err(VariableError::Assignment(text.to_owned())),
        }
    }

    /// Serialize as a pretty-printed JSON object.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_owned())
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Insert or overwrite a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_json_strings_and_scalars() {
        let vars = VariableSet::from_json(r#"{"title": "Hello", "count": 3, "dark": true}"#).unwrap();
        assert_eq!(vars.get("title"), Some("Hello"));
        assert_eq!(vars.get("count"), Some("3"));
        assert_eq!(vars.get("dark"), Some("true"));
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let err = VariableSet::from_json(r#"{"meta": {"a": 1}}"#).unwrap_err();
        assert!(matches!(err, VariableError::NotAString(ref key) if key == "meta"));

        let err = VariableSet::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, VariableError::NotAnObject));

        let err = VariableSet::from_json("{").unwrap_err();
        assert!(matches!(err, VariableError::Json(_)));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            VariableSet::parse_assignment("title=a=b").unwrap(),
            ("title".to_owned(), "a=b".to_owned())
        );
        assert_eq!(
            VariableSet::parse_assignment("empty=").unwrap(),
            ("empty".to_owned(), String::new())
        );
        assert!(VariableSet::parse_assignment("=value").is_err());
        assert!(VariableSet::parse_assignment("novalue").is_err());
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = VariableSet::from_pairs([("a", "1"), ("b", "2")]);
        let b = VariableSet::from_pairs([("b", "2"), ("a", "1")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_json_round_trip() {
        let vars = VariableSet::from_pairs([("title", "Example")]);
        assert_eq!(VariableSet::from_json(&vars.to_json()).unwrap(), vars);
    }
}
