//! Label selector domain model and parser.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A set of `key=value` labels selecting target pods.
///
/// Backed by an ordered map: equality ignores insertion order and the
/// serialized form is stable. Two selectors are equal iff they hold exactly
/// the same pairs, which is what rule merging keys on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSelector(BTreeMap<String, String>);

impl LabelSelector {
    /// Create an empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, overwriting any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate labels in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromStr for LabelSelector {
    type Err = ParseError;

    /// Parse `key=value,key2=value2`. An empty string is an empty selector.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut selector = LabelSelector::new();
        if s.is_empty() {
            return Ok(selector);
        }

        for token in s.split(',') {
            let mut parts = token.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => selector.insert(key, value),
                _ => return Err(ParseError::MalformedSelector(token.to_string())),
            }
        }

        Ok(selector)
    }
}

/// Renders the canonical `key=value,...` form, sorted by key.
impl std::fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Parse a selector string such as `app=web,tier=frontend`.
pub fn parse_selectors(text: &str) -> Result<LabelSelector, ParseError> {
    text.parse()
}
