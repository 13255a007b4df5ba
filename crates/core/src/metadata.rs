//! Per-file object metadata resolution
//!
//! Content type, content encoding and cache control are chosen from rule
//! tables mapping a regular expression (searched in the local path) to a
//! value. Rules keep the order they were declared in; the first match wins.

use std::str::FromStr;

use regex::Regex;

use crate::error::{Error, Result};

/// Content type used when neither a rule nor the extension table applies
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An ordered table of (pattern, value) rules
#[derive(Debug, Clone, Default)]
pub struct MetadataRules {
    rules: Vec<(Regex, String)>,
}

impl MetadataRules {
    /// Build a table from (pattern, value) pairs, compiling every pattern.
    pub fn from_pairs<I, P, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, V)>,
        P: AsRef<str>,
        V: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .map(|(pattern, value)| {
                let pattern = pattern.as_ref();
                Regex::new(pattern)
                    .map(|re| (re, value.into()))
                    .map_err(|e| Error::Config(format!("invalid rule pattern '{pattern}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Parse a JSON object such as `{"\\.svg$": "image/svg+xml"}`.
    ///
    /// An empty or whitespace-only string yields an empty table. Key order in
    /// the JSON text is the rule order.
    pub fn from_json(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }

        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(input)
            .map_err(|e| Error::Config(format!("rule table must be a JSON object: {e}")))?;

        let pairs = map
            .into_iter()
            .map(|(pattern, value)| match value {
                serde_json::Value::String(s) => Ok((pattern, s)),
                other => Err(Error::Config(format!(
                    "value for rule '{pattern}' must be a string, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_pairs(pairs)
    }

    /// Value of the first rule whose pattern is found in `path`
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(path))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromStr for MetadataRules {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

/// Content type for `path`: matching rule, then the extension table, then
/// `application/octet-stream`.
pub fn content_type_for(path: &str, rules: &MetadataRules) -> String {
    if let Some(value) = rules.resolve(path) {
        return value.to_string();
    }

    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}
