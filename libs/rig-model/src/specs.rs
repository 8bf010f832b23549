//! Component attribute bag
//!
//! Every component carries a free-form map of named string attributes
//! ("socket" -> "AM5", "tdp" -> "105"). Lookups are total: a missing key reads
//! as the empty string, and rule evaluation treats an empty value as
//! "not applicable".
//!
//! Catalog files may write numeric or boolean attributes unquoted
//! (`tdp: 105`); they are stored in their textual form. Floats keep their
//! decimal point (`version: 4.0` reads as `"4.0"`), but the parser has already
//! normalised them, so `4.00` also reads as `"4.0"`. Quote a value whose exact
//! text is compared by an `EQUALS` rule.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// String-keyed attribute map with a never-absent accessor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SpecMap(HashMap<String, String>);

impl<'de> Deserialize<'de> for SpecMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            String(String),
            Int(i64),
            Float(f64),
            Bool(bool),
        }

        let raw = HashMap::<String, Scalar>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Scalar::String(s) => s,
                    Scalar::Int(i) => i.to_string(),
                    // Debug keeps the ".0" Display drops
                    Scalar::Float(f) => format!("{:?}", f),
                    Scalar::Bool(b) => b.to_string(),
                };
                (key, value)
            })
            .collect())
    }
}

impl SpecMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Value for `key`, or `""` when the key is not present
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    /// Insert or replace an attribute, returning `self` for chaining
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse a numeric attribute
///
/// Only finite decimal numbers count: `"inf"`, `"NaN"` and the like are treated
/// as non-numeric, the same as any other unparseable text.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl<K, V> FromIterator<(K, V)> for SpecMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
