//! Per-entity feature vectors
//!
//! A [`FeatureVector`] maps feature keys to values for one contact. Keys are not
//! uniform across entities: a missing key means "absent", never zero.
//!
//! # Serialization
//!
//! Values deserialize from plain JSON scalars:
//!
//! ```json
//! {
//!   "id": "contact-17",
//!   "features": { "totalMeetings": 4, "hasGift": true, "daysSinceLastMemo": null }
//! }
//! ```
//!
//! Any other JSON value (strings, arrays, objects) is kept as
//! [`FeatureValue::Other`] and treated as absent by the statistics.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A single feature value as produced by the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Bool(bool),
    Null,
    /// Non-numeric value; never usable
    Other(serde_json::Value),
}

impl FeatureValue {
    /// Numeric reading of the value.
    ///
    /// Booleans read as `0.0`/`1.0`. Null and non-finite numbers are not usable.
    ///
    /// ```
    /// # use rapport_analysis::feature::FeatureValue;
    /// assert_eq!(FeatureValue::Bool(true).as_f64(), Some(1.0));
    /// assert_eq!(FeatureValue::Number(f64::NAN).as_f64(), None);
    /// assert_eq!(FeatureValue::Null.as_f64(), None);
    /// assert_eq!(FeatureValue::Other("vip".into()).as_f64(), None);
    /// ```
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FeatureValue::Number(value) if value.is_finite() => Some(value),
            FeatureValue::Number(_) | FeatureValue::Null | FeatureValue::Other(_) => None,
            FeatureValue::Bool(value) => Some(if value { 1.0 } else { 0.0 }),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Bool(value)
    }
}

/// Feature values of one entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Entity identifier
    pub id: String,
    /// Feature key to value
    #[serde(default)]
    pub features: BTreeMap<String, FeatureValue>,
}

impl FeatureVector {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            features: BTreeMap::new(),
        }
    }

    /// Builder-style insertion, mostly for tests and fixtures.
    #[must_use]
    pub fn with<V>(mut self, key: impl Into<String>, value: V) -> Self
    where
        V: Into<FeatureValue>,
    {
        self.features.insert(key.into(), value.into());
        self
    }

    /// Usable numeric value of `key`, if any.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<f64> {
        self.features.get(key).and_then(FeatureValue::as_f64)
    }

    /// Copy of this vector restricted to `keys`.
    ///
    /// Keys missing from this vector stay missing.
    #[must_use]
    pub fn retain_keys<'a, I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let features = keys
            .into_iter()
            .filter_map(|key| self.features.get_key_value(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self {
            id: self.id.clone(),
            features,
        }
    }
}

/// Sorted union of all feature keys across `vectors`.
#[must_use]
pub fn feature_keys(vectors: &[FeatureVector]) -> BTreeSet<&str> {
    vectors
        .iter()
        .flat_map(|vector| vector.features.keys())
        .map(String::as_str)
        .collect()
}

/// Usable values of `key`, in entity order.
#[must_use]
pub fn column(vectors: &[FeatureVector], key: &str) -> Vec<f64> {
    vectors
        .iter()
        .filter_map(|vector| vector.value(key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_values() {
        let json = r#"{"id": "a", "features": {"x": 3, "hasGift": true, "y": null}}"#;
        let vector: FeatureVector = serde_json::from_str(json).unwrap();
        assert_eq!(vector.value("x"), Some(3.0));
        assert_eq!(vector.value("hasGift"), Some(1.0));
        assert_eq!(vector.value("y"), None);
        assert_eq!(vector.value("missing"), None);
        assert_eq!(vector.features.len(), 3);
    }

    #[test]
    fn test_non_numeric_values_are_unusable() {
        let json = r#"{"id": "a", "features": {"x": 1, "note": "vip", "tags": ["a"], "meta": {"k": 1}}}"#;
        let vector: FeatureVector = serde_json::from_str(json).unwrap();
        assert_eq!(vector.features.len(), 4);
        assert_eq!(vector.value("x"), Some(1.0));
        assert_eq!(vector.value("note"), None);
        assert_eq!(vector.value("tags"), None);
        assert_eq!(vector.value("meta"), None);
        assert_eq!(
            vector.features["note"],
            FeatureValue::Other(serde_json::Value::from("vip"))
        );
        // round-trips unchanged
        let back: FeatureVector =
            serde_json::from_str(&serde_json::to_string(&vector).unwrap()).unwrap();
        assert_eq!(back, vector);
    }

    #[test]
    fn test_feature_keys_union() {
        let vectors = [
            FeatureVector::new("a").with("x", 1.0),
            FeatureVector::new("b").with("y", 2.0).with("x", 3.0),
        ];
        let keys = feature_keys(&vectors).into_iter().collect::<Vec<_>>();
        assert_eq!(keys, ["x", "y"]);
        assert_eq!(column(&vectors, "x"), [1.0, 3.0]);
        assert_eq!(column(&vectors, "y"), [2.0]);
    }

    #[test]
    fn test_retain_keys_preserves_absence() {
        let vector = FeatureVector::new("a").with("x", 1.0).with("y", 2.0);
        let reduced = vector.retain_keys(["y", "z"]);
        assert_eq!(reduced.id, "a");
        assert_eq!(reduced.features.len(), 1);
        assert_eq!(reduced.value("y"), Some(2.0));
        assert!(!reduced.features.contains_key("z"));
    }
}
