//! Keyframe definitions
//!
//! A [`KeyframeDefinition`] maps property names to the keyframes the
//! property should animate through. Properties keep their insertion order,
//! which is the order they are handed to the engine.
//!
//! ```rust
//! use tempo_animation::{KeyframeDefinition, KeyframeValue};
//!
//! let keyframes = KeyframeDefinition::new()
//!     .set("x", 100.0)
//!     .set("opacity", KeyframeValue::sequence([0.0, 1.0]))
//!     .set("backgroundColor", "#ff0000");
//!
//! assert_eq!(keyframes.len(), 3);
//! assert_eq!(keyframes.keys().next(), Some("x"));
//! ```

use crate::values::{AnimatableValue, KeyframeValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Property name to keyframes, in insertion order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyframeDefinition {
    properties: IndexMap<String, KeyframeValue>,
}

impl KeyframeDefinition {
    /// Create an empty definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyframes of a property (builder pattern)
    ///
    /// Setting a property twice replaces its keyframes but keeps its position.
    pub fn set(mut self, property: impl Into<String>, value: impl Into<KeyframeValue>) -> Self {
        self.insert(property, value);
        self
    }

    /// Set the keyframes of a property in place
    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<KeyframeValue>) {
        self.properties.insert(property.into(), value.into());
    }

    /// Keyframes of a property
    pub fn get(&self, property: &str) -> Option<&KeyframeValue> {
        self.properties.get(property)
    }

    /// Final value of a property, if it has an explicit one
    pub fn target_value(&self, property: &str) -> Option<&AnimatableValue> {
        self.get(property).and_then(KeyframeValue::final_value)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property names in animation order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyframeValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay `other` on top of this definition
    ///
    /// Properties present in both take `other`'s keyframes; new properties are
    /// appended after the existing ones.
    pub fn merge(mut self, other: &KeyframeDefinition) -> Self {
        for (property, value) in other.iter() {
            self.properties.insert(property.to_string(), value.clone());
        }
        self
    }
}

impl<K: Into<String>, V: Into<KeyframeValue>> FromIterator<(K, V)> for KeyframeDefinition {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut definition = KeyframeDefinition::new();
        for (property, value) in iter {
            definition.insert(property, value);
        }
        definition
    }
}

/// Properties of the geometric identity transform, in animation order
pub const GEOMETRIC_IDENTITY: [(&str, f64); 13] = [
    ("x", 0.0),
    ("y", 0.0),
    ("z", 0.0),
    ("scale", 1.0),
    ("scaleX", 1.0),
    ("scaleY", 1.0),
    ("scaleZ", 1.0),
    ("rotate", 0.0),
    ("rotateX", 0.0),
    ("rotateY", 0.0),
    ("rotateZ", 0.0),
    ("skewX", 0.0),
    ("skewY", 0.0),
];

/// Keyframes for "no transform applied": zero translation, rotation and
/// skew, unit scale on every axis
///
/// Gesture release animates back to this when no explicit initial
/// keyframes are supplied.
pub fn geometric_identity() -> KeyframeDefinition {
    GEOMETRIC_IDENTITY.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let keyframes = KeyframeDefinition::new()
            .set("opacity", 1.0)
            .set("x", 100.0)
            .set("opacity", 0.5);

        let keys: Vec<&str> = keyframes.keys().collect();
        assert_eq!(keys, vec!["opacity", "x"]);
        assert_eq!(
            keyframes.target_value("opacity"),
            Some(&AnimatableValue::Number(0.5))
        );
    }

    #[test]
    fn test_geometric_identity() {
        let identity = geometric_identity();
        assert_eq!(identity.len(), 13);
        assert_eq!(identity.target_value("scaleY"), Some(&AnimatableValue::Number(1.0)));
        assert_eq!(identity.target_value("skewX"), Some(&AnimatableValue::Number(0.0)));
        assert!(!identity.contains("opacity"));
    }

    #[test]
    fn test_merge_overrides_and_appends() {
        let base = KeyframeDefinition::new().set("x", 0.0).set("y", 0.0);
        let overlay = KeyframeDefinition::new().set("y", 10.0).set("pathLength", 1.0);

        let merged = base.merge(&overlay);
        let keys: Vec<&str> = merged.keys().collect();
        assert_eq!(keys, vec!["x", "y", "pathLength"]);
        assert_eq!(merged.target_value("y"), Some(&AnimatableValue::Number(10.0)));
    }

    #[test]
    fn test_json_preset_keeps_order() {
        let json = r#"{"scale":3,"backgroundColor":"red","x":[0,null,100]}"#;
        let keyframes: KeyframeDefinition = serde_json::from_str(json).unwrap();

        let keys: Vec<&str> = keyframes.keys().collect();
        assert_eq!(keys, vec!["scale", "backgroundColor", "x"]);
        assert_eq!(
            keyframes.get("x"),
            Some(&KeyframeValue::Sequence(vec![
                Some(AnimatableValue::Number(0.0)),
                None,
                Some(AnimatableValue::Number(100.0)),
            ]))
        );
    }
}
