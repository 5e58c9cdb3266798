//! Animatable value types
//!
//! Values handed to the animation engine. Numbers are unitless (the engine
//! applies its default unit per property), text carries units, colors or
//! any other string the engine knows how to parse.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single animatable value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimatableValue {
    /// Unitless number (`100`, `0.5`)
    Number(f64),
    /// Unit or color string (`"100px"`, `"#ff0000"`, `"50%"`)
    Text(String),
}

impl AnimatableValue {
    /// The numeric value, if this is a plain number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnimatableValue::Number(n) => Some(*n),
            AnimatableValue::Text(_) => None,
        }
    }
}

impl fmt::Display for AnimatableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimatableValue::Number(n) => write!(f, "{}", n),
            AnimatableValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AnimatableValue {
    fn from(value: f64) -> Self {
        AnimatableValue::Number(value)
    }
}

impl From<f32> for AnimatableValue {
    fn from(value: f32) -> Self {
        AnimatableValue::Number(value as f64)
    }
}

impl From<i32> for AnimatableValue {
    fn from(value: i32) -> Self {
        AnimatableValue::Number(value as f64)
    }
}

impl From<&str> for AnimatableValue {
    fn from(value: &str) -> Self {
        AnimatableValue::Text(value.to_string())
    }
}

impl From<String> for AnimatableValue {
    fn from(value: String) -> Self {
        AnimatableValue::Text(value)
    }
}

/// The keyframes of one property: a target value or an ordered list of
/// values, where `None` entries keep the current/implicit value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyframeValue {
    Single(AnimatableValue),
    Sequence(Vec<Option<AnimatableValue>>),
}

impl KeyframeValue {
    /// Build a keyframe list from values, none of them implicit
    pub fn sequence<V: Into<AnimatableValue>>(values: impl IntoIterator<Item = V>) -> Self {
        KeyframeValue::Sequence(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// Number of keyframes this value describes
    pub fn len(&self) -> usize {
        match self {
            KeyframeValue::Single(_) => 1,
            KeyframeValue::Sequence(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The last explicit value, which is where the animation settles
    pub fn final_value(&self) -> Option<&AnimatableValue> {
        match self {
            KeyframeValue::Single(value) => Some(value),
            KeyframeValue::Sequence(values) => values.iter().rev().flatten().next(),
        }
    }
}

macro_rules! single_keyframe_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for KeyframeValue {
                fn from(value: $ty) -> Self {
                    KeyframeValue::Single(value.into())
                }
            }
        )*
    };
}

single_keyframe_from!(AnimatableValue, f64, f32, i32, &str, String);

/// A plain object whose properties an engine can animate in place
///
/// Used for [`AnimationTarget::Object`](crate::AnimationTarget::Object),
/// e.g. scene-graph nodes or uniform blocks that are not host elements.
pub trait AnimatableObject {
    /// Current value of a property, if the object has it
    fn get(&self, property: &str) -> Option<AnimatableValue>;

    /// Write an interpolated value
    fn set(&mut self, property: &str, value: AnimatableValue);
}

impl AnimatableObject for IndexMap<String, AnimatableValue> {
    fn get(&self, property: &str) -> Option<AnimatableValue> {
        IndexMap::get(self, property).cloned()
    }

    fn set(&mut self, property: &str, value: AnimatableValue) {
        self.insert(property.to_string(), value);
    }
}
