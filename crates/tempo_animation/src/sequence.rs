//! Timeline sequences
//!
//! A sequence is an ordered list of segments the engine lays out on one
//! timeline. Each segment names its own target, so sequences bypass the
//! single-element/stagger dispatch that plain keyframe inputs go through.
//!
//! Segment placement is controlled by [`SequenceTime`]:
//!
//! | `at`       | Meaning                                      |
//! |------------|----------------------------------------------|
//! | `1.5`      | absolute time in seconds                     |
//! | `"<"`      | start together with the previous segment     |
//! | `"+0.5"`   | half a second after the previous segment ends|
//! | `"-0.2"`   | overlap the previous segment by 0.2 seconds  |
//! | `"intro"`  | at the label named `intro`                   |

use crate::error::{AnimationError, Result};
use crate::keyframe::KeyframeDefinition;
use crate::target::ElementId;
use crate::transition::TransitionOptions;
use crate::values::{AnimatableValue, KeyframeValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a segment starts on the sequence timeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SequenceTimeRepr", into = "SequenceTimeRepr")]
pub enum SequenceTime {
    /// Seconds from the start of the sequence
    Absolute(f64),
    /// Same start as the previous segment
    WithPrevious,
    /// Seconds relative to the end of the previous segment
    Relative(f64),
    /// At a named label
    Label(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SequenceTimeRepr {
    Seconds(f64),
    Text(String),
}

impl FromStr for SequenceTime {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AnimationError::InvalidSequenceTime(s.to_string()));
        }
        if s == "<" {
            return Ok(SequenceTime::WithPrevious);
        }
        if let Some(rest) = s.strip_prefix('+').or_else(|| s.strip_prefix('-')) {
            let offset: f64 = rest
                .parse()
                .map_err(|_| AnimationError::InvalidSequenceTime(s.to_string()))?;
            let sign = if s.starts_with('-') { -1.0 } else { 1.0 };
            return Ok(SequenceTime::Relative(sign * offset));
        }
        if let Ok(seconds) = s.parse::<f64>() {
            return Ok(SequenceTime::Absolute(seconds));
        }
        Ok(SequenceTime::Label(s.to_string()))
    }
}

impl fmt::Display for SequenceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceTime::Absolute(seconds) => write!(f, "{}", seconds),
            SequenceTime::WithPrevious => f.write_str("<"),
            SequenceTime::Relative(offset) if *offset < 0.0 => write!(f, "{}", offset),
            SequenceTime::Relative(offset) => write!(f, "+{}", offset),
            SequenceTime::Label(label) => f.write_str(label),
        }
    }
}

impl TryFrom<SequenceTimeRepr> for SequenceTime {
    type Error = AnimationError;

    fn try_from(repr: SequenceTimeRepr) -> Result<Self> {
        match repr {
            SequenceTimeRepr::Seconds(seconds) => Ok(SequenceTime::Absolute(seconds)),
            SequenceTimeRepr::Text(text) => text.parse(),
        }
    }
}

impl From<SequenceTime> for SequenceTimeRepr {
    fn from(time: SequenceTime) -> Self {
        match time {
            SequenceTime::Absolute(seconds) => SequenceTimeRepr::Seconds(seconds),
            other => SequenceTimeRepr::Text(other.to_string()),
        }
    }
}

/// What a keyframe segment animates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentTarget {
    Element(ElementId),
    Elements(Vec<ElementId>),
    /// Resolved by the engine against the host document
    Selector(String),
}

impl From<ElementId> for SegmentTarget {
    fn from(element: ElementId) -> Self {
        SegmentTarget::Element(element)
    }
}

/// One entry of a sequence
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Segment {
    /// Animate elements through keyframes
    Keyframes {
        target: SegmentTarget,
        keyframes: KeyframeDefinition,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transition: Option<TransitionOptions>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<SequenceTime>,
    },
    /// Animate a bare value
    Value {
        from: AnimatableValue,
        to: KeyframeValue,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transition: Option<TransitionOptions>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<SequenceTime>,
    },
    /// Name a point on the timeline
    Label {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<SequenceTime>,
    },
}

impl Segment {
    /// Keyframe segment with the sequence's default transition
    pub fn keyframes(target: impl Into<SegmentTarget>, keyframes: KeyframeDefinition) -> Self {
        Segment::Keyframes {
            target: target.into(),
            keyframes,
            transition: None,
            at: None,
        }
    }

    /// Label at the current end of the timeline
    pub fn label(name: impl Into<String>) -> Self {
        Segment::Label {
            name: name.into(),
            at: None,
        }
    }

    /// Attach a transition (ignored on labels)
    pub fn with_transition(mut self, options: TransitionOptions) -> Self {
        match &mut self {
            Segment::Keyframes { transition, .. } | Segment::Value { transition, .. } => {
                *transition = Some(options);
            }
            Segment::Label { .. } => {}
        }
        self
    }

    /// Place the segment on the timeline
    pub fn at(mut self, time: SequenceTime) -> Self {
        match &mut self {
            Segment::Keyframes { at, .. } | Segment::Value { at, .. } | Segment::Label { at, .. } => {
                *at = Some(time);
            }
        }
        self
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Segment::Label { .. })
    }
}

/// An ordered list of segments played on one timeline
pub type AnimationSequence = Vec<Segment>;
