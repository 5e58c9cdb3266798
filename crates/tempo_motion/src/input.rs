//! Declarative trigger inputs
//!
//! Each trigger mode accepts a small tagged union: a timeline sequence, a
//! callback where the mode supports one, or a keyframe map.

use std::fmt;
use std::rc::Rc;
use tempo_animation::{
    AnimationSequence, EnterHandler, ExitHandler, KeyframeDefinition, ProgressCallback,
    ScrollInfo, ViewEntry,
};

/// What the direct trigger animates
#[derive(Clone, Debug, PartialEq)]
pub enum AnimateInput {
    /// A whole timeline, played with the sequence options
    Sequence(AnimationSequence),
    /// Keyframes for the host element, or its children when staggered
    Keyframes(KeyframeDefinition),
}

impl From<KeyframeDefinition> for AnimateInput {
    fn from(keyframes: KeyframeDefinition) -> Self {
        AnimateInput::Keyframes(keyframes)
    }
}

impl From<AnimationSequence> for AnimateInput {
    fn from(sequence: AnimationSequence) -> Self {
        AnimateInput::Sequence(sequence)
    }
}

/// What the scroll trigger links to scroll progress
#[derive(Clone)]
pub enum ScrollInput {
    Sequence(AnimationSequence),
    /// Raw progress subscriber; no animation is created
    Progress(ProgressCallback),
    Keyframes(KeyframeDefinition),
}

impl ScrollInput {
    pub fn progress(f: impl Fn(f64, &ScrollInfo) + 'static) -> Self {
        ScrollInput::Progress(Rc::new(f))
    }
}

impl fmt::Debug for ScrollInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollInput::Sequence(sequence) => f.debug_tuple("Sequence").field(sequence).finish(),
            ScrollInput::Progress(_) => f.write_str("Progress(<fn>)"),
            ScrollInput::Keyframes(keyframes) => {
                f.debug_tuple("Keyframes").field(keyframes).finish()
            }
        }
    }
}

impl From<KeyframeDefinition> for ScrollInput {
    fn from(keyframes: KeyframeDefinition) -> Self {
        ScrollInput::Keyframes(keyframes)
    }
}

impl From<AnimationSequence> for ScrollInput {
    fn from(sequence: AnimationSequence) -> Self {
        ScrollInput::Sequence(sequence)
    }
}

/// What the view trigger plays when the host enters the viewport
#[derive(Clone)]
pub enum ViewInput {
    Sequence(AnimationSequence),
    /// Handed to the view linker as-is
    Enter(EnterHandler),
    Keyframes(KeyframeDefinition),
}

impl ViewInput {
    pub fn on_enter(f: impl Fn(&ViewEntry) -> Option<ExitHandler> + 'static) -> Self {
        ViewInput::Enter(Rc::new(f))
    }
}

impl fmt::Debug for ViewInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewInput::Sequence(sequence) => f.debug_tuple("Sequence").field(sequence).finish(),
            ViewInput::Enter(_) => f.write_str("Enter(<fn>)"),
            ViewInput::Keyframes(keyframes) => {
                f.debug_tuple("Keyframes").field(keyframes).finish()
            }
        }
    }
}

impl From<KeyframeDefinition> for ViewInput {
    fn from(keyframes: KeyframeDefinition) -> Self {
        ViewInput::Keyframes(keyframes)
    }
}

impl From<AnimationSequence> for ViewInput {
    fn from(sequence: AnimationSequence) -> Self {
        ViewInput::Sequence(sequence)
    }
}
