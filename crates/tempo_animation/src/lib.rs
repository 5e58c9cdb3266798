//! Tempo Animation Model
//!
//! Data types and capability contracts shared by the motion orchestrator and
//! the animation backends that plug into it.
//!
//! # Features
//!
//! - **Keyframes**: insertion-ordered property maps with single or multi-step values
//! - **Transitions**: tween, spring and inertia options with serde presets
//! - **Sequences**: segment lists laid out on one timeline with relative placement
//! - **Stagger**: per-index delays from a first, last, center or explicit origin
//! - **Capabilities**: [`AnimationEngine`], [`ScrollLinker`], [`ViewLinker`] and
//!   [`HostElement`] traits, plus [`PlaybackControls`] handles
//! - **Testing** (feature `testing`): recording fakes of every capability

pub mod easing;
pub mod engine;
pub mod error;
pub mod keyframe;
pub mod linker;
pub mod playback;
pub mod sequence;
pub mod stagger;
pub mod target;
#[cfg(feature = "testing")]
pub mod testing;
pub mod transition;
pub mod values;

pub use easing::Easing;
pub use engine::AnimationEngine;
pub use error::{AnimationError, Result};
pub use keyframe::{geometric_identity, KeyframeDefinition, GEOMETRIC_IDENTITY};
pub use linker::{
    AxisScrollInfo, Disposer, EnterHandler, ExitHandler, ProgressCallback, ScrollAxis,
    ScrollInfo, ScrollLinker, ScrollOffset, ScrollOptions, ScrollSubject, ViewAmount, ViewEntry,
    ViewLinker, ViewOptions,
};
pub use playback::{HandleSummary, PlayState, PlaybackControls, PlaybackHandle};
pub use sequence::{AnimationSequence, Segment, SegmentTarget, SequenceTime};
pub use stagger::{stagger, stagger_delay, StaggerOptions, StaggerOrigin};
pub use target::{AnimationTarget, Children, ElementId, HostElement, ObjectRef};
pub use transition::{
    Delay, GeneratorKind, Repeat, RepeatType, SequenceOptions, StaggerFn, TransitionOptions,
};
pub use values::{AnimatableObject, AnimatableValue, KeyframeValue};
