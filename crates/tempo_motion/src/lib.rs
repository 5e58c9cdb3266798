//! Tempo Motion
//!
//! Reactive animation triggers for a host element. A [`MotionBinding`]
//! watches declarative inputs and decides, per trigger mode, what to hand to
//! the animation engine and the scroll and view linkers:
//!
//! | Trigger | Fires on | Teardown |
//! |---------|----------|----------|
//! | direct  | `animate` input change | stop the animation |
//! | scroll  | `scroll` input or options change | dispose the scroll link |
//! | view    | `view` input or options change, then each viewport enter | dispose the view link, stop the last enter animation |
//! | hover   | pointer enter / leave | stopped by the next engage or on dispose |
//! | tap     | pointer or touch down / up | stopped by the next engage or on dispose |
//!
//! Every created handle is published to one output cell,
//! [`MotionBinding::animation`], last write wins.
//!
//! Keyframe dispatch targets the host's children instead of the host when
//! the transition carries a per-index delay and the host has children; see
//! [`tempo_animation::stagger`].

pub mod binding;
pub mod error;
pub mod input;
pub mod service;
mod trigger;

#[cfg(test)]
mod tests;

pub use binding::{MotionBinding, MotionInputs, MotionServices};
pub use error::{MotionError, Result, TriggerMode};
pub use input::{AnimateInput, ScrollInput, ViewInput};
pub use service::MotionService;
