//! Animation engine contract
//!
//! The engine owns interpolation, easing, physics and the frame driver. The
//! orchestration layer only decides what to animate and when, then hands the
//! request over here.

use crate::error::Result;
use crate::keyframe::KeyframeDefinition;
use crate::playback::PlaybackHandle;
use crate::sequence::AnimationSequence;
use crate::target::AnimationTarget;
use crate::transition::{SequenceOptions, TransitionOptions};
use crate::values::{AnimatableValue, KeyframeValue};

/// Produces playback handles for animation requests
///
/// Errors (malformed keyframes, unresolvable selectors) are returned as-is;
/// callers do not retry.
pub trait AnimationEngine {
    /// Animate a target through keyframes
    ///
    /// When `target` is a collection and `options.delay` is per-index, the
    /// engine staggers the collection by evaluating the delay for each index.
    fn animate(
        &self,
        target: AnimationTarget,
        keyframes: &KeyframeDefinition,
        options: &TransitionOptions,
    ) -> Result<PlaybackHandle>;

    /// Animate a bare value from `from` through `to`
    fn animate_value(
        &self,
        from: AnimatableValue,
        to: &KeyframeValue,
        options: &TransitionOptions,
    ) -> Result<PlaybackHandle>;

    /// Lay out and play a sequence on one timeline
    fn animate_sequence(
        &self,
        sequence: &AnimationSequence,
        options: &SequenceOptions,
    ) -> Result<PlaybackHandle>;
}
