//! Trigger computations
//!
//! Each trigger mode is one reactive effect (direct, scroll, view) or one
//! gesture state machine (hover, tap). They all dispatch through
//! [`Dispatcher`], which owns the single-vs-collection decision and writes
//! the shared output cells.

pub(crate) mod direct;
pub(crate) mod gesture;
pub(crate) mod scroll;
pub(crate) mod view;

use crate::binding::MotionServices;
use crate::error::{MotionError, TriggerMode};
use std::rc::Rc;
use tempo_animation::{
    stagger_delay, AnimationError, AnimationSequence, AnimationTarget, ElementId,
    HandleSummary, HostElement, KeyframeDefinition, PlaybackHandle, SequenceOptions,
    TransitionOptions,
};
use tempo_core::State;

/// Shared dispatch state captured by every trigger
#[derive(Clone)]
pub(crate) struct Dispatcher {
    pub host: Rc<dyn HostElement>,
    pub services: MotionServices,
    pub animation: State<Option<PlaybackHandle>>,
    pub error: State<Option<MotionError>>,
}

impl Dispatcher {
    pub fn element(&self) -> ElementId {
        self.host.element()
    }

    /// Children when a stagger is requested and there are any, else the host
    ///
    /// Children are queried fresh on every call.
    pub fn resolve_target(&self, transition: &TransitionOptions) -> AnimationTarget {
        if stagger_delay(transition).is_some() {
            let children = self.host.children();
            if !children.is_empty() {
                return AnimationTarget::Elements(children.into_vec());
            }
            tracing::debug!(
                "stagger requested on {} without children, animating the element",
                self.element()
            );
        }
        AnimationTarget::Element(self.element())
    }

    /// Animate keyframes on the resolved target
    pub fn animate_keyframes(
        &self,
        mode: TriggerMode,
        keyframes: &KeyframeDefinition,
        transition: &TransitionOptions,
    ) -> Result<PlaybackHandle, AnimationError> {
        let target = self.resolve_target(transition);
        tracing::debug!(%mode, ?target, properties = keyframes.len(), "animate");
        self.services.engine.animate(target, keyframes, transition)
    }

    pub fn animate_sequence(
        &self,
        mode: TriggerMode,
        sequence: &AnimationSequence,
        options: &SequenceOptions,
    ) -> Result<PlaybackHandle, AnimationError> {
        tracing::debug!(%mode, segments = sequence.len(), "animate sequence");
        self.services.engine.animate_sequence(sequence, options)
    }

    /// Make `handle` the authoritative animation
    ///
    /// A pending error raised by the same mode is cleared.
    pub fn publish(&self, mode: TriggerMode, handle: &PlaybackHandle) {
        tracing::trace!(%mode, handle = ?HandleSummary(&**handle), "publish");
        self.animation.set(Some(handle.clone()));

        let stale = matches!(
            self.error.get_untracked().flatten(),
            Some(ref error) if error.mode == mode
        );
        if stale {
            self.error.set(None);
        }
    }

    /// Record a failure raised where no caller can receive it
    pub fn report(&self, mode: TriggerMode, source: AnimationError) {
        let error = MotionError::new(mode, source);
        tracing::warn!("{}", error);
        self.error.set(Some(error));
    }
}
