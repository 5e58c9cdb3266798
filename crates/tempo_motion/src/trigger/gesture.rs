//! Hover and tap gesture state machines
//!
//! ```text
//!            engage                      release
//!   idle ───────────────▶ engaged ───────────────────▶ released
//!     ▲                     │  animate to hover/tap       │ animate back to
//!     │                     │  keyframes                  │ initial, lasting as
//!     └─────────────────────┴──────── engage ◀────────────┘ long as engage ran
//! ```
//!
//! Pointer leave releases hover and then tap, in that order: hosts may
//! deliver leave before the press ends.

use super::Dispatcher;
use crate::binding::MotionInputs;
use crate::error::{MotionError, Result, TriggerMode};
use std::cell::RefCell;
use tempo_animation::{geometric_identity, AnimationTarget, KeyframeDefinition, PlaybackHandle};
use tempo_core::State;

/// Which gesture a state machine tracks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Gesture {
    Hover,
    Tap,
}

impl Gesture {
    fn mode(self) -> TriggerMode {
        match self {
            Gesture::Hover => TriggerMode::Hover,
            Gesture::Tap => TriggerMode::Tap,
        }
    }

    fn input(self, inputs: &MotionInputs) -> &State<Option<KeyframeDefinition>> {
        match self {
            Gesture::Hover => &inputs.hover,
            Gesture::Tap => &inputs.tap,
        }
    }
}

/// Handles retained by one gesture
#[derive(Default)]
struct Retained {
    /// Forward animation, kept until release to read its elapsed time
    engage: Option<PlaybackHandle>,
    /// Latest release animation, stopped by the next engage
    release: Option<PlaybackHandle>,
}

pub(crate) struct GestureMachine {
    gesture: Gesture,
    retained: RefCell<Retained>,
}

impl GestureMachine {
    pub fn new(gesture: Gesture) -> Self {
        Self {
            gesture,
            retained: RefCell::new(Retained::default()),
        }
    }

    /// Animate toward the gesture keyframes, if any are set
    pub fn engage(&self, dispatch: &Dispatcher, inputs: &MotionInputs) -> Result<()> {
        let mode = self.gesture.mode();
        let Some(keyframes) = self.gesture.input(inputs).get_untracked().flatten() else {
            return Ok(());
        };
        let transition = inputs.transition.get_untracked().unwrap_or_default();

        self.halt();

        tracing::debug!(%mode, "engage");
        let handle = dispatch
            .services
            .engine
            .animate(
                AnimationTarget::Element(dispatch.element()),
                &keyframes,
                &transition,
            )
            .map_err(|err| MotionError::new(mode, err))?;

        self.retained.borrow_mut().engage = Some(handle.clone());
        dispatch.publish(mode, &handle);
        Ok(())
    }

    /// Animate back to `initial` (or the identity transform)
    ///
    /// Runs when the gesture input is set or an engage is still retained.
    /// The release lasts as long as the engage animation had run; without a
    /// retained engage the configured duration is kept.
    pub fn release(&self, dispatch: &Dispatcher, inputs: &MotionInputs) -> Result<()> {
        let mode = self.gesture.mode();
        let engaged = self.retained.borrow_mut().engage.take();
        let active = self.gesture.input(inputs).get_untracked().flatten().is_some();
        if !active && engaged.is_none() {
            return Ok(());
        }

        let previous = self.retained.borrow_mut().release.take();
        if let Some(previous) = previous {
            previous.stop();
        }

        let elapsed = engaged.as_ref().map(|handle| handle.time());
        if let Some(engaged) = engaged {
            engaged.stop();
        }

        let keyframes = inputs
            .initial
            .get_untracked()
            .flatten()
            .unwrap_or_else(geometric_identity);
        let transition = inputs
            .transition
            .get_untracked()
            .unwrap_or_default()
            .with_duration(elapsed);

        tracing::debug!(%mode, ?elapsed, "release");
        let handle = dispatch
            .services
            .engine
            .animate(
                AnimationTarget::Element(dispatch.element()),
                &keyframes,
                &transition,
            )
            .map_err(|err| MotionError::new(mode, err))?;

        self.retained.borrow_mut().release = Some(handle.clone());
        dispatch.publish(mode, &handle);
        Ok(())
    }

    /// Stop every retained handle
    pub fn halt(&self) {
        let retained = std::mem::take(&mut *self.retained.borrow_mut());
        for handle in [retained.engage, retained.release].into_iter().flatten() {
            handle.stop();
        }
    }
}
