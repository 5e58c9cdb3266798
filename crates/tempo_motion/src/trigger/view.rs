//! View trigger: play the `view` input each time the host enters the viewport
//!
//! Keyframe and sequence inputs are wrapped in an enter handler that reads
//! the transition and children at enter time, so stagger eligibility follows
//! the host's current state rather than the state at link time. Each enter
//! returns an exit handler stopping the animation it started.

use super::Dispatcher;
use crate::binding::MotionInputs;
use crate::error::TriggerMode;
use crate::input::ViewInput;
use std::cell::RefCell;
use std::rc::Rc;
use tempo_animation::{AnimationError, EnterHandler, ExitHandler, PlaybackHandle, ViewEntry};
use tempo_core::{Effect, EffectCleanup, ReactiveGraph};

/// The animation started by the latest enter, until its exit
type ActiveSlot = Rc<RefCell<Option<PlaybackHandle>>>;

pub(crate) fn create_effect(
    graph: &ReactiveGraph,
    dispatch: Dispatcher,
    inputs: MotionInputs,
) -> Effect {
    graph.create_effect(move |_| {
        let Some(input) = inputs.view.try_get().flatten() else {
            return EffectCleanup::none();
        };
        let options = inputs.view_options.get();
        let active: ActiveSlot = Rc::default();

        let on_enter: EnterHandler = match input {
            ViewInput::Enter(handler) => handler,
            ViewInput::Sequence(sequence) => {
                let dispatch = dispatch.clone();
                let inputs = inputs.clone();
                let active = active.clone();
                Rc::new(move |entry: &ViewEntry| {
                    tracing::debug!(target_element = %entry.target, "view: enter");
                    start(&dispatch, &active, || {
                        let options = inputs.sequence.get_untracked().unwrap_or_default();
                        dispatch.animate_sequence(TriggerMode::View, &sequence, &options)
                    })
                })
            }
            ViewInput::Keyframes(keyframes) => {
                let dispatch = dispatch.clone();
                let inputs = inputs.clone();
                let active = active.clone();
                Rc::new(move |entry: &ViewEntry| {
                    tracing::debug!(target_element = %entry.target, "view: enter");
                    start(&dispatch, &active, || {
                        let transition = inputs.transition.get_untracked().unwrap_or_default();
                        dispatch.animate_keyframes(TriggerMode::View, &keyframes, &transition)
                    })
                })
            }
        };

        match dispatch
            .services
            .view
            .link(dispatch.element(), on_enter, &options)
        {
            Ok(mut disposer) => EffectCleanup::new(move || {
                tracing::trace!("view: disposing link");
                disposer.dispose();
                let handle = active.borrow_mut().take();
                if let Some(handle) = handle {
                    handle.stop();
                }
            }),
            Err(err) => {
                dispatch.report(TriggerMode::View, err);
                EffectCleanup::none()
            }
        }
    })
}

/// Start an enter animation and build the exit handler that stops it
fn start(
    dispatch: &Dispatcher,
    active: &ActiveSlot,
    animate: impl FnOnce() -> Result<PlaybackHandle, AnimationError>,
) -> Option<ExitHandler> {
    // Re-entering without an exit supersedes the previous enter
    let previous = active.borrow_mut().take();
    if let Some(previous) = previous {
        previous.stop();
    }

    let handle = match animate() {
        Ok(handle) => handle,
        Err(err) => {
            dispatch.report(TriggerMode::View, err);
            return None;
        }
    };

    dispatch.publish(TriggerMode::View, &handle);
    *active.borrow_mut() = Some(handle.clone());

    let active = active.clone();
    Some(Box::new(move |_entry: &ViewEntry| {
        let current = {
            let mut slot = active.borrow_mut();
            match slot.as_ref() {
                Some(current) if Rc::ptr_eq(current, &handle) => slot.take(),
                _ => None,
            }
        };
        if let Some(current) = current {
            tracing::trace!("view: exit, stopping animation");
            current.stop();
        }
    }))
}
