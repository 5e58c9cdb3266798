//! Scroll trigger: link the `scroll` input to scroll progress
//!
//! Once an animation is linked, the scroll linker owns stopping it. The
//! cleanup only disposes the link.

use super::Dispatcher;
use crate::binding::MotionInputs;
use crate::error::TriggerMode;
use crate::input::ScrollInput;
use tempo_animation::{AnimationError, Disposer, PlaybackHandle, ScrollOptions, ScrollSubject};
use tempo_core::{Effect, EffectCleanup, ReactiveGraph};

pub(crate) fn create_effect(
    graph: &ReactiveGraph,
    dispatch: Dispatcher,
    inputs: MotionInputs,
) -> Effect {
    graph.create_effect(move |_| {
        let Some(input) = inputs.scroll.try_get().flatten() else {
            return EffectCleanup::none();
        };
        let options = inputs.scroll_options.get();

        let linked = match input {
            ScrollInput::Progress(callback) => {
                tracing::debug!("scroll: linking progress callback");
                dispatch
                    .services
                    .scroll
                    .link(ScrollSubject::Progress(callback), &options)
            }
            ScrollInput::Sequence(sequence) => {
                let sequence_options = inputs.sequence.get();
                dispatch
                    .animate_sequence(TriggerMode::Scroll, &sequence, &sequence_options)
                    .and_then(|handle| link_animation(&dispatch, handle, &options))
            }
            ScrollInput::Keyframes(keyframes) => {
                let transition = inputs.transition.get();
                dispatch
                    .animate_keyframes(TriggerMode::Scroll, &keyframes, &transition)
                    .and_then(|handle| link_animation(&dispatch, handle, &options))
            }
        };

        match linked {
            Ok(mut disposer) => EffectCleanup::new(move || {
                tracing::trace!("scroll: disposing link");
                disposer.dispose();
            }),
            Err(err) => {
                dispatch.report(TriggerMode::Scroll, err);
                EffectCleanup::none()
            }
        }
    })
}

/// Hand `handle` to the scroll linker, then publish it
///
/// If linking fails nobody owns the animation, so it is stopped here.
fn link_animation(
    dispatch: &Dispatcher,
    handle: PlaybackHandle,
    options: &ScrollOptions,
) -> Result<Disposer, AnimationError> {
    match dispatch
        .services
        .scroll
        .link(ScrollSubject::Animation(handle.clone()), options)
    {
        Ok(disposer) => {
            dispatch.publish(TriggerMode::Scroll, &handle);
            Ok(disposer)
        }
        Err(err) => {
            handle.stop();
            Err(err)
        }
    }
}
