//! Direct trigger: animate whenever the `animate` input changes

use super::Dispatcher;
use crate::binding::MotionInputs;
use crate::error::TriggerMode;
use crate::input::AnimateInput;
use tempo_core::{Effect, EffectCleanup, ReactiveGraph};

pub(crate) fn create_effect(
    graph: &ReactiveGraph,
    dispatch: Dispatcher,
    inputs: MotionInputs,
) -> Effect {
    graph.create_effect(move |_| {
        let Some(input) = inputs.animate.try_get().flatten() else {
            return EffectCleanup::none();
        };

        let result = match &input {
            AnimateInput::Sequence(sequence) => {
                let options = inputs.sequence.get();
                dispatch.animate_sequence(TriggerMode::Direct, sequence, &options)
            }
            AnimateInput::Keyframes(keyframes) => {
                let transition = inputs.transition.get();
                dispatch.animate_keyframes(TriggerMode::Direct, keyframes, &transition)
            }
        };

        match result {
            Ok(handle) => {
                dispatch.publish(TriggerMode::Direct, &handle);
                EffectCleanup::new(move || {
                    tracing::trace!("direct: stopping superseded animation");
                    handle.stop();
                })
            }
            Err(err) => {
                dispatch.report(TriggerMode::Direct, err);
                EffectCleanup::none()
            }
        }
    })
}
