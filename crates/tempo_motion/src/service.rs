//! Bare value animation outside any binding

use crate::error::{MotionError, Result, TriggerMode};
use std::rc::Rc;
use tempo_animation::{
    AnimatableValue, AnimationEngine, KeyframeValue, PlaybackHandle, TransitionOptions,
};

/// Animates plain numbers and strings with the engine
///
/// The caller owns the returned handle.
#[derive(Clone)]
pub struct MotionService {
    engine: Rc<dyn AnimationEngine>,
}

impl MotionService {
    pub fn new(engine: Rc<dyn AnimationEngine>) -> Self {
        Self { engine }
    }

    /// Animate from `from` to `to`; progress is read through the handle
    pub fn from_to(
        &self,
        from: impl Into<AnimatableValue>,
        to: impl Into<KeyframeValue>,
        options: &TransitionOptions,
    ) -> Result<PlaybackHandle> {
        let from = from.into();
        let to = to.into();
        tracing::debug!(%from, ?to, "animate value");
        self.engine
            .animate_value(from, &to, options)
            .map_err(|err| MotionError::new(TriggerMode::Direct, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_animation::testing::{Call, FakeCapabilities};

    #[test]
    fn test_from_to_forwards_to_engine() {
        let fakes = FakeCapabilities::new();
        let service = MotionService::new(fakes.engine.clone());

        let handle = service
            .from_to(0.0, 100.0, &TransitionOptions::tween(0.5))
            .unwrap();
        assert_eq!(handle.duration(), 0.5);

        match &fakes.log.calls()[0] {
            Call::AnimateValue { from, to, .. } => {
                assert_eq!(*from, AnimatableValue::Number(0.0));
                assert_eq!(to.final_value(), Some(&AnimatableValue::Number(100.0)));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_from_to_propagates_engine_errors() {
        let fakes = FakeCapabilities::new();
        fakes
            .engine
            .fail_next(tempo_animation::AnimationError::UnsupportedTarget("color".into()));
        let service = MotionService::new(fakes.engine.clone());

        let Err(err) = service.from_to("#fff", "#000", &TransitionOptions::new()) else {
            panic!("expected an engine error");
        };
        assert_eq!(err.mode, TriggerMode::Direct);
    }
}
