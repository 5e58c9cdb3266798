//! Scenarios organized by trigger mode

pub mod direct;
pub mod gestures;
pub mod scroll;
pub mod stagger;
pub mod view;

use crate::runner::TestSuite;
use tempo_animation::KeyframeDefinition;

/// Create all scenario suites
pub fn all_suites() -> Vec<TestSuite> {
    vec![
        direct::suite(),
        scroll::suite(),
        view::suite(),
        gestures::suite(),
        stagger::suite(),
    ]
}

pub(crate) fn fade(opacity: f64) -> KeyframeDefinition {
    KeyframeDefinition::new().set("opacity", opacity)
}
