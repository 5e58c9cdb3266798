//! Stagger delays
//!
//! A transition requests a staggered collection animation by carrying a
//! per-index [`Delay`]. [`stagger_delay`] is the single place that decides
//! whether that is the case; [`stagger`] builds such delays.

use crate::easing::Easing;
use crate::transition::{Delay, StaggerFn, TransitionOptions};
use std::rc::Rc;

/// The per-index delay function of `options`, if it has one
///
/// Returns `None` for constant or missing delays, which means "no stagger
/// requested" regardless of how many children the host has.
pub fn stagger_delay(options: &TransitionOptions) -> Option<StaggerFn> {
    match &options.delay {
        Some(Delay::PerIndex(f)) => Some(f.clone()),
        _ => None,
    }
}

/// Where the stagger wave starts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerOrigin {
    /// Animate first to last
    #[default]
    First,
    /// Animate last to first
    Last,
    /// Animate from the center outward
    Center,
    /// Animate outward from a specific index
    Index(usize),
}

impl StaggerOrigin {
    /// Position the wave starts from in a collection of `total`
    fn position(self, total: usize) -> f64 {
        match self {
            StaggerOrigin::First => 0.0,
            StaggerOrigin::Last => total.saturating_sub(1) as f64,
            StaggerOrigin::Center => total.saturating_sub(1) as f64 / 2.0,
            StaggerOrigin::Index(index) => index as f64,
        }
    }
}

/// Configuration for [`stagger`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaggerOptions {
    /// Delay of the first target to start, in seconds
    pub start_delay: f64,
    pub from: StaggerOrigin,
    /// Redistribute delays along a curve instead of linearly
    pub ease: Option<Easing>,
}

impl StaggerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_delay(mut self, seconds: f64) -> Self {
        self.start_delay = seconds;
        self
    }

    pub fn origin(mut self, origin: StaggerOrigin) -> Self {
        self.from = origin;
        self
    }

    /// Stagger from last to first
    pub fn reverse(self) -> Self {
        self.origin(StaggerOrigin::Last)
    }

    /// Stagger from center outward
    pub fn from_center(self) -> Self {
        self.origin(StaggerOrigin::Center)
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.ease = Some(easing);
        self
    }
}

/// Per-index delay spacing targets `step` seconds apart
///
/// ```rust
/// use tempo_animation::{stagger, StaggerOptions, TransitionOptions};
///
/// let options = TransitionOptions::tween(0.3).delay(stagger(0.05, StaggerOptions::new()));
/// let delay = options.delay.unwrap();
/// assert!((delay.for_index(2, 5) - 0.1).abs() < 1e-9);
/// ```
pub fn stagger(step: f64, options: StaggerOptions) -> Delay {
    let StaggerOptions {
        start_delay,
        from,
        ease,
    } = options;

    Delay::PerIndex(Rc::new(move |index: usize, total: usize| {
        let distance = (index as f64 - from.position(total)).abs();
        let mut delay = step * distance;

        if let Some(easing) = &ease {
            let span = step * total as f64;
            if span > 0.0 {
                delay = easing.apply(delay / span) * span;
            }
        }

        start_delay + delay
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delays(delay: &Delay, total: usize) -> Vec<f64> {
        (0..total).map(|i| delay.for_index(i, total)).collect()
    }

    fn assert_delays(actual: Vec<f64>, expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_stagger_delay_only_for_per_index() {
        assert!(stagger_delay(&TransitionOptions::tween(1.0)).is_none());
        assert!(stagger_delay(&TransitionOptions::tween(1.0).delay(0.2)).is_none());

        let options = TransitionOptions::tween(1.0).delay(Delay::per_index(|i, _| i as f64));
        let f = stagger_delay(&options).unwrap();
        assert_eq!(f(3, 4), 3.0);
    }

    #[test]
    fn test_stagger_first() {
        let delay = stagger(0.05, StaggerOptions::new());
        assert_delays(delays(&delay, 5), &[0.0, 0.05, 0.1, 0.15, 0.2]);
    }

    #[test]
    fn test_stagger_last() {
        let delay = stagger(0.05, StaggerOptions::new().reverse());
        assert_delays(delays(&delay, 5), &[0.2, 0.15, 0.1, 0.05, 0.0]);
    }

    #[test]
    fn test_stagger_center() {
        // Odd counts have a true center element
        let delay = stagger(0.1, StaggerOptions::new().from_center());
        assert_delays(delays(&delay, 5), &[0.2, 0.1, 0.0, 0.1, 0.2]);

        // Even counts split the middle pair
        assert_delays(delays(&delay, 4), &[0.15, 0.05, 0.05, 0.15]);
    }

    #[test]
    fn test_stagger_from_index_with_start_delay() {
        let delay = stagger(
            0.1,
            StaggerOptions::new()
                .start_delay(0.5)
                .origin(StaggerOrigin::Index(1)),
        );
        assert_delays(delays(&delay, 4), &[0.6, 0.5, 0.6, 0.7]);
    }

    #[test]
    fn test_stagger_ease_compresses_early_delays() {
        let linear = stagger(0.1, StaggerOptions::new());
        let eased = stagger(0.1, StaggerOptions::new().ease(Easing::EaseIn));

        assert!((eased.for_index(0, 4) - 0.0).abs() < 1e-9);
        assert!(eased.for_index(1, 4) < linear.for_index(1, 4));

        // Remapped over step * total, so the last index sits inside the curve
        let span = 0.1 * 4.0;
        let last = Easing::EaseIn.apply(0.3 / span) * span;
        assert!((eased.for_index(3, 4) - last).abs() < 1e-9);
        assert!(eased.for_index(3, 4) < linear.for_index(3, 4));
    }
}
