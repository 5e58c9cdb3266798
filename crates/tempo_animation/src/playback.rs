//! Playback control handles
//!
//! Every engine call returns a [`PlaybackHandle`]. The computation that
//! created it owns its lifecycle (stop/cancel); anyone else only observes it.

use std::fmt;
use std::rc::Rc;

/// Coarse playback state of an animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayState {
    /// Created but not started, or stopped
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

impl PlayState {
    /// Running or paused: still holds the animated properties
    pub fn is_active(self) -> bool {
        matches!(self, PlayState::Running | PlayState::Paused)
    }
}

/// Control surface of a playing animation
///
/// Methods take `&self`; implementations use interior mutability since the
/// engine's own driver advances the animation between calls.
///
/// `stop` and `cancel` must be idempotent and safe on finished animations.
pub trait PlaybackControls {
    /// Elapsed playback time in seconds
    fn time(&self) -> f64;

    /// Seek to a time in seconds
    fn set_time(&self, time: f64);

    /// Playback rate multiplier (1.0 is normal speed)
    fn speed(&self) -> f64;

    fn set_speed(&self, speed: f64);

    /// Duration of the active part, without delay or repeats, in seconds
    fn duration(&self) -> f64;

    /// Driver timestamp the animation started at, if it has started
    fn start_time(&self) -> Option<f64>;

    fn state(&self) -> PlayState;

    fn play(&self);

    fn pause(&self);

    /// Stop in place, keeping the current animated values
    fn stop(&self);

    /// Jump to the end state
    fn complete(&self);

    /// Stop and revert to the pre-animation values
    fn cancel(&self);

    /// Register a callback for when the animation finishes
    ///
    /// Called at most once. Stopped or cancelled animations never finish.
    fn on_finished(&self, callback: Box<dyn FnOnce()>);

    /// Progress through the active part, clamped to 0.0..=1.0
    fn progress(&self) -> f64 {
        let duration = self.duration();
        if duration <= 0.0 {
            return 1.0;
        }
        (self.time() / duration).clamp(0.0, 1.0)
    }
}

/// Shared handle to a playing animation
pub type PlaybackHandle = Rc<dyn PlaybackControls>;

/// Debug view of a handle for logs
pub struct HandleSummary<'a>(pub &'a dyn PlaybackControls);

impl fmt::Debug for HandleSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playback")
            .field("state", &self.0.state())
            .field("time", &self.0.time())
            .field("duration", &self.0.duration())
            .finish()
    }
}
