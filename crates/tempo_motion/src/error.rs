//! Error types for tempo_motion

use std::fmt;
use tempo_animation::AnimationError;
use thiserror::Error;

/// An independent reason an animation may start
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerMode {
    /// The `animate` input
    Direct,
    /// The `scroll` input, linked to scroll progress
    Scroll,
    /// The `view` input, linked to viewport visibility
    View,
    Hover,
    Tap,
}

impl TriggerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerMode::Direct => "direct",
            TriggerMode::Scroll => "scroll",
            TriggerMode::View => "view",
            TriggerMode::Hover => "hover",
            TriggerMode::Tap => "tap",
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure from the engine or a linker, tagged with the trigger that hit it
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{mode} trigger failed: {source}")]
pub struct MotionError {
    pub mode: TriggerMode,
    pub source: AnimationError,
}

impl MotionError {
    pub fn new(mode: TriggerMode, source: AnimationError) -> Self {
        Self { mode, source }
    }
}

/// Result type for tempo_motion operations
pub type Result<T> = std::result::Result<T, MotionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display_and_source() {
        let err = MotionError::new(
            TriggerMode::Scroll,
            AnimationError::ScrollLink("no scroll container".into()),
        );
        assert_eq!(
            err.to_string(),
            "scroll trigger failed: scroll link failed: no scroll container"
        );
        assert!(err.source().is_some());
    }
}
