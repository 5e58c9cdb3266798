//! Error types for tempo_animation

use thiserror::Error;

/// Errors raised by animation engines, linkers and option parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// A keyframe value the engine cannot interpolate
    #[error("invalid keyframes for `{property}`: {reason}")]
    InvalidKeyframes { property: String, reason: String },

    /// A sequence segment selector that resolved to nothing
    #[error("selector `{0}` matched no elements")]
    InvalidSelector(String),

    /// The engine does not support this kind of target
    #[error("unsupported animation target: {0}")]
    UnsupportedTarget(String),

    /// Linking an animation or callback to scroll progress failed
    #[error("scroll link failed: {0}")]
    ScrollLink(String),

    /// Linking a callback to viewport visibility failed
    #[error("view link failed: {0}")]
    ViewLink(String),

    /// A sequence `at` value that is neither a number, `<`, `+n`/`-n` nor a label
    #[error("invalid sequence time `{0}`")]
    InvalidSequenceTime(String),

    /// An option value outside its accepted range or vocabulary
    #[error("invalid option value: {0}")]
    InvalidOption(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for tempo_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
