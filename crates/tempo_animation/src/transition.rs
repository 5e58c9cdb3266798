//! Transition options
//!
//! Describes how the engine should move between keyframes: timing, easing,
//! repetition and physics. Which of the duration/spring/inertia families is
//! honored is up to the engine; nothing here validates that only one is set.
//!
//! Options deserialize from camelCase JSON, so presets can live in config
//! files:
//!
//! ```rust
//! use tempo_animation::{Delay, TransitionOptions};
//!
//! let options: TransitionOptions =
//!     serde_json::from_str(r#"{"duration": 0.4, "delay": 0.1, "ease": "easeOut"}"#).unwrap();
//! assert_eq!(options.duration, Some(0.4));
//! assert_eq!(options.delay, Some(Delay::Fixed(0.1)));
//! ```

use crate::easing::Easing;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::rc::Rc;

/// Delay as a function of `(index, total)` over a collection of targets
pub type StaggerFn = Rc<dyn Fn(usize, usize) -> f64>;

/// Delay before an animation starts, in seconds
#[derive(Clone, Deserialize)]
#[serde(from = "f64")]
pub enum Delay {
    /// Same delay for every target
    Fixed(f64),
    /// Per-target delay; requests a staggered collection animation
    PerIndex(StaggerFn),
}

impl Delay {
    /// Wrap a per-index delay function
    pub fn per_index(f: impl Fn(usize, usize) -> f64 + 'static) -> Self {
        Delay::PerIndex(Rc::new(f))
    }

    /// Delay for target `index` of `total`
    pub fn for_index(&self, index: usize, total: usize) -> f64 {
        match self {
            Delay::Fixed(delay) => *delay,
            Delay::PerIndex(f) => f(index, total),
        }
    }

    pub fn is_per_index(&self) -> bool {
        matches!(self, Delay::PerIndex(_))
    }
}

impl From<f64> for Delay {
    fn from(delay: f64) -> Self {
        Delay::Fixed(delay)
    }
}

impl fmt::Debug for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delay::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
            Delay::PerIndex(_) => f.write_str("PerIndex(<fn>)"),
        }
    }
}

impl PartialEq for Delay {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Delay::Fixed(a), Delay::Fixed(b)) => a == b,
            (Delay::PerIndex(a), Delay::PerIndex(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Delay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Delay::Fixed(delay) => serializer.serialize_f64(*delay),
            Delay::PerIndex(_) => Err(serde::ser::Error::custom(
                "per-index delays cannot be serialized",
            )),
        }
    }
}

/// Generator family used to produce intermediate values
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Tween,
    Keyframes,
    Spring,
    Inertia,
    Decay,
}

/// How many extra times an animation plays after the first run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RepeatRepr", into = "RepeatRepr")]
pub enum Repeat {
    Count(u32),
    Infinite,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RepeatRepr {
    Count(u32),
    Keyword(String),
}

impl TryFrom<RepeatRepr> for Repeat {
    type Error = String;

    fn try_from(repr: RepeatRepr) -> Result<Self, Self::Error> {
        match repr {
            RepeatRepr::Count(n) => Ok(Repeat::Count(n)),
            RepeatRepr::Keyword(k) if k == "infinite" => Ok(Repeat::Infinite),
            RepeatRepr::Keyword(k) => Err(format!("unknown repeat `{}`", k)),
        }
    }
}

impl From<Repeat> for RepeatRepr {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Count(n) => RepeatRepr::Count(n),
            Repeat::Infinite => RepeatRepr::Keyword("infinite".to_string()),
        }
    }
}

/// Direction of repeated runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    /// Restart from the first keyframe
    #[default]
    Loop,
    /// Alternate direction each run
    Reverse,
    /// Swap start and end keyframes each run
    Mirror,
}

/// Transition configuration passed through to the engine
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitionOptions {
    /// Duration of the active part of the animation, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<Delay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<Easing>,
    /// Progress offsets (0.0 to 1.0) of each keyframe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<f64>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<GeneratorKind>,

    // Spring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stiffness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damping: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce: Option<f64>,
    /// Overrides `duration` for springs when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_duration: Option<f64>,

    // Inertia
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_constant: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce_stiffness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce_damping: Option<f64>,

    // Inherited velocity and settling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_delta: Option<f64>,

    // Playback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_type: Option<RepeatType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    /// Start this far into the animation, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<f64>,
}

impl TransitionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tween of the given duration in seconds
    pub fn tween(duration: f64) -> Self {
        Self {
            kind: Some(GeneratorKind::Tween),
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// A spring with explicit physics parameters
    pub fn spring(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            kind: Some(GeneratorKind::Spring),
            stiffness: Some(stiffness),
            damping: Some(damping),
            mass: Some(mass),
            ..Self::default()
        }
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self::spring(120.0, 14.0, 1.0)
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self::spring(180.0, 12.0, 1.0)
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self::spring(400.0, 30.0, 1.0)
    }

    /// A very stiff spring with minimal oscillation (good for quick responses)
    pub fn snappy() -> Self {
        Self::spring(600.0, 40.0, 1.0)
    }

    /// Inertial deceleration from an initial velocity
    pub fn inertia(velocity: f64) -> Self {
        Self {
            kind: Some(GeneratorKind::Inertia),
            velocity: Some(velocity),
            ..Self::default()
        }
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn delay(mut self, delay: impl Into<Delay>) -> Self {
        self.delay = Some(delay.into());
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.ease = Some(easing);
        self
    }

    pub fn times(mut self, times: Vec<f64>) -> Self {
        self.times = Some(times);
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn repeat_type(mut self, repeat_type: RepeatType) -> Self {
        self.repeat_type = Some(repeat_type);
        self
    }

    pub fn repeat_delay(mut self, seconds: f64) -> Self {
        self.repeat_delay = Some(seconds);
        self
    }

    pub fn bounce(mut self, bounce: f64) -> Self {
        self.bounce = Some(bounce);
        self
    }

    pub fn visual_duration(mut self, seconds: f64) -> Self {
        self.visual_duration = Some(seconds);
        self
    }

    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    /// Copy of these options with `duration` replaced
    ///
    /// `None` keeps the configured duration.
    pub fn with_duration(&self, duration: Option<f64>) -> Self {
        let mut options = self.clone();
        if let Some(duration) = duration {
            options.duration = Some(duration);
        }
        options
    }
}

/// Options applied to a whole timeline sequence
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequenceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    /// Stretch or squash the whole sequence to this many seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_type: Option<RepeatType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_delay: Option<f64>,
    /// Transition for segments that do not carry their own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_transition: Option<TransitionOptions>,
}

impl SequenceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = Some(seconds);
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn default_transition(mut self, transition: TransitionOptions) -> Self {
        self.default_transition = Some(transition);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_duration_overrides_only_when_given() {
        let options = TransitionOptions::tween(2.0).ease(Easing::EaseOut);

        let released = options.with_duration(Some(0.75));
        assert_eq!(released.duration, Some(0.75));
        assert_eq!(released.ease, Some(Easing::EaseOut));

        let kept = options.with_duration(None);
        assert_eq!(kept.duration, Some(2.0));
    }

    #[test]
    fn test_per_index_delay() {
        let delay = Delay::per_index(|i, _| i as f64 * 0.1);
        assert!(delay.is_per_index());
        assert!((delay.for_index(3, 5) - 0.3).abs() < 1e-9);
        assert_eq!(Delay::Fixed(0.2).for_index(3, 5), 0.2);
    }

    #[test]
    fn test_per_index_delay_does_not_serialize() {
        let options = TransitionOptions::new().delay(Delay::per_index(|i, _| i as f64));
        assert!(serde_json::to_string(&options).is_err());

        let fixed = TransitionOptions::new().duration(1.0).delay(0.5);
        assert_eq!(
            serde_json::to_string(&fixed).unwrap(),
            r#"{"duration":1.0,"delay":0.5}"#
        );
    }

    #[test]
    fn test_spring_preset_json() {
        let options: TransitionOptions = serde_json::from_str(
            r#"{"type":"spring","stiffness":400,"damping":30,"repeat":"infinite","repeatType":"mirror"}"#,
        )
        .unwrap();

        assert_eq!(options.kind, Some(GeneratorKind::Spring));
        assert_eq!(options.stiffness, TransitionOptions::stiff().stiffness);
        assert_eq!(options.repeat, Some(Repeat::Infinite));
        assert_eq!(options.repeat_type, Some(RepeatType::Mirror));

        let bad = serde_json::from_str::<TransitionOptions>(r#"{"repeat":"forever"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_sequence_options_json() {
        let options: SequenceOptions = serde_json::from_str(
            r#"{"duration":3,"repeat":2,"defaultTransition":{"duration":0.5}}"#,
        )
        .unwrap();

        assert_eq!(options.duration, Some(3.0));
        assert_eq!(options.repeat, Some(Repeat::Count(2)));
        assert_eq!(
            options.default_transition.and_then(|t| t.duration),
            Some(0.5)
        );
    }
}
