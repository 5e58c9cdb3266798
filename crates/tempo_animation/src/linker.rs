//! Scroll and viewport linkers
//!
//! Linkers tie an external event source to animation playback. Each link
//! call returns a [`Disposer`] that severs the link. Once an animation is
//! handed to a scroll linker, stopping it is the linker's job: disposing the
//! link tears the animation down too.

use crate::error::Result;
use crate::playback::PlaybackHandle;
use crate::target::ElementId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

// ============================================================================
// Disposer
// ============================================================================

/// Severs a link when disposed
///
/// Disposing twice, or disposing a no-op disposer, does nothing.
#[derive(Default)]
pub struct Disposer {
    inner: Option<Box<dyn FnOnce()>>,
}

impl Disposer {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self {
            inner: Some(Box::new(f)),
        }
    }

    /// A disposer with nothing linked
    pub fn noop() -> Self {
        Self { inner: None }
    }

    /// Sever the link if it is still in place
    pub fn dispose(&mut self) {
        if let Some(f) = self.inner.take() {
            tracing::trace!("disposing link");
            f();
        }
    }

    /// Whether disposing would still do something
    pub fn is_linked(&self) -> bool {
        self.inner.is_some()
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("linked", &self.is_linked())
            .finish()
    }
}

// ============================================================================
// Scroll
// ============================================================================

/// Scroll measurements for one axis
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisScrollInfo {
    pub current: f64,
    pub offset: Vec<f64>,
    pub progress: f64,
    pub scroll_length: f64,
    pub velocity: f64,
    pub target_offset: f64,
    pub target_length: f64,
    pub container_length: f64,
}

/// Scroll measurements delivered with each progress update
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollInfo {
    pub time: f64,
    pub x: AxisScrollInfo,
    pub y: AxisScrollInfo,
}

/// Raw progress subscriber: `(progress, info)`
pub type ProgressCallback = Rc<dyn Fn(f64, &ScrollInfo)>;

/// What a scroll link drives
#[derive(Clone)]
pub enum ScrollSubject {
    /// Scrub an animation's playback with scroll progress
    Animation(PlaybackHandle),
    /// Report progress to a callback, no animation involved
    Progress(ProgressCallback),
}

impl ScrollSubject {
    /// Wrap a progress closure
    pub fn progress(f: impl Fn(f64, &ScrollInfo) + 'static) -> Self {
        ScrollSubject::Progress(Rc::new(f))
    }
}

impl fmt::Debug for ScrollSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollSubject::Animation(_) => f.write_str("Animation(..)"),
            ScrollSubject::Progress(_) => f.write_str("Progress(<fn>)"),
        }
    }
}

/// Scroll axis to track
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
    X,
    #[default]
    Y,
}

/// One edge of a scroll offset, e.g. `"start end"` or `"0.5 center"`:
/// a target position followed by a container position
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrollOffset(pub String);

impl ScrollOffset {
    pub fn new(edge: impl Into<String>) -> Self {
        ScrollOffset(edge.into())
    }
}

/// Scroll link configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollOptions {
    /// Scrollable container; the document scroller when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ElementId>,
    /// Track this element's progress through the container instead of the
    /// container's own scroll progress
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ElementId>,
    pub axis: ScrollAxis,
    /// Start and end intersections that map to progress 0 and 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<(ScrollOffset, ScrollOffset)>,
}

impl ScrollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(mut self, axis: ScrollAxis) -> Self {
        self.axis = axis;
        self
    }

    pub fn container(mut self, container: ElementId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn offset(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.offset = Some((ScrollOffset::new(start), ScrollOffset::new(end)));
        self
    }
}

/// Ties animations or callbacks to scroll progress
pub trait ScrollLinker {
    fn link(&self, subject: ScrollSubject, options: &ScrollOptions) -> Result<Disposer>;
}

// ============================================================================
// View
// ============================================================================

/// Visibility change delivered to view handlers
#[derive(Clone, Debug, PartialEq)]
pub struct ViewEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the target, 0.0 to 1.0
    pub intersection_ratio: f64,
    /// Driver timestamp of the observation
    pub time: f64,
}

/// Called when the target leaves the viewport
pub type ExitHandler = Box<dyn FnOnce(&ViewEntry)>;

/// Called when the target enters the viewport; may return an exit handler
pub type EnterHandler = Rc<dyn Fn(&ViewEntry) -> Option<ExitHandler>>;

/// How much of the target must be visible to count as "in view"
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewAmountRepr", into = "ViewAmountRepr")]
pub enum ViewAmount {
    /// Any visible pixel
    #[default]
    Some,
    /// The whole target
    All,
    /// A visible fraction between 0.0 and 1.0
    Fraction(f64),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ViewAmountRepr {
    Fraction(f64),
    Keyword(String),
}

impl TryFrom<ViewAmountRepr> for ViewAmount {
    type Error = String;

    fn try_from(repr: ViewAmountRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            ViewAmountRepr::Fraction(f) if (0.0..=1.0).contains(&f) => Ok(ViewAmount::Fraction(f)),
            ViewAmountRepr::Fraction(f) => Err(format!("view amount {} outside 0..=1", f)),
            ViewAmountRepr::Keyword(k) if k == "some" => Ok(ViewAmount::Some),
            ViewAmountRepr::Keyword(k) if k == "all" => Ok(ViewAmount::All),
            ViewAmountRepr::Keyword(k) => Err(format!("unknown view amount `{}`", k)),
        }
    }
}

impl From<ViewAmount> for ViewAmountRepr {
    fn from(amount: ViewAmount) -> Self {
        match amount {
            ViewAmount::Some => ViewAmountRepr::Keyword("some".to_string()),
            ViewAmount::All => ViewAmountRepr::Keyword("all".to_string()),
            ViewAmount::Fraction(f) => ViewAmountRepr::Fraction(f),
        }
    }
}

/// Viewport link configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewOptions {
    /// Viewport element; the window when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<ElementId>,
    /// Margin grown around the root, CSS shorthand (`"0px -20% 0px 0px"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    pub amount: ViewAmount,
}

impl ViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, root: ElementId) -> Self {
        self.root = Some(root);
        self
    }

    pub fn margin(mut self, margin: impl Into<String>) -> Self {
        self.margin = Some(margin.into());
        self
    }

    pub fn amount(mut self, amount: ViewAmount) -> Self {
        self.amount = amount;
        self
    }
}

/// Ties callbacks to a target entering and leaving the viewport
pub trait ViewLinker {
    fn link(
        &self,
        target: ElementId,
        on_enter: EnterHandler,
        options: &ViewOptions,
    ) -> Result<Disposer>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_disposer_runs_once() {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let mut disposer = Disposer::new(move || count_clone.set(count_clone.get() + 1));

        assert!(disposer.is_linked());
        disposer.dispose();
        disposer.dispose();
        assert_eq!(count.get(), 1);
        assert!(!disposer.is_linked());

        let mut noop = Disposer::noop();
        noop.dispose();
        assert!(!noop.is_linked());
    }

    #[test]
    fn test_view_options_json() {
        let options: ViewOptions =
            serde_json::from_str(r#"{"margin":"0px 0px -20% 0px","amount":0.5}"#).unwrap();
        assert_eq!(options.amount, ViewAmount::Fraction(0.5));
        assert_eq!(options.margin.as_deref(), Some("0px 0px -20% 0px"));

        let all: ViewOptions = serde_json::from_str(r#"{"amount":"all"}"#).unwrap();
        assert_eq!(all.amount, ViewAmount::All);

        assert!(serde_json::from_str::<ViewOptions>(r#"{"amount":2}"#).is_err());
        assert!(serde_json::from_str::<ViewOptions>(r#"{"amount":"most"}"#).is_err());
    }

    #[test]
    fn test_scroll_options_json() {
        let options: ScrollOptions =
            serde_json::from_str(r#"{"axis":"x","offset":["start end","end start"]}"#).unwrap();
        assert_eq!(options.axis, ScrollAxis::X);
        assert_eq!(
            options.offset,
            Some((ScrollOffset::new("start end"), ScrollOffset::new("end start")))
        );

        assert_eq!(ScrollOptions::default().axis, ScrollAxis::Y);
    }
}
