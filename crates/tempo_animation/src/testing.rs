//! Recording fakes of the external capabilities
//!
//! Enabled with the `testing` feature. Every fake writes into one shared
//! [`CallLog`], so tests can assert on the interleaving of engine calls,
//! handle stops and link teardown:
//!
//! ```rust
//! use tempo_animation::testing::{Call, FakeCapabilities};
//! use tempo_animation::{AnimationEngine, HostElement, KeyframeDefinition, TransitionOptions};
//!
//! let fakes = FakeCapabilities::new();
//! let handle = fakes
//!     .engine
//!     .animate(
//!         fakes.host.element().into(),
//!         &KeyframeDefinition::new().set("opacity", 1.0),
//!         &TransitionOptions::tween(1.0),
//!     )
//!     .unwrap();
//! handle.stop();
//!
//! let calls = fakes.log.calls();
//! assert!(matches!(calls[0], Call::Animate { .. }));
//! assert!(matches!(calls[1], Call::Stop { .. }));
//! ```

use crate::engine::AnimationEngine;
use crate::error::{AnimationError, Result};
use crate::keyframe::KeyframeDefinition;
use crate::linker::{
    Disposer, EnterHandler, ExitHandler, ScrollInfo, ScrollLinker, ScrollOptions, ScrollSubject,
    ViewEntry, ViewLinker, ViewOptions,
};
use crate::playback::{PlayState, PlaybackControls, PlaybackHandle};
use crate::sequence::AnimationSequence;
use crate::target::{AnimationTarget, Children, ElementId, HostElement};
use crate::transition::{SequenceOptions, TransitionOptions};
use crate::values::{AnimatableValue, KeyframeValue};
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Duration given to fake animations whose options carry none
pub const DEFAULT_FAKE_DURATION: f64 = 0.3;

/// What a scroll link was asked to drive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkedSubject {
    /// An animation, by fake handle id
    Animation(Option<u64>),
    Progress,
}

/// One recorded capability call
#[derive(Clone, Debug)]
pub enum Call {
    Animate {
        target: AnimationTarget,
        keyframes: KeyframeDefinition,
        options: TransitionOptions,
        handle: u64,
    },
    AnimateValue {
        from: AnimatableValue,
        to: KeyframeValue,
        options: TransitionOptions,
        handle: u64,
    },
    AnimateSequence {
        sequence: AnimationSequence,
        options: SequenceOptions,
        handle: u64,
    },
    Stop {
        handle: u64,
    },
    Cancel {
        handle: u64,
    },
    ScrollLink {
        link: u64,
        subject: LinkedSubject,
        options: ScrollOptions,
    },
    ScrollUnlink {
        link: u64,
    },
    ViewLink {
        link: u64,
        target: ElementId,
        options: ViewOptions,
    },
    ViewUnlink {
        link: u64,
    },
}

impl Call {
    /// Handle created by an engine call
    pub fn created_handle(&self) -> Option<u64> {
        match self {
            Call::Animate { handle, .. }
            | Call::AnimateValue { handle, .. }
            | Call::AnimateSequence { handle, .. } => Some(*handle),
            _ => None,
        }
    }

    pub fn is_engine_call(&self) -> bool {
        self.created_handle().is_some()
    }
}

#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u64>,
    handles: RefCell<Vec<Rc<FakePlayback>>>,
}

impl Recorder {
    fn push(&self, call: Call) {
        tracing::trace!(?call, "recorded");
        self.calls.borrow_mut().push(call);
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

/// Shared, ordered record of every call made to the fakes
#[derive(Clone, Default)]
pub struct CallLog(Rc<Recorder>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all calls so far
    pub fn calls(&self) -> Vec<Call> {
        self.0.calls.borrow().clone()
    }

    /// Snapshot of the engine calls only
    pub fn engine_calls(&self) -> Vec<Call> {
        self.0
            .calls
            .borrow()
            .iter()
            .filter(|call| call.is_engine_call())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.calls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget recorded calls; created handles stay reachable
    pub fn clear(&self) {
        self.0.calls.borrow_mut().clear();
    }

    /// Fake handle by id
    pub fn handle(&self, id: u64) -> Option<Rc<FakePlayback>> {
        self.0.handles.borrow().iter().find(|h| h.id == id).cloned()
    }

    /// Most recently created fake handle
    pub fn last_handle(&self) -> Option<Rc<FakePlayback>> {
        self.0.handles.borrow().last().cloned()
    }

    /// All fake handles, in creation order
    pub fn handles(&self) -> Vec<Rc<FakePlayback>> {
        self.0.handles.borrow().clone()
    }

    /// Fake id behind a type-erased handle
    pub fn id_of(&self, handle: &PlaybackHandle) -> Option<u64> {
        let ptr = Rc::as_ptr(handle) as *const ();
        self.0
            .handles
            .borrow()
            .iter()
            .find(|h| Rc::as_ptr(*h) as *const () == ptr)
            .map(|h| h.id)
    }

    fn create_handle(&self, duration: f64) -> Rc<FakePlayback> {
        let handle = Rc::new(FakePlayback {
            id: self.0.next_id(),
            time: Cell::new(0.0),
            speed: Cell::new(1.0),
            duration,
            state: Cell::new(PlayState::Running),
            stop_count: Cell::new(0),
            cancel_count: Cell::new(0),
            finished: RefCell::new(Vec::new()),
            recorder: Rc::downgrade(&self.0),
        });
        self.0.handles.borrow_mut().push(handle.clone());
        handle
    }
}

// ============================================================================
// Playback
// ============================================================================

/// Playback handle that never advances on its own
///
/// Tests move it with [`PlaybackControls::set_time`] and [`FakePlayback::finish`].
pub struct FakePlayback {
    id: u64,
    time: Cell<f64>,
    speed: Cell<f64>,
    duration: f64,
    state: Cell<PlayState>,
    stop_count: Cell<usize>,
    cancel_count: Cell<usize>,
    finished: RefCell<Vec<Box<dyn FnOnce()>>>,
    recorder: Weak<Recorder>,
}

impl FakePlayback {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// How many times `stop` was called
    pub fn stop_count(&self) -> usize {
        self.stop_count.get()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancel_count.get()
    }

    /// Whether the handle was stopped or cancelled at least once
    pub fn was_halted(&self) -> bool {
        self.stop_count() + self.cancel_count() > 0
    }

    /// Run to the end and fire finish callbacks
    pub fn finish(&self) {
        if !self.state.get().is_active() {
            return;
        }
        self.time.set(self.duration);
        self.state.set(PlayState::Finished);
        let callbacks = std::mem::take(&mut *self.finished.borrow_mut());
        for callback in callbacks {
            callback();
        }
    }

    fn record(&self, call: Call) {
        if let Some(recorder) = self.recorder.upgrade() {
            recorder.push(call);
        }
    }
}

impl PlaybackControls for FakePlayback {
    fn time(&self) -> f64 {
        self.time.get()
    }

    fn set_time(&self, time: f64) {
        self.time.set(time.max(0.0));
    }

    fn speed(&self) -> f64 {
        self.speed.get()
    }

    fn set_speed(&self, speed: f64) {
        self.speed.set(speed);
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn start_time(&self) -> Option<f64> {
        Some(0.0)
    }

    fn state(&self) -> PlayState {
        self.state.get()
    }

    fn play(&self) {
        if self.state.get() != PlayState::Finished {
            self.state.set(PlayState::Running);
        }
    }

    fn pause(&self) {
        if self.state.get() == PlayState::Running {
            self.state.set(PlayState::Paused);
        }
    }

    fn stop(&self) {
        self.stop_count.set(self.stop_count.get() + 1);
        self.record(Call::Stop { handle: self.id });
        if self.state.get().is_active() {
            self.state.set(PlayState::Idle);
        }
        self.finished.borrow_mut().clear();
    }

    fn complete(&self) {
        self.finish();
    }

    fn cancel(&self) {
        self.cancel_count.set(self.cancel_count.get() + 1);
        self.record(Call::Cancel { handle: self.id });
        self.time.set(0.0);
        self.state.set(PlayState::Idle);
        self.finished.borrow_mut().clear();
    }

    fn on_finished(&self, callback: Box<dyn FnOnce()>) {
        self.finished.borrow_mut().push(callback);
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Engine that records requests and hands out [`FakePlayback`] handles
pub struct RecordingEngine {
    log: CallLog,
    fail_next: RefCell<Option<AnimationError>>,
}

impl RecordingEngine {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail_next: RefCell::new(None),
        }
    }

    /// Make the next engine call fail with `error`
    pub fn fail_next(&self, error: AnimationError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    fn check_failure(&self) -> Result<()> {
        match self.fail_next.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AnimationEngine for RecordingEngine {
    fn animate(
        &self,
        target: AnimationTarget,
        keyframes: &KeyframeDefinition,
        options: &TransitionOptions,
    ) -> Result<PlaybackHandle> {
        self.check_failure()?;
        let duration = options
            .visual_duration
            .or(options.duration)
            .unwrap_or(DEFAULT_FAKE_DURATION);
        let handle = self.log.create_handle(duration);
        self.log.0.push(Call::Animate {
            target,
            keyframes: keyframes.clone(),
            options: options.clone(),
            handle: handle.id,
        });
        Ok(handle)
    }

    fn animate_value(
        &self,
        from: AnimatableValue,
        to: &KeyframeValue,
        options: &TransitionOptions,
    ) -> Result<PlaybackHandle> {
        self.check_failure()?;
        let handle = self
            .log
            .create_handle(options.duration.unwrap_or(DEFAULT_FAKE_DURATION));
        self.log.0.push(Call::AnimateValue {
            from,
            to: to.clone(),
            options: options.clone(),
            handle: handle.id,
        });
        Ok(handle)
    }

    fn animate_sequence(
        &self,
        sequence: &AnimationSequence,
        options: &SequenceOptions,
    ) -> Result<PlaybackHandle> {
        self.check_failure()?;
        let handle = self
            .log
            .create_handle(options.duration.unwrap_or(DEFAULT_FAKE_DURATION));
        self.log.0.push(Call::AnimateSequence {
            sequence: sequence.clone(),
            options: options.clone(),
            handle: handle.id,
        });
        Ok(handle)
    }
}

// ============================================================================
// Scroll linker
// ============================================================================

type ScrollLinks = Rc<RefCell<FxHashMap<u64, ScrollSubject>>>;

/// Scroll linker driven by [`RecordingScrollLinker::emit_progress`]
///
/// Disposing a link that drives an animation stops that animation.
pub struct RecordingScrollLinker {
    log: CallLog,
    links: ScrollLinks,
    fail_next: RefCell<Option<AnimationError>>,
}

impl RecordingScrollLinker {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            links: Rc::default(),
            fail_next: RefCell::new(None),
        }
    }

    pub fn fail_next(&self, error: AnimationError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    /// Number of links not yet disposed
    pub fn active_links(&self) -> usize {
        self.links.borrow().len()
    }

    /// Deliver scroll progress to every live link
    ///
    /// Animations are scrubbed to `progress * duration`; callbacks receive
    /// the progress and `info` unchanged.
    pub fn emit_progress(&self, progress: f64, info: &ScrollInfo) {
        let mut subjects: Vec<(u64, ScrollSubject)> = self
            .links
            .borrow()
            .iter()
            .map(|(id, subject)| (*id, subject.clone()))
            .collect();
        subjects.sort_by_key(|(id, _)| *id);

        for (_, subject) in subjects {
            match subject {
                ScrollSubject::Animation(handle) => handle.set_time(progress * handle.duration()),
                ScrollSubject::Progress(callback) => callback(progress, info),
            }
        }
    }
}

impl ScrollLinker for RecordingScrollLinker {
    fn link(&self, subject: ScrollSubject, options: &ScrollOptions) -> Result<Disposer> {
        if let Some(error) = self.fail_next.borrow_mut().take() {
            return Err(error);
        }

        let link = self.log.0.next_id();
        let linked = match &subject {
            ScrollSubject::Animation(handle) => LinkedSubject::Animation(self.log.id_of(handle)),
            ScrollSubject::Progress(_) => LinkedSubject::Progress,
        };
        self.log.0.push(Call::ScrollLink {
            link,
            subject: linked,
            options: options.clone(),
        });
        self.links.borrow_mut().insert(link, subject);

        let links = self.links.clone();
        let log = self.log.clone();
        Ok(Disposer::new(move || {
            let removed = links.borrow_mut().remove(&link);
            if let Some(subject) = removed {
                log.0.push(Call::ScrollUnlink { link });
                if let ScrollSubject::Animation(handle) = subject {
                    handle.stop();
                }
            }
        }))
    }
}

// ============================================================================
// View linker
// ============================================================================

struct ViewLink {
    target: ElementId,
    on_enter: EnterHandler,
    in_view: bool,
    exit: Option<ExitHandler>,
}

type ViewLinks = Rc<RefCell<FxHashMap<u64, ViewLink>>>;

/// View linker driven by [`RecordingViewLinker::enter`] and
/// [`RecordingViewLinker::exit`]
///
/// Disposing a link drops its pending exit handler without calling it.
pub struct RecordingViewLinker {
    log: CallLog,
    links: ViewLinks,
    fail_next: RefCell<Option<AnimationError>>,
}

impl RecordingViewLinker {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            links: Rc::default(),
            fail_next: RefCell::new(None),
        }
    }

    pub fn fail_next(&self, error: AnimationError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    pub fn active_links(&self) -> usize {
        self.links.borrow().len()
    }

    /// Bring `target` into view, returning how many enter handlers ran
    ///
    /// Links already in view are skipped.
    pub fn enter(&self, target: ElementId) -> usize {
        let mut pending: Vec<(u64, EnterHandler)> = self
            .links
            .borrow()
            .iter()
            .filter(|(_, link)| link.target == target && !link.in_view)
            .map(|(id, link)| (*id, link.on_enter.clone()))
            .collect();
        pending.sort_by_key(|(id, _)| *id);

        let entry = ViewEntry {
            target,
            is_intersecting: true,
            intersection_ratio: 1.0,
            time: 0.0,
        };
        for (id, on_enter) in &pending {
            let exit = on_enter(&entry);
            if let Some(link) = self.links.borrow_mut().get_mut(id) {
                link.in_view = true;
                link.exit = exit;
            }
        }
        pending.len()
    }

    /// Take `target` out of view, returning how many exit handlers ran
    pub fn exit(&self, target: ElementId) -> usize {
        let mut pending: Vec<(u64, Option<ExitHandler>)> = self
            .links
            .borrow_mut()
            .iter_mut()
            .filter(|(_, link)| link.target == target && link.in_view)
            .map(|(id, link)| {
                link.in_view = false;
                (*id, link.exit.take())
            })
            .collect();
        pending.sort_by_key(|(id, _)| *id);

        let entry = ViewEntry {
            target,
            is_intersecting: false,
            intersection_ratio: 0.0,
            time: 0.0,
        };
        let mut ran = 0;
        for (_, exit) in pending {
            if let Some(exit) = exit {
                exit(&entry);
                ran += 1;
            }
        }
        ran
    }
}

impl ViewLinker for RecordingViewLinker {
    fn link(
        &self,
        target: ElementId,
        on_enter: EnterHandler,
        options: &ViewOptions,
    ) -> Result<Disposer> {
        if let Some(error) = self.fail_next.borrow_mut().take() {
            return Err(error);
        }

        let link = self.log.0.next_id();
        self.log.0.push(Call::ViewLink {
            link,
            target,
            options: options.clone(),
        });
        self.links.borrow_mut().insert(
            link,
            ViewLink {
                target,
                on_enter,
                in_view: false,
                exit: None,
            },
        );

        let links = self.links.clone();
        let log = self.log.clone();
        Ok(Disposer::new(move || {
            let removed = links.borrow_mut().remove(&link);
            if removed.is_some() {
                log.0.push(Call::ViewUnlink { link });
            }
        }))
    }
}

// ============================================================================
// Host
// ============================================================================

/// Host element with a settable child list
pub struct FakeHost {
    element: ElementId,
    children: RefCell<Children>,
}

impl FakeHost {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            children: RefCell::new(Children::new()),
        }
    }

    pub fn set_children(&self, children: impl IntoIterator<Item = ElementId>) {
        *self.children.borrow_mut() = children.into_iter().collect();
    }

    pub fn clear_children(&self) {
        self.children.borrow_mut().clear();
    }
}

impl HostElement for FakeHost {
    fn element(&self) -> ElementId {
        self.element
    }

    fn children(&self) -> Children {
        self.children.borrow().clone()
    }
}

/// Every fake wired to one [`CallLog`]
pub struct FakeCapabilities {
    pub log: CallLog,
    pub engine: Rc<RecordingEngine>,
    pub scroll: Rc<RecordingScrollLinker>,
    pub view: Rc<RecordingViewLinker>,
    pub host: Rc<FakeHost>,
}

impl FakeCapabilities {
    /// Host element id used by [`FakeCapabilities::new`]
    pub const HOST: ElementId = ElementId::from_raw(1);

    pub fn new() -> Self {
        let log = CallLog::new();
        Self {
            engine: Rc::new(RecordingEngine::new(log.clone())),
            scroll: Rc::new(RecordingScrollLinker::new(log.clone())),
            view: Rc::new(RecordingViewLinker::new(log.clone())),
            host: Rc::new(FakeHost::new(Self::HOST)),
            log,
        }
    }

    /// Give the host `count` children with ids 100, 101, ...
    pub fn with_children(self, count: u64) -> Self {
        self.host
            .set_children((0..count).map(|i| ElementId::from_raw(100 + i)));
        self
    }
}

impl Default for FakeCapabilities {
    fn default() -> Self {
        Self::new()
    }
}
