//! Fine-grained reactive signal system
//!
//! Signals hold values, effects read them. Every effect run records the
//! signals it reads and is rerun synchronously when any of them changes.
//!
//! Effects return an [`EffectCleanup`]. The cleanup of the previous run is
//! always executed before the next run body, and once more when the effect
//! is disposed. This pairing is what lets a computation own resources
//! (animations, subscriptions) for exactly the lifetime of one run.
//!
//! # State
//!
//! The [`State<T>`] type binds a signal to its graph so it can be read and
//! written without passing the graph around.
//!
//! ```rust
//! use tempo_core::reactive::{EffectCleanup, ReactiveGraph};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let graph = ReactiveGraph::new();
//! let count = graph.create_state(0i32);
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let log_clone = log.clone();
//! let signal = count.signal();
//! let _effect = graph.create_effect(move |g| {
//!     let value = g.get(signal).unwrap_or(0);
//!     log_clone.borrow_mut().push(format!("run {}", value));
//!     let log_clone = log_clone.clone();
//!     EffectCleanup::new(move || log_clone.borrow_mut().push(format!("cleanup {}", value)))
//! });
//!
//! count.set(1);
//! assert_eq!(*log.borrow(), vec!["run 0", "cleanup 0", "run 1"]);
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Upper bound on effect runs in a single flush before it is considered a
/// feedback loop and abandoned.
const MAX_FLUSH_ITERATIONS: usize = 10_000;

new_key_type! {
    /// Unique identifier for a signal
    pub struct SignalId;
    /// Unique identifier for an effect
    pub struct EffectId;
}

/// A reactive signal handle (cheap to copy)
pub struct Signal<T> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.id).finish()
    }
}

impl<T> Signal<T> {
    /// Get the signal's internal ID
    pub fn id(&self) -> SignalId {
        self.id
    }
}

/// An effect handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn id(&self) -> EffectId {
        self.id
    }
}

/// Teardown returned by an effect run
///
/// Runs at most once: either before the effect's next run or when the
/// effect is disposed.
#[derive(Default)]
pub struct EffectCleanup {
    inner: Option<Box<dyn FnOnce()>>,
}

impl EffectCleanup {
    /// A cleanup that does nothing
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// Wrap a teardown closure
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self {
            inner: Some(Box::new(f)),
        }
    }

    /// Whether there is anything to run
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Run the teardown, consuming it
    pub fn run(mut self) {
        if let Some(f) = self.inner.take() {
            f();
        }
    }
}

impl fmt::Debug for EffectCleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectCleanup")
            .field("empty", &self.is_empty())
            .finish()
    }
}

type EffectFn = Box<dyn FnMut(&ReactiveGraph) -> EffectCleanup>;

/// Internal signal node storage
struct SignalNode {
    /// The signal value (type-erased)
    value: Box<dyn Any>,
    /// Version counter for change detection
    version: u64,
    /// Effects to notify on change
    subscribers: SmallVec<[EffectId; 4]>,
}

/// Internal effect node storage
struct EffectNode {
    /// The effect body; `None` while it is running
    run: Option<EffectFn>,
    /// Cleanup returned by the last run
    cleanup: EffectCleanup,
    /// Signals read during the last run
    dependencies: SmallVec<[SignalId; 4]>,
    /// Whether the effect is queued to run
    dirty: bool,
}

struct GraphInner {
    signals: SlotMap<SignalId, SignalNode>,
    effects: SlotMap<EffectId, EffectNode>,
    pending_effects: VecDeque<EffectId>,
    batch_depth: u32,
    flushing: bool,
    /// One frame per running effect; `None` frames come from `untrack`
    tracking: Vec<Option<Vec<SignalId>>>,
    global_version: u64,
}

impl GraphInner {
    fn mark_dirty(&mut self, id: EffectId) {
        if let Some(node) = self.effects.get_mut(id) {
            if !node.dirty {
                node.dirty = true;
                self.pending_effects.push_back(id);
            }
        }
    }

    fn unsubscribe(&mut self, effect: EffectId, deps: &[SignalId]) {
        for &dep_id in deps {
            if let Some(sig) = self.signals.get_mut(dep_id) {
                sig.subscribers.retain(|s| *s != effect);
            }
        }
    }
}

/// The reactive graph that owns all signals and effects
///
/// Cloning yields another handle to the same graph. The graph is
/// single-threaded: all reads, writes and effect runs happen on the caller's
/// thread, synchronously.
#[derive(Clone)]
pub struct ReactiveGraph {
    inner: Rc<RefCell<GraphInner>>,
}

impl ReactiveGraph {
    /// Create a new reactive graph
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(GraphInner {
                signals: SlotMap::with_key(),
                effects: SlotMap::with_key(),
                pending_effects: VecDeque::new(),
                batch_depth: 0,
                flushing: false,
                tracking: Vec::new(),
                global_version: 0,
            })),
        }
    }

    // =========================================================================
    // SIGNALS
    // =========================================================================

    /// Create a new signal with an initial value
    pub fn create_signal<T: 'static>(&self, initial: T) -> Signal<T> {
        let id = self.inner.borrow_mut().signals.insert(SignalNode {
            value: Box::new(initial),
            version: 0,
            subscribers: SmallVec::new(),
        });
        Signal {
            id,
            _marker: PhantomData,
        }
    }

    /// Create a signal already bound to this graph
    pub fn create_state<T: Clone + 'static>(&self, initial: T) -> State<T> {
        State::new(self.create_signal(initial), self.clone())
    }

    /// Get the current value of a signal
    ///
    /// If called while an effect runs, the signal is recorded as one of its
    /// dependencies.
    pub fn get<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        let mut inner = self.inner.borrow_mut();
        if let Some(Some(deps)) = inner.tracking.last_mut() {
            if !deps.contains(&signal.id) {
                deps.push(signal.id);
            }
        }

        inner
            .signals
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>().cloned())
    }

    /// Get the current value without tracking as a dependency
    pub fn get_untracked<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.inner
            .borrow()
            .signals
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>().cloned())
    }

    /// Set the value of a signal, rerunning dependent effects
    ///
    /// Effects run before this returns unless a batch or an outer flush is in
    /// progress, in which case they run when that finishes.
    pub fn set<T: 'static>(&self, signal: Signal<T>, value: T) {
        let previous = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let Some(node) = inner.signals.get_mut(signal.id) else {
                return;
            };
            let previous = std::mem::replace(&mut node.value, Box::new(value));
            node.version += 1;
            let subscribers = node.subscribers.clone();
            inner.global_version += 1;

            for sub in subscribers {
                inner.mark_dirty(sub);
            }
            previous
        };
        // The old value may own resources whose drop re-enters the graph
        drop(previous);

        self.flush_if_idle();
    }

    /// Update a signal using a function
    pub fn update<T: Clone + 'static, F: FnOnce(T) -> T>(&self, signal: Signal<T>, f: F) {
        if let Some(current) = self.get_untracked(signal) {
            self.set(signal, f(current));
        }
    }

    /// Get the version of a signal (for change detection)
    pub fn signal_version(&self, id: SignalId) -> Option<u64> {
        self.inner.borrow().signals.get(id).map(|n| n.version)
    }

    /// Remove a signal and drop its value
    ///
    /// Effects that read it stop depending on it. Later reads return `None`
    /// and writes are ignored. Disposing twice does nothing.
    pub fn dispose_signal<T: 'static>(&self, signal: Signal<T>) {
        let removed = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let node = inner.signals.remove(signal.id);
            if let Some(ref node) = node {
                for &sub in &node.subscribers {
                    if let Some(effect) = inner.effects.get_mut(sub) {
                        effect.dependencies.retain(|dep| *dep != signal.id);
                    }
                }
            }
            node
        };

        if let Some(node) = removed {
            tracing::trace!("disposing signal {:?}", signal.id);
            // Dropped outside the borrow: the value may re-enter the graph
            drop(node);
        }
    }

    /// Run `f` without recording any signal reads as dependencies
    pub fn untrack<R>(&self, f: impl FnOnce() -> R) -> R {
        self.inner.borrow_mut().tracking.push(None);
        let result = f();
        self.inner.borrow_mut().tracking.pop();
        result
    }

    // =========================================================================
    // EFFECTS
    // =========================================================================

    /// Create an effect that runs now and whenever its dependencies change
    pub fn create_effect<F>(&self, run: F) -> Effect
    where
        F: FnMut(&ReactiveGraph) -> EffectCleanup + 'static,
    {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.effects.insert(EffectNode {
                run: Some(Box::new(run)),
                cleanup: EffectCleanup::none(),
                dependencies: SmallVec::new(),
                dirty: true,
            });
            inner.pending_effects.push_back(id);
            id
        };

        self.flush_if_idle();

        Effect { id }
    }

    /// Dispose of an effect, running its last cleanup
    ///
    /// Disposing an already disposed effect is a no-op.
    pub fn dispose_effect(&self, effect: Effect) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let node = inner.effects.remove(effect.id);
            if let Some(ref node) = node {
                inner.unsubscribe(effect.id, &node.dependencies);
            }
            node
        };

        if let Some(node) = removed {
            tracing::trace!("disposing effect {:?}", effect.id);
            node.cleanup.run();
            drop(node.run);
        }
    }

    /// Whether an effect is still registered
    pub fn is_effect_alive(&self, effect: Effect) -> bool {
        self.inner.borrow().effects.contains_key(effect.id)
    }

    // =========================================================================
    // BATCHING
    // =========================================================================

    /// Start a batch - effects won't run until the batch ends
    pub fn batch_start(&self) {
        self.inner.borrow_mut().batch_depth += 1;
    }

    /// End a batch and flush pending effects
    pub fn batch_end(&self) {
        let flush = {
            let mut inner = self.inner.borrow_mut();
            match inner.batch_depth {
                0 => false,
                depth => {
                    inner.batch_depth = depth - 1;
                    depth == 1
                }
            }
        };
        if flush {
            self.flush_if_idle();
        }
    }

    /// Run a function in a batch context
    pub fn batch<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Self) -> R,
    {
        self.batch_start();
        let result = f(self);
        self.batch_end();
        result
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn flush_if_idle(&self) {
        let idle = {
            let inner = self.inner.borrow();
            inner.batch_depth == 0 && !inner.flushing
        };
        if idle {
            self.flush_effects();
        }
    }

    /// Run queued effects until the queue drains
    fn flush_effects(&self) {
        self.inner.borrow_mut().flushing = true;

        let mut iterations = 0usize;
        loop {
            let next = self.inner.borrow_mut().pending_effects.pop_front();
            let Some(effect_id) = next else {
                break;
            };

            iterations += 1;
            if iterations > MAX_FLUSH_ITERATIONS {
                let mut guard = self.inner.borrow_mut();
                let inner = &mut *guard;
                tracing::warn!(
                    "reactive flush exceeded {} effect runs, dropping {} queued effects",
                    MAX_FLUSH_ITERATIONS,
                    inner.pending_effects.len() + 1
                );
                for id in inner.pending_effects.drain(..).chain(Some(effect_id)) {
                    if let Some(node) = inner.effects.get_mut(id) {
                        node.dirty = false;
                    }
                }
                break;
            }

            self.run_effect(effect_id);
        }

        self.inner.borrow_mut().flushing = false;
    }

    /// Run a single effect: previous cleanup, then body, then resubscribe
    fn run_effect(&self, effect_id: EffectId) {
        let (mut run, previous_cleanup) = {
            let mut inner = self.inner.borrow_mut();
            let Some(node) = inner.effects.get_mut(effect_id) else {
                return;
            };
            if !node.dirty {
                return;
            }
            node.dirty = false;
            let Some(run) = node.run.take() else {
                return;
            };
            (run, std::mem::take(&mut node.cleanup))
        };

        previous_cleanup.run();

        self.inner.borrow_mut().tracking.push(Some(Vec::new()));
        let cleanup = run(self);
        let deps = self
            .inner
            .borrow_mut()
            .tracking
            .pop()
            .flatten()
            .unwrap_or_default();

        let orphaned = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            match inner.effects.get_mut(effect_id) {
                Some(node) => {
                    let old_deps = std::mem::take(&mut node.dependencies);
                    node.run = Some(run);
                    node.cleanup = cleanup;
                    node.dependencies = deps.iter().copied().collect();

                    inner.unsubscribe(effect_id, &old_deps);
                    for dep_id in deps {
                        if let Some(sig) = inner.signals.get_mut(dep_id) {
                            if !sig.subscribers.contains(&effect_id) {
                                sig.subscribers.push(effect_id);
                            }
                        }
                    }
                    None
                }
                // Disposed while running: nothing will ever call this cleanup
                None => Some((cleanup, run)),
            }
        };

        if let Some((cleanup, run)) = orphaned {
            tracing::trace!("effect {:?} disposed during its own run", effect_id);
            cleanup.run();
            drop(run);
        }
    }

    /// Get statistics about the reactive graph
    pub fn stats(&self) -> ReactiveStats {
        let inner = self.inner.borrow();
        ReactiveStats {
            signal_count: inner.signals.len(),
            effect_count: inner.effects.len(),
            pending_effects: inner.pending_effects.len(),
            global_version: inner.global_version,
        }
    }
}

impl Default for ReactiveGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReactiveGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveGraph")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Statistics about the reactive graph
#[derive(Debug, Clone)]
pub struct ReactiveStats {
    pub signal_count: usize,
    pub effect_count: usize,
    pub pending_effects: usize,
    pub global_version: u64,
}

// =============================================================================
// STATE - High-level cell API
// =============================================================================

/// A bound state value with direct get/set methods
///
/// Reads through `get`/`try_get` are tracked when performed inside an
/// effect, exactly like [`ReactiveGraph::get`].
pub struct State<T> {
    signal: Signal<T>,
    graph: ReactiveGraph,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal,
            graph: self.graph.clone(),
        }
    }
}

impl<T: Clone + 'static> State<T> {
    /// Create a new State wrapper
    pub fn new(signal: Signal<T>, graph: ReactiveGraph) -> Self {
        Self { signal, graph }
    }

    /// Get the current value
    pub fn get(&self) -> T
    where
        T: Default,
    {
        self.graph.get(self.signal).unwrap_or_default()
    }

    /// Get the current value, returning None if the signal is gone
    pub fn try_get(&self) -> Option<T> {
        self.graph.get(self.signal)
    }

    /// Get the current value without registering a dependency
    pub fn get_untracked(&self) -> Option<T> {
        self.graph.get_untracked(self.signal)
    }

    /// Set a new value
    pub fn set(&self, value: T) {
        self.graph.set(self.signal, value);
    }

    /// Update the value using a function
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        self.graph.update(self.signal, f);
    }

    /// Remove the cell from its graph
    pub fn dispose(&self) {
        self.graph.dispose_signal(self.signal);
    }

    /// Get the underlying signal
    pub fn signal(&self) -> Signal<T> {
        self.signal
    }

    /// Get the signal ID (for dependency tracking)
    pub fn signal_id(&self) -> SignalId {
        self.signal.id()
    }

    /// The graph this state belongs to
    pub fn graph(&self) -> &ReactiveGraph {
        &self.graph
    }
}

impl<T> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State").field("signal", &self.signal).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_signal_create_get_set() {
        let graph = ReactiveGraph::new();

        let count = graph.create_signal(0i32);
        assert_eq!(graph.get(count), Some(0));

        graph.set(count, 42);
        assert_eq!(graph.get(count), Some(42));
        assert_eq!(graph.signal_version(count.id()), Some(1));
    }

    #[test]
    fn test_signal_update() {
        let graph = ReactiveGraph::new();

        let count = graph.create_signal(10i32);
        graph.update(count, |x| x + 5);
        assert_eq!(graph.get(count), Some(15));
    }

    #[test]
    fn test_effect_runs_on_change() {
        let graph = ReactiveGraph::new();
        let effect_runs = Rc::new(RefCell::new(Vec::new()));

        let count = graph.create_signal(0i32);
        let effect_runs_clone = effect_runs.clone();

        let _effect = graph.create_effect(move |g| {
            let val = g.get(count).unwrap_or(0);
            effect_runs_clone.borrow_mut().push(val);
            EffectCleanup::none()
        });

        // Effect runs immediately
        assert_eq!(*effect_runs.borrow(), vec![0]);

        graph.set(count, 1);
        assert_eq!(*effect_runs.borrow(), vec![0, 1]);

        graph.set(count, 2);
        assert_eq!(*effect_runs.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cleanup_runs_before_next_run() {
        let graph = ReactiveGraph::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let count = graph.create_signal(0i32);
        let log_clone = log.clone();
        let _effect = graph.create_effect(move |g| {
            let val = g.get(count).unwrap_or(0);
            log_clone.borrow_mut().push(format!("run {val}"));
            let log_clone = log_clone.clone();
            EffectCleanup::new(move || log_clone.borrow_mut().push(format!("cleanup {val}")))
        });

        graph.set(count, 1);
        graph.set(count, 2);

        assert_eq!(
            *log.borrow(),
            vec!["run 0", "cleanup 0", "run 1", "cleanup 1", "run 2"]
        );
    }

    #[test]
    fn test_dispose_runs_final_cleanup_once() {
        let graph = ReactiveGraph::new();
        let cleanups = Rc::new(Cell::new(0));

        let count = graph.create_signal(0i32);
        let cleanups_clone = cleanups.clone();
        let effect = graph.create_effect(move |g| {
            let _ = g.get(count);
            let cleanups_clone = cleanups_clone.clone();
            EffectCleanup::new(move || cleanups_clone.set(cleanups_clone.get() + 1))
        });

        graph.dispose_effect(effect);
        assert_eq!(cleanups.get(), 1);
        assert!(!graph.is_effect_alive(effect));

        // Second dispose and later writes touch nothing
        graph.dispose_effect(effect);
        graph.set(count, 5);
        assert_eq!(cleanups.get(), 1);
    }

    #[test]
    fn test_batching() {
        let graph = ReactiveGraph::new();
        let effect_runs = Rc::new(Cell::new(0));

        let a = graph.create_signal(1i32);
        let b = graph.create_signal(2i32);
        let effect_runs_clone = effect_runs.clone();

        let _effect = graph.create_effect(move |g| {
            let _a = g.get(a);
            let _b = g.get(b);
            effect_runs_clone.set(effect_runs_clone.get() + 1);
            EffectCleanup::none()
        });

        assert_eq!(effect_runs.get(), 1);

        // Without batching, effect runs twice
        effect_runs.set(0);
        graph.set(a, 10);
        graph.set(b, 20);
        assert_eq!(effect_runs.get(), 2);

        // With batching, effect runs once
        effect_runs.set(0);
        graph.batch(|g| {
            g.set(a, 100);
            g.set(b, 200);
        });
        assert_eq!(effect_runs.get(), 1);
    }

    #[test]
    fn test_dependencies_follow_last_run() {
        let graph = ReactiveGraph::new();
        let runs = Rc::new(Cell::new(0));

        let use_a = graph.create_signal(true);
        let a = graph.create_signal(0i32);
        let b = graph.create_signal(0i32);
        let runs_clone = runs.clone();

        let _effect = graph.create_effect(move |g| {
            runs_clone.set(runs_clone.get() + 1);
            if g.get(use_a).unwrap_or(false) {
                let _ = g.get(a);
            } else {
                let _ = g.get(b);
            }
            EffectCleanup::none()
        });

        graph.set(b, 1);
        assert_eq!(runs.get(), 1);

        graph.set(use_a, false);
        assert_eq!(runs.get(), 2);

        graph.set(a, 1);
        assert_eq!(runs.get(), 2);
        graph.set(b, 2);
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn test_untrack_skips_dependency() {
        let graph = ReactiveGraph::new();
        let runs = Rc::new(Cell::new(0));

        let tracked = graph.create_signal(0i32);
        let hidden = graph.create_signal(0i32);
        let runs_clone = runs.clone();

        let _effect = graph.create_effect(move |g| {
            runs_clone.set(runs_clone.get() + 1);
            let _ = g.get(tracked);
            let _ = g.untrack(|| g.get(hidden));
            EffectCleanup::none()
        });

        graph.set(hidden, 1);
        assert_eq!(runs.get(), 1);
        graph.set(tracked, 1);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_write_from_effect_is_flushed() {
        let graph = ReactiveGraph::new();
        let input = graph.create_signal(1i32);
        let output = graph.create_signal(0i32);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let _producer = graph.create_effect(move |g| {
            let value = g.get(input).unwrap_or(0);
            g.set(output, value * 10);
            EffectCleanup::none()
        });

        let seen_clone = seen.clone();
        let _consumer = graph.create_effect(move |g| {
            seen_clone.borrow_mut().push(g.get(output).unwrap_or(0));
            EffectCleanup::none()
        });

        graph.set(input, 2);
        assert_eq!(graph.get(output), Some(20));
        assert_eq!(seen.borrow().last(), Some(&20));
    }

    #[test]
    fn test_dispose_during_run_runs_returned_cleanup() {
        let graph = ReactiveGraph::new();
        let cleaned = Rc::new(Cell::new(false));
        let slot: Rc<Cell<Option<Effect>>> = Rc::new(Cell::new(None));
        let trigger = graph.create_signal(0i32);

        let cleaned_clone = cleaned.clone();
        let slot_clone = slot.clone();
        let effect = graph.create_effect(move |g| {
            if g.get(trigger).unwrap_or(0) > 0 {
                if let Some(me) = slot_clone.get() {
                    g.dispose_effect(me);
                }
            }
            let cleaned_clone = cleaned_clone.clone();
            EffectCleanup::new(move || cleaned_clone.set(true))
        });
        slot.set(Some(effect));

        // First cleanup runs before the self-disposing run, second right after it
        graph.set(trigger, 1);
        assert!(cleaned.get());
        assert!(!graph.is_effect_alive(effect));
    }

    #[test]
    fn test_runaway_feedback_is_cut() {
        let graph = ReactiveGraph::new();
        let count = graph.create_signal(0u64);

        let _effect = graph.create_effect(move |g| {
            let value = g.get(count).unwrap_or(0);
            g.set(count, value + 1);
            EffectCleanup::none()
        });

        // Bounded rather than looping forever
        let value = graph.get_untracked(count).unwrap_or(0);
        assert!(value > 0 && value <= MAX_FLUSH_ITERATIONS as u64 + 1);
        assert_eq!(graph.stats().pending_effects, 0);
    }

    #[test]
    fn test_state_wrapper() {
        let graph = ReactiveGraph::new();
        let state = graph.create_state(Some(3i32));

        assert_eq!(state.get(), Some(3));
        state.update(|v| v.map(|x| x * 2));
        assert_eq!(state.try_get(), Some(Some(6)));
        state.set(None);
        assert_eq!(state.get_untracked(), Some(None));
    }

    #[test]
    fn test_dispose_signal_frees_slot_and_subscriptions() {
        let graph = ReactiveGraph::new();
        let source = graph.create_state(1i32);
        let other = graph.create_state(10i32);
        let runs = Rc::new(Cell::new(0));

        let runs_clone = runs.clone();
        let (s, o) = (source.clone(), other.clone());
        let effect = graph.create_effect(move |_| {
            let _ = s.try_get();
            let _ = o.try_get();
            runs_clone.set(runs_clone.get() + 1);
            EffectCleanup::none()
        });
        assert_eq!(runs.get(), 1);

        source.dispose();
        source.dispose();
        assert_eq!(graph.stats().signal_count, 1);
        assert_eq!(source.try_get(), None);

        // Writes to a disposed cell are dropped
        source.set(2);
        assert_eq!(runs.get(), 1);

        // The surviving dependency still drives the effect
        other.set(11);
        assert_eq!(runs.get(), 2);

        graph.dispose_effect(effect);
        other.dispose();
        assert_eq!(graph.stats().signal_count, 0);
    }

    #[test]
    fn test_dispose_signal_drops_value() {
        let graph = ReactiveGraph::new();
        let shared = Rc::new(());
        let state = graph.create_state(Some(shared.clone()));
        assert_eq!(Rc::strong_count(&shared), 2);

        state.dispose();
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    fn test_stats() {
        let graph = ReactiveGraph::new();

        let _s1 = graph.create_signal(1);
        let _s2 = graph.create_signal(2);
        let _e1 = graph.create_effect(|_| EffectCleanup::none());

        let stats = graph.stats();
        assert_eq!(stats.signal_count, 2);
        assert_eq!(stats.effect_count, 1);
        assert_eq!(stats.pending_effects, 0);
    }
}
