//! Motion bindings
//!
//! A [`MotionBinding`] attaches the trigger computations to one host element.
//! Inputs are plain [`State`] cells; setting one reruns the trigger that
//! reads it, which first tears down whatever its previous run started.
//!
//! ```rust
//! use std::rc::Rc;
//! use tempo_animation::testing::FakeCapabilities;
//! use tempo_animation::{KeyframeDefinition, TransitionOptions};
//! use tempo_core::ReactiveGraph;
//! use tempo_motion::{MotionBinding, MotionServices};
//!
//! let graph = ReactiveGraph::new();
//! let fakes = FakeCapabilities::new();
//! let services = MotionServices::new(fakes.engine.clone(), fakes.scroll.clone(), fakes.view.clone());
//! let binding = MotionBinding::new(&graph, fakes.host.clone(), services);
//!
//! binding.inputs().transition.set(TransitionOptions::tween(1.0));
//! binding
//!     .inputs()
//!     .animate
//!     .set(Some(KeyframeDefinition::new().set("opacity", 1.0).into()));
//!
//! assert!(binding.animation().get_untracked().flatten().is_some());
//! ```

use crate::error::{MotionError, Result};
use crate::input::{AnimateInput, ScrollInput, ViewInput};
use crate::trigger::gesture::{Gesture, GestureMachine};
use crate::trigger::{direct, scroll, view, Dispatcher};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tempo_animation::{
    AnimationEngine, ElementId, HostElement, KeyframeDefinition, PlaybackHandle, ScrollLinker,
    ScrollOptions, SequenceOptions, TransitionOptions, ViewLinker, ViewOptions,
};
use tempo_core::{Effect, ReactiveGraph, State};

/// External capabilities a binding dispatches to
#[derive(Clone)]
pub struct MotionServices {
    pub engine: Rc<dyn AnimationEngine>,
    pub scroll: Rc<dyn ScrollLinker>,
    pub view: Rc<dyn ViewLinker>,
}

impl MotionServices {
    pub fn new(
        engine: Rc<dyn AnimationEngine>,
        scroll: Rc<dyn ScrollLinker>,
        view: Rc<dyn ViewLinker>,
    ) -> Self {
        Self {
            engine,
            scroll,
            view,
        }
    }
}

/// Declarative inputs of a binding, one cell each
#[derive(Clone, Debug)]
pub struct MotionInputs {
    /// Direct trigger
    pub animate: State<Option<AnimateInput>>,
    /// Scroll trigger
    pub scroll: State<Option<ScrollInput>>,
    pub scroll_options: State<ScrollOptions>,
    /// View trigger
    pub view: State<Option<ViewInput>>,
    pub view_options: State<ViewOptions>,
    /// Transition for every keyframe dispatch
    pub transition: State<TransitionOptions>,
    /// Options for every sequence dispatch
    pub sequence: State<SequenceOptions>,
    /// Release target for hover and tap; the identity transform when unset
    pub initial: State<Option<KeyframeDefinition>>,
    pub hover: State<Option<KeyframeDefinition>>,
    pub tap: State<Option<KeyframeDefinition>>,
}

impl MotionInputs {
    /// Fresh, unset inputs
    pub fn new(graph: &ReactiveGraph) -> Self {
        Self {
            animate: graph.create_state(None),
            scroll: graph.create_state(None),
            scroll_options: graph.create_state(ScrollOptions::default()),
            view: graph.create_state(None),
            view_options: graph.create_state(ViewOptions::default()),
            transition: graph.create_state(TransitionOptions::default()),
            sequence: graph.create_state(SequenceOptions::default()),
            initial: graph.create_state(None),
            hover: graph.create_state(None),
            tap: graph.create_state(None),
        }
    }

    /// Remove every cell from the graph
    pub fn dispose(&self) {
        self.animate.dispose();
        self.scroll.dispose();
        self.scroll_options.dispose();
        self.view.dispose();
        self.view_options.dispose();
        self.transition.dispose();
        self.sequence.dispose();
        self.initial.dispose();
        self.hover.dispose();
        self.tap.dispose();
    }
}

/// Trigger computations bound to one host element
///
/// Dropping the binding disposes it.
pub struct MotionBinding {
    graph: ReactiveGraph,
    inputs: MotionInputs,
    /// Whether `inputs` were created by the binding and go away with it
    owns_inputs: bool,
    dispatch: Dispatcher,
    effects: RefCell<Vec<Effect>>,
    hover: GestureMachine,
    tap: GestureMachine,
    disposed: Cell<bool>,
}

impl MotionBinding {
    /// Bind to `host` with unset inputs
    pub fn new(graph: &ReactiveGraph, host: Rc<dyn HostElement>, services: MotionServices) -> Self {
        let mut binding = Self::with_inputs(graph, host, services, MotionInputs::new(graph));
        binding.owns_inputs = true;
        binding
    }

    /// Bind to `host` with inputs created (and possibly set) by the caller
    ///
    /// Triggers whose input is already set dispatch immediately. The caller
    /// keeps ownership of `inputs`: they stay in the graph after dispose.
    pub fn with_inputs(
        graph: &ReactiveGraph,
        host: Rc<dyn HostElement>,
        services: MotionServices,
        inputs: MotionInputs,
    ) -> Self {
        let dispatch = Dispatcher {
            host,
            services,
            animation: graph.create_state(None),
            error: graph.create_state(None),
        };
        tracing::debug!("binding motion to {}", dispatch.element());

        let effects = vec![
            direct::create_effect(graph, dispatch.clone(), inputs.clone()),
            scroll::create_effect(graph, dispatch.clone(), inputs.clone()),
            view::create_effect(graph, dispatch.clone(), inputs.clone()),
        ];

        Self {
            graph: graph.clone(),
            inputs,
            owns_inputs: false,
            dispatch,
            effects: RefCell::new(effects),
            hover: GestureMachine::new(Gesture::Hover),
            tap: GestureMachine::new(Gesture::Tap),
            disposed: Cell::new(false),
        }
    }

    pub fn inputs(&self) -> &MotionInputs {
        &self.inputs
    }

    /// The most recently created animation, from any trigger
    pub fn animation(&self) -> &State<Option<PlaybackHandle>> {
        &self.dispatch.animation
    }

    /// The last failure of a reactive trigger
    ///
    /// Cleared when the trigger that failed next publishes an animation.
    /// Gesture entry points return their failures instead.
    pub fn error(&self) -> &State<Option<MotionError>> {
        &self.dispatch.error
    }

    pub fn element(&self) -> ElementId {
        self.dispatch.element()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    // =========================================================================
    // GESTURES
    // =========================================================================

    pub fn on_pointer_enter(&self) -> Result<()> {
        self.engage(&self.hover)
    }

    /// Release hover, then tap
    pub fn on_pointer_leave(&self) -> Result<()> {
        let hover = self.release(&self.hover);
        let tap = self.release(&self.tap);
        hover.and(tap)
    }

    pub fn on_pointer_down(&self) -> Result<()> {
        self.engage(&self.tap)
    }

    pub fn on_pointer_up(&self) -> Result<()> {
        self.release(&self.tap)
    }

    pub fn on_touch_start(&self) -> Result<()> {
        self.engage(&self.tap)
    }

    pub fn on_touch_end(&self) -> Result<()> {
        self.release(&self.tap)
    }

    pub fn on_touch_cancel(&self) -> Result<()> {
        self.release(&self.tap)
    }

    fn engage(&self, machine: &GestureMachine) -> Result<()> {
        if self.is_disposed() {
            tracing::trace!("gesture on disposed binding ignored");
            return Ok(());
        }
        machine.engage(&self.dispatch, &self.inputs)
    }

    fn release(&self, machine: &GestureMachine) -> Result<()> {
        if self.is_disposed() {
            tracing::trace!("gesture on disposed binding ignored");
            return Ok(());
        }
        machine.release(&self.dispatch, &self.inputs)
    }

    // =========================================================================
    // TEARDOWN
    // =========================================================================

    /// Stop and unlink everything this binding started, then release its cells
    ///
    /// The output cells are reset to `None` before they are removed, so
    /// observers see the last handle go away. Calling it again does nothing.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        tracing::debug!("disposing motion binding on {}", self.element());

        let effects = std::mem::take(&mut *self.effects.borrow_mut());
        for effect in effects {
            self.graph.dispose_effect(effect);
        }
        self.hover.halt();
        self.tap.halt();

        self.dispatch.animation.set(None);
        self.dispatch.error.set(None);
        self.dispatch.animation.dispose();
        self.dispatch.error.dispose();
        if self.owns_inputs {
            self.inputs.dispose();
        }
    }
}

impl Drop for MotionBinding {
    fn drop(&mut self) {
        self.dispose();
    }
}
