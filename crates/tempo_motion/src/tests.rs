//! Behavioral tests for motion bindings
//!
//! Every capability is a recording fake from `tempo_animation::testing`;
//! assertions are made on the shared call log.

use crate::{MotionBinding, MotionInputs, MotionServices, ScrollInput, TriggerMode, ViewInput};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tempo_animation::testing::{Call, FakeCapabilities, FakePlayback, LinkedSubject};
use tempo_animation::{
    geometric_identity, AnimationError, AnimationSequence, AnimationTarget, Delay, ElementId,
    KeyframeDefinition, PlayState, PlaybackControls, ScrollAxis, ScrollInfo, ScrollOptions,
    Segment, SequenceOptions, TransitionOptions, ViewEntry,
};
use tempo_core::ReactiveGraph;

struct Fixture {
    graph: ReactiveGraph,
    fakes: FakeCapabilities,
    binding: MotionBinding,
}

impl Fixture {
    fn new() -> Self {
        Self::with_fakes(FakeCapabilities::new())
    }

    fn with_fakes(fakes: FakeCapabilities) -> Self {
        let graph = ReactiveGraph::new();
        let binding = MotionBinding::new(&graph, fakes.host.clone(), services(&fakes));
        Self {
            graph,
            fakes,
            binding,
        }
    }

    fn inputs(&self) -> &MotionInputs {
        self.binding.inputs()
    }

    /// Call kinds in order, without ids
    fn kinds(&self) -> Vec<&'static str> {
        self.fakes.log.calls().iter().map(kind).collect()
    }

    /// Fake id of the handle in the output cell
    fn published(&self) -> Option<u64> {
        self.binding
            .animation()
            .get_untracked()
            .flatten()
            .and_then(|handle| self.fakes.log.id_of(&handle))
    }

    fn handle(&self, id: u64) -> Rc<FakePlayback> {
        self.fakes.log.handle(id).expect("unknown handle id")
    }

    /// Handles created by engine calls, in call order
    fn created(&self) -> Vec<u64> {
        self.fakes
            .log
            .calls()
            .iter()
            .filter_map(Call::created_handle)
            .collect()
    }
}

fn services(fakes: &FakeCapabilities) -> MotionServices {
    MotionServices::new(
        fakes.engine.clone(),
        fakes.scroll.clone(),
        fakes.view.clone(),
    )
}

fn kind(call: &Call) -> &'static str {
    match call {
        Call::Animate { .. } => "animate",
        Call::AnimateValue { .. } => "animate-value",
        Call::AnimateSequence { .. } => "sequence",
        Call::Stop { .. } => "stop",
        Call::Cancel { .. } => "cancel",
        Call::ScrollLink { .. } => "scroll-link",
        Call::ScrollUnlink { .. } => "scroll-unlink",
        Call::ViewLink { .. } => "view-link",
        Call::ViewUnlink { .. } => "view-unlink",
    }
}

fn fade(opacity: f64) -> KeyframeDefinition {
    KeyframeDefinition::new().set("opacity", opacity)
}

fn staggered() -> TransitionOptions {
    TransitionOptions::tween(0.5).delay(Delay::per_index(|i, _| i as f64 * 0.1))
}

fn children(ids: &[u64]) -> Vec<ElementId> {
    ids.iter().copied().map(ElementId::from_raw).collect()
}

/// The n-th `Animate` call as (target, keyframes, options)
fn nth_animate(
    fixture: &Fixture,
    n: usize,
) -> (AnimationTarget, KeyframeDefinition, TransitionOptions) {
    fixture
        .fakes
        .log
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Animate {
                target,
                keyframes,
                options,
                ..
            } => Some((target, keyframes, options)),
            _ => None,
        })
        .nth(n)
        .expect("missing animate call")
}

fn two_step_sequence() -> AnimationSequence {
    vec![
        Segment::keyframes(FakeCapabilities::HOST, fade(1.0))
            .with_transition(TransitionOptions::new().duration(1.0)),
        Segment::keyframes(FakeCapabilities::HOST, fade(0.5))
            .with_transition(TransitionOptions::new().duration(1.0)),
    ]
}

// =============================================================================
// DIRECT
// =============================================================================

#[test]
fn test_direct_end_to_end() {
    let f = Fixture::new();
    let keyframes = KeyframeDefinition::new().set("x", 100.0).set("opacity", 1.0);

    f.graph.batch(|_| {
        f.inputs()
            .transition
            .set(TransitionOptions::new().duration(1.0));
        f.inputs().animate.set(Some(keyframes.clone().into()));
    });

    assert_eq!(f.kinds(), vec!["animate"]);
    let (target, sent, options) = nth_animate(&f, 0);
    assert_eq!(target, AnimationTarget::Element(FakeCapabilities::HOST));
    assert_eq!(sent, keyframes);
    assert_eq!(options, TransitionOptions::new().duration(1.0));
    assert_eq!(f.published(), Some(f.created()[0]));
}

#[test]
fn test_direct_unset_input_does_nothing() {
    let f = Fixture::new();
    f.inputs().transition.set(TransitionOptions::tween(1.0));

    assert!(f.fakes.log.is_empty());
    assert_eq!(f.published(), None);
}

#[test]
fn test_direct_reset_stops_previous_once() {
    let f = Fixture::new();

    f.inputs().animate.set(Some(fade(1.0).into()));
    f.inputs().animate.set(Some(fade(0.0).into()));

    assert_eq!(f.kinds(), vec!["animate", "stop", "animate"]);
    let created = f.created();
    assert_eq!(f.handle(created[0]).stop_count(), 1);
    assert_eq!(f.handle(created[1]).stop_count(), 0);
    assert_eq!(f.published(), Some(created[1]));

    // Unsetting stops without starting anything new
    f.inputs().animate.set(None);
    assert_eq!(f.kinds(), vec!["animate", "stop", "animate", "stop"]);
    assert_eq!(f.handle(created[1]).stop_count(), 1);
}

#[test]
fn test_direct_transition_change_redispatches() {
    let f = Fixture::new();
    f.inputs().animate.set(Some(fade(1.0).into()));
    f.inputs().transition.set(TransitionOptions::tween(3.0));

    assert_eq!(f.kinds(), vec!["animate", "stop", "animate"]);
    assert_eq!(nth_animate(&f, 1).2.duration, Some(3.0));
}

#[test]
fn test_direct_sequence_bypasses_stagger() {
    let f = Fixture::with_fakes(FakeCapabilities::new().with_children(3));
    let options = SequenceOptions::new().duration(2.0);

    f.graph.batch(|_| {
        f.inputs().transition.set(staggered());
        f.inputs().sequence.set(options.clone());
        f.inputs().animate.set(Some(two_step_sequence().into()));
    });

    let calls = f.fakes.log.calls();
    assert_eq!(f.kinds(), vec!["sequence"]);
    match &calls[0] {
        Call::AnimateSequence {
            sequence,
            options: sent,
            ..
        } => {
            assert_eq!(*sequence, two_step_sequence());
            assert_eq!(*sent, options);
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn test_direct_engine_error_is_reported() {
    let f = Fixture::new();
    f.fakes
        .engine
        .fail_next(AnimationError::InvalidKeyframes {
            property: "opacity".into(),
            reason: "not a number".into(),
        });

    f.inputs().animate.set(Some(fade(1.0).into()));

    assert!(f.fakes.log.is_empty());
    assert_eq!(f.published(), None);
    let error = f.binding.error().get_untracked().flatten().unwrap();
    assert_eq!(error.mode, TriggerMode::Direct);

    // The next change dispatches normally
    f.inputs().animate.set(Some(fade(0.5).into()));
    assert_eq!(f.kinds(), vec!["animate"]);
}

// =============================================================================
// STAGGER
// =============================================================================

#[test]
fn test_stagger_targets_all_children() {
    let f = Fixture::with_fakes(FakeCapabilities::new().with_children(3));
    f.inputs().transition.set(staggered());
    f.inputs().animate.set(Some(fade(1.0).into()));

    let (target, _, options) = nth_animate(&f, 0);
    assert_eq!(
        target,
        AnimationTarget::Elements(children(&[100, 101, 102]))
    );
    assert!(options.delay.map(|d| d.is_per_index()).unwrap_or(false));
}

#[test]
fn test_constant_delay_targets_host_only() {
    let f = Fixture::with_fakes(FakeCapabilities::new().with_children(3));
    f.inputs()
        .transition
        .set(TransitionOptions::tween(0.5).delay(0.2));
    f.inputs().animate.set(Some(fade(1.0).into()));

    assert_eq!(
        nth_animate(&f, 0).0,
        AnimationTarget::Element(FakeCapabilities::HOST)
    );
}

#[test]
fn test_stagger_without_children_targets_host() {
    let f = Fixture::new();
    f.inputs().transition.set(staggered());
    f.inputs().animate.set(Some(fade(1.0).into()));

    assert_eq!(
        nth_animate(&f, 0).0,
        AnimationTarget::Element(FakeCapabilities::HOST)
    );
}

// =============================================================================
// SCROLL
// =============================================================================

#[test]
fn test_scroll_callback_never_calls_engine() {
    let f = Fixture::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();

    f.inputs().scroll.set(Some(ScrollInput::progress(move |progress, _| {
        seen_clone.borrow_mut().push(progress);
    })));

    assert!(f.fakes.log.engine_calls().is_empty());
    match &f.fakes.log.calls()[..] {
        [Call::ScrollLink { subject, .. }] => assert_eq!(*subject, LinkedSubject::Progress),
        other => panic!("unexpected calls {:?}", other),
    }

    f.fakes.scroll.emit_progress(0.4, &ScrollInfo::default());
    assert_eq!(*seen.borrow(), vec![0.4]);
    assert_eq!(f.published(), None);
}

#[test]
fn test_scroll_sequence_end_to_end() {
    let f = Fixture::new();

    f.graph.batch(|_| {
        f.inputs()
            .scroll_options
            .set(ScrollOptions::new().axis(ScrollAxis::Y));
        f.inputs().scroll.set(Some(two_step_sequence().into()));
    });

    let calls = f.fakes.log.calls();
    assert_eq!(f.kinds(), vec!["sequence", "scroll-link"]);
    let handle = calls[0].created_handle();
    match &calls[1] {
        Call::ScrollLink {
            subject, options, ..
        } => {
            assert_eq!(*subject, LinkedSubject::Animation(handle));
            assert_eq!(options.axis, ScrollAxis::Y);
        }
        other => panic!("unexpected call {:?}", other),
    }
    assert_eq!(f.published(), handle);
}

#[test]
fn test_scroll_reset_disposes_link_once() {
    let f = Fixture::new();

    f.inputs().scroll.set(Some(fade(1.0).into()));
    f.inputs().scroll.set(Some(fade(0.0).into()));

    // The linker stops the animation it owned; the binding does not stop it again
    assert_eq!(
        f.kinds(),
        vec![
            "animate",
            "scroll-link",
            "scroll-unlink",
            "stop",
            "animate",
            "scroll-link"
        ]
    );
    let created = f.created();
    assert_eq!(f.handle(created[0]).stop_count(), 1);
    assert_eq!(f.fakes.scroll.active_links(), 1);
    assert_eq!(f.published(), Some(created[1]));
}

#[test]
fn test_scroll_options_change_relinks() {
    let f = Fixture::new();
    f.inputs().scroll.set(Some(fade(1.0).into()));
    f.inputs()
        .scroll_options
        .set(ScrollOptions::new().axis(ScrollAxis::X));

    assert_eq!(f.fakes.scroll.active_links(), 1);
    match f.fakes.log.calls().last() {
        Some(Call::ScrollLink { options, .. }) => assert_eq!(options.axis, ScrollAxis::X),
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn test_scroll_staggered_keyframes_link_collection() {
    let f = Fixture::with_fakes(FakeCapabilities::new().with_children(2));
    f.inputs().transition.set(staggered());
    f.inputs().scroll.set(Some(fade(1.0).into()));

    assert_eq!(f.kinds(), vec!["animate", "scroll-link"]);
    assert_eq!(
        nth_animate(&f, 0).0,
        AnimationTarget::Elements(children(&[100, 101]))
    );
    match &f.fakes.log.calls()[1] {
        Call::ScrollLink { subject, .. } => {
            assert_eq!(*subject, LinkedSubject::Animation(Some(f.created()[0])))
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn test_scroll_link_failure_stops_animation() {
    let f = Fixture::new();
    f.fakes
        .scroll
        .fail_next(AnimationError::ScrollLink("no scroll container".into()));

    f.inputs().scroll.set(Some(fade(1.0).into()));

    assert_eq!(f.kinds(), vec!["animate", "stop"]);
    assert_eq!(f.fakes.scroll.active_links(), 0);
    assert_eq!(f.published(), None);
    let error = f.binding.error().get_untracked().flatten().unwrap();
    assert_eq!(error.mode, TriggerMode::Scroll);
}

#[test]
fn test_scroll_progress_scrubs_linked_animation() {
    let f = Fixture::new();
    f.inputs().transition.set(TransitionOptions::tween(2.0));
    f.inputs().scroll.set(Some(fade(1.0).into()));

    f.fakes.scroll.emit_progress(0.25, &ScrollInfo::default());
    let handle = f.handle(f.created()[0]);
    assert_eq!(handle.time(), 0.5);
}

// =============================================================================
// VIEW
// =============================================================================

#[test]
fn test_view_animates_on_each_enter() {
    let f = Fixture::new();
    f.inputs().view.set(Some(fade(1.0).into()));

    assert_eq!(f.kinds(), vec!["view-link"]);
    assert_eq!(f.published(), None);

    f.fakes.view.enter(FakeCapabilities::HOST);
    assert_eq!(f.kinds(), vec!["view-link", "animate"]);
    let first = f.created()[0];
    assert_eq!(f.published(), Some(first));

    f.fakes.view.exit(FakeCapabilities::HOST);
    assert_eq!(f.handle(first).stop_count(), 1);

    f.fakes.view.enter(FakeCapabilities::HOST);
    let second = f.created()[1];
    assert_eq!(f.published(), Some(second));
    assert_eq!(f.handle(first).stop_count(), 1);
}

#[test]
fn test_view_stagger_evaluated_at_enter() {
    let f = Fixture::new();
    f.inputs().transition.set(staggered());
    f.inputs().view.set(Some(fade(1.0).into()));

    f.fakes.view.enter(FakeCapabilities::HOST);
    assert_eq!(
        nth_animate(&f, 0).0,
        AnimationTarget::Element(FakeCapabilities::HOST)
    );
    f.fakes.view.exit(FakeCapabilities::HOST);

    f.fakes.host.set_children(children(&[7, 8, 9]));
    f.fakes.view.enter(FakeCapabilities::HOST);
    assert_eq!(
        nth_animate(&f, 1).0,
        AnimationTarget::Elements(children(&[7, 8, 9]))
    );

    // Children and transition are read at enter time; the link was made once
    let links = f.kinds().iter().filter(|k| **k == "view-link").count();
    assert_eq!(links, 1);
}

#[test]
fn test_view_reset_relinks_and_stops_active() {
    let f = Fixture::new();
    f.inputs().view.set(Some(fade(1.0).into()));
    f.fakes.view.enter(FakeCapabilities::HOST);
    let entered = f.created()[0];

    f.inputs().view.set(Some(fade(0.5).into()));

    assert_eq!(
        f.kinds(),
        vec!["view-link", "animate", "view-unlink", "stop", "view-link"]
    );
    assert_eq!(f.handle(entered).stop_count(), 1);
    assert_eq!(f.fakes.view.active_links(), 1);

    // The old link is gone, its exit handler never runs
    assert_eq!(f.fakes.view.exit(FakeCapabilities::HOST), 0);
    assert_eq!(f.handle(entered).stop_count(), 1);
}

#[test]
fn test_view_sequence_stops_on_exit() {
    let f = Fixture::new();
    f.inputs().view.set(Some(two_step_sequence().into()));
    f.fakes.view.enter(FakeCapabilities::HOST);
    f.fakes.view.exit(FakeCapabilities::HOST);

    assert_eq!(f.kinds(), vec!["view-link", "sequence", "stop"]);
}

#[test]
fn test_view_callback_passed_through() {
    let f = Fixture::new();
    let entered = Rc::new(Cell::new(0));
    let entered_clone = entered.clone();

    f.inputs()
        .view
        .set(Some(ViewInput::on_enter(move |entry: &ViewEntry| {
            assert!(entry.is_intersecting);
            entered_clone.set(entered_clone.get() + 1);
            None
        })));
    f.fakes.view.enter(FakeCapabilities::HOST);

    assert_eq!(entered.get(), 1);
    assert!(f.fakes.log.engine_calls().is_empty());
}

// =============================================================================
// GESTURES
// =============================================================================

#[test]
fn test_hover_release_lasts_as_long_as_engage() {
    let f = Fixture::new();
    let initial = KeyframeDefinition::new().set("scale", 1.0);
    f.graph.batch(|_| {
        f.inputs().transition.set(TransitionOptions::tween(2.0));
        f.inputs().initial.set(Some(initial.clone()));
        f.inputs()
            .hover
            .set(Some(KeyframeDefinition::new().set("scale", 1.2)));
    });

    f.binding.on_pointer_enter().unwrap();
    let engage = f.created()[0];
    assert_eq!(nth_animate(&f, 0).2.duration, Some(2.0));
    assert_eq!(f.published(), Some(engage));

    f.handle(engage).set_time(0.75);
    f.binding.on_pointer_leave().unwrap();

    assert_eq!(f.kinds(), vec!["animate", "stop", "animate"]);
    let (target, keyframes, options) = nth_animate(&f, 1);
    assert_eq!(target, AnimationTarget::Element(FakeCapabilities::HOST));
    assert_eq!(keyframes, initial);
    assert_eq!(options.duration, Some(0.75));
    assert_eq!(f.published(), Some(f.created()[1]));
}

#[test]
fn test_release_without_engage_uses_identity_and_configured_duration() {
    let f = Fixture::new();
    f.inputs().transition.set(TransitionOptions::tween(2.0));
    f.inputs()
        .hover
        .set(Some(KeyframeDefinition::new().set("rotate", 15.0)));

    f.binding.on_pointer_leave().unwrap();

    assert_eq!(f.kinds(), vec!["animate"]);
    let (_, keyframes, options) = nth_animate(&f, 0);
    assert_eq!(keyframes, geometric_identity());
    assert_eq!(options.duration, Some(2.0));
}

#[test]
fn test_leave_with_active_tap_releases_hover_then_tap() {
    let f = Fixture::new();
    f.graph.batch(|_| {
        f.inputs().transition.set(TransitionOptions::tween(1.0));
        f.inputs()
            .hover
            .set(Some(KeyframeDefinition::new().set("scale", 1.1)));
        f.inputs()
            .tap
            .set(Some(KeyframeDefinition::new().set("scale", 0.9)));
    });

    f.binding.on_pointer_enter().unwrap();
    f.binding.on_pointer_down().unwrap();
    let created = f.created();
    f.handle(created[0]).set_time(0.3);
    f.handle(created[1]).set_time(0.1);

    f.binding.on_pointer_leave().unwrap();

    assert_eq!(
        f.kinds(),
        vec!["animate", "animate", "stop", "animate", "stop", "animate"]
    );
    // Hover release first, then tap release
    assert_eq!(nth_animate(&f, 2).2.duration, Some(0.3));
    assert_eq!(nth_animate(&f, 3).2.duration, Some(0.1));
    assert_eq!(f.published(), Some(f.created()[3]));

    // Pointer up after leave has nothing retained to time against
    f.binding.on_pointer_up().unwrap();
    assert_eq!(nth_animate(&f, 4).2.duration, Some(1.0));
}

#[test]
fn test_gestures_without_input_do_nothing() {
    let f = Fixture::new();

    f.binding.on_pointer_enter().unwrap();
    f.binding.on_pointer_down().unwrap();
    f.binding.on_pointer_up().unwrap();
    f.binding.on_pointer_leave().unwrap();

    assert!(f.fakes.log.is_empty());
}

#[test]
fn test_tap_reengage_stops_previous_release() {
    let f = Fixture::new();
    f.inputs()
        .tap
        .set(Some(KeyframeDefinition::new().set("scale", 0.95)));

    f.binding.on_touch_start().unwrap();
    f.binding.on_touch_end().unwrap();
    f.binding.on_touch_start().unwrap();
    f.binding.on_touch_cancel().unwrap();

    assert_eq!(
        f.kinds(),
        vec!["animate", "stop", "animate", "stop", "animate", "stop", "animate"]
    );
    let created = f.created();
    for id in &created[..3] {
        assert_eq!(f.handle(*id).stop_count(), 1);
    }
    assert_eq!(f.handle(created[3]).stop_count(), 0);
}

#[test]
fn test_gesture_engine_error_propagates() {
    let f = Fixture::new();
    f.inputs()
        .hover
        .set(Some(KeyframeDefinition::new().set("scale", 1.1)));
    f.fakes
        .engine
        .fail_next(AnimationError::UnsupportedTarget("svg".into()));

    let err = f.binding.on_pointer_enter().unwrap_err();
    assert_eq!(err.mode, TriggerMode::Hover);
    assert_eq!(f.binding.error().get_untracked().flatten(), None);
    assert_eq!(f.published(), None);
}

// =============================================================================
// OUTPUT CELL AND TEARDOWN
// =============================================================================

#[test]
fn test_output_cell_last_write_wins() {
    let f = Fixture::new();
    f.inputs()
        .hover
        .set(Some(KeyframeDefinition::new().set("scale", 1.1)));

    f.inputs().animate.set(Some(fade(1.0).into()));
    let direct = f.created()[0];
    f.binding.on_pointer_enter().unwrap();
    let hover = f.created()[1];
    assert_eq!(f.published(), Some(hover));

    // Different modes never cancel each other
    assert_eq!(f.handle(direct).state(), PlayState::Running);

    f.inputs().animate.set(Some(fade(0.0).into()));
    assert_eq!(f.published(), Some(f.created()[2]));
    assert_eq!(f.handle(hover).state(), PlayState::Running);
}

#[test]
fn test_output_cell_is_reactive() {
    let f = Fixture::new();
    let updates = Rc::new(Cell::new(0));
    let updates_clone = updates.clone();
    let animation = f.binding.animation().clone();
    let watcher = f.graph.create_effect(move |_| {
        if animation.get().is_some() {
            updates_clone.set(updates_clone.get() + 1);
        }
        tempo_core::EffectCleanup::none()
    });

    f.inputs().animate.set(Some(fade(1.0).into()));
    f.inputs().animate.set(Some(fade(0.0).into()));
    assert_eq!(updates.get(), 2);

    f.graph.dispose_effect(watcher);
}

#[test]
fn test_dispose_stops_everything_once() {
    let f = Fixture::new();
    f.graph.batch(|_| {
        f.inputs()
            .hover
            .set(Some(KeyframeDefinition::new().set("scale", 1.1)));
        f.inputs()
            .tap
            .set(Some(KeyframeDefinition::new().set("scale", 0.9)));
        f.inputs().animate.set(Some(fade(1.0).into()));
        f.inputs().scroll.set(Some(fade(0.5).into()));
        f.inputs().view.set(Some(fade(0.8).into()));
    });
    f.fakes.view.enter(FakeCapabilities::HOST);
    f.binding.on_pointer_enter().unwrap();
    f.binding.on_pointer_down().unwrap();
    f.binding.on_pointer_up().unwrap();

    let effects_before = f.graph.stats().effect_count;
    f.binding.dispose();
    f.binding.dispose();

    let handles = f.fakes.log.handles();
    assert_eq!(handles.len(), 6);
    for handle in &handles {
        assert_eq!(handle.stop_count(), 1, "handle {} stopped", handle.id());
    }
    assert_eq!(f.fakes.scroll.active_links(), 0);
    assert_eq!(f.fakes.view.active_links(), 0);
    assert_eq!(f.graph.stats().effect_count, effects_before - 3);

    // Inputs and gestures are inert afterwards
    f.inputs().animate.set(Some(fade(0.0).into()));
    f.binding.on_pointer_enter().unwrap();
    assert_eq!(f.fakes.log.handles().len(), 6);
}

#[test]
fn test_drop_disposes_binding() {
    let graph = ReactiveGraph::new();
    let fakes = FakeCapabilities::new();
    {
        let binding = MotionBinding::new(&graph, fakes.host.clone(), services(&fakes));
        binding.inputs().animate.set(Some(fade(1.0).into()));
        binding.inputs().view.set(Some(fade(1.0).into()));
    }

    let handle = fakes.log.last_handle().unwrap();
    assert_eq!(handle.stop_count(), 1);
    assert_eq!(fakes.view.active_links(), 0);
    assert_eq!(graph.stats().effect_count, 0);
    assert_eq!(graph.stats().signal_count, 0);
}

#[test]
fn test_dispose_releases_cells_and_handles() {
    let graph = ReactiveGraph::new();
    let fakes = FakeCapabilities::new();
    let signals_before = graph.stats().signal_count;

    for opacity in 0..50 {
        let binding = MotionBinding::new(&graph, fakes.host.clone(), services(&fakes));
        binding
            .inputs()
            .animate
            .set(Some(fade(opacity as f64 / 50.0).into()));
        binding.dispose();
    }

    assert_eq!(graph.stats().signal_count, signals_before);
    assert_eq!(graph.stats().effect_count, 0);

    // Only the call log and this test still hold the last handle
    let last = fakes.log.last_handle().unwrap();
    assert_eq!(Rc::strong_count(&last), 2);
}

#[test]
fn test_dispose_clears_output_for_observers() {
    let f = Fixture::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    let animation = f.binding.animation().clone();
    let watcher = f.graph.create_effect(move |_| {
        seen_clone.borrow_mut().push(animation.try_get().flatten().is_some());
        tempo_core::EffectCleanup::none()
    });

    f.inputs().animate.set(Some(fade(1.0).into()));
    f.binding.dispose();

    assert_eq!(*seen.borrow(), vec![false, true, false]);
    f.graph.dispose_effect(watcher);
}

#[test]
fn test_caller_owned_inputs_survive_dispose() {
    let graph = ReactiveGraph::new();
    let fakes = FakeCapabilities::new();
    let inputs = MotionInputs::new(&graph);
    let input_cells = graph.stats().signal_count;

    let binding = MotionBinding::with_inputs(
        &graph,
        fakes.host.clone(),
        services(&fakes),
        inputs.clone(),
    );
    inputs.animate.set(Some(fade(1.0).into()));
    binding.dispose();

    assert_eq!(graph.stats().signal_count, input_cells);
    assert!(inputs.animate.get_untracked().flatten().is_some());
}

#[test]
fn test_error_cleared_by_next_success_of_same_mode() {
    let f = Fixture::new();
    f.inputs()
        .hover
        .set(Some(KeyframeDefinition::new().set("scale", 1.1)));
    f.fakes
        .engine
        .fail_next(AnimationError::UnsupportedTarget("x".into()));

    f.inputs().animate.set(Some(fade(1.0).into()));
    assert!(f.binding.error().get_untracked().flatten().is_some());

    // Another mode succeeding leaves the direct failure in place
    f.binding.on_pointer_enter().unwrap();
    let error = f.binding.error().get_untracked().flatten().unwrap();
    assert_eq!(error.mode, TriggerMode::Direct);

    f.inputs().animate.set(Some(fade(0.5).into()));
    assert_eq!(f.binding.error().get_untracked().flatten(), None);
    assert_eq!(f.published(), Some(f.created()[1]));
}

#[test]
fn test_with_inputs_dispatches_immediately() {
    let graph = ReactiveGraph::new();
    let fakes = FakeCapabilities::new();
    let inputs = MotionInputs::new(&graph);
    inputs.animate.set(Some(fade(1.0).into()));
    inputs
        .scroll
        .set(Some(ScrollInput::progress(|_, _: &ScrollInfo| {})));

    let binding =
        MotionBinding::with_inputs(&graph, fakes.host.clone(), services(&fakes), inputs);

    let kinds: Vec<_> = fakes.log.calls().iter().map(kind).collect();
    assert_eq!(kinds, vec!["animate", "scroll-link"]);
    assert!(binding.animation().get_untracked().flatten().is_some());
}
