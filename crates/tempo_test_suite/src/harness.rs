//! Scenario harness
//!
//! Every scenario gets a fresh reactive graph, fresh recording
//! capabilities and a motion binding wired to them. Scenarios fail by
//! returning an error; `ensure!` keeps them short.

use anyhow::{anyhow, ensure, Result};
use std::rc::Rc;
use tempo_animation::testing::{Call, FakeCapabilities, FakePlayback};
use tempo_animation::{ElementId, TransitionOptions};
use tempo_core::ReactiveGraph;
use tempo_motion::{MotionBinding, MotionInputs, MotionServices};

/// Transition used when no preset is given
pub const DEFAULT_PRESET_DURATION: f64 = 0.3;

/// Result of a scenario
#[derive(Clone, Debug, PartialEq)]
pub enum TestResult {
    /// Scenario passed
    Passed,
    /// Scenario returned an error
    Failed { reason: String },
    /// Scenario does not apply to the active preset
    Skipped { reason: String },
}

impl TestResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestResult::Passed)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TestResult::Skipped { .. })
    }

    /// Short label for reports
    pub fn status(&self) -> &'static str {
        match self {
            TestResult::Passed => "passed",
            TestResult::Failed { .. } => "failed",
            TestResult::Skipped { .. } => "skipped",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            TestResult::Passed => None,
            TestResult::Failed { reason } | TestResult::Skipped { reason } => Some(reason),
        }
    }
}

/// State handed to one scenario
pub struct ScenarioContext {
    graph: ReactiveGraph,
    fakes: FakeCapabilities,
    binding: MotionBinding,
    preset: TransitionOptions,
    skipped: Option<String>,
}

impl ScenarioContext {
    pub fn new(preset: TransitionOptions) -> Self {
        let graph = ReactiveGraph::new();
        let fakes = FakeCapabilities::new();
        let services = MotionServices::new(
            fakes.engine.clone(),
            fakes.scroll.clone(),
            fakes.view.clone(),
        );
        let binding = MotionBinding::new(&graph, fakes.host.clone(), services);
        Self {
            graph,
            fakes,
            binding,
            preset,
            skipped: None,
        }
    }

    pub fn graph(&self) -> &ReactiveGraph {
        &self.graph
    }

    pub fn fakes(&self) -> &FakeCapabilities {
        &self.fakes
    }

    pub fn binding(&self) -> &MotionBinding {
        &self.binding
    }

    pub fn inputs(&self) -> &MotionInputs {
        self.binding.inputs()
    }

    /// The host element the binding is attached to
    pub fn host(&self) -> ElementId {
        FakeCapabilities::HOST
    }

    /// The transition preset of this run
    pub fn preset(&self) -> TransitionOptions {
        self.preset.clone()
    }

    /// Preset duration, falling back to the default
    pub fn preset_duration(&self) -> f64 {
        self.preset.duration.unwrap_or(DEFAULT_PRESET_DURATION)
    }

    /// Give the host `count` children with ids 100, 101, ...
    pub fn set_children(&self, count: u64) {
        self.fakes
            .host
            .set_children((0..count).map(|i| ElementId::from_raw(100 + i)));
    }

    /// Mark the scenario skipped; it still has to return `Ok`
    pub fn skip(&mut self, reason: impl Into<String>) {
        self.skipped = Some(reason.into());
    }

    /// Recorded call kinds in order
    pub fn kinds(&self) -> Vec<&'static str> {
        self.fakes.log.calls().iter().map(call_kind).collect()
    }

    /// Handle ids created by engine calls, in order
    pub fn created(&self) -> Vec<u64> {
        self.fakes
            .log
            .calls()
            .iter()
            .filter_map(Call::created_handle)
            .collect()
    }

    /// Engine calls of one kind, in order
    pub fn calls_of(&self, kind: &str) -> Vec<Call> {
        self.fakes
            .log
            .calls()
            .into_iter()
            .filter(|call| call_kind(call) == kind)
            .collect()
    }

    pub fn handle(&self, id: u64) -> Result<Rc<FakePlayback>> {
        self.fakes
            .log
            .handle(id)
            .ok_or_else(|| anyhow!("no handle #{}", id))
    }

    /// The n-th created handle
    pub fn nth_handle(&self, n: usize) -> Result<Rc<FakePlayback>> {
        let id = self
            .created()
            .get(n)
            .copied()
            .ok_or_else(|| anyhow!("only {} handles created", self.created().len()))?;
        self.handle(id)
    }

    /// Fake id of the handle in the binding's output cell
    pub fn published(&self) -> Option<u64> {
        self.binding
            .animation()
            .get_untracked()
            .flatten()
            .and_then(|handle| self.fakes.log.id_of(&handle))
    }

    pub fn expect_calls(&self, expected: &[&str]) -> Result<()> {
        let kinds = self.kinds();
        ensure!(
            kinds == expected,
            "expected calls {:?}, got {:?}",
            expected,
            kinds
        );
        Ok(())
    }

    pub fn expect_published(&self, id: u64) -> Result<()> {
        let published = self.published();
        ensure!(
            published == Some(id),
            "expected #{} published, got {:?}",
            id,
            published
        );
        Ok(())
    }

    /// One line per recorded call
    pub fn trace(&self) -> Vec<String> {
        self.fakes.log.calls().iter().map(describe).collect()
    }
}

/// Kind of a recorded call, without ids
pub fn call_kind(call: &Call) -> &'static str {
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

/// Human readable form of a recorded call
pub fn describe(call: &Call) -> String {
    match call {
        Call::Animate {
            target,
            keyframes,
            options,
            handle,
        } => format!(
            "animate #{} {:?} ({} properties, duration {:?})",
            handle,
            target,
            keyframes.len(),
            options.duration
        ),
        Call::AnimateValue {
            from, to, handle, ..
        } => format!("animate-value #{} {} -> {:?}", handle, from, to),
        Call::AnimateSequence {
            sequence, handle, ..
        } => format!("sequence #{} ({} segments)", handle, sequence.len()),
        Call::Stop { handle } => format!("stop #{}", handle),
        Call::Cancel { handle } => format!("cancel #{}", handle),
        Call::ScrollLink {
            link,
            subject,
            options,
        } => format!("scroll-link @{} {:?} axis {:?}", link, subject, options.axis),
        Call::ScrollUnlink { link } => format!("scroll-unlink @{}", link),
        Call::ViewLink { link, target, .. } => format!("view-link @{} {}", link, target),
        Call::ViewUnlink { link } => format!("view-unlink @{}", link),
    }
}

/// Runs scenarios with a shared transition preset
pub struct ScenarioHarness {
    preset: TransitionOptions,
    show_trace: bool,
}

impl ScenarioHarness {
    pub fn new() -> Self {
        Self {
            preset: TransitionOptions::tween(DEFAULT_PRESET_DURATION),
            show_trace: false,
        }
    }

    /// Use `preset` as the base transition of every scenario
    pub fn with_preset(mut self, preset: TransitionOptions) -> Self {
        self.preset = preset;
        self
    }

    /// Print the recorded calls of every scenario
    pub fn show_trace(mut self, show: bool) -> Self {
        self.show_trace = show;
        self
    }

    pub fn preset(&self) -> &TransitionOptions {
        &self.preset
    }

    /// Run one scenario in a fresh context
    pub fn run_scenario<F>(&self, name: &str, scenario: F) -> TestResult
    where
        F: FnOnce(&mut ScenarioContext) -> Result<()>,
    {
        let mut ctx = ScenarioContext::new(self.preset.clone());
        let outcome = scenario(&mut ctx);

        if self.show_trace {
            println!("    {}:", name);
            for line in ctx.trace() {
                println!("      {}", line);
            }
        }

        match (outcome, ctx.skipped.take()) {
            (Err(err), _) => {
                tracing::debug!("{} trace: {:?}", name, ctx.trace());
                TestResult::Failed {
                    reason: format!("{:#}", err),
                }
            }
            (Ok(()), Some(reason)) => TestResult::Skipped { reason },
            (Ok(()), None) => TestResult::Passed,
        }
    }
}

impl Default for ScenarioHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_animation::KeyframeDefinition;

    #[test]
    fn test_failed_scenario_keeps_reason() {
        let harness = ScenarioHarness::new();
        let result = harness.run_scenario("broken", |ctx| {
            ctx.expect_calls(&["animate"])?;
            Ok(())
        });

        assert_eq!(result.status(), "failed");
        assert!(result.reason().unwrap().contains("expected calls"));
    }

    #[test]
    fn test_skip_wins_over_pass() {
        let harness = ScenarioHarness::new();
        let result = harness.run_scenario("skipped", |ctx| {
            ctx.skip("not applicable");
            Ok(())
        });
        assert!(result.is_skipped());
    }

    #[test]
    fn test_context_reports_published_handle() {
        let harness = ScenarioHarness::new();
        let result = harness.run_scenario("publish", |ctx| {
            ctx.inputs()
                .animate
                .set(Some(KeyframeDefinition::new().set("x", 10.0).into()));
            let created = ctx.created();
            ensure!(created.len() == 1, "one handle");
            ctx.expect_published(created[0])
        });
        assert!(result.is_passed());
    }
}
