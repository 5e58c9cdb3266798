//! Runner for scenario suites
//!
//! Manages scenario execution, result collection and reporting.

use crate::harness::{ScenarioContext, ScenarioHarness, TestResult};
use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

type ScenarioFn = Box<dyn FnOnce(&mut ScenarioContext) -> Result<()>>;

/// A single scenario
pub struct TestCase {
    pub name: String,
    /// Suite the case belongs to
    pub category: String,
    pub scenario: ScenarioFn,
}

impl TestCase {
    pub fn new<F>(name: &str, category: &str, scenario: F) -> Self
    where
        F: FnOnce(&mut ScenarioContext) -> Result<()> + 'static,
    {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            scenario: Box::new(scenario),
        }
    }

    fn matches(&self, pattern: &str) -> bool {
        self.name.contains(pattern) || self.category.contains(pattern)
    }
}

/// Result of running one scenario
pub struct TestRun {
    pub name: String,
    pub category: String,
    pub result: TestResult,
    pub duration: Duration,
}

impl TestRun {
    pub fn is_passed(&self) -> bool {
        self.result.is_passed()
    }
}

/// Named group of scenarios
pub struct TestSuite {
    pub name: String,
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cases: Vec::new(),
        }
    }

    pub fn add<F>(&mut self, name: &str, scenario: F) -> &mut Self
    where
        F: FnOnce(&mut ScenarioContext) -> Result<()> + 'static,
    {
        self.cases.push(TestCase::new(name, &self.name, scenario));
        self
    }
}

/// Runs suites through one harness
pub struct TestRunner {
    harness: ScenarioHarness,
    suites: Vec<TestSuite>,
    /// Filter pattern (None = run all)
    filter: Option<String>,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::with_harness(ScenarioHarness::new())
    }

    pub fn with_harness(harness: ScenarioHarness) -> Self {
        Self {
            harness,
            suites: Vec::new(),
            filter: None,
        }
    }

    pub fn add_suite(&mut self, suite: TestSuite) -> &mut Self {
        self.suites.push(suite);
        self
    }

    pub fn filter(&mut self, pattern: &str) -> &mut Self {
        self.filter = Some(pattern.to_string());
        self
    }

    /// Run every suite, consuming them
    pub fn run(&mut self) -> RunResult {
        let start = Instant::now();
        let mut results = Vec::new();

        for suite in self.suites.drain(..) {
            tracing::info!("Running suite: {}", suite.name);

            for case in suite.cases {
                if let Some(ref pattern) = self.filter {
                    if !case.matches(pattern) {
                        continue;
                    }
                }

                let full_name = format!("{}::{}", case.category, case.name);
                tracing::debug!("Running scenario: {}", full_name);

                let case_start = Instant::now();
                let result = self.harness.run_scenario(&full_name, case.scenario);
                let duration = case_start.elapsed();

                match &result {
                    TestResult::Passed => tracing::info!("  ✓ {} ({:?})", case.name, duration),
                    TestResult::Skipped { reason } => {
                        tracing::info!("  - {} skipped: {}", case.name, reason)
                    }
                    TestResult::Failed { reason } => {
                        tracing::error!("  ✗ {}: {}", case.name, reason)
                    }
                }

                results.push(TestRun {
                    name: case.name,
                    category: case.category,
                    result,
                    duration,
                });
            }
        }

        RunResult::new(results, start.elapsed())
    }

    pub fn harness(&self) -> &ScenarioHarness {
        &self.harness
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Results of a run
pub struct RunResult {
    pub results: Vec<TestRun>,
    pub duration: Duration,
}

impl RunResult {
    pub fn new(results: Vec<TestRun>, duration: Duration) -> Self {
        Self { results, duration }
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.result, TestResult::Failed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_skipped()).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// No scenario failed; skipped ones do not count against the run
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn by_category(&self) -> HashMap<String, Vec<&TestRun>> {
        let mut map: HashMap<String, Vec<&TestRun>> = HashMap::new();
        for result in &self.results {
            map.entry(result.category.clone()).or_default().push(result);
        }
        map
    }

    /// Serializable summary for `--json`
    pub fn report(&self) -> RunReport {
        RunReport {
            passed: self.passed(),
            failed: self.failed(),
            skipped: self.skipped(),
            total: self.total(),
            duration_ms: self.duration.as_secs_f64() * 1000.0,
            results: self
                .results
                .iter()
                .map(|run| CaseReport {
                    name: run.name.clone(),
                    category: run.category.clone(),
                    status: run.result.status(),
                    reason: run.result.reason().map(str::to_string),
                    duration_ms: run.duration.as_secs_f64() * 1000.0,
                })
                .collect(),
        }
    }

    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════╗");
        println!("║         SCENARIO RESULTS SUMMARY         ║");
        println!("╠══════════════════════════════════════════╣");
        println!("║  Passed:  {:>5}                          ║", self.passed());
        println!("║  Failed:  {:>5}                          ║", self.failed());
        println!("║  Skipped: {:>5}                          ║", self.skipped());
        println!("║  Total:   {:>5}                          ║", self.total());
        println!("║  Time:    {:>8.2?}                      ║", self.duration);
        println!("╚══════════════════════════════════════════╝");

        if self.failed() > 0 {
            println!("\nFailed scenarios:");
            for run in &self.results {
                if let TestResult::Failed { reason } = &run.result {
                    println!("  ✗ {}::{}: {}", run.category, run.name, reason);
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
    pub duration_ms: f64,
    pub results: Vec<CaseReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReport {
    pub name: String,
    pub category: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub duration_ms: f64,
}
