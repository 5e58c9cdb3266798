//! Scenario Runner
//!
//! Command-line tool for running Tempo motion scenarios against the
//! recording capabilities.
//!
//! Usage:
//!   tempo-scenarios                       # Run all scenarios
//!   tempo-scenarios --filter hover        # Run scenarios matching "hover"
//!   tempo-scenarios --list                # List all scenarios
//!   tempo-scenarios --preset spring.json  # Base transition from a JSON file
//!   tempo-scenarios --trace               # Print recorded calls per scenario
//!   tempo-scenarios --json                # Print a JSON report instead of the summary

use anyhow::{Context, Result};
use tempo_animation::TransitionOptions;
use tempo_test_suite::{runner::TestRunner, suites, ScenarioHarness};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn load_preset(path: &str) -> Result<TransitionOptions> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read preset {}", path))?;
    serde_json::from_str(&json).with_context(|| format!("invalid transition preset {}", path))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--list") {
        println!("Available scenario suites:");
        for suite in suites::all_suites() {
            println!("\n  {}:", suite.name);
            for case in &suite.cases {
                println!("    - {}", case.name);
            }
        }
        return Ok(());
    }

    let json = args.iter().any(|a| a == "--json");
    let mut harness = ScenarioHarness::new().show_trace(args.iter().any(|a| a == "--trace"));
    if let Some(path) = flag_value(&args, "--preset") {
        let preset = load_preset(&path)?;
        tracing::info!("Using transition preset {}: {:?}", path, preset);
        harness = harness.with_preset(preset);
    }

    if !json {
        println!("╔══════════════════════════════════════════╗");
        println!("║         TEMPO MOTION SCENARIOS           ║");
        println!("╚══════════════════════════════════════════╝\n");
    }

    let mut runner = TestRunner::with_harness(harness);
    for suite in suites::all_suites() {
        runner.add_suite(suite);
    }

    if let Some(pattern) = flag_value(&args, "--filter") {
        tracing::info!("Running scenarios matching: {}", pattern);
        runner.filter(&pattern);
    }

    let result = runner.run();

    if json {
        println!("{}", serde_json::to_string_pretty(&result.report())?);
    } else {
        result.print_summary();
    }

    if result.all_passed() {
        if !json {
            println!("\nAll scenarios passed!");
        }
        Ok(())
    } else {
        std::process::exit(1);
    }
}
