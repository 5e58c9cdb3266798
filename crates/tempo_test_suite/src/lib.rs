//! Tempo Scenario Suite
//!
//! Runs motion bindings against recording capabilities and checks the
//! calls they make. No renderer or timer is involved: scenarios move
//! playback time and viewport state by hand.
//!
//! # Scenario Categories
//!
//! - **direct**: `animate` input changes
//! - **scroll**: scroll-linked sequences, keyframes and callbacks
//! - **view**: viewport enter and exit
//! - **gestures**: hover and tap engage and release
//! - **stagger**: collection dispatch and per-index delays

pub mod harness;
pub mod runner;
pub mod suites;

pub use harness::{ScenarioContext, ScenarioHarness, TestResult};
pub use runner::TestRunner;
