//! Tempo Core Runtime
//!
//! The reactive host the motion bindings are built on:
//!
//! - **Signals**: typed reactive cells, written last-write-wins
//! - **Effects**: computations rerun synchronously on dependency change, each
//!   run paired with a cleanup that executes before the next run and on disposal
//! - **State**: signal + graph bundles used as declarative input/output cells
//!
//! # Example
//!
//! ```rust
//! use tempo_core::reactive::{EffectCleanup, ReactiveGraph};
//!
//! let graph = ReactiveGraph::new();
//! let count = graph.create_signal(0i32);
//!
//! let effect = graph.create_effect(move |g| {
//!     println!("Count is now: {:?}", g.get(count));
//!     EffectCleanup::none()
//! });
//!
//! graph.set(count, 5);
//! graph.dispose_effect(effect);
//! ```

pub mod reactive;

pub use reactive::{
    Effect, EffectCleanup, EffectId, ReactiveGraph, ReactiveStats, Signal, SignalId, State,
};
