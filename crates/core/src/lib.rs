#![deny(unsafe_code)]
//! Core types for the cellsim cellular automaton toolkit.
//!
//! Provides the `Grid` and `History` data model, neighbor counting, the
//! `RuleSpec` contract and `Registry`, the simulation `Engine`, run metrics,
//! the `Xorshift64` PRNG, `RunSpec` and parameter helpers.

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod history;
pub mod metrics;
pub mod neighborhood;
pub mod params;
pub mod prng;
pub mod registry;
pub mod rule;
pub mod run_spec;

pub use config::{EngineConfig, InitMode};
pub use engine::Engine;
pub use error::AutomataError;
pub use grid::{Cells, Grid, GridSize};
pub use history::History;
pub use metrics::MetricsSummary;
pub use neighborhood::{neighbor_counts, Boundary, Kernel3x3, NeighborCounts, Neighborhood};
pub use prng::Xorshift64;
pub use registry::Registry;
pub use rule::{RuleSpec, StateKind, Transition};
pub use run_spec::RunSpec;
