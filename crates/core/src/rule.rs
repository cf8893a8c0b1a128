//! The rule contract: what a transition function looks like and how it declares
//! the inputs it needs.
//!
//! A [`RuleSpec`] bundles a [`Transition`] with its name, dimensionality,
//! description and [`StateKind`]. The transition is a tagged variant rather than
//! a callable inspected at runtime: [`Transition::StateOnly`] rules receive only
//! the grid, [`Transition::WithNeighbors`] rules also receive precomputed
//! neighbor counts and the number of states. The engine branches on the variant.

use std::fmt;
use std::sync::Arc;

use crate::error::AutomataError;
use crate::grid::Grid;
use crate::neighborhood::NeighborCounts;

/// Transition that maps a grid to the next grid.
pub type StateOnlyFn = dyn Fn(&Grid) -> Result<Grid, AutomataError> + Send + Sync;

/// Transition that also consumes neighbor counts and the state count.
pub type NeighborFn =
    dyn Fn(&Grid, &NeighborCounts, u8) -> Result<Grid, AutomataError> + Send + Sync;

/// A rule's transition function, tagged by the inputs it requires.
#[derive(Clone)]
pub enum Transition {
    StateOnly(Arc<StateOnlyFn>),
    WithNeighbors(Arc<NeighborFn>),
}

impl Transition {
    /// Wraps a grid-only transition.
    pub fn state_only<F>(f: F) -> Self
    where
        F: Fn(&Grid) -> Result<Grid, AutomataError> + Send + Sync + 'static,
    {
        Transition::StateOnly(Arc::new(f))
    }

    /// Wraps a transition that needs neighbor counts and the state count.
    pub fn with_neighbors<F>(f: F) -> Self
    where
        F: Fn(&Grid, &NeighborCounts, u8) -> Result<Grid, AutomataError> + Send + Sync + 'static,
    {
        Transition::WithNeighbors(Arc::new(f))
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::StateOnly(_) => f.write_str("Transition::StateOnly(..)"),
            Transition::WithNeighbors(_) => f.write_str("Transition::WithNeighbors(..)"),
        }
    }
}

/// Cell family a rule operates on, used by the engine to build the initial grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    /// Integer states in `[0, num_states)`.
    Discrete { num_states: u8 },
    /// `channels` floating-point values in [0, 1] per cell.
    Continuous { channels: usize },
}

/// An immutable, named rule ready to be bound to an engine.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    name: String,
    dimensionality: usize,
    description: String,
    states: StateKind,
    transition: Transition,
}

impl RuleSpec {
    /// Builds a rule specification.
    ///
    /// Returns `AutomataError::Configuration` if `dimensionality` is not 1 or 2,
    /// if a discrete rule declares fewer than 2 states, or if a continuous rule
    /// declares no channels.
    pub fn new(
        name: impl Into<String>,
        dimensionality: usize,
        description: impl Into<String>,
        states: StateKind,
        transition: Transition,
    ) -> Result<Self, AutomataError> {
        let name = name.into();
        if !(1..=2).contains(&dimensionality) {
            return Err(AutomataError::Configuration(format!(
                "rule '{name}' has dimensionality {dimensionality}; expected 1 or 2"
            )));
        }
        match states {
            StateKind::Discrete { num_states } if num_states < 2 => {
                return Err(AutomataError::Configuration(format!(
                    "rule '{name}' needs at least 2 states, got {num_states}"
                )))
            }
            StateKind::Continuous { channels: 0 } => {
                return Err(AutomataError::Configuration(format!(
                    "rule '{name}' needs at least one channel"
                )))
            }
            _ => {}
        }
        Ok(Self {
            name,
            dimensionality,
            description: description.into(),
            states,
            transition,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn states(&self) -> StateKind {
        self.states
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Whether the engine must compute neighbor counts before calling the rule.
    pub fn needs_neighbors(&self) -> bool {
        matches!(self.transition, Transition::WithNeighbors(_))
    }

    /// Number of discrete states, or `None` for continuous rules.
    pub fn num_states(&self) -> Option<u8> {
        match self.states {
            StateKind::Discrete { num_states } => Some(num_states),
            StateKind::Continuous { .. } => None,
        }
    }

    /// Invokes the transition.
    ///
    /// `neighbors` must be `Some` for rules that need them; passing `None` to
    /// such a rule is a `Configuration` error. Continuous rules see a state
    /// count of 0.
    pub fn apply(
        &self,
        grid: &Grid,
        neighbors: Option<&NeighborCounts>,
    ) -> Result<Grid, AutomataError> {
        match &self.transition {
            Transition::StateOnly(f) => f(grid),
            Transition::WithNeighbors(f) => {
                let counts = neighbors.ok_or_else(|| {
                    AutomataError::Configuration(format!(
                        "rule '{}' requires neighbor counts",
                        self.name
                    ))
                })?;
                f(grid, counts, self.num_states().unwrap_or(0))
            }
        }
    }
}
