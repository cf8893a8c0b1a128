//! Engine configuration: grid size, dimensionality, seed, initial pattern,
//! neighborhood and boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AutomataError;
use crate::grid::GridSize;
use crate::neighborhood::{Boundary, Neighborhood};

/// How the engine fills the grid at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitMode {
    /// Every cell drawn independently and uniformly.
    #[default]
    Random,
    /// All zero except the centre cell, which is set to 1.
    CenterDot,
    /// All zero.
    Zeros,
}

impl InitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitMode::Random => "random",
            InitMode::CenterDot => "center_dot",
            InitMode::Zeros => "zeros",
        }
    }
}

impl FromStr for InitMode {
    type Err = AutomataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "random" => Ok(InitMode::Random),
            "center_dot" | "centre_dot" => Ok(InitMode::CenterDot),
            "zeros" => Ok(InitMode::Zeros),
            _ => Err(AutomataError::Configuration(format!(
                "unsupported init mode '{s}' (expected random, center_dot or zeros)"
            ))),
        }
    }
}

impl fmt::Display for InitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything an [`Engine`](crate::engine::Engine) needs besides its rule.
///
/// Consumed once at construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub size: GridSize,
    pub dimensionality: usize,
    /// `None` draws the initial grid from process entropy.
    pub seed: Option<u64>,
    pub init: InitMode,
    pub neighborhood: Neighborhood,
    pub boundary: Boundary,
}

impl EngineConfig {
    /// A random-init, Moore, wrapping configuration with dimensionality taken
    /// from `size`.
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            dimensionality: size.dimensionality(),
            seed: None,
            init: InitMode::default(),
            neighborhood: Neighborhood::default(),
            boundary: Boundary::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_init(mut self, init: InitMode) -> Self {
        self.init = init;
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Checks that the dimensionality is 1 or 2, agrees with the size variant,
    /// and that every extent is positive.
    pub fn validate(&self) -> Result<(), AutomataError> {
        if !(1..=2).contains(&self.dimensionality) {
            return Err(AutomataError::Configuration(format!(
                "dimensionality must be 1 or 2, got {}",
                self.dimensionality
            )));
        }
        if self.size.dimensionality() != self.dimensionality {
            return Err(AutomataError::Configuration(format!(
                "{}-D engine needs a {} size, got {}",
                self.dimensionality,
                if self.dimensionality == 1 {
                    "scalar"
                } else {
                    "(height, width)"
                },
                self.size
            )));
        }
        self.size.validate()
    }
}
