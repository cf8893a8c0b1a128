//! Single-channel diffusion with decay on a torus.

use cellsim_core::params::param_f64;
use cellsim_core::{AutomataError, Grid, Kernel3x3, RuleSpec, StateKind, Transition};
use serde_json::{json, Value};

use crate::continuous_values;

pub const NAME: &str = "continuous_diffusion";

const DEFAULT_DECAY: f64 = 0.98;

/// Gaussian-like blur whose weights sum to 1.
pub const BLUR: Kernel3x3 = Kernel3x3([
    [0.05, 0.1, 0.05],
    [0.1, 0.4, 0.1],
    [0.05, 0.1, 0.05],
]);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionParams {
    /// Multiplier applied after blurring.
    pub decay: f64,
}

impl Default for DiffusionParams {
    fn default() -> Self {
        Self {
            decay: DEFAULT_DECAY,
        }
    }
}

impl DiffusionParams {
    pub fn from_json(params: &Value) -> Result<Self, AutomataError> {
        let decay = param_f64(params, "decay", DEFAULT_DECAY);
        if !decay.is_finite() || decay < 0.0 {
            return Err(AutomataError::Configuration(format!(
                "decay must be a non-negative number, got {decay}"
            )));
        }
        Ok(Self { decay })
    }
}

/// Blurs with [`BLUR`], scales by `decay` and clamps to `[0, 1]`.
pub fn step(grid: &Grid, params: &DiffusionParams) -> Result<Grid, AutomataError> {
    continuous_values(NAME, grid, 2, 1)?;
    let next = BLUR
        .apply_wrapped(grid, 0)?
        .into_iter()
        .map(|v| (v * params.decay).clamp(0.0, 1.0))
        .collect();
    Grid::from_values(grid.size(), 1, next)
}

pub fn spec(params: DiffusionParams) -> Result<RuleSpec, AutomataError> {
    RuleSpec::new(
        NAME,
        2,
        format!("Continuous diffusion with decay {}", params.decay),
        StateKind::Continuous { channels: 1 },
        Transition::state_only(move |grid: &Grid| step(grid, &params)),
    )
}

pub fn param_schema() -> Value {
    json!({
        "decay": {
            "type": "number",
            "default": DEFAULT_DECAY,
            "min": 0.0,
            "max": 1.0,
            "description": "Multiplier applied after each blur"
        }
    })
}
