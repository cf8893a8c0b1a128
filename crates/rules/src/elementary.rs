//! Wolfram's elementary 1-D automata.
//!
//! Each cell looks at `(left, centre, right)` on a ring and forms the index
//! `(left << 2) | (centre << 1) | right`. The new state is bit `index` of the
//! 8-bit rule number.

use cellsim_core::params::param_u64;
use cellsim_core::{AutomataError, Grid, RuleSpec, StateKind, Transition};
use serde_json::{json, Value};

use crate::discrete_states;

/// Rule used when `configure("elementary", ..)` gets no `rule` parameter.
pub const DEFAULT_RULE: u8 = 30;

/// An elementary rule number, `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementaryRule(pub u8);

impl ElementaryRule {
    /// Reads `params["rule"]`, defaulting to [`DEFAULT_RULE`].
    ///
    /// Numbers above 255 are a `Configuration` error.
    pub fn from_json(params: &Value) -> Result<Self, AutomataError> {
        let n = param_u64(params, "rule", u64::from(DEFAULT_RULE));
        u8::try_from(n).map(ElementaryRule).map_err(|_| {
            AutomataError::Configuration(format!("elementary rule must be 0..=255, got {n}"))
        })
    }

    /// Registry name, e.g. `rule_110`.
    pub fn name(&self) -> String {
        format!("rule_{}", self.0)
    }

    /// New centre state for one neighborhood. Inputs must be 0 or 1.
    pub fn next_state(&self, left: u8, center: u8, right: u8) -> u8 {
        let index = (left << 2) | (center << 1) | right;
        (self.0 >> index) & 1
    }

    /// One synchronous update of a binary 1-D grid with wrapping ends.
    pub fn step(&self, grid: &Grid) -> Result<Grid, AutomataError> {
        let name = self.name();
        let states = discrete_states(&name, grid, 1)?;
        if let Some(bad) = states.iter().find(|&&s| s > 1) {
            return Err(AutomataError::IncompatibleGrid {
                rule: name,
                reason: format!("elementary rules are binary, found state {bad}"),
            });
        }

        let w = states.len();
        let next = (0..w)
            .map(|i| {
                let left = states[(i + w - 1) % w];
                let right = states[(i + 1) % w];
                self.next_state(left, states[i], right)
            })
            .collect();
        Grid::from_states(grid.size(), next)
    }

    pub fn spec(self) -> Result<RuleSpec, AutomataError> {
        RuleSpec::new(
            self.name(),
            1,
            format!("Elementary 1-D rule {} on a ring", self.0),
            StateKind::Discrete { num_states: 2 },
            Transition::state_only(move |grid: &Grid| self.step(grid)),
        )
    }
}

pub fn param_schema() -> Value {
    json!({
        "rule": {
            "type": "integer",
            "default": DEFAULT_RULE,
            "min": 0,
            "max": 255,
            "description": "Wolfram rule number"
        }
    })
}
