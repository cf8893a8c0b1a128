//! Three-state excitable medium: resting (0), excited (1), refractory (2).
//!
//! A resting cell fires when at least one Moore neighbor is excited; excited
//! cells become refractory and refractory cells rest. Only excited neighbors
//! count, so the rule builds its own 0/1 indicator grid and counts that
//! instead of taking summed states from the engine.

use cellsim_core::{
    neighbor_counts, AutomataError, Boundary, Grid, Neighborhood, RuleSpec, StateKind, Transition,
};

use crate::discrete_states;

pub const NAME: &str = "multistate_wave";

pub const RESTING: u8 = 0;
pub const EXCITED: u8 = 1;
pub const REFRACTORY: u8 = 2;

pub fn step(grid: &Grid) -> Result<Grid, AutomataError> {
    let states = discrete_states(NAME, grid, 2)?;
    let indicator = Grid::from_states(
        grid.size(),
        states.iter().map(|&s| u8::from(s == EXCITED)).collect(),
    )?;
    let excited = neighbor_counts(&indicator, Neighborhood::Moore, Boundary::Wrap)?;

    let next = states
        .iter()
        .zip(excited.counts())
        .map(|(&s, &n)| match s {
            RESTING if n >= 1 => EXCITED,
            EXCITED => REFRACTORY,
            _ => RESTING,
        })
        .collect();
    Grid::from_states(grid.size(), next)
}

pub fn spec() -> Result<RuleSpec, AutomataError> {
    RuleSpec::new(
        NAME,
        2,
        "Excitable medium: resting cells fire next to an excited neighbor, then recover",
        StateKind::Discrete { num_states: 3 },
        Transition::state_only(step),
    )
}
