//! Conway's Game of Life (B3/S23).

use cellsim_core::{AutomataError, Grid, NeighborCounts, RuleSpec, StateKind, Transition};

use crate::discrete_states;

pub const NAME: &str = "game_of_life";

/// Live cells survive with 2 or 3 live neighbors; dead cells with exactly 3
/// become live.
pub fn step(grid: &Grid, counts: &NeighborCounts) -> Result<Grid, AutomataError> {
    let states = discrete_states(NAME, grid, 2)?;
    if counts.size() != grid.size() {
        return Err(AutomataError::IncompatibleGrid {
            rule: NAME.to_string(),
            reason: format!(
                "neighbor counts are {} but the grid is {}",
                counts.size(),
                grid.size()
            ),
        });
    }

    let next = states
        .iter()
        .zip(counts.counts())
        .map(|(&alive, &n)| u8::from(matches!((alive, n), (1, 2) | (1, 3) | (0, 3))))
        .collect();
    Grid::from_states(grid.size(), next)
}

pub fn spec() -> Result<RuleSpec, AutomataError> {
    RuleSpec::new(
        NAME,
        2,
        "Conway's Game of Life: birth on 3, survival on 2 or 3",
        StateKind::Discrete { num_states: 2 },
        Transition::with_neighbors(|grid: &Grid, counts: &NeighborCounts, _| step(grid, counts)),
    )
}
