//! The simulation engine: owns the current grid, applies one rule transition
//! per step and records the history of a run.

use crate::config::{EngineConfig, InitMode};
use crate::error::AutomataError;
use crate::grid::{Grid, GridSize};
use crate::history::History;
use crate::neighborhood::neighbor_counts;
use crate::prng::Xorshift64;
use crate::registry::Registry;
use crate::rule::{RuleSpec, StateKind};

/// A cellular automaton bound to one rule and one configuration.
///
/// Construction validates the configuration and draws the initial grid.
/// [`step`](Engine::step) advances one generation; [`run`](Engine::run)
/// records frame 0 and then one frame per step. Given the same configuration
/// (including a seed), rule and step count, two engines produce identical
/// histories.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    rule: RuleSpec,
    grid: Grid,
    generation: usize,
}

impl Engine {
    /// Builds an engine and draws its initial grid.
    ///
    /// Returns `AutomataError::Configuration` if the configuration is invalid
    /// or the rule's dimensionality differs from the configured one.
    pub fn new(config: EngineConfig, rule: RuleSpec) -> Result<Self, AutomataError> {
        config.validate()?;
        if rule.dimensionality() != config.dimensionality {
            return Err(AutomataError::Configuration(format!(
                "rule '{}' is {}-D but the engine is configured for {}-D",
                rule.name(),
                rule.dimensionality(),
                config.dimensionality
            )));
        }

        let seed = config.seed.unwrap_or_else(Xorshift64::entropy_seed);
        let mut rng = Xorshift64::new(seed);
        let grid = initial_grid(config.size, config.init, rule.states(), &mut rng)?;

        tracing::debug!(
            rule = rule.name(),
            size = %config.size,
            init = %config.init,
            neighborhood = %config.neighborhood,
            boundary = %config.boundary,
            seeded = config.seed.is_some(),
            "engine constructed"
        );

        Ok(Self {
            config,
            rule,
            grid,
            generation: 0,
        })
    }

    /// Resolves `rule` in `registry` and builds an engine with it.
    pub fn from_registry(
        config: EngineConfig,
        registry: &Registry,
        rule: &str,
    ) -> Result<Self, AutomataError> {
        let spec = registry.get(rule)?.clone();
        Self::new(config, spec)
    }

    /// Replaces the current grid, e.g. to seed a continuous model with a
    /// structured pattern after construction.
    ///
    /// The grid must have the configured size and match the rule's cell family:
    /// the right channel count for continuous rules, states below `num_states`
    /// for discrete ones. Anything else is a `Configuration` error and leaves
    /// the engine unchanged.
    pub fn seed_grid(&mut self, grid: Grid) -> Result<(), AutomataError> {
        if grid.size() != self.config.size {
            return Err(AutomataError::Configuration(format!(
                "seed grid is {} but the engine is configured for {}",
                grid.size(),
                self.config.size
            )));
        }
        let compatible = match self.rule.states() {
            StateKind::Discrete { num_states } => grid
                .states()
                .is_some_and(|states| states.iter().all(|&s| s < num_states)),
            StateKind::Continuous { channels } => {
                !grid.is_discrete() && grid.channels() == channels
            }
        };
        if !compatible {
            return Err(AutomataError::Configuration(format!(
                "seed grid ({}) does not match the cells of rule '{}' ({:?})",
                grid.describe(),
                self.rule.name(),
                self.rule.states()
            )));
        }
        self.grid = grid;
        Ok(())
    }

    /// Applies exactly one transition.
    ///
    /// Neighbor counts are computed first only when the rule needs them. A
    /// result that is not congruent with the current grid is a
    /// `RuleContractViolation`, and the current grid is kept.
    pub fn step(&mut self) -> Result<(), AutomataError> {
        let counts = if self.rule.needs_neighbors() {
            Some(neighbor_counts(
                &self.grid,
                self.config.neighborhood,
                self.config.boundary,
            )?)
        } else {
            None
        };
        let next = self.rule.apply(&self.grid, counts.as_ref())?;

        if !next.is_congruent(&self.grid) {
            return Err(AutomataError::RuleContractViolation {
                rule: self.rule.name().to_string(),
                expected: self.grid.describe(),
                found: next.describe(),
            });
        }

        self.grid = next;
        self.generation += 1;
        tracing::trace!(rule = self.rule.name(), generation = self.generation, "step");
        Ok(())
    }

    /// Records the current grid, steps `steps` times recording each result, and
    /// returns the `steps + 1` frames.
    ///
    /// Any step error aborts the run; no partial history is returned.
    pub fn run(&mut self, steps: usize) -> Result<History, AutomataError> {
        let mut history = History::starting_at(self.grid.clone());
        for _ in 0..steps {
            self.step()?;
            history.push(self.grid.clone());
        }
        tracing::debug!(
            rule = self.rule.name(),
            frames = history.len(),
            generation = self.generation,
            "run complete"
        );
        Ok(history)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rule(&self) -> &RuleSpec {
        &self.rule
    }

    /// Steps applied since construction.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The configured seed; `None` when the initial grid came from entropy.
    pub fn seed(&self) -> Option<u64> {
        self.config.seed
    }
}

/// Draws the initial grid for `init`, matching the rule's cell family.
fn initial_grid(
    size: GridSize,
    init: InitMode,
    states: StateKind,
    rng: &mut Xorshift64,
) -> Result<Grid, AutomataError> {
    let cells = size.cell_count()?;
    let (row, col) = size.center();
    let center = row * size.width() + col;

    match states {
        StateKind::Discrete { num_states } => {
            let data = match init {
                InitMode::Random => (0..cells).map(|_| rng.next_state(num_states)).collect(),
                InitMode::CenterDot => {
                    let mut data = vec![0; cells];
                    data[center] = 1;
                    data
                }
                InitMode::Zeros => vec![0; cells],
            };
            Grid::from_states(size, data)
        }
        StateKind::Continuous { channels } => {
            let len = cells.checked_mul(channels).ok_or_else(|| {
                AutomataError::Configuration(format!(
                    "{channels} channels of {size} overflow usize"
                ))
            })?;
            let data = match init {
                InitMode::Random => (0..len).map(|_| rng.next_f64()).collect(),
                InitMode::CenterDot => {
                    let mut data = vec![0.0; len];
                    data[center * channels..(center + 1) * channels].fill(1.0);
                    data
                }
                InitMode::Zeros => vec![0.0; len],
            };
            Grid::from_values(size, channels, data)
        }
    }
}
