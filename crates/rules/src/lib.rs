#![deny(unsafe_code)]
//! Built-in rules for cellsim.
//!
//! Each module exposes a pure `step` function and a `spec` constructor that
//! wraps it in a [`RuleSpec`]. [`register_builtins`] adds the default set to a
//! [`Registry`]; [`configure`] builds a parameterised variant by name for the
//! families that take parameters.

pub mod diffusion;
pub mod elementary;
pub mod excitable;
pub mod life;
pub mod reaction_diffusion;

use cellsim_core::{AutomataError, Grid, Registry, RuleSpec};
use serde_json::Value;

use diffusion::DiffusionParams;
use elementary::ElementaryRule;
use reaction_diffusion::GrayScottParams;

/// Family name accepted by [`configure`] for arbitrary elementary rule numbers.
pub const ELEMENTARY_FAMILY: &str = "elementary";

/// Elementary rules registered by name.
const REGISTERED_ELEMENTARY: [u8; 3] = [30, 90, 110];

/// Registers `rule_30`, `rule_90`, `rule_110`, `game_of_life`,
/// `multistate_wave`, `continuous_diffusion` and `reaction_diffusion` with
/// default parameters, in that order.
pub fn register_builtins(registry: &mut Registry) -> Result<(), AutomataError> {
    for n in REGISTERED_ELEMENTARY {
        registry.register_spec(ElementaryRule(n).spec()?)?;
    }
    registry.register_spec(life::spec()?)?;
    registry.register_spec(excitable::spec()?)?;
    registry.register_spec(diffusion::spec(DiffusionParams::default())?)?;
    registry.register_spec(reaction_diffusion::spec(GrayScottParams::default())?)?;
    Ok(())
}

/// A fresh registry holding only the built-in rules.
pub fn builtin_registry() -> Result<Registry, AutomataError> {
    let mut registry = Registry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}

/// Builds a rule by name with parameters.
///
/// - `elementary` reads `{"rule": n}`; any `rule_<n>` name selects rule `n`,
///   and a `rule` parameter naming a different number is a `Configuration` error.
/// - `continuous_diffusion` reads `decay`.
/// - `reaction_diffusion` reads `feed_rate`, `kill_rate`, `diffusion_u`,
///   `diffusion_v` and `dt`.
/// - `game_of_life` and `multistate_wave` take no parameters.
///
/// Unrecognized names are `UnknownRule`.
pub fn configure(name: &str, params: &Value) -> Result<RuleSpec, AutomataError> {
    let spec = match name {
        ELEMENTARY_FAMILY => ElementaryRule::from_json(params)?.spec(),
        life::NAME => life::spec(),
        excitable::NAME => excitable::spec(),
        diffusion::NAME => diffusion::spec(DiffusionParams::from_json(params)?),
        reaction_diffusion::NAME => reaction_diffusion::spec(GrayScottParams::from_json(params)?),
        _ => match name.strip_prefix("rule_").and_then(|n| n.parse::<u8>().ok()) {
            Some(n) => numbered_elementary(n, params)?.spec(),
            None => Err(unknown(name)),
        },
    }?;
    tracing::debug!(rule = name, %params, "configured rule");
    Ok(spec)
}

fn numbered_elementary(n: u8, params: &Value) -> Result<ElementaryRule, AutomataError> {
    if params.get("rule").is_none() {
        return Ok(ElementaryRule(n));
    }
    let requested = ElementaryRule::from_json(params)?;
    if requested.0 != n {
        return Err(AutomataError::Configuration(format!(
            "rule_{n} does not accept params rule {}",
            requested.0
        )));
    }
    Ok(requested)
}

/// Parameter schema of a configurable family, `None` for fixed rules.
pub fn param_schema(name: &str) -> Option<Value> {
    match name {
        diffusion::NAME => Some(diffusion::param_schema()),
        reaction_diffusion::NAME => Some(reaction_diffusion::param_schema()),
        ELEMENTARY_FAMILY => Some(elementary::param_schema()),
        _ => None,
    }
}

fn unknown(name: &str) -> AutomataError {
    let mut known: Vec<String> = builtin_registry()
        .map(|r| r.list())
        .unwrap_or_default();
    known.push(ELEMENTARY_FAMILY.to_string());
    known.sort();
    AutomataError::UnknownRule {
        name: name.to_string(),
        known,
    }
}

/// States of a discrete grid of the given dimensionality, or `IncompatibleGrid`.
pub(crate) fn discrete_states<'a>(
    rule: &str,
    grid: &'a Grid,
    dimensionality: usize,
) -> Result<&'a [u8], AutomataError> {
    check_dimensionality(rule, grid, dimensionality)?;
    grid.states().ok_or_else(|| AutomataError::IncompatibleGrid {
        rule: rule.to_string(),
        reason: format!("expected discrete cells, got {}", grid.describe()),
    })
}

/// Values of a continuous grid with the given dimensionality and channel count,
/// or `IncompatibleGrid`.
pub(crate) fn continuous_values<'a>(
    rule: &str,
    grid: &'a Grid,
    dimensionality: usize,
    channels: usize,
) -> Result<&'a [f64], AutomataError> {
    check_dimensionality(rule, grid, dimensionality)?;
    match grid.values() {
        Some(values) if grid.channels() == channels => Ok(values),
        _ => Err(AutomataError::IncompatibleGrid {
            rule: rule.to_string(),
            reason: format!(
                "expected continuous cells with {channels} channel(s), got {}",
                grid.describe()
            ),
        }),
    }
}

fn check_dimensionality(rule: &str, grid: &Grid, dimensionality: usize) -> Result<(), AutomataError> {
    if grid.dimensionality() != dimensionality {
        return Err(AutomataError::IncompatibleGrid {
            rule: rule.to_string(),
            reason: format!(
                "expected a {dimensionality}-D grid, got {}",
                grid.describe()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellsim_core::{
        metrics, Boundary, Engine, EngineConfig, GridSize, History, InitMode, Neighborhood,
    };
    use serde_json::json;

    fn registry() -> Registry {
        builtin_registry().unwrap()
    }

    fn run(rule: &str, config: EngineConfig, steps: usize) -> History {
        Engine::from_registry(config, &registry(), rule)
            .unwrap()
            .run(steps)
            .unwrap()
    }

    // ---- Registry ----

    #[test]
    fn builtins_are_listed_in_registration_order() {
        assert_eq!(
            registry().list(),
            vec![
                "rule_30",
                "rule_90",
                "rule_110",
                "game_of_life",
                "multistate_wave",
                "continuous_diffusion",
                "reaction_diffusion",
            ]
        );
    }

    #[test]
    fn registering_builtins_twice_is_a_duplicate() {
        let mut registry = registry();
        assert!(matches!(
            register_builtins(&mut registry),
            Err(AutomataError::DuplicateRule(ref n)) if n == "rule_30"
        ));
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn builtin_dimensionality_and_states() {
        let registry = registry();
        for name in ["rule_30", "rule_90", "rule_110"] {
            assert_eq!(registry.get(name).unwrap().dimensionality(), 1);
        }
        assert_eq!(registry.get("multistate_wave").unwrap().num_states(), Some(3));
        assert_eq!(registry.get("reaction_diffusion").unwrap().num_states(), None);
    }

    #[test]
    fn unknown_lookup_lists_builtins() {
        match registry().get("rule_999") {
            Err(AutomataError::UnknownRule { known, .. }) => {
                assert!(known.contains(&"game_of_life".to_string()));
                assert!(known.windows(2).all(|w| w[0] <= w[1]));
            }
            other => panic!("expected UnknownRule, got {other:?}"),
        }
    }

    // ---- configure ----

    #[test]
    fn configure_elementary_family() {
        let spec = configure("elementary", &json!({"rule": 54})).unwrap();
        assert_eq!(spec.name(), "rule_54");
        assert_eq!(configure("rule_184", &json!({})).unwrap().name(), "rule_184");
    }

    #[test]
    fn numbered_rule_accepts_only_its_own_number() {
        let spec = configure("rule_30", &json!({"rule": 30})).unwrap();
        assert_eq!(spec.name(), "rule_30");
        assert!(matches!(
            configure("rule_30", &json!({"rule": 110})),
            Err(AutomataError::Configuration(_))
        ));
        assert!(matches!(
            configure("rule_30", &json!({"rule": 300})),
            Err(AutomataError::Configuration(_))
        ));
    }

    #[test]
    fn configure_continuous_families() {
        let spec = configure("continuous_diffusion", &json!({"decay": 0.9})).unwrap();
        assert!(spec.description().contains("0.9"));
        let spec = configure("reaction_diffusion", &json!({"feed_rate": 0.037})).unwrap();
        assert!(spec.description().contains("0.037"));
        assert!(configure("reaction_diffusion", &json!({"dt": -1.0})).is_err());
    }

    #[test]
    fn configure_rejects_unknown_names() {
        for name in ["rule_256", "rule_x", "langtons_ant"] {
            assert!(matches!(
                configure(name, &json!({})),
                Err(AutomataError::UnknownRule { .. })
            ));
        }
    }

    #[test]
    fn param_schema_only_for_configurable_families() {
        assert!(param_schema("reaction_diffusion").is_some());
        assert!(param_schema("elementary").is_some());
        assert!(param_schema("game_of_life").is_none());
    }

    // ---- Engine properties ----

    #[test]
    fn rule_30_history_shape() {
        let config = EngineConfig::new(GridSize::Line(101)).with_seed(7);
        assert_eq!(run("rule_30", config, 25).shape(), vec![26, 101]);
    }

    #[test]
    fn game_of_life_history_shape() {
        let config = EngineConfig::new(GridSize::Plane(40, 50)).with_seed(7);
        assert_eq!(run("game_of_life", config, 10).shape(), vec![11, 40, 50]);
    }

    #[test]
    fn reaction_diffusion_history_shape() {
        let config = EngineConfig::new(GridSize::Plane(16, 20)).with_seed(7);
        let history = run("reaction_diffusion", config, 3);
        assert_eq!(history.shape(), vec![4, 16, 20, 2]);
        assert_eq!(history.dtype(), "f64");
    }

    #[test]
    fn rule_30_is_deterministic_per_seed() {
        let config = EngineConfig::new(GridSize::Line(101)).with_seed(42);
        assert_eq!(run("rule_30", config.clone(), 50), run("rule_30", config, 50));
    }

    #[test]
    fn rule_30_seeds_differ() {
        let a = run("rule_30", EngineConfig::new(GridSize::Line(101)).with_seed(1), 20);
        let b = run("rule_30", EngineConfig::new(GridSize::Line(101)).with_seed(2), 20);
        assert_ne!(a, b);
    }

    #[test]
    fn rule_90_from_single_cell_ring() {
        let config = EngineConfig::new(GridSize::Line(5)).with_init(InitMode::Zeros);
        let mut engine = Engine::from_registry(config, &registry(), "rule_90").unwrap();
        engine
            .seed_grid(Grid::from_states(GridSize::Line(5), vec![1, 0, 0, 0, 0]).unwrap())
            .unwrap();
        let history = engine.run(1).unwrap();
        assert_eq!(history.last().states().unwrap(), &[0, 1, 0, 0, 1]);
    }

    #[test]
    fn rule_90_center_dot_draws_sierpinski_rows() {
        let config = EngineConfig::new(GridSize::Line(9)).with_init(InitMode::CenterDot);
        let history = run("rule_90", config, 2);
        assert_eq!(history.get(1).unwrap().states().unwrap(), &[0, 0, 0, 1, 0, 1, 0, 0, 0]);
        assert_eq!(history.get(2).unwrap().states().unwrap(), &[0, 0, 1, 0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn rule_110_from_center_dot_grows_leftward() {
        let config = EngineConfig::new(GridSize::Line(7)).with_init(InitMode::CenterDot);
        let history = run("rule_110", config, 1);
        assert_eq!(history.last().states().unwrap(), &[0, 0, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn game_of_life_block_survives_a_run() {
        let size = GridSize::Plane(6, 6);
        let mut states = vec![0; 36];
        for i in [14, 15, 20, 21] {
            states[i] = 1;
        }
        let block = Grid::from_states(size, states).unwrap();
        for boundary in [Boundary::Wrap, Boundary::Fixed] {
            let config = EngineConfig::new(size)
                .with_init(InitMode::Zeros)
                .with_boundary(boundary);
            let mut engine = Engine::from_registry(config, &registry(), "game_of_life").unwrap();
            engine.seed_grid(block.clone()).unwrap();
            let history = engine.run(5).unwrap();
            assert!(history.iter().all(|frame| frame == &block), "{boundary}");
        }
    }

    #[test]
    fn game_of_life_block_straddling_the_seam_survives_on_a_torus() {
        let size = GridSize::Plane(6, 6);
        let mut states = vec![0; 36];
        // rows 5 and 0, columns 5 and 0
        for i in [35, 30, 5, 0] {
            states[i] = 1;
        }
        let block = Grid::from_states(size, states).unwrap();
        let config = EngineConfig::new(size).with_init(InitMode::Zeros);
        let mut engine = Engine::from_registry(config, &registry(), "game_of_life").unwrap();
        engine.seed_grid(block.clone()).unwrap();
        let history = engine.run(5).unwrap();
        assert!(history.iter().all(|frame| frame == &block));
    }

    #[test]
    fn von_neumann_game_of_life_runs() {
        let config = EngineConfig::new(GridSize::Plane(10, 10))
            .with_seed(3)
            .with_neighborhood(Neighborhood::VonNeumann);
        assert_eq!(run("game_of_life", config, 4).len(), 5);
    }

    #[test]
    fn excitable_wave_from_center_dot_expands() {
        let config = EngineConfig::new(GridSize::Plane(9, 9)).with_init(InitMode::CenterDot);
        let history = run("multistate_wave", config, 2);
        let excited = |i: usize| {
            history
                .get(i)
                .unwrap()
                .states()
                .unwrap()
                .iter()
                .filter(|&&s| s == excitable::EXCITED)
                .count()
        };
        assert_eq!(excited(0), 1);
        assert_eq!(excited(1), 8);
        assert_eq!(excited(2), 16);
    }

    #[test]
    fn seeded_reaction_diffusion_run() {
        let size = GridSize::Plane(32, 32);
        let config = EngineConfig::new(size).with_seed(5);
        let mut engine = Engine::from_registry(config, &registry(), "reaction_diffusion").unwrap();
        engine
            .seed_grid(reaction_diffusion::spot_grid(size, 5).unwrap())
            .unwrap();
        let history = engine.run(10).unwrap();
        let summary = metrics::MetricsSummary::from_history(&history);
        assert!(summary.notes.is_some());
        assert!(summary.activity.unwrap() > 0.0);
    }

    #[test]
    fn diffusion_on_center_dot_conserves_mass_minus_decay() {
        let config = EngineConfig::new(GridSize::Plane(7, 7)).with_init(InitMode::CenterDot);
        let history = run("continuous_diffusion", config, 1);
        let mass: f64 = history.last().values().unwrap().iter().sum();
        assert!((mass - 0.98).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn elementary_runs_are_reproducible(
                rule: u8,
                seed: u64,
                width in 1_usize..80,
                steps in 0_usize..30,
            ) {
                let config = EngineConfig::new(GridSize::Line(width)).with_seed(seed);
                let spec = ElementaryRule(rule).spec().unwrap();
                let a = Engine::new(config.clone(), spec.clone()).unwrap().run(steps).unwrap();
                let b = Engine::new(config, spec).unwrap().run(steps).unwrap();
                prop_assert_eq!(a.shape(), vec![steps + 1, width]);
                prop_assert_eq!(a, b);
            }

            #[test]
            fn two_dimensional_rules_keep_shape(
                h in 1_usize..12,
                w in 1_usize..12,
                seed: u64,
                pick in 0_usize..4,
            ) {
                let rule = ["game_of_life", "multistate_wave", "continuous_diffusion", "reaction_diffusion"][pick];
                let config = EngineConfig::new(GridSize::Plane(h, w)).with_seed(seed);
                let history = run(rule, config, 3);
                prop_assert_eq!(history.len(), 4);
                prop_assert_eq!(&history.shape()[1..3], &[h, w][..]);
            }
        }
    }
}
