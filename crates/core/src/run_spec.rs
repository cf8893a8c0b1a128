//! Reproducible description of a run.
//!
//! A [`RunSpec`] captures everything needed to replay a simulation: rule name,
//! grid extents, seed, initial pattern, step count, neighborhood, boundary and
//! rule parameters. Two identical seeded `RunSpec`s fed to the same binary
//! produce identical histories.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, InitMode};
use crate::error::AutomataError;
use crate::grid::GridSize;
use crate::neighborhood::{Boundary, Neighborhood};

pub const DEFAULT_WIDTH: usize = 101;
pub const DEFAULT_STEPS: usize = 100;

/// JSON-serializable run description. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub rule: String,
    /// `[width]` for 1-D rules, `[height, width]` for 2-D rules.
    #[serde(default = "default_size")]
    pub size: Vec<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub init: InitMode,
    #[serde(default = "default_steps")]
    pub steps: usize,
    #[serde(default)]
    pub neighborhood: Neighborhood,
    #[serde(default)]
    pub boundary: Boundary,
    /// Rule parameters, read leniently by the rule family.
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
}

fn default_size() -> Vec<usize> {
    vec![DEFAULT_WIDTH]
}

fn default_steps() -> usize {
    DEFAULT_STEPS
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl RunSpec {
    /// A random-init, unseeded spec with default steps and no parameters.
    pub fn new(rule: &str, size: GridSize) -> Self {
        Self {
            rule: rule.to_string(),
            size: size.dims(),
            seed: None,
            init: InitMode::default(),
            steps: DEFAULT_STEPS,
            neighborhood: Neighborhood::default(),
            boundary: Boundary::default(),
            params: empty_params(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AutomataError> {
        let spec: RunSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn to_json_pretty(&self) -> Result<String, AutomataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn grid_size(&self) -> Result<GridSize, AutomataError> {
        GridSize::from_dims(&self.size)
    }

    /// Checks the rule name is non-empty, the extents form a valid size and
    /// `params` is a JSON object (or null).
    pub fn validate(&self) -> Result<(), AutomataError> {
        if self.rule.trim().is_empty() {
            return Err(AutomataError::Configuration("rule name is empty".into()));
        }
        self.grid_size()?;
        if !(self.params.is_object() || self.params.is_null()) {
            return Err(AutomataError::Configuration(format!(
                "params must be a JSON object, got {}",
                self.params
            )));
        }
        Ok(())
    }

    pub fn engine_config(&self) -> Result<EngineConfig, AutomataError> {
        self.validate()?;
        let mut config = EngineConfig::new(self.grid_size()?)
            .with_init(self.init)
            .with_neighborhood(self.neighborhood)
            .with_boundary(self.boundary);
        config.seed = self.seed;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_uses_defaults() {
        let spec = RunSpec::new("rule_30", GridSize::Line(64));
        assert_eq!(spec.size, vec![64]);
        assert_eq!(spec.steps, DEFAULT_STEPS);
        assert_eq!(spec.seed, None);
        assert_eq!(spec.params, json!({}));
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let spec = RunSpec::from_json(r#"{"rule": "rule_110"}"#).unwrap();
        assert_eq!(spec.size, vec![DEFAULT_WIDTH]);
        assert_eq!(spec.init, InitMode::Random);
        assert_eq!(spec.neighborhood, Neighborhood::Moore);
        assert_eq!(spec.boundary, Boundary::Wrap);
        assert_eq!(spec.steps, DEFAULT_STEPS);
    }

    #[test]
    fn full_json_round_trip() {
        let mut spec = RunSpec::new("reaction_diffusion", GridSize::Plane(64, 64));
        spec.seed = Some(8_675_309);
        spec.init = InitMode::Zeros;
        spec.steps = 500;
        spec.boundary = Boundary::Fixed;
        spec.params = json!({"feed_rate": 0.037, "kill_rate": 0.06});

        let json = spec.to_json_pretty().unwrap();
        assert_eq!(RunSpec::from_json(&json).unwrap(), spec);
    }

    #[test]
    fn json_uses_snake_case_enum_values() {
        let spec = RunSpec::from_json(
            r#"{"rule": "game_of_life", "size": [10, 20], "init": "center_dot",
                "neighborhood": "von_neumann", "boundary": "fixed"}"#,
        )
        .unwrap();
        assert_eq!(spec.init, InitMode::CenterDot);
        assert_eq!(spec.neighborhood, Neighborhood::VonNeumann);
        assert_eq!(spec.grid_size().unwrap(), GridSize::Plane(10, 20));
    }

    #[test]
    fn unknown_init_mode_fails_to_parse() {
        assert!(RunSpec::from_json(r#"{"rule": "rule_30", "init": "glider"}"#).is_err());
    }

    #[test]
    fn validate_rejects_bad_sizes() {
        for size in [vec![], vec![0], vec![3, 0], vec![2, 2, 2]] {
            let mut spec = RunSpec::new("rule_30", GridSize::Line(8));
            spec.size = size.clone();
            assert!(spec.validate().is_err(), "size {size:?} accepted");
        }
    }

    #[test]
    fn validate_rejects_empty_rule_and_non_object_params() {
        let mut spec = RunSpec::new(" ", GridSize::Line(8));
        assert!(spec.validate().is_err());
        spec.rule = "rule_30".into();
        spec.params = json!([1, 2]);
        assert!(spec.validate().is_err());
        spec.params = serde_json::Value::Null;
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn engine_config_carries_every_field() {
        let mut spec = RunSpec::new("game_of_life", GridSize::Plane(5, 6));
        spec.seed = Some(3);
        spec.init = InitMode::CenterDot;
        spec.neighborhood = Neighborhood::VonNeumann;
        let config = spec.engine_config().unwrap();
        assert_eq!(config.size, GridSize::Plane(5, 6));
        assert_eq!(config.dimensionality, 2);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.init, InitMode::CenterDot);
        assert_eq!(config.neighborhood, Neighborhood::VonNeumann);
        assert_eq!(config.boundary, Boundary::Wrap);
    }
}
