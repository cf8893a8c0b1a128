//! Run reports: provenance of a run plus its [`MetricsSummary`], written as
//! pretty JSON with keys in sorted order.

use std::path::Path;

use cellsim_core::{AutomataError, EngineConfig, History, MetricsSummary};
use serde::{Deserialize, Serialize};

use crate::ensure_parent_dir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Rule name.
    pub model: String,
    pub steps: usize,
    /// Grid extents, `[width]` or `[height, width]`.
    pub size: Vec<usize>,
    pub dim: usize,
    pub seed: Option<u64>,
    pub init: Option<String>,
    #[serde(flatten)]
    pub summary: MetricsSummary,
}

impl RunReport {
    /// Summarizes `history` produced by `steps` steps of `model` under `config`.
    pub fn new(model: &str, config: &EngineConfig, steps: usize, history: &History) -> Self {
        Self {
            model: model.to_string(),
            steps,
            size: config.size.dims(),
            dim: config.dimensionality,
            seed: config.seed,
            init: Some(config.init.to_string()),
            summary: MetricsSummary::from_history(history),
        }
    }

    /// Pretty JSON with every key, nested or flattened, in sorted order.
    pub fn to_json_pretty(&self) -> Result<String, AutomataError> {
        // serde_json::Map is a BTreeMap, so going through Value sorts the keys
        let value = serde_json::to_value(self)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    pub fn from_json(json: &str) -> Result<Self, AutomataError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Writes `report` to `path`, creating parent directories.
pub fn write_report(path: &Path, report: &RunReport) -> Result<(), AutomataError> {
    ensure_parent_dir(path)?;
    std::fs::write(path, report.to_json_pretty()?)?;
    tracing::debug!(path = %path.display(), model = %report.model, "wrote run report");
    Ok(())
}
