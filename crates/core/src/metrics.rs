//! Scalar descriptors of a run: per-frame Shannon entropy, temporal activity
//! and left-right symmetry, plus the summary consumed by report writers.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::AutomataError;
use crate::grid::{Cells, Grid};
use crate::history::History;

/// Continuous cells count as changed when they move by more than this.
pub const ACTIVITY_EPSILON: f64 = 1e-9;

/// Bins used to discretize continuous histories for entropy in summaries.
pub const SUMMARY_ENTROPY_BINS: usize = 16;

/// Shannon entropy, in bits, of the state distribution of a discrete grid.
///
/// Continuous grids are `UnsupportedMetric`; [`discretize`] them first.
pub fn frame_entropy(grid: &Grid) -> Result<f64, AutomataError> {
    let states = grid.states().ok_or_else(|| {
        AutomataError::UnsupportedMetric(
            "entropy needs a discrete grid; discretize continuous values first".into(),
        )
    })?;

    let mut histogram = [0_usize; 256];
    for &s in states {
        histogram[usize::from(s)] += 1;
    }
    let total = states.len() as f64;
    let entropy = histogram
        .iter()
        .filter(|&&n| n > 0)
        .map(|&n| {
            let p = n as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>();
    // -0.0 for single-state frames
    Ok(entropy.max(0.0))
}

/// One entropy value per frame.
pub fn temporal_entropy(history: &History) -> Result<Vec<f64>, AutomataError> {
    history.iter().map(frame_entropy).collect()
}

/// Mean fraction of cells that changed between consecutive frames, in `[0, 1]`.
///
/// Needs at least two frames.
pub fn activity_score(history: &History) -> Result<f64, AutomataError> {
    if history.len() < 2 {
        return Err(AutomataError::UnsupportedMetric(
            "activity needs at least two frames".into(),
        ));
    }

    let transitions = history.frames().windows(2).map(|pair| {
        let (before, after) = (&pair[0], &pair[1]);
        let elements = before.cell_count() * before.channels();
        let changed = before
            .iter_f64()
            .zip(after.iter_f64())
            .filter(|(a, b)| (a - b).abs() > ACTIVITY_EPSILON)
            .count();
        changed as f64 / elements as f64
    });
    let total: f64 = transitions.sum();
    Ok(total / (history.len() - 1) as f64)
}

/// Left-right mirror agreement in `[0, 1]`; 1 means perfectly symmetric.
///
/// Discrete grids score the fraction of cells equal to their mirror cell.
/// Continuous grids score `1 - mean |a - mirror(a)|` over all channels.
pub fn symmetry_score(grid: &Grid) -> f64 {
    let (height, width, channels) = (grid.height(), grid.width(), grid.channels());
    let mirror = |i: usize| {
        let cell = i / channels;
        let (row, col) = (cell / width, cell % width);
        (row * width + (width - 1 - col)) * channels + i % channels
    };
    let elements = height * width * channels;

    match grid.cells() {
        Cells::Discrete(states) => {
            let equal = (0..elements)
                .filter(|&i| states[i] == states[mirror(i)])
                .count();
            equal as f64 / elements as f64
        }
        Cells::Continuous(values) => {
            let deviation = (0..elements)
                .map(|i| (values[i] - values[mirror(i)]).abs())
                .sum::<f64>()
                / elements as f64;
            (1.0 - deviation).clamp(0.0, 1.0)
        }
    }
}

/// Maps one channel of a continuous grid onto `bins` equal-width states over
/// `[0, 1]`. Discrete grids are returned unchanged.
///
/// `bins` must be in `2..=256`.
pub fn discretize(grid: &Grid, channel: usize, bins: usize) -> Result<Grid, AutomataError> {
    if !(2..=256).contains(&bins) {
        return Err(AutomataError::Configuration(format!(
            "bins must be between 2 and 256, got {bins}"
        )));
    }
    if grid.is_discrete() {
        return Ok(grid.clone());
    }
    let top = bins - 1;
    let states = grid
        .channel(channel)?
        .into_iter()
        .map(|v| ((v.clamp(0.0, 1.0) * bins as f64) as usize).min(top) as u8)
        .collect();
    Grid::from_states(grid.size(), states)
}

/// [`discretize`] applied to every frame.
pub fn discretize_history(
    history: &History,
    channel: usize,
    bins: usize,
) -> Result<History, AutomataError> {
    let frames = history
        .iter()
        .map(|f| discretize(f, channel, bins))
        .collect::<Result<Vec<_>, _>>()?;
    History::from_frames(frames)
}

/// Output statistics and metrics for one history.
///
/// Statistics cover every element of every frame. Metrics are computed on
/// channel 0 of multi-channel histories; a metric that cannot be computed is
/// `None` rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub history_shape: Vec<usize>,
    pub dtype: String,
    pub min_value: f64,
    pub max_value: f64,
    pub mean_value: f64,
    pub entropy_mean: Option<f64>,
    pub activity: Option<f64>,
    pub symmetry: Option<f64>,
    pub notes: Option<String>,
}

impl MetricsSummary {
    pub fn from_history(history: &History) -> Self {
        let (mut min, mut max, mut sum, mut count) = (f64::INFINITY, f64::NEG_INFINITY, 0.0, 0_usize);
        for v in history.iter().flat_map(Grid::iter_f64) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        let channels = history.first().channels();
        let view = match metric_view(history) {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::debug!(error = %e, "no metric view; metrics unavailable");
                None
            }
        };

        let entropy_mean = view.as_deref().and_then(|v| degrade("entropy", entropy_mean(v)));
        let activity = view.as_deref().and_then(|v| degrade("activity", activity_score(v)));
        let symmetry = view.as_deref().map(|v| symmetry_score(v.last()));

        Self {
            history_shape: history.shape(),
            dtype: history.dtype().to_string(),
            min_value: min,
            max_value: max,
            mean_value: sum / count as f64,
            entropy_mean,
            activity,
            symmetry,
            notes: (channels > 1)
                .then(|| format!("metrics computed on channel 0 of {channels}")),
        }
    }
}

/// Channel 0 of multi-channel histories, the history itself otherwise.
fn metric_view(history: &History) -> Result<Cow<'_, History>, AutomataError> {
    if history.first().channels() > 1 {
        Ok(Cow::Owned(history.project_channel(0)?))
    } else {
        Ok(Cow::Borrowed(history))
    }
}

fn entropy_mean(history: &History) -> Result<f64, AutomataError> {
    let discrete = if history.first().is_discrete() {
        Cow::Borrowed(history)
    } else {
        Cow::Owned(discretize_history(history, 0, SUMMARY_ENTROPY_BINS)?)
    };
    let curve = temporal_entropy(&discrete)?;
    Ok(curve.iter().sum::<f64>() / curve.len() as f64)
}

fn degrade(metric: &str, result: Result<f64, AutomataError>) -> Option<f64> {
    result
        .map_err(|e| tracing::debug!(metric, error = %e, "metric unavailable"))
        .ok()
}
