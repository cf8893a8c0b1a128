//! One- and two-dimensional cell grids with discrete or continuous states.
//!
//! A [`Grid`] stores its cells in row-major order. Discrete grids hold one
//! `u8` state per cell; continuous grids hold one or more `f64` channels per
//! cell, interleaved as a trailing axis so that the value of channel `c` at
//! `(row, col)` lives at `(row * width + col) * channels + c`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AutomataError;

/// Spatial extent of a grid.
///
/// `Line(width)` is a 1-D row of cells; `Plane(height, width)` is a 2-D grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridSize {
    Line(usize),
    Plane(usize, usize),
}

impl GridSize {
    /// Builds a size from a list of extents: `[width]` or `[height, width]`.
    ///
    /// Returns `AutomataError::Configuration` for any other arity or a zero extent.
    pub fn from_dims(dims: &[usize]) -> Result<Self, AutomataError> {
        let size = match *dims {
            [w] => GridSize::Line(w),
            [h, w] => GridSize::Plane(h, w),
            _ => {
                return Err(AutomataError::Configuration(format!(
                    "grid size must have 1 or 2 extents, got {}",
                    dims.len()
                )))
            }
        };
        size.validate()?;
        Ok(size)
    }

    /// 1 for `Line`, 2 for `Plane`.
    pub fn dimensionality(&self) -> usize {
        match self {
            GridSize::Line(_) => 1,
            GridSize::Plane(..) => 2,
        }
    }

    pub fn width(&self) -> usize {
        match *self {
            GridSize::Line(w) | GridSize::Plane(_, w) => w,
        }
    }

    /// Number of rows. A line has exactly one.
    pub fn height(&self) -> usize {
        match *self {
            GridSize::Line(_) => 1,
            GridSize::Plane(h, _) => h,
        }
    }

    /// Extents in axis order, as they appear in a history shape.
    pub fn dims(&self) -> Vec<usize> {
        match *self {
            GridSize::Line(w) => vec![w],
            GridSize::Plane(h, w) => vec![h, w],
        }
    }

    /// Checks that every extent is positive and that the cell count fits in `usize`.
    pub fn validate(&self) -> Result<(), AutomataError> {
        self.cell_count().map(|_| ())
    }

    /// Total number of cells, validating the extents on the way.
    pub fn cell_count(&self) -> Result<usize, AutomataError> {
        let (h, w) = (self.height(), self.width());
        if h == 0 || w == 0 {
            return Err(AutomataError::Configuration(format!(
                "grid extents must be positive, got {self}"
            )));
        }
        h.checked_mul(w).ok_or_else(|| {
            AutomataError::Configuration(format!("grid of {self} cells overflows usize"))
        })
    }

    /// Centre cell as `(row, col)`, using `floor(extent / 2)` on each axis.
    pub fn center(&self) -> (usize, usize) {
        match *self {
            GridSize::Line(w) => (0, w / 2),
            GridSize::Plane(h, w) => (h / 2, w / 2),
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridSize::Line(w) => write!(f, "line {w}"),
            GridSize::Plane(h, w) => write!(f, "plane {h}x{w}"),
        }
    }
}

/// Cell storage: integer states or floating-point channel values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cells {
    Discrete(Vec<u8>),
    Continuous(Vec<f64>),
}

/// A grid of cell states at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct Grid {
    size: GridSize,
    channels: usize,
    cells: Cells,
}

/// Unvalidated wire form; deserialized grids pass through [`Grid::from_cells`].
#[derive(Deserialize)]
struct GridRepr {
    size: GridSize,
    channels: usize,
    cells: Cells,
}

impl TryFrom<GridRepr> for Grid {
    type Error = AutomataError;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        Grid::from_cells(repr.size, repr.channels, repr.cells)
    }
}

impl Grid {
    /// Creates a discrete grid with every cell in state 0.
    pub fn zeros(size: GridSize) -> Result<Self, AutomataError> {
        let len = size.cell_count()?;
        Ok(Self {
            size,
            channels: 1,
            cells: Cells::Discrete(vec![0; len]),
        })
    }

    /// Creates a continuous grid with `channels` zero-valued channels per cell.
    pub fn continuous(size: GridSize, channels: usize) -> Result<Self, AutomataError> {
        let len = size.cell_count()?;
        if channels == 0 {
            return Err(AutomataError::Configuration(
                "continuous grids need at least one channel".into(),
            ));
        }
        let total = len.checked_mul(channels).ok_or_else(|| {
            AutomataError::Configuration(format!("{channels} channels of {size} overflow usize"))
        })?;
        Ok(Self {
            size,
            channels,
            cells: Cells::Continuous(vec![0.0; total]),
        })
    }

    /// Wraps a row-major vector of discrete states.
    pub fn from_states(size: GridSize, states: Vec<u8>) -> Result<Self, AutomataError> {
        Self::from_cells(size, 1, Cells::Discrete(states))
    }

    /// Wraps a row-major, channel-interleaved vector of continuous values.
    ///
    /// Values are **not** clamped; rules are responsible for keeping them in [0, 1].
    pub fn from_values(
        size: GridSize,
        channels: usize,
        values: Vec<f64>,
    ) -> Result<Self, AutomataError> {
        Self::from_cells(size, channels, Cells::Continuous(values))
    }

    /// Validates and wraps raw cell storage.
    ///
    /// Discrete grids must have exactly one channel, and the storage length must
    /// equal `cell_count * channels`.
    pub fn from_cells(
        size: GridSize,
        channels: usize,
        cells: Cells,
    ) -> Result<Self, AutomataError> {
        let count = size.cell_count()?;
        let len = match &cells {
            Cells::Discrete(states) => {
                if channels != 1 {
                    return Err(AutomataError::Configuration(format!(
                        "discrete grids have exactly one channel, got {channels}"
                    )));
                }
                states.len()
            }
            Cells::Continuous(values) => {
                if channels == 0 {
                    return Err(AutomataError::Configuration(
                        "continuous grids need at least one channel".into(),
                    ));
                }
                values.len()
            }
        };
        if Some(len) != count.checked_mul(channels) {
            return Err(AutomataError::Configuration(format!(
                "{len} values do not fill {size} with {channels} channel(s)"
            )));
        }
        Ok(Self {
            size,
            channels,
            cells,
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn dimensionality(&self) -> usize {
        self.size.dimensionality()
    }

    pub fn width(&self) -> usize {
        self.size.width()
    }

    pub fn height(&self) -> usize {
        self.size.height()
    }

    /// Values per cell. Always 1 for discrete grids.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of spatial cells (not counting channels).
    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self.cells, Cells::Discrete(_))
    }

    /// Discrete states, or `None` for a continuous grid.
    pub fn states(&self) -> Option<&[u8]> {
        match &self.cells {
            Cells::Discrete(states) => Some(states),
            Cells::Continuous(_) => None,
        }
    }

    /// Continuous values (all channels interleaved), or `None` for a discrete grid.
    pub fn values(&self) -> Option<&[f64]> {
        match &self.cells {
            Cells::Discrete(_) => None,
            Cells::Continuous(values) => Some(values),
        }
    }

    /// Element type name as it appears in reports: `"u8"` or `"f64"`.
    pub fn dtype(&self) -> &'static str {
        match self.cells {
            Cells::Discrete(_) => "u8",
            Cells::Continuous(_) => "f64",
        }
    }

    /// Array shape: spatial extents, plus a trailing channel axis when there
    /// is more than one channel.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = self.size.dims();
        if self.channels > 1 {
            shape.push(self.channels);
        }
        shape
    }

    /// State at `(row, col)` of a discrete grid; `None` when out of bounds or continuous.
    pub fn state_at(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        self.states().map(|s| s[row * self.width() + col])
    }

    /// Value of `channel` at `(row, col)` as `f64`, for either cell family.
    pub fn value_at(&self, row: usize, col: usize, channel: usize) -> Option<f64> {
        if row >= self.height() || col >= self.width() || channel >= self.channels {
            return None;
        }
        let cell = row * self.width() + col;
        match &self.cells {
            Cells::Discrete(states) => Some(f64::from(states[cell])),
            Cells::Continuous(values) => Some(values[cell * self.channels + channel]),
        }
    }

    /// One channel as a dense row-major vector of `f64`.
    ///
    /// Channel 0 of a discrete grid is its states widened to `f64`.
    pub fn channel(&self, channel: usize) -> Result<Vec<f64>, AutomataError> {
        if channel >= self.channels {
            return Err(AutomataError::Configuration(format!(
                "channel {channel} out of range for grid with {} channel(s)",
                self.channels
            )));
        }
        Ok(match &self.cells {
            Cells::Discrete(states) => states.iter().map(|&s| f64::from(s)).collect(),
            Cells::Continuous(values) => values
                .iter()
                .skip(channel)
                .step_by(self.channels)
                .copied()
                .collect(),
        })
    }

    /// Projects one channel into a single-channel grid of the same family.
    pub fn project_channel(&self, channel: usize) -> Result<Grid, AutomataError> {
        if self.channels == 1 && channel == 0 {
            return Ok(self.clone());
        }
        Grid::from_values(self.size, 1, self.channel(channel)?)
    }

    /// Every stored value widened to `f64`.
    pub fn iter_f64(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match &self.cells {
            Cells::Discrete(states) => Box::new(states.iter().map(|&s| f64::from(s))),
            Cells::Continuous(values) => Box::new(values.iter().copied()),
        }
    }

    /// Same spatial size, channel count and cell family.
    pub fn is_congruent(&self, other: &Grid) -> bool {
        self.size == other.size
            && self.channels == other.channels
            && self.is_discrete() == other.is_discrete()
    }

    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self.cells {
            Cells::Discrete(_) => format!("discrete {}", self.size),
            Cells::Continuous(_) => format!(
                "continuous {} with {} channel(s)",
                self.size, self.channels
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- GridSize --

    #[test]
    fn from_dims_builds_line_and_plane() {
        assert_eq!(GridSize::from_dims(&[101]).unwrap(), GridSize::Line(101));
        assert_eq!(
            GridSize::from_dims(&[40, 50]).unwrap(),
            GridSize::Plane(40, 50)
        );
    }

    #[test]
    fn from_dims_rejects_bad_arity_and_zero() {
        assert!(matches!(
            GridSize::from_dims(&[]),
            Err(AutomataError::Configuration(_))
        ));
        assert!(GridSize::from_dims(&[2, 3, 4]).is_err());
        assert!(GridSize::from_dims(&[0]).is_err());
        assert!(GridSize::from_dims(&[5, 0]).is_err());
    }

    #[test]
    fn cell_count_detects_overflow() {
        assert!(GridSize::Plane(usize::MAX, 2).cell_count().is_err());
    }

    #[test]
    fn center_uses_floor_division() {
        assert_eq!(GridSize::Line(5).center(), (0, 2));
        assert_eq!(GridSize::Line(4).center(), (0, 2));
        assert_eq!(GridSize::Plane(7, 10).center(), (3, 5));
    }

    #[test]
    fn line_has_single_row() {
        let size = GridSize::Line(9);
        assert_eq!(size.height(), 1);
        assert_eq!(size.width(), 9);
        assert_eq!(size.dimensionality(), 1);
    }

    // -- Construction --

    #[test]
    fn zeros_creates_discrete_grid() {
        let grid = Grid::zeros(GridSize::Plane(3, 4)).unwrap();
        assert!(grid.is_discrete());
        assert_eq!(grid.channels(), 1);
        assert_eq!(grid.cell_count(), 12);
        assert!(grid.states().unwrap().iter().all(|&s| s == 0));
    }

    #[test]
    fn continuous_creates_interleaved_storage() {
        let grid = Grid::continuous(GridSize::Plane(2, 3), 2).unwrap();
        assert_eq!(grid.values().unwrap().len(), 12);
        assert_eq!(grid.shape(), vec![2, 3, 2]);
        assert_eq!(grid.dtype(), "f64");
    }

    #[test]
    fn continuous_rejects_zero_channels() {
        assert!(Grid::continuous(GridSize::Line(4), 0).is_err());
    }

    #[test]
    fn from_states_rejects_wrong_length() {
        let result = Grid::from_states(GridSize::Line(5), vec![0, 1, 0]);
        assert!(matches!(result, Err(AutomataError::Configuration(_))));
    }

    #[test]
    fn from_cells_rejects_multichannel_discrete() {
        let result = Grid::from_cells(GridSize::Line(2), 2, Cells::Discrete(vec![0; 4]));
        assert!(result.is_err());
    }

    // -- Access --

    #[test]
    fn state_at_reads_row_major() {
        let grid = Grid::from_states(GridSize::Plane(2, 3), vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(grid.state_at(0, 2), Some(2));
        assert_eq!(grid.state_at(1, 0), Some(3));
        assert_eq!(grid.state_at(2, 0), None);
    }

    #[test]
    fn value_at_reads_channels() {
        let grid =
            Grid::from_values(GridSize::Line(2), 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(grid.value_at(0, 1, 0), Some(0.3));
        assert_eq!(grid.value_at(0, 1, 1), Some(0.4));
        assert_eq!(grid.value_at(0, 1, 2), None);
        assert_eq!(grid.state_at(0, 0), None);
    }

    #[test]
    fn channel_extracts_every_nth_value() {
        let grid =
            Grid::from_values(GridSize::Line(3), 2, vec![1.0, 0.0, 0.5, 0.25, 0.0, 1.0]).unwrap();
        assert_eq!(grid.channel(0).unwrap(), vec![1.0, 0.5, 0.0]);
        assert_eq!(grid.channel(1).unwrap(), vec![0.0, 0.25, 1.0]);
        assert!(grid.channel(2).is_err());
    }

    #[test]
    fn project_channel_yields_single_channel_grid() {
        let grid =
            Grid::from_values(GridSize::Line(2), 2, vec![0.1, 0.9, 0.2, 0.8]).unwrap();
        let v = grid.project_channel(1).unwrap();
        assert_eq!(v.channels(), 1);
        assert_eq!(v.values().unwrap(), &[0.9, 0.8]);
    }

    #[test]
    fn shape_omits_single_channel_axis() {
        let grid = Grid::zeros(GridSize::Line(101)).unwrap();
        assert_eq!(grid.shape(), vec![101]);
        assert_eq!(grid.dtype(), "u8");
    }

    // -- Congruence --

    #[test]
    fn congruence_compares_size_channels_and_family() {
        let a = Grid::zeros(GridSize::Plane(4, 4)).unwrap();
        let b = Grid::zeros(GridSize::Plane(4, 4)).unwrap();
        let c = Grid::zeros(GridSize::Plane(4, 5)).unwrap();
        let d = Grid::continuous(GridSize::Plane(4, 4), 1).unwrap();
        assert!(a.is_congruent(&b));
        assert!(!a.is_congruent(&c));
        assert!(!a.is_congruent(&d));
    }

    // -- Serialization --

    #[test]
    fn json_round_trip_preserves_grid() {
        let grid = Grid::from_states(GridSize::Plane(2, 2), vec![1, 0, 2, 1]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(grid, restored);
    }

    #[test]
    fn deserialize_rejects_inconsistent_length() {
        let json = r#"{"size":{"line":4},"channels":1,"cells":{"discrete":[0,1]}}"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn channel_projection_covers_all_values(
                w in 1_usize..16,
                h in 1_usize..16,
                channels in 1_usize..4,
            ) {
                let size = GridSize::Plane(h, w);
                let n = w * h * channels;
                let values: Vec<f64> = (0..n).map(|i| i as f64 / n as f64).collect();
                let grid = Grid::from_values(size, channels, values.clone()).unwrap();
                let mut collected = 0;
                for c in 0..channels {
                    let ch = grid.channel(c).unwrap();
                    prop_assert_eq!(ch.len(), w * h);
                    collected += ch.len();
                }
                prop_assert_eq!(collected, values.len());
            }
        }
    }
}
