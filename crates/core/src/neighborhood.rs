//! Neighbor counting and small wrapped convolutions.
//!
//! [`neighbor_counts`] sums the states of each cell's neighbors under a
//! [`Neighborhood`] pattern and a [`Boundary`] policy. [`Kernel3x3`] does the
//! same job for continuous grids with arbitrary weights on a torus.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AutomataError;
use crate::grid::{Grid, GridSize};

/// Adjacency pattern for 2-D grids.
///
/// On a 1-D grid both patterns reduce to the left and right neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// 8 neighbors: orthogonal and diagonal.
    #[default]
    Moore,
    /// 4 orthogonal neighbors.
    VonNeumann,
}

const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const VON_NEUMANN_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

const LINE_OFFSETS: [(isize, isize); 2] = [(0, -1), (0, 1)];

impl Neighborhood {
    /// Relative `(row, col)` offsets of the neighbors. The centre is excluded.
    pub fn offsets(&self) -> &'static [(isize, isize)] {
        match self {
            Neighborhood::Moore => &MOORE_OFFSETS,
            Neighborhood::VonNeumann => &VON_NEUMANN_OFFSETS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Neighborhood::Moore => "moore",
            Neighborhood::VonNeumann => "von_neumann",
        }
    }
}

impl FromStr for Neighborhood {
    type Err = AutomataError;

    /// Accepts `moore` and `von_neumann` in any case, with `-` or a space in
    /// place of the underscore.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace(|c: char| c == '-' || c == ' ', "_");
        match normalized.as_str() {
            "moore" => Ok(Neighborhood::Moore),
            "von_neumann" | "vonneumann" => Ok(Neighborhood::VonNeumann),
            _ => Err(AutomataError::Configuration(format!(
                "unsupported neighborhood '{s}' (expected moore or von_neumann)"
            ))),
        }
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treatment of neighbors that fall outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Toroidal: edges see cells from the opposite edge.
    #[default]
    Wrap,
    /// Cells outside the grid read as state 0.
    Fixed,
}

impl Boundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Boundary::Wrap => "wrap",
            Boundary::Fixed => "fixed",
        }
    }
}

impl FromStr for Boundary {
    type Err = AutomataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wrap" | "toroidal" => Ok(Boundary::Wrap),
            "fixed" | "fill" => Ok(Boundary::Fixed),
            _ => Err(AutomataError::Configuration(format!(
                "unsupported boundary '{s}' (expected wrap or fixed)"
            ))),
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-cell neighbor sums, laid out exactly like the grid they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborCounts {
    size: GridSize,
    counts: Vec<u32>,
}

impl NeighborCounts {
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Row-major sums.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.size.height() || col >= self.size.width() {
            return None;
        }
        Some(self.counts[row * self.size.width() + col])
    }
}

/// Sums the neighbor states of every cell of a discrete grid.
///
/// Returns `AutomataError::Configuration` for continuous grids.
pub fn neighbor_counts(
    grid: &Grid,
    pattern: Neighborhood,
    boundary: Boundary,
) -> Result<NeighborCounts, AutomataError> {
    let states = grid.states().ok_or_else(|| {
        AutomataError::Configuration(format!(
            "neighbor counts require a discrete grid, got {}",
            grid.describe()
        ))
    })?;
    let offsets: &[(isize, isize)] = match grid.size() {
        GridSize::Line(_) => &LINE_OFFSETS,
        GridSize::Plane(..) => pattern.offsets(),
    };
    let (h, w) = (grid.height(), grid.width());

    let counts = (0..h * w)
        .map(|i| {
            let (row, col) = (i / w, i % w);
            offsets
                .iter()
                .filter_map(|&(dr, dc)| neighbor_index(row, col, dr, dc, h, w, boundary))
                .map(|j| u32::from(states[j]))
                .sum()
        })
        .collect();

    Ok(NeighborCounts {
        size: grid.size(),
        counts,
    })
}

/// Flat index of the neighbor at `(row + dr, col + dc)`, or `None` when it falls
/// outside a fixed boundary.
fn neighbor_index(
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
    h: usize,
    w: usize,
    boundary: Boundary,
) -> Option<usize> {
    let r = row as isize + dr;
    let c = col as isize + dc;
    match boundary {
        Boundary::Wrap => {
            Some(r.rem_euclid(h as isize) as usize * w + c.rem_euclid(w as isize) as usize)
        }
        Boundary::Fixed => {
            if r < 0 || c < 0 || r >= h as isize || c >= w as isize {
                None
            } else {
                Some(r as usize * w + c as usize)
            }
        }
    }
}

/// A 3x3 stencil applied with toroidal wrapping.
///
/// Weights are indexed `[row offset + 1][col offset + 1]`. The stencil is applied
/// as a correlation, which equals convolution for the symmetric kernels used here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3x3(pub [[f64; 3]; 3]);

impl Kernel3x3 {
    /// Sum of all weights.
    pub fn weight_sum(&self) -> f64 {
        self.0.iter().flatten().sum()
    }

    /// Convolves one channel of `grid`, returning a row-major vector.
    ///
    /// A line is treated as a single-row torus.
    pub fn apply_wrapped(&self, grid: &Grid, channel: usize) -> Result<Vec<f64>, AutomataError> {
        let data = grid.channel(channel)?;
        Ok(self.convolve_wrapped(&data, grid.height(), grid.width()))
    }

    /// Convolves a dense row-major `height x width` slice.
    pub fn convolve_wrapped(&self, data: &[f64], height: usize, width: usize) -> Vec<f64> {
        let mut out = vec![0.0; height * width];
        for row in 0..height {
            let rows = [wrap(row, -1, height), row, wrap(row, 1, height)];
            for col in 0..width {
                let cols = [wrap(col, -1, width), col, wrap(col, 1, width)];
                let mut acc = 0.0;
                for (kr, &r) in rows.iter().enumerate() {
                    for (kc, &c) in cols.iter().enumerate() {
                        acc += self.0[kr][kc] * data[r * width + c];
                    }
                }
                out[row * width + col] = acc;
            }
        }
        out
    }
}

/// Toroidal coordinate wrap: `(coord + offset) mod size`.
fn wrap(coord: usize, offset: isize, size: usize) -> usize {
    ((coord as isize + offset).rem_euclid(size as isize)) as usize
}
