//! Recorded evolution of a grid: frame 0 is the initial grid, frame `i` the
//! grid after `i` steps.

use serde::{Deserialize, Serialize};

use crate::error::AutomataError;
use crate::grid::Grid;

/// A non-empty sequence of congruent grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Grid>", into = "Vec<Grid>")]
pub struct History {
    frames: Vec<Grid>,
}

impl TryFrom<Vec<Grid>> for History {
    type Error = AutomataError;

    fn try_from(frames: Vec<Grid>) -> Result<Self, Self::Error> {
        History::from_frames(frames)
    }
}

impl From<History> for Vec<Grid> {
    fn from(history: History) -> Self {
        history.frames
    }
}

impl History {
    /// Validates that `frames` is non-empty and every frame is congruent with
    /// the first.
    pub fn from_frames(frames: Vec<Grid>) -> Result<Self, AutomataError> {
        let first = frames.first().ok_or_else(|| {
            AutomataError::Configuration("a history needs at least one frame".into())
        })?;
        if let Some((i, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| !f.is_congruent(first))
        {
            return Err(AutomataError::Configuration(format!(
                "frame {i} is {} but frame 0 is {}",
                frame.describe(),
                first.describe()
            )));
        }
        Ok(Self { frames })
    }

    /// Starts a history at `initial`. Used by the engine while recording.
    pub(crate) fn starting_at(initial: Grid) -> Self {
        Self {
            frames: vec![initial],
        }
    }

    /// Appends a frame. The engine only pushes congruent grids.
    pub(crate) fn push(&mut self, frame: Grid) {
        debug_assert!(frame.is_congruent(&self.frames[0]));
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[Grid] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Grid> {
        self.frames
    }

    /// Number of frames, i.e. `steps + 1`.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Grid> {
        self.frames.get(index)
    }

    pub fn first(&self) -> &Grid {
        &self.frames[0]
    }

    pub fn last(&self) -> &Grid {
        &self.frames[self.frames.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Grid> {
        self.frames.iter()
    }

    /// `(frames, ...spatial extents..., [channels])`.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = vec![self.frames.len()];
        shape.extend(self.first().shape());
        shape
    }

    pub fn dtype(&self) -> &'static str {
        self.first().dtype()
    }

    /// Projects every frame onto one channel.
    pub fn project_channel(&self, channel: usize) -> Result<History, AutomataError> {
        let frames = self
            .frames
            .iter()
            .map(|f| f.project_channel(channel))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(History { frames })
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Grid;
    type IntoIter = std::slice::Iter<'a, Grid>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
