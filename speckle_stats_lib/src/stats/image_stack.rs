use ndarray::{Array2, ArrayBase, Data, Ix2};
use speckle_common::SpeckleFramesGray;

use crate::stats::{ensure_same_dim, Error};
use crate::StatsResult;

/// Returns the shared (rows, cols) of every matrix in `stack`.
///
/// Fails with [`Error::EmptyInput`] for an empty stack and [`Error::ShapeMismatch`] at the
/// first matrix whose shape differs from the first one.
pub(crate) fn stack_dim<S>(stack: &[ArrayBase<S, Ix2>]) -> StatsResult<(usize, usize)>
where
    S: Data,
{
    let first = stack.first().ok_or(Error::EmptyInput("image stack"))?;
    let expected = first.dim();

    for frame in &stack[1..] {
        ensure_same_dim(expected, frame.dim())?;
    }

    Ok(expected)
}

/// An ordered, non-empty sequence of equally-shaped intensity matrices.
///
/// The shape invariant is checked once on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStack {
    frames: Vec<Array2<f64>>,
    dim: (usize, usize),
}

impl ImageStack {
    pub fn from_frames(frames: Vec<Array2<f64>>) -> StatsResult<Self> {
        let dim = stack_dim(&frames)?;
        Ok(Self { frames, dim })
    }

    pub fn from_gray_frames(frames: &SpeckleFramesGray) -> StatsResult<Self> {
        Self::from_frames(frames.to_matrices())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// (rows, cols) shared by every frame.
    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    pub fn frames(&self) -> &[Array2<f64>] {
        &self.frames
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Array2<f64>> {
        self.frames
    }
}
