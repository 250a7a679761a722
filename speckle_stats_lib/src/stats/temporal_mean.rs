use ndarray::{Array2, ArrayBase, Data, Ix2, Zip};

use crate::stats::{image_stack::stack_dim, Intensity};
use crate::StatsResult;

/// The per-pixel arithmetic mean of a stack of frames (the "average image").
///
/// Each frame is accumulated into an `f64` matrix, which is then divided by the number of
/// frames.
///
/// # Errors
/// * [`crate::Error::EmptyInput`] if `stack` is empty.
/// * [`crate::Error::ShapeMismatch`] if the frames are not all the same shape.
pub fn average<S, A>(stack: &[ArrayBase<S, Ix2>]) -> StatsResult<Array2<f64>>
where
    S: Data<Elem = A>,
    A: Intensity,
{
    let dim = stack_dim(stack)?;

    let mut sum = Array2::<f64>::zeros(dim);
    for frame in stack {
        Zip::from(&mut sum)
            .and(frame)
            .for_each(|acc, &pix| *acc += pix.to_f64());
    }

    let num_frames = stack.len() as f64;
    sum.mapv_inplace(|total| total / num_frames);

    Ok(sum)
}
