use ndarray::{Array2, ArrayBase, Data, Ix2, Zip};

use crate::stats::{ensure_same_dim, image_stack::stack_dim, Intensity};
use crate::StatsResult;

/// The per-pixel standard deviation of `stack` around `average` (the "dispersion matrix").
///
/// For every pixel `(i, j)` this is `sqrt(sum_k (stack[k][i, j] - average[i, j])^2 / N)`. The
/// divisor is the number of frames `N`, not `N - 1`: this is the population standard deviation.
/// A single-frame stack therefore has an all-zero dispersion matrix.
///
/// `average` is normally the output of [`crate::average`] for the same stack.
///
/// # Errors
/// * [`crate::Error::EmptyInput`] if `stack` is empty.
/// * [`crate::Error::ShapeMismatch`] if the frames differ in shape, or `average` does not
///   have the frames' shape.
pub fn dispersion<S, A, T>(
    stack: &[ArrayBase<S, Ix2>],
    average: &ArrayBase<T, Ix2>,
) -> StatsResult<Array2<f64>>
where
    S: Data<Elem = A> + Sync,
    A: Intensity,
    T: Data<Elem = f64> + Sync,
{
    let dim = stack_dim(stack)?;
    ensure_same_dim(dim, average.dim())?;

    cfg_if::cfg_if! {
        if #[cfg(feature = "parallel_stats")] {
            return Ok(dispersion_par(stack, average, dim));
        } else {
            return Ok(dispersion_serial(stack, average, dim));
        }
    }
}

//accumulate the squared deviations one frame at a time, in stack order.
#[cfg_attr(feature = "parallel_stats", allow(dead_code))]
fn dispersion_serial<S, A, T>(
    stack: &[ArrayBase<S, Ix2>],
    average: &ArrayBase<T, Ix2>,
    dim: (usize, usize),
) -> Array2<f64>
where
    S: Data<Elem = A>,
    A: Intensity,
    T: Data<Elem = f64>,
{
    let num_frames = stack.len() as f64;

    let mut ret = Array2::<f64>::zeros(dim);
    for frame in stack {
        Zip::from(&mut ret)
            .and(frame)
            .and(average)
            .for_each(|acc, &pix, &mean| {
                let dev = pix.to_f64() - mean;
                *acc += dev * dev;
            });
    }
    ret.mapv_inplace(|sum_sq| (sum_sq / num_frames).sqrt());

    ret
}

//every output pixel is independent: reduce along the temporal axis inside each pixel,
//then write the pixel once.
#[cfg(feature = "parallel_stats")]
fn dispersion_par<S, A, T>(
    stack: &[ArrayBase<S, Ix2>],
    average: &ArrayBase<T, Ix2>,
    dim: (usize, usize),
) -> Array2<f64>
where
    S: Data<Elem = A> + Sync,
    A: Intensity,
    T: Data<Elem = f64> + Sync,
{
    let num_frames = stack.len() as f64;

    let mut ret = Array2::<f64>::zeros(dim);
    Zip::indexed(&mut ret)
        .and(average)
        .par_for_each(|(row, col), out, &mean| {
            let sum_sq = stack.iter().fold(0.0, |acc, frame| {
                let dev = frame[[row, col]].to_f64() - mean;
                acc + dev * dev
            });
            *out = (sum_sq / num_frames).sqrt();
        });

    ret
}
