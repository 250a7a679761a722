use ndarray::{ArrayBase, Data, Ix2, Zip};

use crate::definitions::CORRELATION_REGULARIZATION;
use crate::stats::{ensure_same_dim, Error, Intensity};
use crate::StatsResult;

/// Running sums of the mean-centred products of two images.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CrossSums {
    sample_ref: f64,
    sample_sample: f64,
    ref_ref: f64,
}

impl CrossSums {
    fn add(self, sample_dev: f64, ref_dev: f64) -> Self {
        Self {
            sample_ref: self.sample_ref + sample_dev * ref_dev,
            sample_sample: self.sample_sample + sample_dev * sample_dev,
            ref_ref: self.ref_ref + ref_dev * ref_dev,
        }
    }

    fn coefficient(&self) -> f64 {
        self.sample_ref / ((self.sample_sample * self.ref_ref).sqrt() + CORRELATION_REGULARIZATION)
    }
}

fn mean<S, A>(matrix: &ArrayBase<S, Ix2>) -> f64
where
    S: Data<Elem = A>,
    A: Intensity,
{
    let sum: f64 = matrix.iter().map(|&pix| pix.to_f64()).sum();
    sum / matrix.len() as f64
}

/// The regularized normalized cross-correlation between the average image and a reference image.
///
/// With `a` and `r` the mean-centred pixels of `average` and `reference`:
///
/// ```text
///            sum(a * r)
/// rho = ---------------------------------
///       sqrt(sum(a * a) * sum(r * r)) + 1
/// ```
///
/// The `+ 1` in the denominator ([`crate::CORRELATION_REGULARIZATION`]) keeps the result finite
/// when either image has zero variance, in which case the result is exactly 0. It also means
/// the result is slightly smaller in magnitude than the Pearson correlation.
///
/// # Errors
/// * [`crate::Error::ShapeMismatch`] if the two images differ in shape.
/// * [`crate::Error::EmptyInput`] if the images contain no pixels.
pub fn correlate<S, A, T, B>(
    average: &ArrayBase<S, Ix2>,
    reference: &ArrayBase<T, Ix2>,
) -> StatsResult<f64>
where
    S: Data<Elem = A>,
    A: Intensity,
    T: Data<Elem = B>,
    B: Intensity,
{
    ensure_same_dim(average.dim(), reference.dim())?;
    if average.is_empty() {
        return Err(Error::EmptyInput("average image"));
    }

    let mean_avg = mean(average);
    let mean_ref = mean(reference);

    let sums = Zip::from(average)
        .and(reference)
        .fold(CrossSums::default(), |acc, &avg_pix, &ref_pix| {
            acc.add(avg_pix.to_f64() - mean_avg, ref_pix.to_f64() - mean_ref)
        });

    Ok(sums.coefficient())
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    use super::*;

    #[test]
    fn test_zero_variance_reference_is_exactly_zero() {
        let avg = array![[2.0, 2.0], [2.0, 2.0]];
        let reference = array![[2u8, 2], [2, 2]];

        assert_eq!(correlate(&avg, &reference).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_variance_sample_is_exactly_zero() {
        let avg = array![[7.0, 7.0, 7.0]];
        let reference = array![[1.0, 50.0, 3.0]];

        assert_eq!(correlate(&avg, &reference).unwrap(), 0.0);
    }

    #[test]
    fn test_self_correlation_is_regularized() {
        //deviations from the mean 2.5 are -1.5, -0.5, 0.5, 1.5, summing squares to 5.
        let m = array![[1.0, 2.0], [3.0, 4.0]];
        let rho = correlate(&m, &m).unwrap();

        assert_abs_diff_eq!(rho, 5.0 / 6.0, epsilon = 1e-12);
        assert!(rho < 1.0);
    }

    #[test]
    fn test_anticorrelation() {
        let avg = array![[1.0, 2.0], [3.0, 4.0]];
        let reference = array![[4.0, 3.0], [2.0, 1.0]];
        let rho = correlate(&avg, &reference).unwrap();

        assert_abs_diff_eq!(rho, -5.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_offset_does_not_matter() {
        let avg = array![[10.0, 20.0, 30.0]];
        let reference = array![[110u16, 120, 130]];

        let rho_offset = correlate(&avg, &reference).unwrap();
        let rho_self = correlate(&avg, &avg).unwrap();

        assert_abs_diff_eq!(rho_offset, rho_self, epsilon = 1e-12);
    }

    #[test]
    fn test_correlate_shape_mismatch() {
        let avg = Array2::<f64>::zeros((2, 2));
        let reference = Array2::<f64>::zeros((2, 1));

        assert!(matches!(
            correlate(&avg, &reference),
            Err(Error::ShapeMismatch {
                expected: (2, 2),
                actual: (2, 1)
            })
        ));
    }

    #[test]
    fn test_correlate_empty() {
        let avg = Array2::<f64>::zeros((0, 3));
        let reference = Array2::<f64>::zeros((0, 3));

        assert!(matches!(
            correlate(&avg, &reference),
            Err(Error::EmptyInput(_))
        ));
    }
}
