use ndarray::{ArrayBase, Data, Ix2};

use crate::stats::Error;
use crate::StatsResult;

/// The mean over every element of a dispersion matrix (the "average standard deviation").
///
/// # Errors
/// [`crate::Error::EmptyInput`] if the matrix has no elements.
pub fn summarize<S>(dispersion: &ArrayBase<S, Ix2>) -> StatsResult<f64>
where
    S: Data<Elem = f64>,
{
    dispersion
        .mean()
        .ok_or(Error::EmptyInput("dispersion matrix"))
}

#[cfg(test)]
mod test {
    use ndarray::{array, Array2};

    use super::*;

    #[test]
    fn test_summarize() {
        let disp = array![[0.0, 1.0], [2.0, 5.0]];
        assert_eq!(summarize(&disp).unwrap(), 2.0);
    }

    #[test]
    fn test_summarize_empty() {
        let disp = Array2::<f64>::zeros((3, 0));
        assert!(matches!(summarize(&disp), Err(Error::EmptyInput(_))));
    }
}
