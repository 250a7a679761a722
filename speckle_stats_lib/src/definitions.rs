use speckle_common::Roi;

/// The region of interest applied to every loaded image unless another one is configured.
///
/// 180 columns by 150 rows with its top-left corner at column 1075, row 615, so source
/// images must be at least 1255x765 pixels. Pass `None` as the ROI to analyse whole frames.
pub const DEFAULT_ROI: Roi = Roi::new(1075, 615, 180, 150);

/// Added to the denominator of the correlation coefficient so that a reference or sample
/// image with zero variance yields 0 instead of a division by zero.
///
/// Because of this term the coefficient is not exactly a Pearson correlation: correlating an
/// image with itself gives `S / (S + 1)` where `S` is its summed squared deviation.
pub const CORRELATION_REGULARIZATION: f64 = 1.0;
