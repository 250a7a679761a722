use std::path::Path;

use log::{debug, info};
use ndarray::{Array2, ArrayBase, Data, Ix2};
use serde::Serialize;
use speckle_common::{Roi, SpeckleFrameExt};

use crate::definitions::DEFAULT_ROI;
use crate::stats::{
    correlation::correlate, dispersion::dispersion, image_stack::ImageStack, loader,
    summary::summarize, temporal_mean::average, Intensity,
};
use crate::StatsResult;

/// Options for how image files are turned into intensity matrices before the statistics are
/// computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// The region of every image (samples and reference alike) that is analysed. `None` uses
    /// the whole frame.
    ///
    /// Defaults to [`crate::DEFAULT_ROI`].
    pub roi: Option<Roi>,
}

impl std::default::Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            roi: Some(DEFAULT_ROI),
        }
    }
}

/// The two scalar results of analysing a stack, plus the per-pixel data they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeckleReport {
    num_images: usize,
    roi_dims: (usize, usize),
    mean_std_dev: f64,
    correlation: f64,

    #[serde(skip)]
    dispersion: Array2<f64>,
}

impl SpeckleReport {
    /// The number of frames in the analysed stack.
    pub fn num_images(&self) -> usize {
        self.num_images
    }

    /// (rows, cols) of the analysed region.
    pub fn roi_dims(&self) -> (usize, usize) {
        self.roi_dims
    }

    /// The mean over all pixels of the per-pixel temporal standard deviation.
    pub fn mean_std_dev(&self) -> f64 {
        self.mean_std_dev
    }

    /// The regularized correlation between the average image and the reference image.
    pub fn correlation(&self) -> f64 {
        self.correlation
    }

    /// The per-pixel temporal standard deviation.
    pub fn dispersion(&self) -> &Array2<f64> {
        &self.dispersion
    }
}

/// Runs the whole pipeline: average image, dispersion matrix, mean standard deviation, and
/// correlation with the reference.
///
/// Use [`SpeckleAnalysisBuilder::default`] unless a different region of interest is needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpeckleAnalysisBuilder {
    options: AnalysisOptions,
}

impl SpeckleAnalysisBuilder {
    /// Create an analysis builder with the selected [`AnalysisOptions`]
    pub fn from_options(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> AnalysisOptions {
        self.options
    }

    /// Analyse a stack that is already in memory. The region of interest is not applied here:
    /// `stack` and `reference` are used as they are.
    ///
    /// # Errors
    /// [`crate::Error::ShapeMismatch`] if `reference` does not have the shape of the stack's
    /// frames.
    pub fn analyze<T, B>(
        &self,
        stack: &ImageStack,
        reference: &ArrayBase<T, Ix2>,
    ) -> StatsResult<SpeckleReport>
    where
        T: Data<Elem = B>,
        B: Intensity,
    {
        let avg = average(stack.frames())?;
        let disp = dispersion(stack.frames(), &avg)?;
        let mean_std_dev = summarize(&disp)?;
        let correlation = correlate(&avg, reference)?;

        debug!(target: "analysis", "The average standard deviation is {mean_std_dev}");
        debug!(target: "analysis", "The correlation coefficient with the reference image is {correlation}");

        Ok(SpeckleReport {
            num_images: stack.len(),
            roi_dims: stack.dim(),
            mean_std_dev,
            correlation,
            dispersion: disp,
        })
    }

    /// Load every image in `samples_dir` and the reference image at `reference_path`, crop
    /// them to the region of interest, and analyse them.
    ///
    /// `reference_path` may be an image file or a directory, in which case its first image
    /// is used.
    pub fn analyze_dirs(
        &self,
        samples_dir: impl AsRef<Path>,
        reference_path: impl AsRef<Path>,
    ) -> StatsResult<SpeckleReport> {
        let roi = self.options.roi;

        let samples = loader::load_stack(samples_dir, roi)?;
        let stack = ImageStack::from_gray_frames(&samples)?;

        let (rows, cols) = stack.dim();
        info!(target: "analysis", "Region of interest is {rows} rows by {cols} columns");

        let reference = loader::load_reference(reference_path, roi)?.to_matrix();

        self.analyze(&stack, &reference)
    }
}
