#![allow(clippy::let_and_return)]
#![allow(clippy::len_without_is_empty)]
#![warn(clippy::cast_lossless)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::todo)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::unimplemented)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::panic)]
#![allow(clippy::doc_markdown)]

//! # Overview
//! `speckle_stats_lib` computes per-pixel temporal statistics of a stack of speckle images,
//! all taken of the same scene with the same camera settings.
//!
//! For a stack of N equally-sized frames it produces:
//! * The **average image**: the per-pixel arithmetic mean over the stack.
//! * The **dispersion matrix**: the per-pixel population standard deviation over the stack.
//! * The **mean standard deviation**: the mean of the dispersion matrix over all pixels. A
//!   single number describing how much the speckle pattern fluctuates from frame to frame.
//! * The **correlation** between the average image and a reference image: a regularized
//!   normalized cross-correlation describing how similar the averaged pattern is to the
//!   reference pattern.
//!
//! # High Level API
//! ```rust
//! use ndarray::array;
//! use speckle_stats_lib::{ImageStack, SpeckleAnalysisBuilder};
//!
//! let stack = ImageStack::from_frames(vec![
//!     array![[1.0, 1.0], [1.0, 1.0]],
//!     array![[3.0, 3.0], [3.0, 3.0]],
//!     array![[2.0, 2.0], [2.0, 2.0]],
//! ])
//! .unwrap();
//! let reference = array![[2.0, 2.0], [2.0, 2.0]];
//!
//! let report = SpeckleAnalysisBuilder::default()
//!     .analyze(&stack, &reference)
//!     .unwrap();
//!
//! // every pixel takes the values 1, 3 and 2, so its standard deviation is sqrt(2/3).
//! approx::assert_abs_diff_eq!(report.mean_std_dev(), (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
//!
//! // the reference has no variance at all, so it does not correlate with anything.
//! assert_eq!(report.correlation(), 0.0);
//! ```
//!
//! To analyse image files on disk, use [`SpeckleAnalysisBuilder::analyze_dirs`] with a
//! directory of sample images and a reference image (or a directory holding one). Each image
//! is reduced to a single gray channel and cropped to the region of interest in
//! [`AnalysisOptions`] before any statistics are computed.
//!
//! The individual steps are also available as free functions: [`average`], [`dispersion`],
//! [`summarize`] and [`correlate`]. These work on any 2-D `ndarray` of a numeric pixel type,
//! and always do their arithmetic in `f64`.
//!
//! # Parallelism
//! With the default `parallel_loading` feature, images are decoded in parallel with rayon.
//! The `parallel_stats` feature additionally computes the dispersion matrix in parallel.
//! Results do not depend on either feature.

mod definitions;
mod stats;

pub use stats::{
    analysis::{AnalysisOptions, SpeckleAnalysisBuilder, SpeckleReport},
    correlation::correlate,
    dispersion::dispersion,
    image_stack::ImageStack,
    loader::{list_image_files, load_frame, load_reference, load_stack},
    summary::summarize,
    temporal_mean::average,
    Error, Intensity,
};

pub use definitions::{CORRELATION_REGULARIZATION, DEFAULT_ROI};

pub use speckle_common::{GrayImage16, Roi};

type StatsResult<T> = Result<T, crate::Error>;
