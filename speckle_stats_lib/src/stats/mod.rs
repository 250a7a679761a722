pub mod analysis;
pub mod correlation;
pub mod dispersion;
pub mod image_stack;
pub mod loader;
pub mod summary;
pub mod temporal_mean;

use std::path::PathBuf;

use speckle_common::Roi;
use thiserror::Error;

/// A pixel value that the statistics can be computed over. All arithmetic is done in `f64`
/// regardless of the stored type, so integer stacks are never truncated or overflowed.
pub trait Intensity: Copy + Into<f64> + Send + Sync {
    fn to_f64(self) -> f64 {
        self.into()
    }
}

impl<T> Intensity for T where T: Copy + Into<f64> + Send + Sync {}

/// An error that prevented the speckle statistics from being computed.
///
/// Matrix dimensions are always reported as (rows, cols).
#[derive(Error, Debug)]
pub enum Error {
    #[error("matrix shapes differ: expected {expected:?}, actual {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error(
        "{} is {actual:?} (rows, cols) but the frames before it are {expected:?}",
        .path.display()
    )]
    FrameSizeMismatch {
        path: PathBuf,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("{0} is empty")]
    EmptyInput(&'static str),

    #[error("no images found in {}", .0.display())]
    NoImages(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to list {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to load image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "region of interest {roi} does not fit inside {} ({}x{})",
        .path.display(),
        .frame_res.0,
        .frame_res.1
    )]
    RoiOutOfBounds {
        roi: Roi,
        frame_res: (u32, u32),
        path: PathBuf,
    },
}

pub(crate) fn ensure_same_dim(expected: (usize, usize), actual: (usize, usize)) -> crate::StatsResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::ShapeMismatch { expected, actual })
    }
}
