use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    time::Instant,
};

use image::ImageFormat;
use log::{debug, info, trace};
#[cfg(feature = "parallel_loading")]
use rayon::prelude::*;
use speckle_common::{gray16_from_dynamic, GrayImage16, Roi, SpeckleFrameExt, SpeckleFramesGray};
use walkdir::WalkDir;

use crate::stats::Error;
use crate::StatsResult;

fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Every image file directly inside `dir`, sorted by file name.
///
/// Subdirectories, hidden files and files whose extension is not a known image format are
/// skipped.
pub fn list_image_files(dir: impl AsRef<Path>) -> StatsResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut ret = vec![];
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| Error::Walk {
            path: dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() || is_hidden(entry.file_name()) {
            continue;
        }

        if ImageFormat::from_path(entry.path()).is_err() {
            debug!(target: "loader", "skipping non-image file {}", entry.path().display());
            continue;
        }

        ret.push(entry.into_path());
    }

    Ok(ret)
}

/// Decode a single image as a gray frame, cropped to `roi` if one is given.
pub fn load_frame(path: impl AsRef<Path>, roi: Option<Roi>) -> StatsResult<GrayImage16> {
    let path = path.as_ref();
    debug!(target: "loader", "loading {}", path.display());

    let img = image::open(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let frame = gray16_from_dynamic(img);

    let Some(roi) = roi else {
        return Ok(frame);
    };

    let crop = roi
        .to_crop(frame.dimensions())
        .ok_or_else(|| Error::RoiOutOfBounds {
            roi,
            frame_res: frame.dimensions(),
            path: path.to_path_buf(),
        })?;

    Ok(frame.cropped(crop).to_image())
}

fn load_frames(paths: &[PathBuf], roi: Option<Roi>) -> StatsResult<Vec<GrayImage16>> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "parallel_loading")] {
            //collecting into a Result keeps the input order.
            return paths.par_iter().map(|path| load_frame(path, roi)).collect();
        } else {
            return paths.iter().map(|path| load_frame(path, roi)).collect();
        }
    }
}

fn are_all_frames_same_size<'a, T>(frames: T) -> StatsResult<()>
where
    T: Iterator<Item = (&'a PathBuf, &'a GrayImage16)>,
{
    use itertools::Itertools;

    //(rows, cols), to match the matrices the frames become
    let rows_cols = |f: &GrayImage16| (f.height() as usize, f.width() as usize);

    for ((_, f1), (path, f2)) in frames.tuple_windows::<(_, _)>() {
        if f1.dimensions() != f2.dimensions() {
            return Err(Error::FrameSizeMismatch {
                path: path.clone(),
                expected: rows_cols(f1),
                actual: rows_cols(f2),
            });
        }
    }

    Ok(())
}

/// Load every image in `dir` (in file name order) as a stack of gray frames, each cropped
/// to `roi` if one is given.
///
/// # Errors
/// * [`Error::NoImages`] if `dir` contains no image files.
/// * [`Error::FrameSizeMismatch`], naming the first file whose size differs from the one
///   before it, if the loaded frames are not all the same size.
/// * Any error from [`list_image_files`] or [`load_frame`].
pub fn load_stack(dir: impl AsRef<Path>, roi: Option<Roi>) -> StatsResult<SpeckleFramesGray> {
    let dir = dir.as_ref();
    let start = Instant::now();

    let paths = list_image_files(dir)?;
    if paths.is_empty() {
        return Err(Error::NoImages(dir.to_path_buf()));
    }

    let frames = load_frames(&paths, roi)?;
    are_all_frames_same_size(paths.iter().zip(frames.iter()))?;

    let frames =
        SpeckleFramesGray::from_images(frames).ok_or_else(|| Error::NoImages(dir.to_path_buf()))?;

    info!(target: "loader", "There are {} images in {}", frames.len(), dir.display());
    trace!(target: "loader", "loaded stack in {:.3}s", start.elapsed().as_secs_f64());

    Ok(frames)
}

/// Load the reference image. `path` is either an image file, or a directory whose first
/// image (in file name order) is used.
pub fn load_reference(path: impl AsRef<Path>, roi: Option<Roi>) -> StatsResult<GrayImage16> {
    let path = path.as_ref();

    if !path.is_dir() {
        return load_frame(path, roi);
    }

    let first = list_image_files(path)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoImages(path.to_path_buf()))?;

    info!(target: "loader", "Using {} as the reference image", first.display());
    load_frame(first, roi)
}
