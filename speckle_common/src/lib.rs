#![allow(clippy::let_and_return)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::dbg_macro)]

mod crop;
mod roi;
pub mod speckle_frames_gray;

pub use crop::Crop;
pub use roi::{Roi, RoiParseError};
pub use speckle_frames_gray::{gray16_from_dynamic, GrayImage16, SpeckleFrameExt, SpeckleFramesGray};
