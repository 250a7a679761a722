use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Crop;

/// A region of interest, given as a top-left corner and a size in pixels.
///
/// Unlike [`Crop`] a `Roi` does not know the resolution of the frames it will be applied to.
/// Use [`Roi::to_crop`] once the frame resolution is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoiParseError {
    #[error("expected 4 comma separated values (x,y,width,height), got {0}")]
    WrongNumberOfFields(usize),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("region of interest must have a nonzero width and height")]
    Empty,
}

impl Roi {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Place this region inside a frame of resolution `orig_res` (width, height).
    /// Returns `None` if the region does not fit.
    #[must_use]
    pub fn to_crop(&self, orig_res: (u32, u32)) -> Option<Crop> {
        Crop::try_from_topleft_and_dims(orig_res, self.x, self.y, self.width, self.height)
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for Roi {
    type Err = RoiParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split(',').map(str::trim).collect::<Vec<_>>();
        let [x, y, width, height] = fields.as_slice() else {
            return Err(RoiParseError::WrongNumberOfFields(fields.len()));
        };

        let parse = |field: &str| {
            field
                .parse::<u32>()
                .map_err(|_| RoiParseError::InvalidNumber(field.to_string()))
        };

        let ret = Self::new(parse(x)?, parse(y)?, parse(width)?, parse(height)?);
        if ret.width == 0 || ret.height == 0 {
            return Err(RoiParseError::Empty);
        }

        Ok(ret)
    }
}
