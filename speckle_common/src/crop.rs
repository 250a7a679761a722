use serde::{Deserialize, Serialize};

/// A rectangle placed inside a frame of resolution `orig_res` (width, height), stored as the
/// number of pixels removed from each edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Crop {
    pub orig_res: (u32, u32),
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Crop {
    /// Place a `width` x `height` rectangle with its top-left corner at (`x`, `y`).
    ///
    /// Returns `None` if the rectangle is empty or any part of it lies outside the frame.
    #[must_use]
    pub fn try_from_topleft_and_dims(
        (orig_width, orig_height): (u32, u32),
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let right = orig_width.checked_sub(x)?.checked_sub(width)?;
        let bottom = orig_height.checked_sub(y)?.checked_sub(height)?;

        Some(Self {
            orig_res: (orig_width, orig_height),
            left: x,
            right,
            top: y,
            bottom,
        })
    }

    /// (x, y, width, height), in the order `GenericImageView::view` takes them.
    #[must_use]
    pub fn as_view_args(&self) -> (u32, u32, u32, u32) {
        (self.left, self.top, self.width(), self.height())
    }

    pub fn width(&self) -> u32 {
        self.orig_res.0 - (self.left + self.right)
    }

    pub fn height(&self) -> u32 {
        self.orig_res.1 - (self.top + self.bottom)
    }
}
