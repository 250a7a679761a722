use image::{DynamicImage, GenericImageView, GrayImage, ImageBuffer, Luma, SubImage};
use ndarray::Array2;

use crate::Crop;

/// A single-channel frame wide enough to hold both 8 and 16 bit mono camera output.
pub type GrayImage16 = ImageBuffer<Luma<u16>, Vec<u16>>;

/// An ordered, non-empty sequence of gray speckle frames.
#[derive(Debug, Clone)]
pub struct SpeckleFramesGray {
    frames: Vec<GrayImage16>,
}

impl SpeckleFramesGray {
    pub fn from_images(images: impl IntoIterator<Item = GrayImage16>) -> Option<Self> {
        let img_vec = images.into_iter().collect::<Vec<_>>();
        if img_vec.is_empty() {
            return None;
        }

        Some(Self { frames: img_vec })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// (width, height) of the first frame.
    pub fn dimensions(&self) -> (u32, u32) {
        self.frames[0].dimensions()
    }

    pub fn frames(&self) -> &[GrayImage16] {
        self.frames.as_slice()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<GrayImage16> {
        self.frames
    }

    /// Every frame converted into an intensity matrix. See [`SpeckleFrameExt::to_matrix`].
    pub fn to_matrices(&self) -> Vec<Array2<f64>> {
        self.frames.iter().map(|frame| frame.to_matrix()).collect()
    }
}

pub trait SpeckleFrameExt {
    type Item: GenericImageView<Pixel = Luma<u16>>;

    fn frame(&self) -> &Self::Item;

    fn cropped(&self, crop: Crop) -> SubImage<&Self::Item> {
        let (x, y, w, h) = crop.as_view_args();
        assert!(self.frame().dimensions() == crop.orig_res);
        self.frame().view(x, y, w, h)
    }

    /// Copy the frame into a matrix of shape (height, width), indexed `[row, col]` = `[y, x]`.
    fn to_matrix(&self) -> Array2<f64> {
        let frame = self.frame();
        let (width, height) = frame.dimensions();

        Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
            let Luma([pix]) = frame.get_pixel(col as u32, row as u32);
            f64::from(pix)
        })
    }
}

impl<T> SpeckleFrameExt for T
where
    T: GenericImageView<Pixel = Luma<u16>>,
{
    type Item = T;

    fn frame(&self) -> &Self::Item {
        self
    }
}

/// Reduce a decoded image to a single intensity channel without rescaling.
///
/// 8 bit images keep their 0..=255 values and 16 bit images keep 0..=65535. Colour images
/// are converted to luma at their own bit depth.
pub fn gray16_from_dynamic(img: DynamicImage) -> GrayImage16 {
    match img {
        DynamicImage::ImageLuma16(buf) => buf,
        DynamicImage::ImageLuma8(buf) => widen_gray(&buf),
        wide @ (DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_)) => wide.to_luma16(),
        other => widen_gray(&other.to_luma8()),
    }
}

fn widen_gray(img: &GrayImage) -> GrayImage16 {
    let mut ret = GrayImage16::new(img.width(), img.height());

    for (&mut Luma([ref mut dst_pix]), &Luma([src_pix])) in ret.pixels_mut().zip(img.pixels()) {
        *dst_pix = u16::from(src_pix);
    }

    ret
}

#[cfg(test)]
mod test {
    use image::{GrayImage, Rgb, RgbImage};
    use ndarray::array;

    use super::*;

    #[test]
    fn test_from_images_rejects_empty() {
        assert!(SpeckleFramesGray::from_images(vec![]).is_none());

        let frames = SpeckleFramesGray::from_images(vec![GrayImage16::new(3, 2)]).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames.dimensions(), (3, 2));
    }

    #[test]
    fn test_to_matrix_is_row_major() {
        #[rustfmt::skip]
        let pixs = vec![
            1, 2, 3,
            4, 5, 6,
        ];
        let img = GrayImage16::from_vec(3, 2, pixs).unwrap();

        let exp = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert_eq!(img.to_matrix(), exp);
    }

    #[test]
    fn test_cropped_to_matrix() {
        #[rustfmt::skip]
        let pixs = vec![
            0,  0,  0, 0,
            0, 10, 11, 0,
            0, 12, 13, 0,
        ];
        let img = GrayImage16::from_vec(4, 3, pixs).unwrap();
        let crop = Crop::try_from_topleft_and_dims((4, 3), 1, 1, 2, 2).unwrap();

        let exp = array![[10.0, 11.0], [12.0, 13.0]];
        assert_eq!(img.cropped(crop).to_matrix(), exp);
    }

    #[test]
    fn test_gray16_from_dynamic_keeps_8bit_range() {
        let img = GrayImage::from_vec(2, 1, vec![0, 255]).unwrap();
        let gray = gray16_from_dynamic(DynamicImage::ImageLuma8(img));
        assert_eq!(gray.into_raw(), vec![0, 255]);
    }

    #[test]
    fn test_gray16_from_dynamic_keeps_16bit_range() {
        let img = GrayImage16::from_vec(2, 1, vec![1000, 65535]).unwrap();
        let gray = gray16_from_dynamic(DynamicImage::ImageLuma16(img));
        assert_eq!(gray.into_raw(), vec![1000, 65535]);
    }

    #[test]
    fn test_gray16_from_dynamic_colour() {
        let img = RgbImage::from_pixel(1, 1, Rgb([200, 200, 200]));
        let gray = gray16_from_dynamic(DynamicImage::ImageRgb8(img));
        assert_eq!(gray.into_raw(), vec![200]);
    }
}
