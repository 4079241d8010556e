//! RgbImage - Floating-point three-channel image
//!
//! `RgbImage` is the pixel container consumed and produced by the
//! denoisers. Colour, albedo, normal and depth buffers all use it.
//!
//! See [`ops`] for whole-image helpers (shifting, statistics, comparison).
//!
//! # Examples
//!
//! ```
//! use denoise_core::{Rgb, RgbImage};
//!
//! let mut img = RgbImage::new(64, 32).unwrap();
//! img.set_pixel(10, 20, Rgb::new(0.5, 0.25, 1.0)).unwrap();
//! assert_eq!(img.get_pixel(10, 20).unwrap(), Rgb::new(0.5, 0.25, 1.0));
//! assert_eq!(img.dimensions(), (64, 32));
//! ```

pub mod ops;

use crate::error::{Error, Result};
use crate::rgb::Rgb;

/// Number of interleaved channels per pixel
pub const CHANNELS: usize = 3;

/// Floating-point RGB image
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding, three interleaved
/// `f32` values per pixel. The pixel at (x, y) starts at index
/// `3 * (y * width + x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbImage {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Pixel data (row-major, interleaved, no padding)
    data: Vec<f32>,
}

impl RgbImage {
    /// Create a new image with all pixels set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, Rgb::ZERO)
    }

    /// Create a new image with all pixels set to `value`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new_with_value(width: u32, height: u32, value: Rgb) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let npix = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(npix * CHANNELS);
        for _ in 0..npix {
            data.extend_from_slice(&value.to_array());
        }

        Ok(RgbImage {
            width,
            height,
            data,
        })
    }

    /// Create an image from interleaved raw data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or the data length is not
    /// `3 * width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let expected = (width as usize) * (height as usize) * CHANNELS;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{}x{} = {}",
                data.len(),
                width,
                height,
                CHANNELS,
                expected
            )));
        }

        Ok(RgbImage {
            width,
            height,
            data,
        })
    }

    /// Create an image by evaluating `f(x, y)` at every pixel
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Rgb) -> Result<Self> {
        let mut img = RgbImage::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                img.set_pixel_unchecked(x, y, f(x, y));
            }
        }
        Ok(img)
    }

    /// Create a zeroed image with the same dimensions
    pub fn create_template(&self) -> RgbImage {
        RgbImage {
            width: self.width,
            height: self.height,
            data: vec![0.0; self.data.len()],
        }
    }

    /// Get the image width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the image dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels
    #[inline]
    pub fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Always false: images have at least one pixel
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * CHANNELS
    }

    /// Get the pixel at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Rgb> {
        self.check_bounds(x, y)?;
        Ok(self.get_pixel_unchecked(x, y))
    }

    /// Set the pixel at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: Rgb) -> Result<()> {
        self.check_bounds(x, y)?;
        self.set_pixel_unchecked(x, y, value);
        Ok(())
    }

    /// Get the pixel at (x, y) without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if the pixel lies past the end of the buffer.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> Rgb {
        let i = self.offset(x, y);
        Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Set the pixel at (x, y) without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if the pixel lies past the end of the buffer.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: Rgb) {
        let i = self.offset(x, y);
        self.data[i] = value.r;
        self.data[i + 1] = value.g;
        self.data[i + 2] = value.b;
    }

    /// Raw interleaved pixel data
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw interleaved pixel data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the image, returning its interleaved data
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Number of `f32` values in one row
    #[inline]
    pub fn row_stride(&self) -> usize {
        (self.width as usize) * CHANNELS
    }

    /// Get a row of interleaved data
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[f32] {
        let start = (y as usize) * self.row_stride();
        &self.data[start..start + self.row_stride()]
    }

    /// Get a mutable row of interleaved data
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [f32] {
        let stride = self.row_stride();
        let start = (y as usize) * stride;
        &mut self.data[start..start + stride]
    }

    /// Iterate over all pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
    }

    /// Set all pixels to `value`
    pub fn set_all(&mut self, value: Rgb) {
        for c in self.data.chunks_exact_mut(CHANNELS) {
            c.copy_from_slice(&value.to_array());
        }
    }

    /// Check that `other` has the same dimensions
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompatibleSizes` if dimensions differ.
    pub fn check_same_size(&self, other: &RgbImage) -> Result<()> {
        self.check_dimensions(other.width, other.height)
    }

    /// Check that this image is `width` x `height`
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompatibleSizes` if dimensions differ.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if self.width != width || self.height != height {
            return Err(Error::IncompatibleSizes(
                width,
                height,
                self.width,
                self.height,
            ));
        }
        Ok(())
    }

    #[inline]
    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
