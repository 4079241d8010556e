//! denoise-core - Basic data structures for render denoising
//!
//! This crate provides the data structures shared by the filter, I/O and
//! command-line crates:
//!
//! - [`Rgb`] - A floating-point colour (or guide) triple
//! - [`RgbImage`] - A 2D grid of [`Rgb`] values stored as interleaved `f32`
//! - [`color`] - sRGB transfer functions used when moving between 8-bit
//!   and linear floating-point data

pub mod error;
pub mod rgb;
pub mod rgb_image;

pub use error::{Error, Result};
pub use rgb::Rgb;
pub use rgb_image::RgbImage;

/// Colour transfer helpers.
///
/// Rendered images are linear; 8-bit files are sRGB encoded. Loaders
/// linearize 8-bit samples and writers re-encode before quantizing.
pub mod color {
    /// Convert an sRGB-encoded value in `[0, 1]` to linear light.
    #[inline]
    pub fn srgb_to_linear(v: f32) -> f32 {
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    }

    /// Convert a linear value to sRGB encoding.
    ///
    /// Values outside `[0, 1]` are clamped first.
    #[inline]
    pub fn linear_to_srgb(v: f32) -> f32 {
        let v = v.clamp(0.0, 1.0);
        if v <= 0.003_130_8 {
            v * 12.92
        } else {
            1.055 * v.powf(1.0 / 2.4) - 0.055
        }
    }

    /// Quantize a linear value to an sRGB-encoded byte.
    #[inline]
    pub fn linear_to_u8(v: f32) -> u8 {
        (linear_to_srgb(v) * 255.0 + 0.5) as u8
    }

    /// Expand an sRGB-encoded byte to linear light.
    #[inline]
    pub fn u8_to_linear(v: u8) -> f32 {
        srgb_to_linear(v as f32 / 255.0)
    }

    /// Expand an sRGB-encoded 16-bit sample to linear light.
    #[inline]
    pub fn u16_to_linear(v: u16) -> f32 {
        srgb_to_linear(v as f32 / 65535.0)
    }

}
