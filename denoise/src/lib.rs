//! denoise - Batch denoiser for physically based renders
//!
//! Removes Monte Carlo noise from a rendered colour image, optionally guided
//! by albedo, normal and depth buffers rendered alongside it.
//!
//! # Overview
//!
//! - [`RgbImage`], [`Rgb`], [`color`]: float RGB image types (re-exported)
//! - [`filter`]: the cross-bilateral filter and denoiser strategies
//! - [`io`]: PFM/PPM/PNG/TIFF decoding and encoding
//! - [`batch`]: the load → denoise → save job run by the `denoise` binary
//!
//! # Example
//!
//! ```
//! use denoise::filter::{CrossBilateralFilter, FilterParameters, Guides};
//! use denoise::{Rgb, RgbImage};
//!
//! let color = RgbImage::new_with_value(32, 32, Rgb::splat(0.5)).unwrap();
//! let filter = CrossBilateralFilter::new(FilterParameters::default());
//! let out = filter.denoise(&color, Guides::none()).unwrap();
//! assert_eq!(out.dimensions(), (32, 32));
//! ```

pub mod batch;

// Re-export core types (used everywhere)
pub use denoise_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use denoise_filter as filter;
pub use denoise_io as io;

pub use batch::BatchJob;
