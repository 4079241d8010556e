//! denoise-filter - Denoising of rendered images
//!
//! This crate provides:
//!
//! - Edge-aware pixel weights driven by albedo, normal and depth guides
//! - The cross-bilateral filter, the in-process reference denoiser
//! - A strategy seam for swapping in an external accelerated denoiser
//!
//! # Example
//!
//! ```
//! use denoise_core::{Rgb, RgbImage};
//! use denoise_filter::{DenoiseOptions, DenoiseStrategy, Denoiser, Guides};
//!
//! let color = RgbImage::new_with_value(16, 16, Rgb::splat(1.0)).unwrap();
//! let albedo = RgbImage::new_with_value(16, 16, Rgb::splat(0.5)).unwrap();
//! let strategy = DenoiseStrategy::default();
//! let out = strategy
//!     .denoise(&color, Guides::none().with_albedo(&albedo), &DenoiseOptions::default())
//!     .unwrap();
//! assert_eq!(out.dimensions(), (16, 16));
//! ```

pub mod boundary;
pub mod cross_bilateral;
mod error;
pub mod kernel;
pub mod params;
pub mod strategy;
pub mod weight;

pub use boundary::BoundaryPolicy;
pub use cross_bilateral::{CrossBilateralFilter, cross_bilateral};
pub use error::{FilterError, FilterResult};
pub use kernel::SpatialKernel;
pub use params::{FilterParameters, MAX_HALF_WIDTH};
pub use strategy::{AcceleratedBackend, DenoiseOptions, DenoiseStrategy, Denoiser};
pub use weight::{Guides, PixelWeight, mean_diff};
