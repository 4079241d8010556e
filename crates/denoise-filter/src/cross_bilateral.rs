//! Cross-bilateral denoising filter
//!
//! An edge-aware smoothing filter for rendered images. Each output pixel is
//! a normalized weighted average of the colours in a `(2w+1) x (2w+1)`
//! window, where the weights come from [`PixelWeight`]: a spatial Gaussian
//! modulated by similarity in the albedo, normal and depth guide buffers.
//! Neighbours that differ in a guide (a geometric or texture edge) get
//! little weight, so edges survive while Monte Carlo noise is averaged out.
//!
//! # Algorithm
//!
//! For each pixel `(x, y)`:
//! - `cum_value  = Σ weight(dx, dy) * color[neighbour]`
//! - `cum_weight = Σ weight(dx, dy)`
//! - `out = cum_value / cum_weight`
//!
//! The centre sample always has weight 1, so `cum_weight >= 1` for finite
//! inputs. A zero or non-finite denominator is reported as
//! [`FilterError::DegenerateWeights`].
//!
//! Rows are filtered in parallel; each output pixel depends only on the
//! read-only inputs, so the result does not depend on scheduling.
//!
//! # Example
//!
//! ```
//! use denoise_core::{Rgb, RgbImage};
//! use denoise_filter::{CrossBilateralFilter, FilterParameters, Guides};
//!
//! let color = RgbImage::new_with_value(8, 8, Rgb::splat(0.5)).unwrap();
//! let filter = CrossBilateralFilter::new(FilterParameters::default());
//! let out = filter.denoise(&color, Guides::none()).unwrap();
//! assert_eq!(out.dimensions(), (8, 8));
//! ```

use crate::{FilterError, FilterParameters, FilterResult, Guides, PixelWeight, SpatialKernel};
use denoise_core::rgb_image::CHANNELS;
use denoise_core::{Rgb, RgbImage};
use log::debug;
use rayon::prelude::*;
use std::time::Instant;

/// Cross-bilateral filter with fixed parameters
#[derive(Debug, Clone, Default)]
pub struct CrossBilateralFilter {
    params: FilterParameters,
}

impl CrossBilateralFilter {
    /// Create a filter with the given parameters
    pub fn new(params: FilterParameters) -> Self {
        Self { params }
    }

    /// Filter parameters
    pub fn params(&self) -> &FilterParameters {
        &self.params
    }

    /// Denoise `color`, returning a new image of the same dimensions
    ///
    /// # Errors
    ///
    /// See [`CrossBilateralFilter::denoise_into`].
    pub fn denoise(&self, color: &RgbImage, guides: Guides<'_>) -> FilterResult<RgbImage> {
        let mut out = color.create_template();
        self.denoise_into(color, guides, &mut out)?;
        Ok(out)
    }

    /// Denoise `color` into the caller-supplied `out` buffer
    ///
    /// Inputs are only read; `out` is only written.
    ///
    /// # Errors
    ///
    /// - `FilterError::InvalidParameters` if the parameters do not validate
    /// - `FilterError::Core` if `out` or a guide differs in size from `color`
    /// - `FilterError::DegenerateWeights` if a pixel's weight sum is zero or
    ///   not finite (e.g. NaN or infinite guide data)
    pub fn denoise_into(
        &self,
        color: &RgbImage,
        guides: Guides<'_>,
        out: &mut RgbImage,
    ) -> FilterResult<()> {
        let (w, h) = color.dimensions();
        out.check_dimensions(w, h)?;

        let kernel = SpatialKernel::new(&self.params)?;
        let weights = PixelWeight::new(&self.params, &kernel, guides, w, h)?;

        debug!(
            "cross-bilateral: {}x{}, window {}x{}, {} guide(s), boundary {:?}",
            w,
            h,
            kernel.size(),
            kernel.size(),
            guides.count(),
            self.params.boundary
        );
        let start = Instant::now();

        let hw = self.params.half_width as i32;
        let stride = out.row_stride();
        out.data_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .try_for_each(|(y, row)| -> FilterResult<()> {
                let y = y as u32;
                for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                    let value = denoise_pixel(&weights, color, x as u32, y, hw)?;
                    px.copy_from_slice(&value.to_array());
                }
                Ok(())
            })?;

        debug!("cross-bilateral: done in {:.2?}", start.elapsed());
        Ok(())
    }
}

/// Weighted average over the window centred at `(x, y)`
#[inline]
fn denoise_pixel(
    weights: &PixelWeight<'_>,
    color: &RgbImage,
    x: u32,
    y: u32,
    hw: i32,
) -> FilterResult<Rgb> {
    let center = weights.center(x, y);

    let mut cum_value = Rgb::ZERO;
    let mut cum_weight = 0.0f32;

    for dy in -hw..=hw {
        for dx in -hw..=hw {
            let (u, v) = weights.neighbor(x, y, dx, dy);
            let weight = weights.weight_from(&center, u, v, dx, dy);
            cum_value += weight * color.get_pixel_unchecked(u, v);
            cum_weight += weight;
        }
    }

    if !(cum_weight.is_finite() && cum_weight > 0.0) {
        return Err(FilterError::DegenerateWeights {
            x,
            y,
            weight_sum: cum_weight,
        });
    }

    Ok(cum_value / cum_weight)
}

/// Apply the cross-bilateral filter with `params`
///
/// Convenience wrapper around [`CrossBilateralFilter::denoise`].
pub fn cross_bilateral(
    color: &RgbImage,
    guides: Guides<'_>,
    params: &FilterParameters,
) -> FilterResult<RgbImage> {
    CrossBilateralFilter::new(*params).denoise(color, guides)
}
