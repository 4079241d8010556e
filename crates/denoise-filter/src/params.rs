//! Cross-bilateral filter parameters

use crate::{BoundaryPolicy, FilterError, FilterResult};

/// Largest accepted window half-width
pub const MAX_HALF_WIDTH: u32 = 64;

/// Parameters of the cross-bilateral filter
///
/// Each inverse sigma scales the squared difference in its domain before
/// exponentiation: larger values make the term more selective, zero
/// disables it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    /// Window half-width `w`; the window is `(2w+1) x (2w+1)`
    pub half_width: u32,
    /// Spatial term, applied to `di² + dj²`
    pub inv_sigma_pixel: f32,
    /// Albedo similarity term
    pub inv_sigma_albedo: f32,
    /// Normal similarity term
    pub inv_sigma_normal: f32,
    /// Depth similarity term
    pub inv_sigma_depth: f32,
    /// How the window is sampled past the image edges
    pub boundary: BoundaryPolicy,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            half_width: 3,
            inv_sigma_pixel: 0.1,
            inv_sigma_albedo: 10.0,
            inv_sigma_normal: 10.0,
            inv_sigma_depth: 10.0,
            boundary: BoundaryPolicy::Wrap,
        }
    }
}

impl FilterParameters {
    /// Parameters with every guide term disabled (pure spatial Gaussian)
    pub fn spatial_only(half_width: u32, inv_sigma_pixel: f32) -> Self {
        Self {
            half_width,
            inv_sigma_pixel,
            inv_sigma_albedo: 0.0,
            inv_sigma_normal: 0.0,
            inv_sigma_depth: 0.0,
            boundary: BoundaryPolicy::Wrap,
        }
    }

    pub fn with_half_width(mut self, half_width: u32) -> Self {
        self.half_width = half_width;
        self
    }

    pub fn with_inv_sigma_pixel(mut self, v: f32) -> Self {
        self.inv_sigma_pixel = v;
        self
    }

    pub fn with_inv_sigma_albedo(mut self, v: f32) -> Self {
        self.inv_sigma_albedo = v;
        self
    }

    pub fn with_inv_sigma_normal(mut self, v: f32) -> Self {
        self.inv_sigma_normal = v;
        self
    }

    pub fn with_inv_sigma_depth(mut self, v: f32) -> Self {
        self.inv_sigma_depth = v;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Window side length `2w + 1`
    #[inline]
    pub fn window_size(&self) -> u32 {
        2 * self.half_width + 1
    }

    /// Validate the parameters
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameters` if an inverse sigma is
    /// negative or not finite, or if the half-width exceeds
    /// [`MAX_HALF_WIDTH`].
    pub fn validate(&self) -> FilterResult<()> {
        if self.half_width > MAX_HALF_WIDTH {
            return Err(FilterError::InvalidParameters(format!(
                "half_width {} exceeds maximum {}",
                self.half_width, MAX_HALF_WIDTH
            )));
        }

        let sigmas = [
            ("inv_sigma_pixel", self.inv_sigma_pixel),
            ("inv_sigma_albedo", self.inv_sigma_albedo),
            ("inv_sigma_normal", self.inv_sigma_normal),
            ("inv_sigma_depth", self.inv_sigma_depth),
        ];
        for (name, value) in sigmas {
            if !value.is_finite() || value < 0.0 {
                return Err(FilterError::InvalidParameters(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
