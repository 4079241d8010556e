//! Edge-aware pixel weights
//!
//! The weight between a centre pixel and one of its neighbours is the
//! product of a spatial Gaussian and one similarity factor per guide
//! buffer:
//!
//! ```text
//! weight = exp(-s_pixel  * (dx² + dy²))
//!        * exp(-s_albedo * meanDiff(albedo)²)   if albedo is present
//!        * exp(-s_normal * meanDiff(normal)²)   if normal is present
//!        * exp(-s_depth  * meanDiff(depth)²)    if depth is present
//! ```
//!
//! `meanDiff` is the signed channel mean of `centre - neighbour`. A missing
//! guide contributes a factor of 1; it is never treated as zero data.

use crate::{FilterParameters, FilterResult, SpatialKernel};
use denoise_core::{Rgb, RgbImage};

/// Optional guide buffers for one filter invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct Guides<'a> {
    pub albedo: Option<&'a RgbImage>,
    pub normal: Option<&'a RgbImage>,
    pub depth: Option<&'a RgbImage>,
}

impl<'a> Guides<'a> {
    /// No guide buffers: the filter reduces to a spatial Gaussian
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_albedo(mut self, albedo: &'a RgbImage) -> Self {
        self.albedo = Some(albedo);
        self
    }

    pub fn with_normal(mut self, normal: &'a RgbImage) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_depth(mut self, depth: &'a RgbImage) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Number of guide buffers present
    pub fn count(&self) -> usize {
        [self.albedo, self.normal, self.depth]
            .iter()
            .filter(|g| g.is_some())
            .count()
    }

    /// Check that every present guide is `width` x `height`
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Core(IncompatibleSizes)` for the first
    /// mismatching buffer.
    pub fn check_dimensions(&self, width: u32, height: u32) -> FilterResult<()> {
        for guide in [self.albedo, self.normal, self.depth].into_iter().flatten() {
            guide.check_dimensions(width, height)?;
        }
        Ok(())
    }
}

/// Signed mean over channels of `a - b`
#[inline]
pub fn mean_diff(a: Rgb, b: Rgb) -> f32 {
    (a - b).average()
}

/// One similarity factor, `exp(-inv_sigma * meanDiff²)`
#[inline]
fn similarity(inv_sigma: f32, a: Rgb, b: Rgb) -> f32 {
    let d = mean_diff(a, b);
    (-inv_sigma * d * d).exp()
}

/// Guide samples at a centre pixel, cached while its window is visited
#[derive(Debug, Clone, Copy)]
pub struct CenterSample {
    pub x: u32,
    pub y: u32,
    albedo: Option<Rgb>,
    normal: Option<Rgb>,
    depth: Option<Rgb>,
}

/// Computes cross-bilateral weights for one image and guide set
#[derive(Debug, Clone, Copy)]
pub struct PixelWeight<'a> {
    params: FilterParameters,
    kernel: &'a SpatialKernel,
    guides: Guides<'a>,
    width: u32,
    height: u32,
}

impl<'a> PixelWeight<'a> {
    /// Bind parameters, spatial kernel and guides for a `width` x `height`
    /// image.
    ///
    /// # Errors
    ///
    /// Returns an error if a guide does not match the image dimensions or
    /// the kernel half-width differs from `params`.
    pub fn new(
        params: &FilterParameters,
        kernel: &'a SpatialKernel,
        guides: Guides<'a>,
        width: u32,
        height: u32,
    ) -> FilterResult<Self> {
        if kernel.half_width() != params.half_width {
            return Err(crate::FilterError::InvalidParameters(format!(
                "kernel half-width {} does not match parameters {}",
                kernel.half_width(),
                params.half_width
            )));
        }
        guides.check_dimensions(width, height)?;

        Ok(PixelWeight {
            params: *params,
            kernel,
            guides,
            width,
            height,
        })
    }

    /// Resolve the neighbour at offset `(dx, dy)` from `(x, y)`
    #[inline]
    pub fn neighbor(&self, x: u32, y: u32, dx: i32, dy: i32) -> (u32, u32) {
        let b = self.params.boundary;
        (b.resolve(x, dx, self.width), b.resolve(y, dy, self.height))
    }

    /// Sample the guides at the centre pixel `(x, y)`
    #[inline]
    pub fn center(&self, x: u32, y: u32) -> CenterSample {
        CenterSample {
            x,
            y,
            albedo: self.guides.albedo.map(|g| g.get_pixel_unchecked(x, y)),
            normal: self.guides.normal.map(|g| g.get_pixel_unchecked(x, y)),
            depth: self.guides.depth.map(|g| g.get_pixel_unchecked(x, y)),
        }
    }

    /// Weight between a cached centre and the resolved neighbour `(u, v)`
    /// reached through window offset `(dx, dy)`
    #[inline]
    pub fn weight_from(&self, center: &CenterSample, u: u32, v: u32, dx: i32, dy: i32) -> f32 {
        let mut weight = self.kernel.get(dx, dy);

        if let (Some(c), Some(g)) = (center.albedo, self.guides.albedo) {
            weight *= similarity(self.params.inv_sigma_albedo, c, g.get_pixel_unchecked(u, v));
        }
        if let (Some(c), Some(g)) = (center.normal, self.guides.normal) {
            weight *= similarity(self.params.inv_sigma_normal, c, g.get_pixel_unchecked(u, v));
        }
        if let (Some(c), Some(g)) = (center.depth, self.guides.depth) {
            weight *= similarity(self.params.inv_sigma_depth, c, g.get_pixel_unchecked(u, v));
        }

        weight
    }

    /// Weight between `(x, y)` and its neighbour at offset `(dx, dy)`
    pub fn weight(&self, x: u32, y: u32, dx: i32, dy: i32) -> f32 {
        let center = self.center(x, y);
        let (u, v) = self.neighbor(x, y, dx, dy);
        self.weight_from(&center, u, v, dx, dy)
    }
}
