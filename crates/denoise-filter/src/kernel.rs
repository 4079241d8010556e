//! Spatial weight kernel
//!
//! The spatial factor of the cross-bilateral weight depends only on the
//! window offset, so it is tabulated once per filter invocation.

use crate::{FilterParameters, FilterResult};

/// Precomputed `exp(-inv_sigma_pixel * (dx² + dy²))` over the window
#[derive(Debug, Clone)]
pub struct SpatialKernel {
    /// Half-width of the window
    half_width: u32,
    /// Side length `2 * half_width + 1`
    size: u32,
    /// Kernel data (row-major order, centre at `(half_width, half_width)`)
    data: Vec<f32>,
}

impl SpatialKernel {
    /// Build the spatial kernel for `params`.
    pub fn new(params: &FilterParameters) -> FilterResult<Self> {
        params.validate()?;

        let hw = params.half_width as i32;
        let size = params.window_size();
        let mut data = Vec::with_capacity((size * size) as usize);
        for dy in -hw..=hw {
            for dx in -hw..=hw {
                let d2 = (dx * dx + dy * dy) as f32;
                data.push((-params.inv_sigma_pixel * d2).exp());
            }
        }

        Ok(SpatialKernel {
            half_width: params.half_width,
            size,
            data,
        })
    }

    /// Window half-width
    #[inline]
    pub fn half_width(&self) -> u32 {
        self.half_width
    }

    /// Window side length
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Kernel data in row-major order
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Weight for window offset `(dx, dy)`.
    ///
    /// Offsets outside the window have weight 0.
    #[inline]
    pub fn get(&self, dx: i32, dy: i32) -> f32 {
        let hw = self.half_width as i32;
        if dx.abs() > hw || dy.abs() > hw {
            return 0.0;
        }
        let idx = ((dy + hw) as u32 * self.size + (dx + hw) as u32) as usize;
        self.data[idx]
    }

    /// Sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}
