//! Whole-image helpers for `RgbImage`

use super::RgbImage;
use crate::error::Result;
use crate::rgb::Rgb;

impl RgbImage {
    /// Cyclically shift the image by (dx, dy)
    ///
    /// The pixel at (x, y) moves to `((x + dx) mod w, (y + dy) mod h)`.
    pub fn shifted(&self, dx: i32, dy: i32) -> RgbImage {
        let w = self.width() as i64;
        let h = self.height() as i64;
        let mut out = self.create_template();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let nx = (x as i64 + dx as i64).rem_euclid(w) as u32;
                let ny = (y as i64 + dy as i64).rem_euclid(h) as u32;
                out.set_pixel_unchecked(nx, ny, self.get_pixel_unchecked(x, y));
            }
        }
        out
    }

    /// Apply `f` to every channel of every pixel, returning a new image
    pub fn map_channels(&self, f: impl Fn(f32) -> f32) -> RgbImage {
        let mut out = self.clone();
        for v in out.data_mut() {
            *v = f(*v);
        }
        out
    }

    /// Minimum and maximum over all channels of all pixels
    pub fn min_max(&self) -> (f32, f32) {
        self.data()
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Per-channel mean over the whole image
    pub fn mean(&self) -> Rgb {
        let mut sum = [0.0f64; 3];
        for p in self.pixels() {
            sum[0] += p.r as f64;
            sum[1] += p.g as f64;
            sum[2] += p.b as f64;
        }
        let n = self.len() as f64;
        Rgb::new(
            (sum[0] / n) as f32,
            (sum[1] / n) as f32,
            (sum[2] / n) as f32,
        )
    }

    /// True if every sample is finite
    pub fn is_finite(&self) -> bool {
        self.data().iter().all(|v| v.is_finite())
    }

    /// Largest absolute per-channel difference to `other`
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompatibleSizes` if dimensions differ.
    pub fn max_abs_diff(&self, other: &RgbImage) -> Result<f32> {
        self.check_same_size(other)?;
        Ok(self
            .data()
            .iter()
            .zip(other.data())
            .fold(0.0f32, |acc, (&a, &b)| acc.max((a - b).abs())))
    }

    /// Root-mean-square difference to `other` over all channels
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompatibleSizes` if dimensions differ.
    pub fn rms_diff(&self, other: &RgbImage) -> Result<f32> {
        self.check_same_size(other)?;
        let sum: f64 = self
            .data()
            .iter()
            .zip(other.data())
            .map(|(&a, &b)| {
                let d = (a - b) as f64;
                d * d
            })
            .sum();
        Ok((sum / self.data().len() as f64).sqrt() as f32)
    }
}
