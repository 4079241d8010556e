//! Deterministic synthetic images for tests
//!
//! Rendered test scenes are replaced by simple procedural buffers: a scene
//! of flat-shaded regions with matching albedo/normal/depth guides, and
//! seeded noise standing in for Monte Carlo variance.

use denoise_core::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform image
pub fn uniform(width: u32, height: u32, value: Rgb) -> RgbImage {
    RgbImage::new_with_value(width, height, value).expect("valid dimensions")
}

/// Image whose pixels are all distinct: `(x + 1, y + 1, x * y)` scaled
pub fn distinct(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let i = (y * width + x) as f32;
        Rgb::new(0.1 * (x + 1) as f32, 0.05 * (y + 1) as f32, 0.01 * i)
    })
    .expect("valid dimensions")
}

/// Horizontal ramp from 0 to 1 in every channel
pub fn gradient(width: u32, height: u32) -> RgbImage {
    let denom = (width.max(2) - 1) as f32;
    RgbImage::from_fn(width, height, |x, _| Rgb::splat(x as f32 / denom))
        .expect("valid dimensions")
}

/// Checkerboard of `cell`-sized squares alternating between `a` and `b`
pub fn checkerboard(width: u32, height: u32, cell: u32, a: Rgb, b: Rgb) -> RgbImage {
    let cell = cell.max(1);
    RgbImage::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b }
    })
    .expect("valid dimensions")
}

/// Random values uniformly distributed in `[0, 1)`
pub fn random(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width as usize * height as usize * 3)
        .map(|_| rng.random::<f32>())
        .collect();
    RgbImage::from_data(width, height, data).expect("valid dimensions")
}

/// Add zero-mean Gaussian noise with standard deviation `sigma`
pub fn add_noise(img: &RgbImage, sigma: f32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = img.clone();
    for v in out.data_mut() {
        // Box-Muller
        let u1: f32 = rng.random_range(f32::EPSILON..1.0);
        let u2: f32 = rng.random();
        let n = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
        *v += sigma * n;
    }
    out
}

/// Buffers of a synthetic render: colour plus its three guides
pub struct SyntheticScene {
    pub color: RgbImage,
    pub albedo: RgbImage,
    pub normal: RgbImage,
    pub depth: RgbImage,
}

/// A floor and a raised square, flat shaded
///
/// The square covers the middle half of the image; its albedo, normal and
/// depth all differ from the floor so every guide carries the edge.
pub fn two_plane_scene(width: u32, height: u32) -> SyntheticScene {
    let inside = |x: u32, y: u32| {
        x >= width / 4 && x < 3 * width / 4 && y >= height / 4 && y < 3 * height / 4
    };
    let pick = |x: u32, y: u32, a: Rgb, b: Rgb| if inside(x, y) { a } else { b };

    let albedo = RgbImage::from_fn(width, height, |x, y| {
        pick(x, y, Rgb::new(0.8, 0.2, 0.2), Rgb::new(0.3, 0.3, 0.3))
    })
    .expect("valid dimensions");
    let normal = RgbImage::from_fn(width, height, |x, y| {
        pick(x, y, Rgb::new(0.0, 0.0, 1.0), Rgb::new(0.0, 1.0, 0.0))
    })
    .expect("valid dimensions");
    let depth = RgbImage::from_fn(width, height, |x, y| {
        pick(x, y, Rgb::splat(2.0), Rgb::splat(5.0))
    })
    .expect("valid dimensions");
    let color = RgbImage::from_fn(width, height, |x, y| {
        let a = albedo.get_pixel_unchecked(x, y);
        let shade = if inside(x, y) { 1.0 } else { 0.6 };
        a * shade
    })
    .expect("valid dimensions");

    SyntheticScene {
        color,
        albedo,
        normal,
        depth,
    }
}
