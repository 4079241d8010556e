//! Cross-bilateral filter regression test
//!
//! Checks the filter's observable properties on synthetic buffers:
//!   (1) constant images are fixed points, with or without guides
//!   (2) zero guide bandwidths reduce it to a normalized spatial Gaussian
//!   (3) under wrap boundaries it commutes with cyclic shifts
//!   (4) guides keep edges that the spatial term alone blurs away
//!   (5) the strategy wrapper is interchangeable with the bare filter

use denoise_core::{Rgb, RgbImage};
use denoise_filter::{
    BoundaryPolicy, CrossBilateralFilter, DenoiseOptions, DenoiseStrategy, Denoiser, FilterError,
    FilterParameters, Guides, PixelWeight, SpatialKernel,
};
use denoise_test::{RegParams, generators};

/// Reference spatial-only filter written directly from the weight formula
fn gaussian_reference(img: &RgbImage, half_width: i32, inv_sigma_pixel: f32) -> RgbImage {
    let (w, h) = (img.width() as i32, img.height() as i32);
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let mut sum = Rgb::ZERO;
        let mut wsum = 0.0f32;
        for dy in -half_width..=half_width {
            for dx in -half_width..=half_width {
                let u = (x as i32 + dx).rem_euclid(w) as u32;
                let v = (y as i32 + dy).rem_euclid(h) as u32;
                let wt = (-inv_sigma_pixel * (dx * dx + dy * dy) as f32).exp();
                sum += wt * img.get_pixel_unchecked(u, v);
                wsum += wt;
            }
        }
        sum / wsum
    })
    .unwrap()
}

/// Mean colour error restricted to pixels within `margin` of the square edge
fn edge_error(out: &RgbImage, clean: &RgbImage, margin: u32) -> f32 {
    let (w, h) = out.dimensions();
    let (x0, x1) = (w / 4, 3 * w / 4);
    let mut sum = 0.0f32;
    let mut n = 0;
    for y in h / 4..3 * h / 4 {
        for x in 0..w {
            let near = x.abs_diff(x0) <= margin || x.abs_diff(x1) <= margin;
            if near {
                let d = out.get_pixel_unchecked(x, y) - clean.get_pixel_unchecked(x, y);
                sum += d.r.abs() + d.g.abs() + d.b.abs();
                n += 1;
            }
        }
    }
    sum / n as f32
}

// ============================================================================
// Fixed points and shape
// ============================================================================

#[test]
fn cross_bilateral_constant_reg() {
    let mut rp = RegParams::new("cb_constant");

    let value = Rgb::new(0.25, 0.5, 1.5);
    let color = generators::uniform(40, 30, value);
    let albedo = generators::random(40, 30, 1);
    let normal = generators::random(40, 30, 2);
    let depth = generators::random(40, 30, 3);

    let guide_sets = [
        Guides::none(),
        Guides::none().with_albedo(&albedo),
        Guides::none().with_normal(&normal).with_depth(&depth),
        Guides::none()
            .with_albedo(&albedo)
            .with_normal(&normal)
            .with_depth(&depth),
    ];

    for boundary in [BoundaryPolicy::Wrap, BoundaryPolicy::Clamp, BoundaryPolicy::Mirror] {
        let filter =
            CrossBilateralFilter::new(FilterParameters::default().with_boundary(boundary));
        for guides in guide_sets {
            let out = filter.denoise(&color, guides).unwrap();
            rp.compare_values(40.0, out.width() as f64, 0.0);
            rp.compare_values(30.0, out.height() as f64, 0.0);
            rp.compare_images(&color, &out, 1e-5);
        }
    }

    assert!(rp.cleanup(), "cb_constant regression test failed");
}

#[test]
fn cross_bilateral_weights_positive_reg() {
    let mut rp = RegParams::new("cb_weights");

    let scene = generators::two_plane_scene(24, 24);
    let params = FilterParameters::default();
    let kernel = SpatialKernel::new(&params).unwrap();
    let guides = Guides::none()
        .with_albedo(&scene.albedo)
        .with_normal(&scene.normal)
        .with_depth(&scene.depth);
    let weights = PixelWeight::new(&params, &kernel, guides, 24, 24).unwrap();

    let hw = params.half_width as i32;
    let mut min_weight = f32::INFINITY;
    let mut max_weight = 0.0f32;
    for (x, y) in [(0, 0), (5, 5), (6, 6), (12, 12), (17, 17), (23, 23)] {
        for dy in -hw..=hw {
            for dx in -hw..=hw {
                let wt = weights.weight(x, y, dx, dy);
                min_weight = min_weight.min(wt);
                max_weight = max_weight.max(wt);
            }
        }
        // The centre weight is exactly 1 (zero distance, identical guides)
        rp.compare_values(1.0, weights.weight(x, y, 0, 0) as f64, 0.0);
    }
    rp.compare_values(1.0, (min_weight > 0.0) as u8 as f64, 0.0);
    rp.compare_values(1.0, max_weight as f64, 0.0);

    assert!(rp.cleanup(), "cb_weights regression test failed");
}

#[test]
fn cross_bilateral_convex_reg() {
    let mut rp = RegParams::new("cb_convex");

    let checker = generators::checkerboard(30, 20, 3, Rgb::splat(0.1), Rgb::new(0.9, 0.5, 0.2));
    let ramp = generators::gradient(30, 20);
    let albedo = generators::random(30, 20, 21);

    for img in [&checker, &ramp] {
        // Outputs are convex combinations of inputs
        let (lo, hi) = img.min_max();
        let out = CrossBilateralFilter::default()
            .denoise(img, Guides::none().with_albedo(&albedo))
            .unwrap();
        let (out_lo, out_hi) = out.min_max();
        rp.compare_values(1.0, (out_lo >= lo - 1e-6) as u8 as f64, 0.0);
        rp.compare_values(1.0, (out_hi <= hi + 1e-6) as u8 as f64, 0.0);

        // A spatial-only kernel under wrap is circulant and keeps the mean
        let blurred = CrossBilateralFilter::new(FilterParameters::spatial_only(3, 0.1))
            .denoise(img, Guides::none())
            .unwrap();
        let (m0, m1) = (img.mean(), blurred.mean());
        rp.compare_values(m0.r as f64, m1.r as f64, 1e-4);
        rp.compare_values(m0.g as f64, m1.g as f64, 1e-4);
        rp.compare_values(m0.b as f64, m1.b as f64, 1e-4);
    }

    assert!(rp.cleanup(), "cb_convex regression test failed");
}

// ============================================================================
// Reduction to a spatial Gaussian
// ============================================================================

#[test]
fn cross_bilateral_spatial_reduction_reg() {
    let mut rp = RegParams::new("cb_spatial");

    let color = generators::random(23, 17, 11);
    let albedo = generators::random(23, 17, 12);
    let normal = generators::random(23, 17, 13);
    let depth = generators::random(23, 17, 14);

    for (hw, inv_sigma) in [(1, 0.1f32), (3, 0.1), (4, 0.5), (2, 0.0)] {
        let expected = gaussian_reference(&color, hw, inv_sigma);

        let params = FilterParameters::spatial_only(hw as u32, inv_sigma);
        let filter = CrossBilateralFilter::new(params);

        // Zero guide bandwidths make every guide irrelevant
        let guided = filter
            .denoise(
                &color,
                Guides::none()
                    .with_albedo(&albedo)
                    .with_normal(&normal)
                    .with_depth(&depth),
            )
            .unwrap();
        let unguided = filter.denoise(&color, Guides::none()).unwrap();

        rp.compare_images(&expected, &guided, 1e-5);
        rp.compare_images(&expected, &unguided, 1e-5);
        rp.compare_images(&guided, &unguided, 0.0);
    }

    assert!(rp.cleanup(), "cb_spatial regression test failed");
}

#[test]
fn cross_bilateral_hand_computed_reg() {
    let mut rp = RegParams::new("cb_hand");

    // 4x4 image, half-width 1, no guides: each output pixel is the weighted
    // mean of its 3x3 neighbourhood. Every channel holds a different ramp.
    let value = |i: u32| {
        let i = i as f32;
        Rgb::new(i, 2.0 * i + 1.0, 0.5 * i - 3.0)
    };
    let color = RgbImage::from_fn(4, 4, |x, y| value(y * 4 + x)).unwrap();
    let filter = CrossBilateralFilter::new(FilterParameters::spatial_only(1, 0.1));
    let out = filter.denoise(&color, Guides::none()).unwrap();

    let a = (-0.1f32).exp();
    let b = (-0.2f32).exp();
    let weighted_mean = |window: &[(u32, f32)]| {
        let den: f32 = window.iter().map(|(_, w)| w).sum();
        let [r, g, bl] = window.iter().fold([0.0f32; 3], |acc, &(i, w)| {
            let p = value(i);
            [acc[0] + w * p.r, acc[1] + w * p.g, acc[2] + w * p.b]
        });
        Rgb::new(r / den, g / den, bl / den)
    };
    let mut check = |expected: Rgb, actual: Rgb| {
        rp.compare_values(expected.r as f64, actual.r as f64, 1e-4);
        rp.compare_values(expected.g as f64, actual.g as f64, 1e-4);
        rp.compare_values(expected.b as f64, actual.b as f64, 1e-4);
    };

    // Interior pixel (1, 1)
    let interior = [
        (0, b),
        (1, a),
        (2, b),
        (4, a),
        (5, 1.0),
        (6, a),
        (8, b),
        (9, a),
        (10, b),
    ];
    check(weighted_mean(&interior), out.get_pixel(1, 1).unwrap());

    // At (0, 0) the window wraps to row 3 and column 3
    let wrapped = [
        (15, b),
        (12, a),
        (13, b),
        (3, a),
        (0, 1.0),
        (1, a),
        (7, b),
        (4, a),
        (5, b),
    ];
    check(weighted_mean(&wrapped), out.get_pixel(0, 0).unwrap());

    assert!(rp.cleanup(), "cb_hand regression test failed");
}

// ============================================================================
// Boundary handling
// ============================================================================

#[test]
fn cross_bilateral_wrap_shift_reg() {
    let mut rp = RegParams::new("cb_wrap_shift");

    let scene = generators::two_plane_scene(32, 24);
    let noisy = generators::add_noise(&generators::distinct(32, 24), 0.1, 5);
    let filter = CrossBilateralFilter::default();

    let guides = Guides::none()
        .with_albedo(&scene.albedo)
        .with_normal(&scene.normal)
        .with_depth(&scene.depth);
    let direct = filter.denoise(&noisy, guides).unwrap();

    for (dx, dy) in [(1, 0), (0, 1), (7, -5), (-31, 23)] {
        let s_albedo = scene.albedo.shifted(dx, dy);
        let s_normal = scene.normal.shifted(dx, dy);
        let s_depth = scene.depth.shifted(dx, dy);
        let s_guides = Guides::none()
            .with_albedo(&s_albedo)
            .with_normal(&s_normal)
            .with_depth(&s_depth);
        let shifted = filter
            .denoise(&noisy.shifted(dx, dy), s_guides)
            .unwrap()
            .shifted(-dx, -dy);
        rp.compare_images(&direct, &shifted, 0.0);
    }

    assert!(rp.cleanup(), "cb_wrap_shift regression test failed");
}

#[test]
fn cross_bilateral_boundary_policies_reg() {
    let mut rp = RegParams::new("cb_boundary");

    // A horizontal ramp: wrapping blends the dark left edge with the bright
    // right edge, clamping and mirroring do not
    let color = RgbImage::from_fn(16, 4, |x, _| Rgb::splat(x as f32)).unwrap();
    let run = |boundary| {
        let params = FilterParameters::spatial_only(2, 0.1).with_boundary(boundary);
        CrossBilateralFilter::new(params)
            .denoise(&color, Guides::none())
            .unwrap()
    };

    let wrap = run(BoundaryPolicy::Wrap);
    let clamp = run(BoundaryPolicy::Clamp);
    let mirror = run(BoundaryPolicy::Mirror);

    let left = |img: &RgbImage| img.get_pixel(0, 1).unwrap().r as f64;
    rp.compare_values(1.0, (left(&wrap) > 3.0) as u8 as f64, 0.0);
    rp.compare_values(1.0, (left(&clamp) < 1.0) as u8 as f64, 0.0);
    rp.compare_values(1.0, (left(&mirror) > left(&clamp)) as u8 as f64, 0.0);
    rp.compare_values(1.0, (left(&mirror) < 2.0) as u8 as f64, 0.0);

    // Away from the edges the policies agree
    for x in 2..14 {
        rp.compare_values(
            wrap.get_pixel(x, 1).unwrap().r as f64,
            clamp.get_pixel(x, 1).unwrap().r as f64,
            1e-4,
        );
    }

    // Windows wider than the image are still well defined
    let tiny = generators::random(2, 3, 9);
    for boundary in [BoundaryPolicy::Wrap, BoundaryPolicy::Clamp, BoundaryPolicy::Mirror] {
        let params = FilterParameters::spatial_only(5, 0.1).with_boundary(boundary);
        let out = CrossBilateralFilter::new(params)
            .denoise(&tiny, Guides::none())
            .unwrap();
        rp.compare_values(1.0, out.is_finite() as u8 as f64, 0.0);
    }

    assert!(rp.cleanup(), "cb_boundary regression test failed");
}

// ============================================================================
// Denoising quality
// ============================================================================

#[test]
fn cross_bilateral_denoise_scene_reg() {
    let mut rp = RegParams::new("cb_scene");

    let scene = generators::two_plane_scene(64, 64);
    let noisy = generators::add_noise(&scene.color, 0.05, 42);
    rp.write_image(&noisy, denoise_io::ImageFormat::Pfm).unwrap();

    let filter = CrossBilateralFilter::default();
    let guided = filter
        .denoise(
            &noisy,
            Guides::none()
                .with_albedo(&scene.albedo)
                .with_normal(&scene.normal)
                .with_depth(&scene.depth),
        )
        .unwrap();
    let unguided = filter.denoise(&noisy, Guides::none()).unwrap();
    rp.write_image(&guided, denoise_io::ImageFormat::Pfm).unwrap();
    rp.write_image(&unguided, denoise_io::ImageFormat::Pfm).unwrap();

    let noisy_err = noisy.rms_diff(&scene.color).unwrap();
    let guided_err = guided.rms_diff(&scene.color).unwrap();
    let unguided_err = unguided.rms_diff(&scene.color).unwrap();
    eprintln!(
        "  rms error: noisy {:.4}, guided {:.4}, unguided {:.4}",
        noisy_err, guided_err, unguided_err
    );

    rp.compare_values(1.0, (guided_err < noisy_err) as u8 as f64, 0.0);
    rp.compare_values(1.0, (guided_err < unguided_err) as u8 as f64, 0.0);

    // The guides keep the square's border sharp
    let guided_edge = edge_error(&guided, &scene.color, 1);
    let unguided_edge = edge_error(&unguided, &scene.color, 1);
    rp.compare_values(1.0, (guided_edge < 0.5 * unguided_edge) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "cb_scene regression test failed");
}

#[test]
fn cross_bilateral_strategy_reg() {
    let mut rp = RegParams::new("cb_strategy");

    let scene = generators::two_plane_scene(20, 20);
    let noisy = generators::add_noise(&scene.color, 0.1, 3);
    let guides = Guides::none().with_normal(&scene.normal);
    let params = FilterParameters::default().with_half_width(2);

    let filter = CrossBilateralFilter::new(params);
    let expected = filter.denoise(&noisy, guides).unwrap();

    let strategy = DenoiseStrategy::select(None, CrossBilateralFilter::new(params));
    for hdr in [false, true] {
        let out = strategy
            .denoise(&noisy, guides, &DenoiseOptions { hdr })
            .unwrap();
        rp.compare_images(&expected, &out, 0.0);
    }

    assert!(rp.cleanup(), "cb_strategy regression test failed");
}

// ============================================================================
// Error cases
// ============================================================================

#[test]
fn cross_bilateral_errors_reg() {
    let color = generators::random(8, 8, 1);
    let small = generators::random(4, 8, 2);
    let filter = CrossBilateralFilter::default();

    let err = filter
        .denoise(&color, Guides::none().with_depth(&small))
        .unwrap_err();
    assert!(matches!(err, FilterError::Core(_)));

    let bad = CrossBilateralFilter::new(FilterParameters::default().with_inv_sigma_pixel(-1.0));
    assert!(matches!(
        bad.denoise(&color, Guides::none()),
        Err(FilterError::InvalidParameters(_))
    ));

    // A NaN guide sample poisons every window containing it
    let mut albedo = generators::uniform(8, 8, Rgb::splat(0.5));
    albedo.set_pixel(3, 3, Rgb::splat(f32::NAN)).unwrap();
    let err = filter
        .denoise(&color, Guides::none().with_albedo(&albedo))
        .unwrap_err();
    assert!(matches!(err, FilterError::DegenerateWeights { .. }));
}
