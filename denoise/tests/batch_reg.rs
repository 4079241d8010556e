//! Batch job regression test
//!
//! Runs the full load → denoise → save pipeline on files written to the
//! regout directory.

use denoise::filter::{
    AcceleratedBackend, CrossBilateralFilter, DenoiseOptions, DenoiseStrategy, FilterParameters,
    Guides,
};
use denoise::io::{ImageFormat, read_image, write_image};
use denoise::{BatchJob, RgbImage};
use denoise_test::{RegParams, generators, regout_path};

/// Write the noisy scene and its guides, returning their paths
fn write_scene(prefix: &str) -> (String, String, String, String, RgbImage) {
    let scene = generators::two_plane_scene(48, 32);
    let noisy = generators::add_noise(&scene.color, 0.05, 17);

    let color = regout_path(&format!("{}_color.pfm", prefix)).unwrap();
    let albedo = regout_path(&format!("{}_albedo.pfm", prefix)).unwrap();
    let normal = regout_path(&format!("{}_normal.pfm", prefix)).unwrap();
    let depth = regout_path(&format!("{}_depth.pfm", prefix)).unwrap();
    write_image(&noisy, &color, ImageFormat::Pfm).unwrap();
    write_image(&scene.albedo, &albedo, ImageFormat::Pfm).unwrap();
    write_image(&scene.normal, &normal, ImageFormat::Pfm).unwrap();
    write_image(&scene.depth, &depth, ImageFormat::Pfm).unwrap();

    (color, albedo, normal, depth, noisy)
}

#[test]
fn batch_guided_reg() {
    let mut rp = RegParams::new("batch_guided");

    let (color, albedo, normal, depth, noisy) = write_scene("batch_guided");
    let scene = generators::two_plane_scene(48, 32);

    let mut job = BatchJob::new(&color, regout_path("batch_guided_out.pfm").unwrap());
    job.albedo = Some(albedo.into());
    job.normal = Some(normal.into());
    job.depth = Some(depth.into());

    let target = job.run().unwrap();
    rp.compare_values(1.0, (target.format == ImageFormat::Pfm) as u8 as f64, 0.0);

    let out = read_image(&target.path).unwrap();
    let expected = CrossBilateralFilter::default()
        .denoise(
            &noisy,
            Guides::none()
                .with_albedo(&scene.albedo)
                .with_normal(&scene.normal)
                .with_depth(&scene.depth),
        )
        .unwrap();
    rp.compare_images(&expected, &out, 0.0);

    let before = noisy.rms_diff(&scene.color).unwrap();
    let after = out.rms_diff(&scene.color).unwrap();
    rp.compare_values(1.0, (after < before) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "batch_guided regression test failed");
}

#[test]
fn batch_single_guide_and_fallback_extension_reg() {
    let mut rp = RegParams::new("batch_fallback");

    let (color, _, normal, _, noisy) = write_scene("batch_fallback");
    let scene = generators::two_plane_scene(48, 32);

    // Only the normal guide; an unknown extension is written as .exr
    let mut job = BatchJob::new(&color, regout_path("batch_fallback_out.webp").unwrap());
    job.normal = Some(normal.into());
    let target = job.run().unwrap();
    rp.compare_values(1.0, (target.format == ImageFormat::Exr) as u8 as f64, 0.0);
    rp.compare_values(
        1.0,
        (target.path.extension().and_then(|e| e.to_str()) == Some("exr")) as u8 as f64,
        0.0,
    );

    let out = read_image(&target.path).unwrap();
    let expected = CrossBilateralFilter::default()
        .denoise(&noisy, Guides::none().with_normal(&scene.normal))
        .unwrap();
    rp.compare_images(&expected, &out, 0.0);

    assert!(rp.cleanup(), "batch_fallback regression test failed");
}

#[test]
fn batch_png_output() {
    let (color, _, _, _, _) = write_scene("batch_png");
    let job = BatchJob::new(&color, regout_path("batch_png_out.png").unwrap());
    let target = job.run().unwrap();
    assert_eq!(target.format, ImageFormat::Png);
    let out = read_image(&target.path).unwrap();
    assert_eq!(out.dimensions(), (48, 32));
}

#[test]
fn batch_output_formats_reg() {
    let mut rp = RegParams::new("batch_formats");

    let (color, _, _, _, noisy) = write_scene("batch_formats");
    let expected = CrossBilateralFilter::default()
        .denoise(&noisy, Guides::none())
        .unwrap();

    // Float outputs keep the filtered values exactly
    for (name, format) in [
        ("batch_formats_out.exr", ImageFormat::Exr),
        ("batch_formats_out.tif", ImageFormat::Tiff),
    ] {
        let job = BatchJob::new(&color, regout_path(name).unwrap());
        let target = job.run().unwrap();
        rp.compare_values(1.0, (target.format == format) as u8 as f64, 0.0);
        rp.compare_values(1.0, target.path.ends_with(name) as u8 as f64, 0.0);
        let out = read_image(&target.path).unwrap();
        rp.compare_images(&expected, &out, 0.0);
    }

    let job = BatchJob::new(&color, regout_path("batch_formats_out.jpg").unwrap());
    let target = job.run().unwrap();
    rp.compare_values(1.0, (target.format == ImageFormat::Jpeg) as u8 as f64, 0.0);
    let out = read_image(&target.path).unwrap();
    rp.compare_values(1.0, (out.dimensions() == (48, 32)) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "batch_formats regression test failed");
}

#[test]
fn batch_errors() {
    let (color, _, _, _, _) = write_scene("batch_errors");

    // Missing input
    let job = BatchJob::new(
        "/nonexistent/denoise/noisy.pfm",
        regout_path("batch_errors_a.pfm").unwrap(),
    );
    let err = job.run().unwrap_err();
    assert!(format!("{:#}", err).contains("failed to read input image"));

    // Missing guide
    let mut job = BatchJob::new(&color, regout_path("batch_errors_b.pfm").unwrap());
    job.depth = Some("/nonexistent/denoise/depth.pfm".into());
    let err = job.run().unwrap_err();
    assert!(format!("{:#}", err).contains("depth guide"));

    // Guide of the wrong size
    let small = regout_path("batch_errors_small.pfm").unwrap();
    write_image(&generators::random(8, 8, 1), &small, ImageFormat::Pfm).unwrap();
    let mut job = BatchJob::new(&color, regout_path("batch_errors_c.pfm").unwrap());
    job.albedo = Some(small.into());
    assert!(job.run().is_err());

    // Invalid parameters surface through the strategy
    let mut job = BatchJob::new(&color, regout_path("batch_errors_d.pfm").unwrap());
    job.strategy = DenoiseStrategy::CrossBilateral(CrossBilateralFilter::new(
        FilterParameters::default().with_half_width(1000),
    ));
    assert!(job.run().is_err());
}

/// Backend that records the options it was given in the output
struct HdrFlagBackend;

impl AcceleratedBackend for HdrFlagBackend {
    fn name(&self) -> &str {
        "hdr-flag"
    }

    fn execute(
        &self,
        _color: &RgbImage,
        _guides: Guides<'_>,
        options: &DenoiseOptions,
        output: &mut RgbImage,
    ) -> Result<(), String> {
        output.set_all(denoise::Rgb::splat(if options.hdr { 1.0 } else { 0.0 }));
        Ok(())
    }
}

#[test]
fn batch_hdr_flag_follows_output_format() {
    let (color, _, _, _, _) = write_scene("batch_hdr");

    let mut job = BatchJob::new(&color, regout_path("batch_hdr_out.pfm").unwrap());
    job.strategy = DenoiseStrategy::select(Some(Box::new(HdrFlagBackend)), CrossBilateralFilter::default());
    let target = job.run().unwrap();
    let out = read_image(&target.path).unwrap();
    assert_eq!(out.get_pixel(0, 0).unwrap(), denoise::Rgb::splat(1.0));

    job.output = regout_path("batch_hdr_out.ppm").unwrap().into();
    let target = job.run().unwrap();
    let out = read_image(&target.path).unwrap();
    assert_eq!(out.get_pixel(0, 0).unwrap(), denoise::Rgb::splat(0.0));
}
