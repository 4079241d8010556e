//! Batch job: load the buffers, denoise, write the result
//!
//! Every guide buffer is optional and loaded independently of the others.
//! The output extension picks the encoding; float outputs are flagged as
//! HDR to the denoiser.

use anyhow::{Context, Result};
use denoise_core::RgbImage;
use denoise_filter::{DenoiseOptions, DenoiseStrategy, Denoiser, Guides};
use denoise_io::OutputTarget;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// One invocation of the batch denoiser
#[derive(Debug)]
pub struct BatchJob {
    /// Noisy colour image
    pub input: PathBuf,
    /// Requested output path (extension selects the format)
    pub output: PathBuf,
    /// Optional albedo guide
    pub albedo: Option<PathBuf>,
    /// Optional normal guide
    pub normal: Option<PathBuf>,
    /// Optional depth guide
    pub depth: Option<PathBuf>,
    /// Denoiser to run
    pub strategy: DenoiseStrategy,
}

impl BatchJob {
    /// Create a job with no guides and the default strategy
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        BatchJob {
            input: input.into(),
            output: output.into(),
            albedo: None,
            normal: None,
            depth: None,
            strategy: DenoiseStrategy::default(),
        }
    }

    /// Run the job, returning where and how the result was written
    pub fn run(&self) -> Result<OutputTarget> {
        let target = OutputTarget::from_path(&self.output);

        let color = denoise_io::read_image(&self.input)
            .with_context(|| format!("failed to read input image '{}'", self.input.display()))?;
        let albedo = load_guide("albedo", self.albedo.as_deref())?;
        let normal = load_guide("normal", self.normal.as_deref())?;
        let depth = load_guide("depth", self.depth.as_deref())?;

        let mut guides = Guides::none();
        if let Some(img) = &albedo {
            guides = guides.with_albedo(img);
        }
        if let Some(img) = &normal {
            guides = guides.with_normal(img);
        }
        if let Some(img) = &depth {
            guides = guides.with_depth(img);
        }

        let options = DenoiseOptions {
            hdr: target.is_hdr(),
        };
        info!(
            "denoising {} ({}x{}) with {}, {} guide(s)",
            self.input.display(),
            color.width(),
            color.height(),
            self.strategy.name(),
            guides.count()
        );

        let start = Instant::now();
        let out = self
            .strategy
            .denoise(&color, guides, &options)
            .context("denoising failed")?;
        debug!("denoised in {:.2?}", start.elapsed());

        denoise_io::write_image(&out, &target.path, target.format).with_context(|| {
            format!("failed to write output image '{}'", target.path.display())
        })?;
        info!("wrote {} ({:?})", target.path.display(), target.format);

        Ok(target)
    }
}

fn load_guide(kind: &str, path: Option<&Path>) -> Result<Option<RgbImage>> {
    let Some(path) = path else {
        debug!("no {} guide", kind);
        return Ok(None);
    };
    let img = denoise_io::read_image(path)
        .with_context(|| format!("failed to read {} guide '{}'", kind, path.display()))?;
    Ok(Some(img))
}
