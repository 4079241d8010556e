//! Denoiser selection
//!
//! The batch tool talks to one contract, [`Denoiser`], regardless of
//! whether the in-process cross-bilateral filter or an external
//! accelerated library does the work. The choice is made once, when a
//! [`DenoiseStrategy`] is constructed.
//!
//! Both variants share the same conventions:
//! - pixels are interleaved `f32` RGB triples, row-major ([`RgbImage`])
//! - an absent guide disables its term; it is never replaced by zeros
//! - the output has the dimensions of the colour input

use crate::{CrossBilateralFilter, FilterError, FilterResult, Guides};
use denoise_core::RgbImage;
use log::{debug, info};

/// Per-invocation options forwarded to the denoiser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DenoiseOptions {
    /// The colour data is high dynamic range (will be stored as float)
    pub hdr: bool,
}

/// Common contract of all denoisers
pub trait Denoiser {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// Denoise `color` guided by `guides`
    fn denoise(
        &self,
        color: &RgbImage,
        guides: Guides<'_>,
        options: &DenoiseOptions,
    ) -> FilterResult<RgbImage>;
}

impl Denoiser for CrossBilateralFilter {
    fn name(&self) -> &str {
        "cross-bilateral"
    }

    fn denoise(
        &self,
        color: &RgbImage,
        guides: Guides<'_>,
        _options: &DenoiseOptions,
    ) -> FilterResult<RgbImage> {
        CrossBilateralFilter::denoise(self, color, guides)
    }
}

/// An externally provided, accelerated denoising library
///
/// Implementations wrap a single blocking call into the library. Errors are
/// returned as the library's message and surface as
/// [`FilterError::Backend`].
pub trait AcceleratedBackend: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Run the library on `color`, writing into `output`
    ///
    /// `output` is zero-initialised with the dimensions of `color`; guides
    /// have already been checked against those dimensions.
    fn execute(
        &self,
        color: &RgbImage,
        guides: Guides<'_>,
        options: &DenoiseOptions,
        output: &mut RgbImage,
    ) -> Result<(), String>;
}

/// Denoiser chosen at configuration time
pub enum DenoiseStrategy {
    /// In-process cross-bilateral filter
    CrossBilateral(CrossBilateralFilter),
    /// External accelerated library
    Accelerated(Box<dyn AcceleratedBackend>),
}

impl Default for DenoiseStrategy {
    fn default() -> Self {
        DenoiseStrategy::CrossBilateral(CrossBilateralFilter::default())
    }
}

impl std::fmt::Debug for DenoiseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenoiseStrategy::CrossBilateral(filter) => {
                f.debug_tuple("CrossBilateral").field(filter).finish()
            }
            DenoiseStrategy::Accelerated(backend) => {
                f.debug_tuple("Accelerated").field(&backend.name()).finish()
            }
        }
    }
}

impl DenoiseStrategy {
    /// Use an accelerated backend when one is available, otherwise fall
    /// back to `fallback`
    pub fn select(
        backend: Option<Box<dyn AcceleratedBackend>>,
        fallback: CrossBilateralFilter,
    ) -> Self {
        match backend {
            Some(backend) => {
                info!("using accelerated denoiser '{}'", backend.name());
                DenoiseStrategy::Accelerated(backend)
            }
            None => {
                info!("no accelerated denoiser available, using cross-bilateral filter");
                DenoiseStrategy::CrossBilateral(fallback)
            }
        }
    }
}

impl Denoiser for DenoiseStrategy {
    fn name(&self) -> &str {
        match self {
            DenoiseStrategy::CrossBilateral(filter) => Denoiser::name(filter),
            DenoiseStrategy::Accelerated(backend) => backend.name(),
        }
    }

    fn denoise(
        &self,
        color: &RgbImage,
        guides: Guides<'_>,
        options: &DenoiseOptions,
    ) -> FilterResult<RgbImage> {
        let (w, h) = color.dimensions();
        guides.check_dimensions(w, h)?;
        debug!("denoising {}x{} with {}", w, h, self.name());

        match self {
            DenoiseStrategy::CrossBilateral(filter) => {
                Denoiser::denoise(filter, color, guides, options)
            }
            DenoiseStrategy::Accelerated(backend) => {
                let mut output = color.create_template();
                backend
                    .execute(color, guides, options, &mut output)
                    .map_err(|message| FilterError::Backend {
                        backend: backend.name().to_string(),
                        message,
                    })?;
                output.check_dimensions(w, h)?;
                Ok(output)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterParameters;
    use denoise_core::Rgb;

    /// Stand-in backend that copies the albedo (or colour) into the output
    struct CopyBackend;

    impl AcceleratedBackend for CopyBackend {
        fn name(&self) -> &str {
            "copy"
        }

        fn execute(
            &self,
            color: &RgbImage,
            guides: Guides<'_>,
            _options: &DenoiseOptions,
            output: &mut RgbImage,
        ) -> Result<(), String> {
            let src = guides.albedo.unwrap_or(color);
            output.data_mut().copy_from_slice(src.data());
            Ok(())
        }
    }

    struct FailingBackend;

    impl AcceleratedBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        fn execute(
            &self,
            _color: &RgbImage,
            _guides: Guides<'_>,
            _options: &DenoiseOptions,
            _output: &mut RgbImage,
        ) -> Result<(), String> {
            Err("device lost".to_string())
        }
    }

    #[test]
    fn test_default_is_cross_bilateral() {
        let strategy = DenoiseStrategy::default();
        assert_eq!(strategy.name(), "cross-bilateral");
        assert!(matches!(strategy, DenoiseStrategy::CrossBilateral(_)));
    }

    #[test]
    fn test_select() {
        let fallback = CrossBilateralFilter::new(FilterParameters::default());
        let s = DenoiseStrategy::select(None, fallback.clone());
        assert_eq!(s.name(), "cross-bilateral");
        let s = DenoiseStrategy::select(Some(Box::new(CopyBackend)), fallback);
        assert_eq!(s.name(), "copy");
    }

    #[test]
    fn test_strategies_are_interchangeable() {
        let color = RgbImage::new_with_value(6, 4, Rgb::splat(0.5)).unwrap();
        let options = DenoiseOptions::default();
        let strategies = [
            DenoiseStrategy::default(),
            DenoiseStrategy::Accelerated(Box::new(CopyBackend)),
        ];
        for s in &strategies {
            let out = s.denoise(&color, Guides::none(), &options).unwrap();
            assert_eq!(out.dimensions(), color.dimensions());
            assert!(out.max_abs_diff(&color).unwrap() < 1e-5);
        }
    }

    #[test]
    fn test_backend_failure_propagates_message() {
        let color = RgbImage::new(2, 2).unwrap();
        let s = DenoiseStrategy::Accelerated(Box::new(FailingBackend));
        match s.denoise(&color, Guides::none(), &DenoiseOptions { hdr: true }) {
            Err(FilterError::Backend { backend, message }) => {
                assert_eq!(backend, "failing");
                assert_eq!(message, "device lost");
            }
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[test]
    fn test_guide_mismatch_checked_for_every_strategy() {
        let color = RgbImage::new(4, 4).unwrap();
        let albedo = RgbImage::new(3, 4).unwrap();
        let guides = Guides::none().with_albedo(&albedo);
        let s = DenoiseStrategy::Accelerated(Box::new(CopyBackend));
        assert!(matches!(
            s.denoise(&color, guides, &DenoiseOptions::default()),
            Err(FilterError::Core(_))
        ));
        assert!(DenoiseStrategy::default()
            .denoise(&color, guides, &DenoiseOptions::default())
            .is_err());
    }
}
