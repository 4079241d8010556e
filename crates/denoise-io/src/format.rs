//! Image format detection and output-format selection
//!
//! Input formats are detected by magic number. The output format is chosen
//! from the output file extension; floating-point formats keep the full
//! dynamic range, 8-bit formats are tone-clamped and sRGB encoded.

use crate::{IoError, IoResult};
use log::warn;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Image file formats understood by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// OpenEXR (16/32-bit float)
    Exr,
    /// Portable Float Map (32-bit float)
    Pfm,
    /// Radiance RGBE (shared-exponent float)
    Rgbe,
    /// Binary Portable Pixmap (8/16-bit)
    Ppm,
    /// PNG (8/16-bit)
    Png,
    /// JPEG (8-bit)
    Jpeg,
    /// TIFF (float, 8/16-bit)
    Tiff,
}

impl ImageFormat {
    /// Every format, whether or not its feature is enabled
    pub const ALL: [ImageFormat; 7] = [
        ImageFormat::Exr,
        ImageFormat::Pfm,
        ImageFormat::Rgbe,
        ImageFormat::Ppm,
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Tiff,
    ];

    /// Format used when the output extension is not recognized
    #[cfg(feature = "exr-format")]
    pub const DEFAULT_OUTPUT: ImageFormat = ImageFormat::Exr;
    /// Format used when the output extension is not recognized
    #[cfg(not(feature = "exr-format"))]
    pub const DEFAULT_OUTPUT: ImageFormat = ImageFormat::Pfm;

    /// Canonical file extension
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Exr => "exr",
            ImageFormat::Pfm => "pfm",
            ImageFormat::Rgbe => "hdr",
            ImageFormat::Ppm => "ppm",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Tiff => "tif",
        }
    }

    /// Look up a format by file extension (case-insensitive)
    ///
    /// Formats whose feature is disabled are still recognized; check
    /// [`ImageFormat::is_supported`] before encoding.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "exr" => Some(ImageFormat::Exr),
            "pfm" => Some(ImageFormat::Pfm),
            "hdr" | "rgbe" | "pic" => Some(ImageFormat::Rgbe),
            "ppm" | "pnm" => Some(ImageFormat::Ppm),
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "tif" | "tiff" => Some(ImageFormat::Tiff),
            _ => None,
        }
    }

    /// True if the format stores floating-point (high dynamic range) data
    pub fn is_hdr(self) -> bool {
        matches!(
            self,
            ImageFormat::Exr | ImageFormat::Pfm | ImageFormat::Rgbe | ImageFormat::Tiff
        )
    }

    /// True if support for this format was compiled in
    pub fn is_supported(self) -> bool {
        match self {
            ImageFormat::Exr => cfg!(feature = "exr-format"),
            ImageFormat::Pfm => cfg!(feature = "pfm"),
            ImageFormat::Rgbe => cfg!(feature = "rgbe"),
            ImageFormat::Ppm => cfg!(feature = "pnm"),
            ImageFormat::Png => cfg!(feature = "png-format"),
            ImageFormat::Jpeg => cfg!(feature = "jpeg"),
            ImageFormat::Tiff => cfg!(feature = "tiff-format"),
        }
    }

    /// Fail with `IoError::UnsupportedFormat` unless the format is compiled in
    pub fn check_supported(self) -> IoResult<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(IoError::UnsupportedFormat(format!(
                "{:?} support not enabled",
                self
            )))
        }
    }
}

/// Magic numbers for image format detection
mod magic {
    /// OpenEXR: 76 2F 31 01
    pub const EXR: &[u8] = &[0x76, 0x2F, 0x31, 0x01];

    /// PNG: 89 50 4E 47 0D 0A 1A 0A
    pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// JPEG: SOI marker followed by another marker
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

    /// TIFF little-endian: II 2A 00
    pub const TIFF_LE: &[u8] = &[0x49, 0x49, 0x2A, 0x00];

    /// TIFF big-endian: MM 00 2A
    pub const TIFF_BE: &[u8] = &[0x4D, 0x4D, 0x00, 0x2A];

    /// Radiance: `#?RADIANCE` or `#?RGBE`
    pub const RGBE: &[u8] = b"#?";

    /// PFM colour / greyscale
    pub const PFM_COLOR: &[u8] = b"PF";
    pub const PFM_GRAY: &[u8] = b"Pf";

    /// Binary PPM
    pub const PPM_BINARY: &[u8] = b"P6";
}

/// Detect image format from a file path
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<ImageFormat> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 8];
    let bytes_read = file.read(&mut header)?;
    detect_format_from_bytes(&header[..bytes_read])
}

/// Detect image format from the leading bytes of a file
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(
            "not enough data to detect format".to_string(),
        ));
    }

    if data.starts_with(magic::EXR) {
        return Ok(ImageFormat::Exr);
    }
    if data.starts_with(magic::PNG) {
        return Ok(ImageFormat::Png);
    }
    if data.starts_with(magic::JPEG) {
        return Ok(ImageFormat::Jpeg);
    }
    if data.starts_with(magic::TIFF_LE) || data.starts_with(magic::TIFF_BE) {
        return Ok(ImageFormat::Tiff);
    }
    if data.starts_with(magic::RGBE) {
        return Ok(ImageFormat::Rgbe);
    }
    if data.starts_with(magic::PFM_COLOR) || data.starts_with(magic::PFM_GRAY) {
        return Ok(ImageFormat::Pfm);
    }
    if data.starts_with(magic::PPM_BINARY) {
        return Ok(ImageFormat::Ppm);
    }

    Err(IoError::UnsupportedFormat(
        "unrecognized image header".to_string(),
    ))
}

/// Where and how the denoised image is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// Final output path
    pub path: PathBuf,
    /// Encoding selected from the extension
    pub format: ImageFormat,
}

impl OutputTarget {
    /// Select the output format from the extension of `path`
    ///
    /// Unknown or missing extensions, and extensions of formats that were
    /// not compiled in, fall back to [`ImageFormat::DEFAULT_OUTPUT`]; the
    /// extension is replaced accordingly. The selected format is always
    /// supported.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let requested = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension);

        match requested {
            Some(format) if format.is_supported() => OutputTarget {
                path: path.to_path_buf(),
                format,
            },
            _ => {
                let format = ImageFormat::DEFAULT_OUTPUT;
                let fixed = path.with_extension(format.extension());
                match requested {
                    Some(other) => warn!(
                        "{:?} output support not enabled for '{}', writing '{}'",
                        other,
                        path.display(),
                        fixed.display()
                    ),
                    None => warn!(
                        "unrecognized output extension for '{}', writing '{}'",
                        path.display(),
                        fixed.display()
                    ),
                }
                OutputTarget {
                    path: fixed,
                    format,
                }
            }
        }
    }

    /// True if the output keeps floating-point data
    pub fn is_hdr(&self) -> bool {
        self.format.is_hdr()
    }
}
