//! denoise-io - Image I/O for the denoiser
//!
//! Decodes colour and guide buffers into [`RgbImage`] (linear float RGB)
//! and encodes the denoised result. Supported formats:
//!
//! - OpenEXR (feature `exr-format`, default): 16/32-bit float
//! - PFM (feature `pfm`, default): 32-bit float
//! - Radiance RGBE (feature `rgbe`, default): shared-exponent float
//! - PPM (feature `pnm`, default): binary P6, 8/16-bit
//! - PNG (feature `png-format`, default): 8/16-bit
//! - JPEG (feature `jpeg`, default): 8-bit
//! - TIFF (feature `tiff-format`): float, half float and 8/16-bit
//!
//! 8/16-bit formats are sRGB encoded on disk; they are linearized when
//! read and values are clamped to `[0, 1]` when written.

mod error;
#[cfg(feature = "exr-format")]
pub mod exr;
pub mod format;
mod header;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "pfm")]
pub mod pfm;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;
#[cfg(feature = "rgbe")]
pub mod rgbe;
#[cfg(feature = "tiff-format")]
pub mod tiff;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, OutputTarget, detect_format, detect_format_from_bytes};

use denoise_core::RgbImage;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;

/// Read an image from a file, detecting the format from its header
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<RgbImage> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    format.check_supported()?;
    let reader = BufReader::new(File::open(path)?);
    let img = read_image_format(reader, format)?;
    debug!(
        "read {} ({:?}, {}x{})",
        path.display(),
        format,
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Read an image from memory, detecting the format from its header
pub fn read_image_mem(data: &[u8]) -> IoResult<RgbImage> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(Cursor::new(data), format)
}

/// Read an image of a known format
pub fn read_image_format<R: BufRead + Seek>(reader: R, format: ImageFormat) -> IoResult<RgbImage> {
    match format {
        #[cfg(feature = "exr-format")]
        ImageFormat::Exr => self::exr::read_exr(reader),
        #[cfg(feature = "pfm")]
        ImageFormat::Pfm => self::pfm::read_pfm(reader),
        #[cfg(feature = "rgbe")]
        ImageFormat::Rgbe => self::rgbe::read_rgbe(reader),
        #[cfg(feature = "pnm")]
        ImageFormat::Ppm => self::pnm::read_pnm(reader),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => self::png::read_png(reader),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => self::jpeg::read_jpeg(reader),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => self::tiff::read_tiff(reader),
        #[allow(unreachable_patterns)]
        _ => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            format
        ))),
    }
}

/// Write an image to a file in the given format
///
/// The file is not created when `format` is not compiled in.
pub fn write_image<P: AsRef<Path>>(img: &RgbImage, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    format.check_supported()?;
    let mut writer = BufWriter::new(File::create(path)?);
    write_image_format(img, &mut writer, format)?;
    writer.flush()?;
    debug!(
        "wrote {} ({:?}, {}x{})",
        path.display(),
        format,
        img.width(),
        img.height()
    );
    Ok(())
}

/// Encode an image into memory
pub fn write_image_mem(img: &RgbImage, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_image_format(img, &mut cursor, format)?;
    Ok(cursor.into_inner())
}

/// Write an image in a known format
pub fn write_image_format<W: Write + Seek>(
    img: &RgbImage,
    writer: W,
    format: ImageFormat,
) -> IoResult<()> {
    match format {
        #[cfg(feature = "exr-format")]
        ImageFormat::Exr => self::exr::write_exr(img, writer),
        #[cfg(feature = "pfm")]
        ImageFormat::Pfm => self::pfm::write_pfm(img, writer),
        #[cfg(feature = "rgbe")]
        ImageFormat::Rgbe => self::rgbe::write_rgbe(img, writer),
        #[cfg(feature = "pnm")]
        ImageFormat::Ppm => self::pnm::write_pnm(img, writer),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => self::png::write_png(img, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => self::jpeg::write_jpeg(img, writer),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => self::tiff::write_tiff(img, writer),
        #[allow(unreachable_patterns)]
        _ => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            format
        ))),
    }
}
