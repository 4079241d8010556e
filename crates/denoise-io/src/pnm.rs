//! PPM (binary Portable Pixmap) format support
//!
//! Reads `P6` with maxval up to 65535 and writes 8-bit `P6`. Samples are
//! treated as sRGB encoded: they are linearized on read and re-encoded on
//! write.

use crate::header::{read_dimensions, read_token, read_value};
use crate::{IoError, IoResult};
use denoise_core::{RgbImage, color};
use std::io::{BufRead, Write};

/// Read a binary PPM image from a reader positioned at the `P6` magic.
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<RgbImage> {
    let magic = read_token(&mut reader)?;
    if magic != "P6" {
        return Err(IoError::UnsupportedFormat(format!(
            "only binary PPM (P6) is supported, got '{}'",
            magic
        )));
    }
    let (width, height) = read_dimensions(&mut reader)?;
    let maxval: u32 = read_value(&mut reader, "maxval")?;
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!("invalid maxval {}", maxval)));
    }

    let bytes_per_sample = if maxval < 256 { 1 } else { 2 };
    let mut data = vec![0u8; width as usize * height as usize * 3 * bytes_per_sample];
    reader
        .read_exact(&mut data)
        .map_err(|e| IoError::DecodeError(format!("PPM pixel data truncated: {}", e)))?;

    let scale = maxval as f32;
    let samples: Vec<f32> = if bytes_per_sample == 1 {
        data.iter()
            .map(|&b| color::srgb_to_linear(b as f32 / scale))
            .collect()
    } else {
        data.chunks_exact(2)
            .map(|b| color::srgb_to_linear(u16::from_be_bytes([b[0], b[1]]) as f32 / scale))
            .collect()
    };

    Ok(RgbImage::from_data(width, height, samples)?)
}

/// Write an image as 8-bit binary PPM.
pub fn write_pnm<W: Write>(img: &RgbImage, mut writer: W) -> IoResult<()> {
    write!(writer, "P6\n{} {}\n255\n", img.width(), img.height())?;

    let bytes: Vec<u8> = img.data().iter().map(|&v| color::linear_to_u8(v)).collect();
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
