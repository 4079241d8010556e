//! PFM (Portable Float Map) format support
//!
//! Reads `PF` (colour) and `Pf` (greyscale, replicated to RGB) files and
//! writes `PF`. The sign of the scale field selects byte order (negative
//! means little-endian) and scanlines are stored bottom-to-top.

use crate::header::{read_dimensions, read_token, read_value};
use crate::{IoError, IoResult};
use denoise_core::{Rgb, RgbImage};
use std::io::{BufRead, Write};

/// Read a PFM image from a reader positioned at the `PF`/`Pf` magic.
pub fn read_pfm<R: BufRead>(mut reader: R) -> IoResult<RgbImage> {
    let magic = read_token(&mut reader)?;
    let channels = match magic.as_str() {
        "PF" => 3usize,
        "Pf" => 1usize,
        other => {
            return Err(IoError::InvalidData(format!(
                "not a PFM file (magic '{}')",
                other
            )));
        }
    };
    let (width, height) = read_dimensions(&mut reader)?;
    let scale: f32 = read_value(&mut reader, "scale")?;
    if scale == 0.0 || !scale.is_finite() {
        return Err(IoError::InvalidData(format!("invalid PFM scale {}", scale)));
    }
    let little_endian = scale < 0.0;

    let row_len = width as usize * channels * 4;
    let mut row = vec![0u8; row_len];
    let mut img = RgbImage::new(width, height)?;

    for file_row in 0..height {
        reader
            .read_exact(&mut row)
            .map_err(|e| IoError::DecodeError(format!("PFM pixel data truncated: {}", e)))?;
        let y = height - 1 - file_row;

        let mut samples = row.chunks_exact(4).map(|b| {
            let bytes = [b[0], b[1], b[2], b[3]];
            if little_endian {
                f32::from_le_bytes(bytes)
            } else {
                f32::from_be_bytes(bytes)
            }
        });

        for x in 0..width {
            let px = if channels == 3 {
                // chunks_exact yields exactly width * 3 samples
                let r = samples.next().unwrap_or(0.0);
                let g = samples.next().unwrap_or(0.0);
                let b = samples.next().unwrap_or(0.0);
                Rgb::new(r, g, b)
            } else {
                Rgb::splat(samples.next().unwrap_or(0.0))
            };
            img.set_pixel_unchecked(x, y, px);
        }
    }

    Ok(img)
}

/// Write an image as little-endian colour PFM.
pub fn write_pfm<W: Write>(img: &RgbImage, mut writer: W) -> IoResult<()> {
    write!(writer, "PF\n{} {}\n-1.0\n", img.width(), img.height())?;

    let mut buf = Vec::with_capacity(img.row_stride() * 4);
    for y in (0..img.height()).rev() {
        buf.clear();
        for v in img.row(y) {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        writer.write_all(&buf)?;
    }
    writer.flush()?;
    Ok(())
}
