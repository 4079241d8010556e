//! TIFF image format support
//!
//! Reads greyscale, RGB and RGBA images stored as 32-bit float, 16-bit
//! half float, or 8/16-bit integers. Float samples are taken as linear;
//! integer samples as sRGB encoded. Writes uncompressed RGB 32-bit float.

use crate::{IoError, IoResult};
use denoise_core::{Rgb, RgbImage, color};
use std::io::{Read, Seek, Write};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::TiffEncoder;
use tiff::encoder::colortype::RGB32Float;

/// Read a TIFF image (first page only)
pub fn read_tiff<R: Read + Seek>(reader: R) -> IoResult<RgbImage> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF color type: {}", e)))?;

    let channels = match color_type {
        ColorType::Gray(_) => 1,
        ColorType::GrayA(_) => 2,
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported TIFF color type: {:?}",
                other
            )));
        }
    };

    let samples: Vec<f32> = match decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?
    {
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F16(data) => data.into_iter().map(half::f16::to_f32).collect(),
        DecodingResult::U8(data) => data.into_iter().map(color::u8_to_linear).collect(),
        DecodingResult::U16(data) => data.into_iter().map(color::u16_to_linear).collect(),
        _ => {
            return Err(IoError::UnsupportedFormat(
                "unsupported TIFF sample format".to_string(),
            ));
        }
    };

    let expected = width as usize * height as usize * channels;
    if samples.len() < expected {
        return Err(IoError::InvalidData(format!(
            "TIFF data has {} samples, expected {}",
            samples.len(),
            expected
        )));
    }

    let mut img = RgbImage::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            let i = (y as usize * width as usize + x as usize) * channels;
            let px = if channels < 3 {
                Rgb::splat(samples[i])
            } else {
                Rgb::new(samples[i], samples[i + 1], samples[i + 2])
            };
            img.set_pixel_unchecked(x, y, px);
        }
    }

    Ok(img)
}

/// Write an image as uncompressed RGB 32-bit float TIFF
pub fn write_tiff<W: Write + Seek>(img: &RgbImage, writer: W) -> IoResult<()> {
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?;
    encoder
        .write_image::<RGB32Float>(img.width(), img.height(), img.data())
        .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
    Ok(())
}
