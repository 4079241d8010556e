//! JPEG image format support
//!
//! Reads baseline and progressive JPEG (greyscale or RGB) with
//! `jpeg-decoder`; greyscale is replicated to RGB. Writes 8-bit RGB with
//! `jpeg-encoder`. Samples are sRGB encoded on disk.

use crate::{IoError, IoResult};
use denoise_core::{Rgb, RgbImage, color};
use jpeg_decoder::PixelFormat;
use std::io::{Read, Write};

/// Quality used when writing
pub const DEFAULT_QUALITY: u8 = 95;

/// Read a JPEG image
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<RgbImage> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG info missing after decode".to_string()))?;

    let (width, height) = (info.width as u32, info.height as u32);
    let pixels = width as usize * height as usize;
    let samples: Vec<f32> = match info.pixel_format {
        PixelFormat::RGB24 => data.iter().map(|&v| color::u8_to_linear(v)).collect(),
        PixelFormat::L8 => data
            .iter()
            .flat_map(|&v| Rgb::splat(color::u8_to_linear(v)).to_array())
            .collect(),
        PixelFormat::L16 => data
            .chunks_exact(2)
            .flat_map(|b| Rgb::splat(color::u16_to_linear(u16::from_be_bytes([b[0], b[1]]))).to_array())
            .collect(),
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };

    if samples.len() != pixels * 3 {
        return Err(IoError::InvalidData(format!(
            "JPEG data has {} samples, expected {}",
            samples.len(),
            pixels * 3
        )));
    }
    Ok(RgbImage::from_data(width, height, samples)?)
}

/// Write an image as 8-bit RGB JPEG with [`DEFAULT_QUALITY`]
pub fn write_jpeg<W: Write>(img: &RgbImage, writer: W) -> IoResult<()> {
    let (width, height) = img.dimensions();
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(IoError::UnsupportedFormat(format!(
            "{}x{} exceeds the JPEG size limit",
            width, height
        )));
    }

    let data: Vec<u8> = img.data().iter().map(|&v| color::linear_to_u8(v)).collect();
    let encoder = jpeg_encoder::Encoder::new(writer, DEFAULT_QUALITY);
    encoder
        .encode(&data, width as u16, height as u16, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))?;
    Ok(())
}
