//! PNG image format support
//!
//! Palette and low bit-depth images are expanded by the decoder. All
//! samples are treated as sRGB encoded and linearized; alpha is dropped.
//! Images are written as 8-bit RGB.

use crate::{IoError, IoResult};
use denoise_core::{Rgb, RgbImage, color};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<RgbImage> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let (color_type, bit_depth) = reader.output_color_type();

    let channels = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "indexed PNG was not expanded".to_string(),
            ));
        }
    };
    let sixteen = match bit_depth {
        BitDepth::Eight => false,
        BitDepth::Sixteen => true,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG bit depth after expansion: {:?}",
                other
            )));
        }
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let bytes_per_sample = if sixteen { 2 } else { 1 };

    let sample = |idx: usize| -> f32 {
        if sixteen {
            color::u16_to_linear(u16::from_be_bytes([data[idx], data[idx + 1]]))
        } else {
            color::u8_to_linear(data[idx])
        }
    };

    let mut img = RgbImage::new(width, height)?;
    for y in 0..height {
        let row_start = y as usize * bytes_per_row;
        for x in 0..width {
            let idx = row_start + x as usize * channels * bytes_per_sample;
            let px = if channels < 3 {
                Rgb::splat(sample(idx))
            } else {
                Rgb::new(
                    sample(idx),
                    sample(idx + bytes_per_sample),
                    sample(idx + 2 * bytes_per_sample),
                )
            };
            img.set_pixel_unchecked(x, y, px);
        }
    }

    Ok(img)
}

/// Write an image as 8-bit RGB PNG
pub fn write_png<W: Write>(img: &RgbImage, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, img.width(), img.height());
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let data: Vec<u8> = img.data().iter().map(|&v| color::linear_to_u8(v)).collect();
    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}
