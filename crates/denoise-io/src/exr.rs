//! OpenEXR image format support
//!
//! Reads the R, G and B channels of the first valid layer at full
//! resolution; 16-bit, 32-bit float and integer channels are converted to
//! `f32`. Writes a single RGB layer of 32-bit float channels.

use crate::{IoError, IoResult};
use denoise_core::{RgbImage, rgb_image::CHANNELS};
use exr::prelude::*;
use std::io::{Read, Seek, Write};

/// Interleaved RGB samples collected while decoding
struct Samples {
    width: usize,
    data: Vec<f32>,
}

/// Read an OpenEXR image
pub fn read_exr<R: Read + Seek>(reader: R) -> IoResult<RgbImage> {
    let image = read()
        .no_deep_data()
        .largest_resolution_level()
        .specific_channels()
        .required("R")
        .required("G")
        .required("B")
        .collect_pixels(
            |resolution: Vec2<usize>, _| Samples {
                width: resolution.width(),
                data: vec![0.0; resolution.area() * CHANNELS],
            },
            |samples: &mut Samples, position: Vec2<usize>, (r, g, b): (f32, f32, f32)| {
                let i = (position.y() * samples.width + position.x()) * CHANNELS;
                samples.data[i..i + CHANNELS].copy_from_slice(&[r, g, b]);
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_buffered(reader)
        .map_err(|e| IoError::DecodeError(format!("EXR decode error: {}", e)))?;

    let size = image.layer_data.size;
    let samples = image.layer_data.channel_data.pixels;
    Ok(RgbImage::from_data(
        size.width() as u32,
        size.height() as u32,
        samples.data,
    )?)
}

/// Write an image as an RGB 32-bit float OpenEXR
pub fn write_exr<W: Write + Seek>(img: &RgbImage, writer: W) -> IoResult<()> {
    let (width, height) = img.dimensions();
    let channels = SpecificChannels::rgb(|position: Vec2<usize>| {
        let p = img.get_pixel_unchecked(position.x() as u32, position.y() as u32);
        (p.r, p.g, p.b)
    });

    Image::from_channels((width as usize, height as usize), channels)
        .write()
        .to_buffered(writer)
        .map_err(|e| IoError::EncodeError(format!("EXR write error: {}", e)))?;
    Ok(())
}
