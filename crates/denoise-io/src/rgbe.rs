//! Radiance RGBE (`.hdr`) format support
//!
//! Pixels are stored as three 8-bit mantissas sharing one 8-bit exponent.
//! Reads flat and run-length encoded scanlines in the standard `-Y h +X w`
//! orientation; writes run-length encoded scanlines when the width allows
//! it and flat scanlines otherwise.

use crate::{IoError, IoResult};
use denoise_core::{Rgb, RgbImage};
use std::io::{BufRead, Write};

/// Scanlines outside this width range are never run-length encoded
const MIN_RLE_WIDTH: u32 = 8;
const MAX_RLE_WIDTH: u32 = 0x7fff;

/// Encode one pixel as RGBE
///
/// Negative and non-finite channels are stored as zero.
pub fn to_rgbe(p: Rgb) -> [u8; 4] {
    let clean = |c: f32| if c.is_finite() && c > 0.0 { c } else { 0.0 };
    let (r, g, b) = (clean(p.r), clean(p.g), clean(p.b));
    let v = r.max(g).max(b);
    if v < 1e-32 {
        return [0; 4];
    }
    let e = v.log2().floor() as i32 + 1;
    let scale = 256.0 / 2f32.powi(e);
    let q = |c: f32| (c * scale).min(255.0) as u8;
    [q(r), q(g), q(b), (e + 128).clamp(1, 255) as u8]
}

/// Decode one RGBE pixel
pub fn from_rgbe(px: [u8; 4]) -> Rgb {
    if px[3] == 0 {
        return Rgb::ZERO;
    }
    let f = 2f32.powi(px[3] as i32 - (128 + 8));
    Rgb::new(
        (px[0] as f32 + 0.5) * f,
        (px[1] as f32 + 0.5) * f,
        (px[2] as f32 + 0.5) * f,
    )
}

fn read_line<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Err(IoError::InvalidData("truncated RGBE header".to_string()));
    }
    let line = String::from_utf8(line)
        .map_err(|_| IoError::InvalidData("non-ASCII RGBE header".to_string()))?;
    Ok(line.trim_end().to_string())
}

/// Parse `-Y <height> +X <width>`
fn parse_resolution(line: &str) -> IoResult<(u32, u32)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        ["-Y", h, "+X", w] => {
            let parse = |s: &str| {
                s.parse::<u32>()
                    .map_err(|_| IoError::InvalidData(format!("invalid RGBE size '{}'", line)))
            };
            let (width, height) = (parse(*w)?, parse(*h)?);
            if width == 0 || height == 0 {
                return Err(IoError::InvalidData(format!(
                    "invalid dimensions {}x{}",
                    width, height
                )));
            }
            Ok((width, height))
        }
        _ => Err(IoError::UnsupportedFormat(format!(
            "unsupported RGBE orientation '{}'",
            line
        ))),
    }
}

/// Read one scanline of `width` pixels into `out` (4 bytes per pixel)
fn read_scanline<R: BufRead>(reader: &mut R, width: u32, out: &mut [u8]) -> IoResult<()> {
    let truncated = |e: std::io::Error| IoError::DecodeError(format!("RGBE data truncated: {}", e));

    let mut first = [0u8; 4];
    reader.read_exact(&mut first).map_err(truncated)?;

    let rle = (MIN_RLE_WIDTH..=MAX_RLE_WIDTH).contains(&width)
        && first[0] == 2
        && first[1] == 2
        && first[2] & 0x80 == 0;
    if !rle {
        out[..4].copy_from_slice(&first);
        return reader.read_exact(&mut out[4..]).map_err(truncated);
    }

    let encoded_width = ((first[2] as u32) << 8) | first[3] as u32;
    if encoded_width != width {
        return Err(IoError::InvalidData(format!(
            "RGBE scanline width {} does not match image width {}",
            encoded_width, width
        )));
    }

    let width = width as usize;
    let mut channel = vec![0u8; width];
    for c in 0..4 {
        let mut x = 0;
        while x < width {
            let mut count = [0u8; 1];
            reader.read_exact(&mut count).map_err(truncated)?;
            let (run, literal) = if count[0] > 128 {
                ((count[0] - 128) as usize, false)
            } else {
                (count[0] as usize, true)
            };
            if run == 0 || x + run > width {
                return Err(IoError::InvalidData("bad RGBE run length".to_string()));
            }
            if literal {
                reader
                    .read_exact(&mut channel[x..x + run])
                    .map_err(truncated)?;
            } else {
                let mut value = [0u8; 1];
                reader.read_exact(&mut value).map_err(truncated)?;
                channel[x..x + run].fill(value[0]);
            }
            x += run;
        }
        for (i, &v) in channel.iter().enumerate() {
            out[i * 4 + c] = v;
        }
    }
    Ok(())
}

/// Read a Radiance RGBE image
pub fn read_rgbe<R: BufRead>(mut reader: R) -> IoResult<RgbImage> {
    let magic = read_line(&mut reader)?;
    if !magic.starts_with("#?") {
        return Err(IoError::InvalidData(format!(
            "not a Radiance file (magic '{}')",
            magic
        )));
    }

    loop {
        let line = read_line(&mut reader)?;
        if line.is_empty() {
            break;
        }
        if let Some(format) = line.strip_prefix("FORMAT=")
            && format != "32-bit_rle_rgbe"
        {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported Radiance pixel format '{}'",
                format
            )));
        }
    }

    let (width, height) = parse_resolution(&read_line(&mut reader)?)?;

    let mut img = RgbImage::new(width, height)?;
    let mut scanline = vec![0u8; width as usize * 4];
    for y in 0..height {
        read_scanline(&mut reader, width, &mut scanline)?;
        for (x, px) in scanline.chunks_exact(4).enumerate() {
            img.set_pixel_unchecked(x as u32, y, from_rgbe([px[0], px[1], px[2], px[3]]));
        }
    }

    Ok(img)
}

/// Append one channel of a scanline using runs for repeats of 4 or more
fn encode_channel(out: &mut Vec<u8>, data: &[u8]) {
    let run_at = |i: usize, cap: usize| {
        let mut run = 1;
        while i + run < data.len() && run < cap && data[i + run] == data[i] {
            run += 1;
        }
        run
    };

    let mut i = 0;
    while i < data.len() {
        let run = run_at(i, 127);
        if run >= 4 {
            out.push(128 + run as u8);
            out.push(data[i]);
            i += run;
            continue;
        }

        let start = i;
        while i < data.len() && i - start < 128 && run_at(i, 4) < 4 {
            i += 1;
        }
        out.push((i - start) as u8);
        out.extend_from_slice(&data[start..i]);
    }
}

/// Write an image as Radiance RGBE
pub fn write_rgbe<W: Write>(img: &RgbImage, mut writer: W) -> IoResult<()> {
    let (width, height) = img.dimensions();
    write!(
        writer,
        "#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y {} +X {}\n",
        height, width
    )?;

    let rle = (MIN_RLE_WIDTH..=MAX_RLE_WIDTH).contains(&width);
    let mut pixels = Vec::with_capacity(width as usize * 4);
    let mut channel = Vec::with_capacity(width as usize);
    let mut buf = Vec::with_capacity(width as usize * 5 + 4);

    for y in 0..height {
        pixels.clear();
        for x in 0..width {
            pixels.extend_from_slice(&to_rgbe(img.get_pixel_unchecked(x, y)));
        }

        buf.clear();
        if rle {
            buf.extend_from_slice(&[2, 2, (width >> 8) as u8, (width & 0xff) as u8]);
            for c in 0..4 {
                channel.clear();
                channel.extend(pixels.chunks_exact(4).map(|px| px[c]));
                encode_channel(&mut buf, &channel);
            }
        } else {
            buf.extend_from_slice(&pixels);
        }
        writer.write_all(&buf)?;
    }
    writer.flush()?;
    Ok(())
}
