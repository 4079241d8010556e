//! ASCII header parsing shared by the netpbm-style formats (PPM, PFM)

use crate::{IoError, IoResult};
use std::io::BufRead;

/// Read one whitespace-delimited header token
///
/// Skips leading whitespace and `#` comments, then consumes exactly one
/// whitespace byte after the token so the reader is left at the start of
/// the binary payload when the last header field has been read.
pub(crate) fn read_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        if reader.read(&mut byte)? == 0 {
            return Err(IoError::InvalidData("truncated header".to_string()));
        }
        match byte[0] {
            b'#' if token.is_empty() => {
                let mut comment = Vec::new();
                reader.read_until(b'\n', &mut comment)?;
            }
            b if b.is_ascii_whitespace() => {
                if !token.is_empty() {
                    break;
                }
            }
            b => token.push(b),
        }
    }

    String::from_utf8(token).map_err(|_| IoError::InvalidData("non-ASCII header".to_string()))
}

/// Read a header token and parse it as `T`
pub(crate) fn read_value<R: BufRead, T: std::str::FromStr>(
    reader: &mut R,
    what: &str,
) -> IoResult<T> {
    let token = read_token(reader)?;
    token
        .parse()
        .map_err(|_| IoError::InvalidData(format!("invalid {}: '{}'", what, token)))
}

/// Read and validate width and height fields
pub(crate) fn read_dimensions<R: BufRead>(reader: &mut R) -> IoResult<(u32, u32)> {
    let width: u32 = read_value(reader, "width")?;
    let height: u32 = read_value(reader, "height")?;
    if width == 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "invalid dimensions {}x{}",
            width, height
        )));
    }
    Ok((width, height))
}
