//! Boundary handling for neighbourhood sampling
//!
//! The filter window reaches past the image edges near the border. A
//! `BoundaryPolicy` maps such out-of-range coordinates back inside.

/// How neighbour coordinates outside the image are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Coordinates wrap modulo the image size (toroidal).
    ///
    /// Assumes periodic imagery; non-tiling images blend opposite edges.
    #[default]
    Wrap,
    /// Coordinates are clamped to the nearest edge pixel (replicate border)
    Clamp,
    /// Coordinates are reflected about the edge, without repeating the
    /// edge pixel (`-1 -> 1`, `len -> len - 2`)
    Mirror,
}

impl BoundaryPolicy {
    /// Resolve `coord + offset` to a valid index in `0..len`
    ///
    /// Total for any offset, including windows wider than the image.
    #[inline]
    pub fn resolve(self, coord: u32, offset: i32, len: u32) -> u32 {
        let n = len as i64;
        let p = coord as i64 + offset as i64;
        let r = match self {
            BoundaryPolicy::Wrap => p.rem_euclid(n),
            BoundaryPolicy::Clamp => p.clamp(0, n - 1),
            BoundaryPolicy::Mirror => {
                if n == 1 {
                    0
                } else {
                    let period = 2 * (n - 1);
                    let q = p.rem_euclid(period);
                    if q < n { q } else { period - q }
                }
            }
        };
        r as u32
    }
}
