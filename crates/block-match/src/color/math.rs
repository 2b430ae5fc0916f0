//! Integer color math: distance, compositing and dither offsets

use super::argb::Argb;
use super::lut::hue_factor;

#[inline]
fn channels(c: Argb) -> (i64, i64, i64) {
    (c.red() as i64, c.green() as i64, c.blue() as i64)
}

/// Perceptual distance between two colors.
///
/// A weighted RGB distance where the red and blue weights shift with the mean
/// red level, plus the square of [`hue_distance`]. Alpha is ignored; callers
/// filter on alpha before comparing.
///
/// Returns 0 for identical colors and is symmetric in its arguments.
pub fn distance(c1: Argb, c2: Argb) -> u64 {
    let (r1, g1, b1) = channels(c1);
    let (r2, g2, b2) = channels(c2);

    let rmean = (r1 + r2) >> 1;
    let dr = r1 - r2;
    let dg = g1 - g2;
    let db = b1 - b2;
    let hue = hue_distance(c1, c2) as i64;

    let d = (((512 + rmean) * dr * dr) >> 8) + 4 * dg * dg + (((767 - rmean) * db * db) >> 8)
        + hue * hue;
    d as u64
}

/// Distance between the chromaticities of two colors.
///
/// Each color is scaled so that its channel sum maps to 65535, which removes
/// brightness and leaves only the channel ratios. Black has no chromaticity,
/// so the result is 0 whenever either channel sum is 0.
pub fn hue_distance(c1: Argb, c2: Argb) -> u64 {
    let (r1, g1, b1) = channels(c1);
    let (r2, g2, b2) = channels(c2);

    let t1 = (r1 + g1 + b1) as usize;
    let t2 = (r2 + g2 + b2) as usize;
    if t1 == 0 || t2 == 0 {
        return 0;
    }

    let f1 = hue_factor(t1);
    let f2 = hue_factor(t2);

    let r = (512 * (r1 * f1 - r2 * f2).abs()) >> 10;
    let g = (g1 * f1 - g2 * f2).abs();
    let b = (767 * (b1 * f1 - b2 * f2).abs()) >> 10;

    ((r * r + g * g + b * b) >> 25) as u64
}

/// Composite `top` over `bottom` using the alpha byte of `top`.
///
/// The result is always opaque; the alpha of `bottom` is not consulted.
pub fn composite_over(top: Argb, bottom: Argb) -> Argb {
    let a = top.alpha() as u32;
    let inv = 255 - a;
    let blend = |t: u8, b: u8| ((t as u32 * a + b as u32 * inv) / 255) as u8;

    Argb::new(
        255,
        blend(top.red(), bottom.red()),
        blend(top.green(), bottom.green()),
        blend(top.blue(), bottom.blue()),
    )
}

/// Multiply two colors channel by channel, alpha included.
///
/// [`Argb::WHITE`] is the neutral element.
pub fn multiply(c1: Argb, c2: Argb) -> Argb {
    let mul = |a: u8, b: u8| ((a as u32 * b as u32) / 255) as u8;
    Argb::new(
        mul(c1.alpha(), c2.alpha()),
        mul(c1.red(), c2.red()),
        mul(c1.green(), c2.green()),
        mul(c1.blue(), c2.blue()),
    )
}

/// Integer mean of each channel, alpha included.
///
/// An empty slice averages to [`Argb::TRANSPARENT`].
pub fn average(colors: &[Argb]) -> Argb {
    if colors.is_empty() {
        return Argb::TRANSPARENT;
    }

    let mut sums = [0u64; 4];
    for c in colors {
        for (sum, byte) in sums.iter_mut().zip(c.to_bytes()) {
            *sum += byte as u64;
        }
    }

    let n = colors.len() as u64;
    Argb::new(
        (sums[0] / n) as u8,
        (sums[1] / n) as u8,
        (sums[2] / n) as u8,
        (sums[3] / n) as u8,
    )
}

/// Weighted brightness used to order colors as lighter or darker.
#[inline]
pub fn intensity(c: Argb) -> u32 {
    2 * c.red() as u32 + 4 * c.green() as u32 + 3 * c.blue() as u32
}

/// Per-channel correction learned by the dithering matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DitherOffset {
    pub r: i8,
    pub g: i8,
    pub b: i8,
}

impl DitherOffset {
    pub const ZERO: DitherOffset = DitherOffset { r: 0, g: 0, b: 0 };

    pub const fn new(r: i8, g: i8, b: i8) -> Self {
        Self { r, g, b }
    }

    /// Residual `target - chosen` per channel, saturated to the `i8` range.
    ///
    /// # Example
    /// ```
    /// use block_match::color::{Argb, DitherOffset};
    ///
    /// let off = DitherOffset::between(Argb::from_rgb(100, 0, 255), Argb::from_rgb(90, 200, 0));
    /// assert_eq!(off, DitherOffset::new(10, -128, 127));
    /// ```
    pub fn between(target: Argb, chosen: Argb) -> Self {
        let lane = |t: u8, c: u8| (t as i16 - c as i16).clamp(i8::MIN as i16, i8::MAX as i16) as i8;
        Self {
            r: lane(target.red(), chosen.red()),
            g: lane(target.green(), chosen.green()),
            b: lane(target.blue(), chosen.blue()),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Lanes as `[r, g, b]`.
    #[inline]
    pub fn lanes(&self) -> [i8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Add an offset to a color, clamping each channel to 0..=255.
///
/// Alpha is preserved.
pub fn apply_offset(color: Argb, offset: DitherOffset) -> Argb {
    let add = |c: u8, o: i8| (c as i16 + o as i16).clamp(0, 255) as u8;
    Argb::new(
        color.alpha(),
        add(color.red(), offset.r),
        add(color.green(), offset.g),
        add(color.blue(), offset.b),
    )
}
