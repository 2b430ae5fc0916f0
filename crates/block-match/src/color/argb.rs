//! Packed ARGB color type
//!
//! The catalog, the caches and every search work on packed 32-bit colors.
//! Keeping the packed form means cache keys and exact-color comparisons are a
//! single integer compare.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3, 6 or 8 characters after stripping '#')
    #[error("invalid hex color length (expected 3, 6 or 8 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// A color packed as `0xAARRGGBB`.
///
/// Alpha is usually 0 or 255 for catalog entries, but any value is legal and
/// takes part in matching: searches only consider candidates whose alpha byte
/// equals the input's alpha byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Argb(pub u32);

impl Argb {
    /// Fully transparent black.
    pub const TRANSPARENT: Argb = Argb(0);

    /// Opaque white, the neutral element of [`multiply`](super::multiply).
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);

    /// Create a color from its four channels.
    #[inline]
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Create an opaque color.
    ///
    /// # Example
    /// ```
    /// use block_match::color::Argb;
    /// assert_eq!(Argb::from_rgb(255, 0, 0).0, 0xFFFF0000);
    /// ```
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(255, r, g, b)
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Returns true if the alpha byte is 255.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.alpha() == 255
    }

    /// Same color with a different alpha byte.
    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }

    /// Channels as `[a, r, g, b]`.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Channels as `[r, g, b, a]`, the PNG RGBA8 layout.
    #[inline]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    #[inline]
    pub const fn from_rgba(rgba: [u8; 4]) -> Self {
        Self::new(rgba[3], rgba[0], rgba[1], rgba[2])
    }
}

impl From<u32> for Argb {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Argb> for u32 {
    fn from(color: Argb) -> Self {
        color.0
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for Argb {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Supports the following formats:
    /// - `#RGB` - shorthand, opaque
    /// - `#RRGGBB` - opaque
    /// - `#AARRGGBB` - explicit alpha
    ///
    /// The leading `#` is optional, parsing is case-insensitive and leading
    /// and trailing whitespace is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_match::color::Argb;
    ///
    /// let glass: Argb = "#80FF0000".parse().unwrap();
    /// assert_eq!(glass.alpha(), 0x80);
    ///
    /// let red: Argb = "#F00".parse().unwrap();
    /// assert_eq!(red, Argb::from_rgb(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: expand each digit by multiplying by 17 (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::from_rgb(r, g, b))
            }
            6 => {
                let rgb = u32::from_str_radix(s, 16)?;
                Ok(Self(0xFF00_0000 | rgb))
            }
            8 => Ok(Self(u32::from_str_radix(s, 16)?)),
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_accessors() {
        let color = Argb(0x80_11_22_33);
        assert_eq!(color.alpha(), 0x80);
        assert_eq!(color.red(), 0x11);
        assert_eq!(color.green(), 0x22);
        assert_eq!(color.blue(), 0x33);
        assert!(!color.is_opaque());
        assert_eq!(Argb::new(0x80, 0x11, 0x22, 0x33), color);
    }

    #[test]
    fn test_with_alpha_keeps_rgb() {
        let color = Argb::from_rgb(1, 2, 3).with_alpha(0);
        assert_eq!(color.0, 0x00_01_02_03);
    }

    #[test]
    fn test_rgba_layout() {
        let color = Argb(0x40_A0_B0_C0);
        assert_eq!(color.to_rgba(), [0xA0, 0xB0, 0xC0, 0x40]);
        assert_eq!(Argb::from_rgba(color.to_rgba()), color);
        assert_eq!(color.to_bytes(), [0x40, 0xA0, 0xB0, 0xC0]);
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!("#FFF".parse::<Argb>().unwrap(), Argb::WHITE);
        assert_eq!("7d7d7d".parse::<Argb>().unwrap(), Argb(0xFF7D7D7D));
        assert_eq!(" #00000000 ".parse::<Argb>().unwrap(), Argb::TRANSPARENT);
        assert_eq!("#80ff0000".parse::<Argb>().unwrap(), Argb(0x80FF0000));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "#12345".parse::<Argb>(),
            Err(ParseColorError::InvalidLength)
        );
        assert!(matches!(
            "#GG0000".parse::<Argb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        let color = Argb(0x80FF0000);
        assert_eq!(color.to_string(), "#80FF0000");
        assert_eq!(color.to_string().parse::<Argb>().unwrap(), color);
    }
}
