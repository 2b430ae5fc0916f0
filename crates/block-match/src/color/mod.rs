//! Packed colors and the integer color math used for matching
//!
//! Every catalog color is an [`Argb`]: a `0xAARRGGBB` word, exactly as the
//! asset pipeline hands it over. All arithmetic stays in integers so that
//! distances are reproducible bit for bit across platforms.
//!
//! # Example
//!
//! ```
//! use block_match::color::{distance, Argb};
//!
//! let black = Argb::from_rgb(0, 0, 0);
//! let grey = Argb::from_rgb(16, 16, 16);
//! assert_eq!(distance(black, black), 0);
//! assert!(distance(black, grey) > 0);
//! ```

mod argb;
mod lut;
mod math;

pub use argb::{Argb, ParseColorError};
pub use math::{
    apply_offset, average, composite_over, distance, hue_distance, intensity, multiply,
    DitherOffset,
};
