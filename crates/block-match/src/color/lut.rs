//! Hue factor lookup table access
//!
//! The reciprocal table is generated at compile time by build.rs so the hue
//! term of the distance metric never divides in the hot path.

// Include the generated LUT from build.rs
include!(concat!(env!("OUT_DIR"), "/hue_factors.rs"));

/// Return `65535 / sum` for a channel sum in `0..=765` (0 for a zero sum).
#[inline]
pub fn hue_factor(sum: usize) -> i64 {
    debug_assert!(sum < HUE_FACTORS.len(), "hue_factor: sum {sum} out of range");
    HUE_FACTORS[sum]
}
