//! Decorator that dithers repeated colors and rotates biome mixes
//!
//! Large flat areas of one color map to a single entry, which shows up as
//! banding. The dithering matcher remembers, per exact input color, how far
//! the last chosen entry was from the color, and offsets the next lookup of
//! the same color by that residual. Repeated pixels of one color therefore
//! alternate between entries on either side of it.
//!
//! The feedback is single-step: each residual replaces the previous one
//! rather than accumulating, so the choice can oscillate instead of settling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{BiomeId, BiomeMix, Catalog, CatalogError, EntryId, LayerPair};
use crate::color::{apply_offset, distance, Argb, DitherOffset};

use super::{Matcher, Shade, TerrainChoice};

/// Options for [`DitheringMatcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DitherOptions {
    /// Seed for randomly scaling each offset before it is applied.
    ///
    /// `None` applies offsets in full, which makes results a pure function
    /// of the call sequence.
    pub jitter_seed: Option<u64>,
}

impl DitherOptions {
    /// Scale offsets by a random factor drawn from a generator seeded with
    /// `seed`.
    pub fn jitter(seed: u64) -> Self {
        Self {
            jitter_seed: Some(seed),
        }
    }
}

/// Learned state of a [`DitheringMatcher`].
#[derive(Debug, Clone, Default)]
pub struct DitherState {
    offsets: HashMap<Argb, DitherOffset>,
    mixes: HashMap<Argb, BiomeMix>,
    rotation: u8,
}

impl DitherState {
    /// Offset the next lookup of `color` will apply.
    pub fn offset(&self, color: Argb) -> DitherOffset {
        self.offsets.get(&color).copied().unwrap_or_default()
    }

    /// Rotation slot used by the most recent biome lookup.
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn clear(&mut self) {
        self.offsets.clear();
        self.mixes.clear();
        self.rotation = 0;
    }

    /// Advance `0 -> 1 -> 2 -> 0` and return the new slot.
    fn advance(&mut self) -> usize {
        self.rotation = (self.rotation + 1) % 3;
        self.rotation as usize
    }
}

/// Offsets repeated lookups of a color by the residual of the previous
/// lookup, and cycles through the three biomes of a color's nearest mix.
///
/// Only [`nearest`](Matcher::nearest) is dithered; the other entry searches
/// pass through unchanged. [`nearest_biome`](Matcher::nearest_biome) and
/// [`nearest_biome_mix_rotating`](Matcher::nearest_biome_mix_rotating) share
/// one rotation index per instance.
pub struct DitheringMatcher {
    inner: Box<dyn Matcher>,
    state: DitherState,
    options: DitherOptions,
    seed: Option<u64>,
    rng: Option<StdRng>,
    forks: AtomicU64,
}

/// Spreads consecutive fork numbers over the seed space.
const FORK_SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

impl DitheringMatcher {
    pub fn new(inner: Box<dyn Matcher>, options: DitherOptions) -> Self {
        Self::seeded(inner, options, options.jitter_seed)
    }

    fn seeded(inner: Box<dyn Matcher>, options: DitherOptions, seed: Option<u64>) -> Self {
        Self {
            inner,
            state: DitherState::default(),
            options,
            seed,
            rng: seed.map(StdRng::seed_from_u64),
            forks: AtomicU64::new(0),
        }
    }

    /// Fresh matcher whose jitter generator is seeded from this instance's
    /// seed and its fork count, so sibling forks draw different sequences.
    fn forked(&self) -> Self {
        let n = self.forks.fetch_add(1, Ordering::Relaxed) + 1;
        let seed = self.seed.map(|s| s ^ n.wrapping_mul(FORK_SEED_STEP));
        Self::seeded(self.inner.fork(), self.options, seed)
    }

    pub fn state(&self) -> &DitherState {
        &self.state
    }

    pub fn options(&self) -> DitherOptions {
        self.options
    }

    /// Scale each non-zero lane to a random magnitude below its own,
    /// keeping the sign. Without a generator the offset is returned as is.
    fn jitter(&mut self, offset: DitherOffset) -> DitherOffset {
        let Some(rng) = self.rng.as_mut() else {
            return offset;
        };
        let mut lane = |v: i8| -> i8 {
            let magnitude = (v as i16).abs();
            if magnitude == 0 {
                return 0;
            }
            let scaled = rng.gen_range(0..magnitude);
            (scaled * (v as i16).signum()) as i8
        };
        let [r, g, b] = offset.lanes();
        DitherOffset::new(lane(r), lane(g), lane(b))
    }

    /// The remembered mix for `color`, looked up once per color.
    fn mix_for(&mut self, color: Argb) -> Option<BiomeMix> {
        if let Some(mix) = self.state.mixes.get(&color) {
            return Some(*mix);
        }
        let mix = self.inner.nearest_biome_mix(color)?;
        self.state.mixes.insert(color, mix);
        Some(mix)
    }

    fn rotated_biome(&mut self, color: Argb) -> Option<BiomeId> {
        let mix = self.mix_for(color)?;
        let slot = self.state.advance();
        Some(mix.slot(slot))
    }
}

impl Matcher for DitheringMatcher {
    fn catalog(&self) -> &Arc<Catalog> {
        self.inner.catalog()
    }

    fn color_of(&self, entry: EntryId) -> Result<Argb, CatalogError> {
        self.inner.color_of(entry)
    }

    fn biome(&self) -> Option<BiomeId> {
        self.inner.biome()
    }

    fn nearest(&mut self, color: Argb) -> Option<EntryId> {
        let offset = self.state.offset(color);
        let query = if offset.is_zero() {
            color
        } else {
            let offset = self.jitter(offset);
            apply_offset(color, offset)
        };

        let chosen = self.inner.nearest(query)?;
        if let Ok(chosen_color) = self.inner.color_of(chosen) {
            self.state
                .offsets
                .insert(color, DitherOffset::between(color, chosen_color));
        }
        Some(chosen)
    }

    fn next_nearest(&mut self, color: Argb) -> Option<EntryId> {
        self.inner.next_nearest(color)
    }

    fn nearest_shade(&mut self, color: Argb, shade: Shade) -> Option<EntryId> {
        self.inner.nearest_shade(color, shade)
    }

    fn nearest_layer_pair(&mut self, color: Argb) -> Option<LayerPair> {
        self.inner.nearest_layer_pair(color)
    }

    fn nearest_biome(&mut self, color: Argb) -> Option<BiomeId> {
        self.rotated_biome(color)
    }

    fn nearest_biome_mix(&mut self, color: Argb) -> Option<BiomeMix> {
        self.mix_for(color)
    }

    fn nearest_biome_mix_rotating(&mut self, color: Argb) -> Option<BiomeId> {
        self.rotated_biome(color)
    }

    /// Compares the dithered entry against the averaged tint of the color's
    /// mix, and picks the biome from the rotating slot.
    fn entry_or_biome(&mut self, color: Argb, biome_priority: u64) -> Option<TerrainChoice> {
        let entry = self.nearest(color)?;
        let mix = self.mix_for(color)?;
        let biome = mix.slot(self.state.advance());

        let entry_distance = distance(self.inner.color_of(entry).ok()?, color);
        let biome_distance = distance(mix.average, color);
        Some(TerrainChoice {
            entry,
            biome,
            entry_is_closer: biome_distance.saturating_sub(biome_priority) > entry_distance,
        })
    }

    fn fork(&self) -> Box<dyn Matcher> {
        Box::new(self.forked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BiomeSpec, EntrySpec};
    use crate::matcher::PaletteMatcher;

    fn black_white() -> Box<dyn Matcher> {
        let catalog = Catalog::build(
            vec![
                EntrySpec::new(0, Argb(0xFF000000)),
                EntrySpec::new(1, Argb(0xFFFFFFFF)),
            ],
            vec![
                BiomeSpec::new(1, "dark", Argb(0xFF000000)),
                BiomeSpec::new(2, "mid", Argb(0xFF3C3C3C)),
                BiomeSpec::new(3, "light", Argb(0xFF787878)),
            ],
            Argb::WHITE,
        )
        .unwrap();
        Box::new(PaletteMatcher::new(Arc::new(catalog)))
    }

    #[test]
    fn test_first_lookup_is_plain_nearest() {
        let mut inner = black_white();
        let mut dither = DitheringMatcher::new(black_white(), DitherOptions::default());
        let grey = Argb(0xFF606060);
        assert_eq!(dither.nearest(grey), inner.nearest(grey));
    }

    #[test]
    fn test_repeated_color_alternates() {
        let mut dither = DitheringMatcher::new(black_white(), DitherOptions::default());
        let grey = Argb(0xFF606060);
        let picks: Vec<_> = (0..6).map(|_| dither.nearest(grey).unwrap()).collect();
        assert_eq!(picks, vec![0, 1, 0, 1, 0, 1]);
        // residual of the last pick, white, saturated to the i8 range
        assert_eq!(dither.state().offset(grey), DitherOffset::new(-128, -128, -128));
    }

    #[test]
    fn test_exact_match_is_stable() {
        let mut dither = DitheringMatcher::new(black_white(), DitherOptions::default());
        for _ in 0..5 {
            assert_eq!(dither.nearest(Argb::WHITE), Some(1));
        }
        assert!(dither.state().offset(Argb::WHITE).is_zero());
    }

    #[test]
    fn test_no_match_leaves_state_alone() {
        let mut dither = DitheringMatcher::new(black_white(), DitherOptions::default());
        assert_eq!(dither.nearest(Argb(0x00606060)), None);
        assert!(dither.state().offset(Argb(0x00606060)).is_zero());
    }

    #[test]
    fn test_rotation_visits_all_three_slots() {
        let mut dither = DitheringMatcher::new(black_white(), DitherOptions::default());
        let color = Argb(0xFF3C3C3C);
        let mix = dither.nearest_biome_mix(color).unwrap();
        assert_eq!(mix.ids, [1, 2, 3]);

        let picks: Vec<_> = (0..4)
            .map(|_| dither.nearest_biome_mix_rotating(color).unwrap())
            .collect();
        assert_eq!(&picks[..3], &[mix.ids[1], mix.ids[2], mix.ids[0]]);
        assert_eq!(picks[3], picks[0]);
    }

    #[test]
    fn test_rotation_is_shared_across_biome_lookups() {
        let mut dither = DitheringMatcher::new(black_white(), DitherOptions::default());
        let color = Argb(0xFF3C3C3C);
        assert_eq!(dither.nearest_biome(color), Some(2));
        assert_eq!(dither.nearest_biome_mix_rotating(color), Some(3));
        assert_eq!(dither.nearest_biome(color), Some(1));
        assert_eq!(dither.state().rotation(), 0);
    }

    #[test]
    fn test_jitter_keeps_sign_and_bound() {
        let mut dither = DitheringMatcher::new(black_white(), DitherOptions::jitter(11));
        for _ in 0..200 {
            let j = dither.jitter(DitherOffset::new(10, -128, 0));
            assert!((0..10).contains(&j.r), "r lane {}", j.r);
            assert!((-127..=0).contains(&j.g), "g lane {}", j.g);
            assert_eq!(j.b, 0);
        }
        let mut plain = DitheringMatcher::new(black_white(), DitherOptions::default());
        assert_eq!(plain.jitter(DitherOffset::new(5, 5, 5)), DitherOffset::new(5, 5, 5));
    }

    #[test]
    fn test_jitter_is_reproducible_per_seed() {
        let grey = Argb(0xFF707070);
        let run = |seed| {
            let mut dither = DitheringMatcher::new(black_white(), DitherOptions::jitter(seed));
            (0..50).map(|_| dither.nearest(grey).unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_entry_or_biome_uses_mix_average() {
        let mut dither = DitheringMatcher::new(black_white(), DitherOptions::default());
        let color = Argb(0xFF3C3C3C);
        let choice = dither.entry_or_biome(color, 0).unwrap();
        // the mix averages to exactly this color, so the biome always wins
        assert!(!choice.entry_is_closer);
        assert_eq!(choice.biome, 2);

        let choice = dither.entry_or_biome(Argb::WHITE, 0).unwrap();
        assert_eq!(choice.entry, 1);
    }

    #[test]
    fn test_fork_starts_fresh() {
        let mut dither = DitheringMatcher::new(black_white(), DitherOptions::jitter(1));
        let grey = Argb(0xFF606060);
        dither.nearest(grey);
        dither.nearest_biome(Argb(0xFF3C3C3C));

        let mut forked = dither.fork();
        assert_eq!(forked.nearest(grey), Some(0));
        assert_eq!(forked.nearest_biome(Argb(0xFF3C3C3C)), Some(2));
        assert!(!dither.state().offset(grey).is_zero());
    }

    #[test]
    fn test_forks_draw_distinct_jitter() {
        let draws = |m: &mut DitheringMatcher| {
            (0..64)
                .map(|_| m.jitter(DitherOffset::new(100, -100, 100)))
                .collect::<Vec<_>>()
        };

        let parent = DitheringMatcher::new(black_white(), DitherOptions::jitter(3));
        let first = draws(&mut parent.forked());
        let second = draws(&mut parent.forked());
        assert_ne!(first, second, "sibling forks share a jitter sequence");
        assert_ne!(first, draws(&mut DitheringMatcher::new(black_white(), DitherOptions::jitter(3))));

        // the n-th fork of a parent with the same seed draws the same sequence
        let again = DitheringMatcher::new(black_white(), DitherOptions::jitter(3));
        assert_eq!(draws(&mut again.forked()), first);
        assert_eq!(again.forked().options(), DitherOptions::jitter(3));
    }
}
