//! Colour sampling for generated fields.

use oddone_core::{ColorPair, DifficultyTier, RandomSource};

const HUE_STEPS: u32 = 360;
const SATURATION_FLOOR: f32 = 0.65;
// 0.65 through 0.90 in steps of one hundredth.
const SATURATION_STEPS: u32 = 26;

/// Draws a fresh hue and saturation and derives the field's colour pair.
///
/// Hue is one of the whole degrees `0..360`; saturation is one of the
/// hundredths `0.65..=0.90`. The tier only affects the unusual brightness.
pub fn sample_color_pair(tier: DifficultyTier, random: &mut dyn RandomSource) -> ColorPair {
    let hue = random.next_below(HUE_STEPS) as f32;
    let saturation = SATURATION_FLOOR + random.next_below(SATURATION_STEPS) as f32 / 100.0;
    ColorPair::new(hue, saturation, tier)
}
