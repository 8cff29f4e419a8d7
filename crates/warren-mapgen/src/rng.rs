//! Random-stream helpers shared by the generation steps.

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Percentage-style draws layered over any [`Rng`].
pub trait RogueRng: Rng {
    /// True with probability `chance / 100`. Values at or beyond the range
    /// ends short-circuit so a 100% check never fails and a 0% check never
    /// passes.
    fn percentage_check(&mut self, chance: f64) -> bool
    where
        Self: Sized,
    {
        if chance >= 100.0 {
            return true;
        }
        if chance <= 0.0 {
            return false;
        }
        self.gen_range(0.0..100.0) < chance
    }
}

impl<R: Rng> RogueRng for R {}

/// A ChaCha stream derived from a base seed and a stream index.
///
/// Distinct stream indices give independent, reproducible streams, letting a
/// pipeline hand every randomized step its own generator from one seed.
pub fn derive_stream(seed: u64, stream: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(mix_seed_stream(seed, stream))
}

fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    // Moremur finalizer over the folded inputs.
    let mut state = seed.rotate_left(25) ^ stream.wrapping_add(0xA076_1D64_78BD_642F);
    state ^= state >> 27;
    state = state.wrapping_mul(0x3C79_AC49_2BA7_B653);
    state ^= state >> 33;
    state = state.wrapping_mul(0x1C69_B3F7_4AC4_AE35);
    state ^ (state >> 27)
}
