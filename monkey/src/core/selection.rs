//! Victim selection policy

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Uniform random choice over a candidate snapshot.
///
/// Every candidate has probability `1/n` on each pick; nothing is remembered
/// between picks.
#[derive(Debug, Clone)]
pub struct VictimPicker {
    rng: StdRng,
}

impl VictimPicker {
    /// Picker seeded from the operating system's entropy source
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible picker for tests and replayable runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick one candidate; `None` only when there is nothing to pick from
    pub fn pick<'a>(&mut self, candidates: &'a [String]) -> Option<&'a String> {
        candidates.choose(&mut self.rng)
    }
}

impl Default for VictimPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}
