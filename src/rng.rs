//! Seedable determinism: hold-room tie-breaking and spawn jitter
//! are the only stochastic inputs, and both draw from one seeded stream in
//! a fixed order so that identical configuration + seed produces
//! byte-identical snapshots.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct KernelRng {
    inner: ChaCha8Rng,
}

impl KernelRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        let inner = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self { inner }
    }

    /// A uniform pick among `0..len`, used for hold-room tie-breaking.
    pub fn choose_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            0
        } else {
            self.inner.random_range(0..len)
        }
    }

    /// Sub-minute jitter in whole seconds, `[0, 60)`.
    pub fn jitter_seconds(&mut self) -> u64 {
        self.inner.random_range(0..60)
    }
}
