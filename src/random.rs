//! Random number generator construction.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a seeded RNG.
///
/// The same seed always yields the same stream, which makes whole runs
/// reproducible when the fitness function is pure.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from `seed`, or from a random seed when `None`.
pub fn rng_from_option(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => create_rng(s),
        None => create_rng(rand::random()),
    }
}
