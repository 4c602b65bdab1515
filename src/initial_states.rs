// src/initial_states.rs
//
// Initial orientation generators. Randomness is always drawn from an
// explicit, seedable RNG so relaxation trajectories are bit-reproducible:
// seed once, then draw in site enumeration order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::vec3::normalize;

/// One draw uniform in [-1, 1]^3 (not normalised; the context normalises).
pub fn random_in_cube(rng: &mut StdRng) -> [f64; 3] {
    [
        2.0 * rng.gen::<f64>() - 1.0,
        2.0 * rng.gen::<f64>() - 1.0,
        2.0 * rng.gen::<f64>() - 1.0,
    ]
}

/// Position function drawing a fresh random orientation per site from an RNG
/// seeded exactly once, before any draw. Intended for `Sim::set_m`.
pub fn seeded_random_orientation(seed: u64) -> impl FnMut([f64; 3]) -> [f64; 3] {
    let mut rng = StdRng::seed_from_u64(seed);
    move |_pos| random_in_cube(&mut rng)
}

/// Position function assigning the same (normalised) direction everywhere.
pub fn uniform_orientation(dir: [f64; 3]) -> impl Fn([f64; 3]) -> [f64; 3] {
    let v = normalize(dir);
    move |_pos| v
}
