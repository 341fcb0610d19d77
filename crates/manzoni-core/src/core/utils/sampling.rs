use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Creates the deterministic generator used everywhere randomness enters tracking.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draws one standard normal deviate with the Box-Muller transform.
#[inline]
pub fn standard_normal(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.r#gen::<f64>().max(1e-300); // avoid ln(0)
    let u2: f64 = rng.r#gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
