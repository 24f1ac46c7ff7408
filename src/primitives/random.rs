//! Random draws shared by the generators and the optimizers.

use rand::Rng;
use std::f64::consts::PI;

/// Standard normal draw (Box-Muller).
pub(crate) fn randn(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-10);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
