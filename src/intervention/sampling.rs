//! Gamma and Beta sampling for Thompson Sampling.
//!
//! Beta(a, b) is drawn as X / (X + Y) with X ~ Gamma(a), Y ~ Gamma(b). Gamma uses
//! Marsaglia-Tsang for shape >= 1 and the `U^(1/shape)` boost below 1. Every draw
//! comes from the caller's generator so seeded runs are reproducible.

use rand::Rng;

/// Shapes at or below zero are raised to this floor.
pub const MIN_SHAPE: f64 = 0.01;

/// Uniform draw on the open interval (0, 1).
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u > 0.0 {
            return u;
        }
    }
}

/// Standard normal via Box-Muller.
pub fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = open_unit(rng);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

pub fn sample_gamma<R: Rng + ?Sized>(rng: &mut R, shape: f64) -> f64 {
    let shape = if shape.is_nan() || shape <= 0.0 { MIN_SHAPE } else { shape };

    if shape < 1.0 {
        let boosted = sample_gamma(rng, shape + 1.0);
        return boosted * open_unit(rng).powf(1.0 / shape);
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let x = sample_standard_normal(rng);
        let t = 1.0 + c * x;
        if t <= 0.0 {
            continue;
        }
        let v = t * t * t;
        let u = open_unit(rng);
        if u < 1.0 - 0.0331 * x.powi(4) {
            return d * v;
        }
        if u.ln() < 0.5 * x * x + d * (1.0 - v + v.ln()) {
            return d * v;
        }
    }
}

pub fn sample_beta<R: Rng + ?Sized>(rng: &mut R, alpha: f64, beta: f64) -> f64 {
    let x = sample_gamma(rng, alpha);
    let y = sample_gamma(rng, beta);
    let total = x + y;
    if total > 0.0 {
        x / total
    } else {
        // Both draws underflowed (tiny shapes); fall back to the mean.
        let alpha = alpha.max(MIN_SHAPE);
        alpha / (alpha + beta.max(MIN_SHAPE))
    }
}
