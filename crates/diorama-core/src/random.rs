//! Range helpers used when scattering decorations.

use rand::Rng;
use std::cmp::Ordering;

/// Uniform integer between `ceil(min)` (inclusive) and `floor(max)`.
///
/// Equal bounds (after rounding) yield `ceil(min)`. Reversed bounds sample
/// downwards from `ceil(min)`, so `(2.2, 2.8)` gives 2 almost always.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> i64 {
    let lo = min.ceil() as i64;
    let hi = max.floor() as i64;
    match hi.cmp(&lo) {
        Ordering::Greater => rng.gen_range(lo..hi),
        Ordering::Equal => lo,
        Ordering::Less => (lo as f64 + rng.gen::<f64>() * (hi - lo) as f64).floor() as i64,
    }
}

/// Uniform float between `min` (inclusive) and `max`; `min` when they are
/// equal. Reversed bounds give values in `(max, min]`.
pub fn random_float<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        return rng.gen_range(min..max);
    }
    min + rng.gen::<f64>() * (max - min)
}

#[inline]
pub fn random_int_tls(min: f64, max: f64) -> i64 {
    random_int(&mut rand::thread_rng(), min, max)
}

#[inline]
pub fn random_float_tls(min: f64, max: f64) -> f64 {
    random_float(&mut rand::thread_rng(), min, max)
}
