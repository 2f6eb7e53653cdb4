// Host-side tests for the range helpers.

use diorama_core::random::{random_float, random_float_tls, random_int, random_int_tls};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn random_int_stays_in_rounded_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut seen = [false; 4];
    for _ in 0..500 {
        let v = random_int(&mut rng, 0.5, 5.0);
        assert!((1..5).contains(&v), "{v} out of range");
        seen[(v - 1) as usize] = true;
    }
    assert!(seen.iter().all(|&s| s), "every value should appear: {seen:?}");
}

#[test]
fn random_int_equal_bounds_return_ceiled_min() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(random_int(&mut rng, 4.0, 4.0), 4);
    assert_eq!(random_int(&mut rng, 3.2, 4.9), 4);
}

#[test]
fn random_int_rounding_past_each_other_counts_down() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        assert!((2..=3).contains(&random_int(&mut rng, 2.2, 2.8)));
    }
}

#[test]
fn random_int_reversed_bounds_sample_downwards() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut seen = [false; 5];
    for _ in 0..500 {
        let v = random_int(&mut rng, 5.0, 1.0);
        assert!((1..=5).contains(&v), "{v} out of range");
        seen[(v - 1) as usize] = true;
    }
    assert!(seen[..4].iter().all(|&s| s), "values spread over the range: {seen:?}");
}

#[test]
fn random_int_handles_negative_bounds() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let v = random_int(&mut rng, -3.7, -1.2);
        assert!((-3..-1).contains(&v));
    }
}

#[test]
fn random_float_is_half_open() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let v = random_float(&mut rng, -2.0, 3.0);
        assert!((-2.0..3.0).contains(&v));
    }
}

#[test]
fn random_float_equal_bounds_return_min() {
    let mut rng = StdRng::seed_from_u64(5);
    assert_eq!(random_float(&mut rng, 1.5, 1.5), 1.5);
}

#[test]
fn random_float_reversed_bounds_stay_between_them() {
    let mut rng = StdRng::seed_from_u64(5);
    let values: Vec<f64> = (0..200).map(|_| random_float(&mut rng, 2.0, -1.0)).collect();
    assert!(values.iter().all(|v| *v > -1.0 && *v <= 2.0));
    assert!(values.iter().any(|v| *v < 0.5) && values.iter().any(|v| *v > 0.5));
}

#[test]
fn thread_rng_wrappers_respect_ranges() {
    for _ in 0..100 {
        assert!((10..20).contains(&random_int_tls(10.0, 20.0)));
        assert!((0.0..1.0).contains(&random_float_tls(0.0, 1.0)));
    }
}
