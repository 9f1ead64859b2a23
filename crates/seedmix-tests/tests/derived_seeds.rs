//! Battery checks against real derived seeds and generator output.

use rand::Rng;
use seedmix_core::{new_generator, seed};
use seedmix_tests::{run_byte_tests, seed_collisions};

#[test]
fn derived_seeds_have_no_collisions() {
    let seeds: Vec<i64> = (0..20_000).map(|_| seed()).collect();
    let result = seed_collisions(&seeds);
    assert!(result.passed, "{}", result.details);
}

#[test]
fn fresh_generator_output_passes_byte_battery() {
    let mut rng = new_generator();
    let mut data = vec![0u8; 20_000];
    rng.fill(&mut data[..]);
    let results = run_byte_tests(&data);
    let passed = results.iter().filter(|r| r.passed).count();
    assert!(passed >= results.len() - 1, "only {passed}/{} passed", results.len());
}
