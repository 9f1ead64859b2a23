use std::io;

use rand::Rng;
use seedmix_core::{generator_pool, lock, new_generator, pooled_generator, singleton_generator};
use seedmix_tests::draw_uniformity;

use super::Mode;

/// Bins shown in the histogram before the rest are summarised.
const MAX_BINS_SHOWN: usize = 32;

pub fn run(mode: Mode, count: usize, bound: u64) -> io::Result<()> {
    if bound == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "--bound must be at least 1",
        ));
    }

    let draws = draw(mode, count, bound);
    println!("{count} draws in [0, {bound}) from a {mode} generator\n");

    let hist = histogram(&draws, bound.min(MAX_BINS_SHOWN as u64));
    for (value, &c) in hist.iter().enumerate() {
        let share = if count == 0 { 0.0 } else { c as f64 / count as f64 };
        println!("  {value:>6} {c:>10} {:>7.3}%", share * 100.0);
    }
    if bound > MAX_BINS_SHOWN as u64 {
        println!("  ... {} more value(s)", bound - MAX_BINS_SHOWN as u64);
    }

    if bound >= 2 {
        let result = draw_uniformity(&draws, bound);
        let mark = if result.passed { "✓" } else { "✗" };
        let p = result
            .p_value
            .map(|p| format!("{p:.4}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "\n{mark} {}: p={p} grade {} ({})",
            result.name, result.grade, result.details
        );
    }

    if mode == Mode::Pool {
        let pool = generator_pool();
        println!("\nPool slot usage (last index {}):", pool.last_index());
        for (slot, n) in pool.selection_counts().iter().enumerate() {
            println!("  slot {slot:>2} {n:>10}");
        }
    }
    Ok(())
}

/// Draw `count` values in `[0, bound)` from a generator acquired per `mode`.
///
/// Pool mode acquires a generator for every draw so the pool walk is visible.
pub fn draw(mode: Mode, count: usize, bound: u64) -> Vec<u64> {
    match mode {
        Mode::Fresh => {
            let mut rng = new_generator();
            (0..count).map(|_| rng.random_range(0..bound)).collect()
        }
        Mode::Singleton => {
            let mut rng = lock(singleton_generator());
            (0..count).map(|_| rng.random_range(0..bound)).collect()
        }
        Mode::Pool => (0..count)
            .map(|_| lock(pooled_generator()).random_range(0..bound))
            .collect(),
    }
}

/// Counts for values `0..bins`; larger values are not counted.
fn histogram(draws: &[u64], bins: u64) -> Vec<u64> {
    let mut hist = vec![0u64; bins as usize];
    for &d in draws {
        if let Some(slot) = hist.get_mut(d as usize) {
            *slot += 1;
        }
    }
    hist
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_stay_in_bound_for_every_mode() {
        for mode in [Mode::Fresh, Mode::Singleton, Mode::Pool] {
            let draws = draw(mode, 500, 7);
            assert_eq!(draws.len(), 500);
            assert!(draws.iter().all(|&d| d < 7), "{mode} drew out of range");
        }
    }

    #[test]
    fn test_pool_mode_advances_pool() {
        let before: u64 = generator_pool().selection_counts().iter().sum();
        draw(Mode::Pool, 100, 2);
        let after: u64 = generator_pool().selection_counts().iter().sum();
        assert!(after >= before + 100);
    }

    #[test]
    fn test_histogram_counts() {
        assert_eq!(histogram(&[0, 1, 1, 2, 2, 2], 4), vec![1, 2, 3, 0]);
        assert_eq!(histogram(&[0, 5, 9], 2), vec![1, 0]);
    }

    #[test]
    fn test_zero_bound_is_rejected() {
        let err = run(Mode::Fresh, 10, 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
