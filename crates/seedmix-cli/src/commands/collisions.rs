use std::io;
use std::sync::Mutex;
use std::time::Instant;

use seedmix_tests::seed_collisions;

pub fn run(count: usize, workers: usize) -> io::Result<()> {
    let workers = workers.max(1);
    println!("Deriving {count} seeds on {workers} worker(s)...");

    let t0 = Instant::now();
    let seeds = derive_concurrently(count, workers);
    let elapsed = t0.elapsed().as_secs_f64();

    let result = seed_collisions(&seeds);
    let rate = if elapsed > 0.0 {
        seeds.len() as f64 / elapsed
    } else {
        0.0
    };
    println!(
        "  {} seeds in {elapsed:.2}s ({rate:.0}/s), {}",
        seeds.len(),
        result.details
    );

    if result.statistic > 0.0 {
        return Err(io::Error::other(format!(
            "{} duplicate seed(s) found",
            result.statistic
        )));
    }
    println!("  ✓ no duplicates");
    Ok(())
}

/// Derive `count` seeds split across `workers` threads.
pub fn derive_concurrently(count: usize, workers: usize) -> Vec<i64> {
    let workers = workers.max(1);
    let results = Mutex::new(Vec::with_capacity(count));
    std::thread::scope(|s| {
        for w in 0..workers {
            let share = count / workers + usize::from(w < count % workers);
            let results = &results;
            s.spawn(move || {
                let local: Vec<i64> = (0..share).map(|_| seedmix_core::seed()).collect();
                results
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .extend(local);
            });
        }
    });
    results
        .into_inner()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
