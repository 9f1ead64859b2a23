//! Generator acquisition: fresh, singleton, and pooled.
//!
//! - **Fresh** ([`new_generator`]): a new seed and a new generator per call.
//!   Nothing is shared.
//! - **Singleton** ([`singleton_generator`]): one process-wide generator,
//!   built on first use.
//! - **Pool** ([`pooled_generator`]): one of [`POOL_SIZE`] process-wide
//!   generators, chosen by a pseudo-random walk.
//!
//! Singleton and pool each sit behind their own `OnceLock`, so each
//! initializer runs exactly once and concurrent first callers block until it
//! has finished.

use std::panic::Location;
use std::sync::{Mutex, OnceLock};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::deriver::process_deriver;
use crate::pool::{GeneratorPool, POOL_SIZE};

/// The wrapped pseudo-random generator.
pub type Generator = StdRng;

/// A generator shared between callers. Lock it with [`lock`](crate::pool::lock).
pub type SharedGenerator = Mutex<Generator>;

/// Build a generator from a derived seed.
pub fn generator_from_seed(seed: i64) -> Generator {
    StdRng::seed_from_u64(seed as u64)
}

/// A freshly seeded generator, owned by the caller.
#[track_caller]
pub fn new_generator() -> Generator {
    generator_from_seed(process_deriver().derive_at(Location::caller()))
}

/// A freshly seeded generator together with its seed.
///
/// Meant for verifying seed behaviour; use [`new_generator`] otherwise.
#[track_caller]
pub fn seeded_generator() -> (Generator, i64) {
    let seed = process_deriver().derive_at(Location::caller());
    (generator_from_seed(seed), seed)
}

/// The process-wide generator. Every call returns the same instance.
#[track_caller]
pub fn singleton_generator() -> &'static SharedGenerator {
    static SINGLETON: OnceLock<SharedGenerator> = OnceLock::new();
    let caller = Location::caller();
    SINGLETON.get_or_init(|| {
        let seed = process_deriver().derive_at(caller);
        log::debug!("singleton generator initialised");
        Mutex::new(generator_from_seed(seed))
    })
}

/// The process-wide pool, built on first use.
#[track_caller]
pub fn generator_pool() -> &'static GeneratorPool {
    static POOL: OnceLock<GeneratorPool> = OnceLock::new();
    let caller = Location::caller();
    POOL.get_or_init(|| {
        let pool = GeneratorPool::with_deriver(POOL_SIZE, process_deriver(), caller);
        log::debug!("generator pool initialised with {} slots", pool.len());
        pool
    })
}

/// A generator from the process-wide pool.
///
/// Two callers may receive the same generator; draws through it are
/// serialised by its mutex but interleave.
#[track_caller]
pub fn pooled_generator() -> &'static SharedGenerator {
    generator_pool().select().1
}
