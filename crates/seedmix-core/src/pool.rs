//! Fixed-size pool of independently seeded generators.
//!
//! Selection is a pseudo-random walk: the selector paired with the last
//! selected slot draws the next index. Selectors are forked from their slot's
//! generator at construction and never handed out, so selection only ever
//! waits on another selection, never on a caller holding a generator.
//!
//! The index update is a plain atomic store after an unsynchronised read, so
//! concurrent callers can land on the same slot. That is accepted; a slot is
//! shared, not leased. Each slot sits behind its own mutex, so sharing only
//! interleaves draws.

use std::panic::Location;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::{Rng, SeedableRng};

use crate::deriver::SeedDeriver;
use crate::generator::{Generator, SharedGenerator, generator_from_seed};

/// Size of the process-wide pool returned by [`generator_pool`](crate::generator_pool).
pub const POOL_SIZE: usize = 10;

/// Thread-safe pool of seeded generators.
pub struct GeneratorPool {
    slots: Vec<SharedGenerator>,
    selectors: Vec<Mutex<Generator>>,
    seeds: Vec<i64>,
    last: AtomicUsize,
    selections: Vec<AtomicU64>,
}

impl GeneratorPool {
    /// Create a pool of `size` generators (at least one), each with its own seed.
    #[track_caller]
    pub fn new(size: usize) -> Self {
        Self::with_deriver(size, &SeedDeriver::default(), Location::caller())
    }

    /// Create a pool seeding every slot through `deriver`, attributed to `location`.
    pub fn with_deriver(
        size: usize,
        deriver: &SeedDeriver,
        location: &'static Location<'static>,
    ) -> Self {
        let size = size.max(1);
        let seeds: Vec<i64> = (0..size).map(|_| deriver.derive_at(location)).collect();
        Self::from_seeds(&seeds)
    }

    /// Create a pool from explicit seeds. An empty slice yields one slot seeded with 0.
    pub fn from_seeds(seeds: &[i64]) -> Self {
        let seeds: Vec<i64> = if seeds.is_empty() {
            vec![0]
        } else {
            seeds.to_vec()
        };
        let mut slots = Vec::with_capacity(seeds.len());
        let mut selectors = Vec::with_capacity(seeds.len());
        for &seed in &seeds {
            let mut generator = generator_from_seed(seed);
            selectors.push(Mutex::new(Generator::from_rng(&mut generator)));
            slots.push(Mutex::new(generator));
        }
        Self {
            slots,
            selectors,
            selections: seeds.iter().map(|_| AtomicU64::new(0)).collect(),
            seeds,
            last: AtomicUsize::new(0),
        }
    }

    /// Number of generators.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false: a pool holds at least one generator.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index chosen by the most recent selection.
    pub fn last_index(&self) -> usize {
        self.last.load(Ordering::Relaxed)
    }

    /// Seed each slot (and its selector) was created from.
    pub fn seeds(&self) -> &[i64] {
        &self.seeds
    }

    /// Generator at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&SharedGenerator> {
        self.slots.get(index)
    }

    /// Walk to the next slot and return it with its index.
    pub fn select(&self) -> (usize, &SharedGenerator) {
        let current = self.last.load(Ordering::Relaxed);
        let next = lock(&self.selectors[current]).random_range(0..self.slots.len());
        self.last.store(next, Ordering::Relaxed);
        self.selections[next].fetch_add(1, Ordering::Relaxed);
        (next, &self.slots[next])
    }

    /// How many times each slot has been selected.
    pub fn selection_counts(&self) -> Vec<u64> {
        self.selections
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect()
    }
}

/// Lock a shared generator, recovering it if a previous holder panicked.
///
/// A generator has no invariant a panic can break mid-update, so poisoning
/// carries no information here.
pub fn lock(generator: &SharedGenerator) -> MutexGuard<'_, Generator> {
    generator.lock().unwrap_or_else(PoisonError::into_inner)
}
