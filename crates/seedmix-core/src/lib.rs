//! # seedmix-core
//!
//! Decorrelated 64-bit seeds for pseudo-random generators.
//!
//! A seed is mixed from system state (page size, CPU count, hostname, ids,
//! working directory), the caller's source location, a 32-bit OS CSPRNG draw,
//! and the derivation's own running time. Callers get distinct generator
//! streams across calls, threads, and processes without sharing state.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rand::Rng;
//! use seedmix_core::{lock, new_generator, pooled_generator, seed, singleton_generator};
//!
//! // A raw seed
//! let s: i64 = seed();
//!
//! // An owned generator with its own seed
//! let mut rng = new_generator();
//! let roll: u32 = rng.random_range(1..=6);
//!
//! // Process-wide generators are shared behind a mutex
//! let n: u64 = lock(singleton_generator()).random();
//! let m: u64 = lock(pooled_generator()).random();
//! # let _ = (s, roll, n, m);
//! ```
//!
//! ## Architecture
//!
//! Collector (ordered readings) → Mixer (random add/sub/mul, wrapping) → Seed
//! → `StdRng`
//!
//! This is a decorrelation mechanism, not a CSPRNG: the seed is not meant to
//! be unpredictable to an adversary.

pub mod collector;
pub mod config;
pub mod deriver;
pub mod generator;
pub mod mixer;
pub mod pool;
pub mod source;
pub mod sources;

pub use collector::EntropyCollector;
pub use config::{DEFAULT_EXCLUSIONS, EXCLUDE_ENV, SeedConfig, parse_exclusions};
pub use deriver::{MixStep, SeedDeriver, SeedReport, process_deriver, seed};
pub use generator::{
    Generator, SharedGenerator, generator_from_seed, generator_pool, new_generator,
    pooled_generator, seeded_generator, singleton_generator,
};
pub use mixer::{MixOp, SeedMixer};
pub use pool::{GeneratorPool, POOL_SIZE, lock};
pub use source::{EntropyReading, EntropyTag};
pub use sources::caller::{CallerIdentity, external_caller, resolve_caller};
pub use sources::helpers::fnv1_32;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
