//! Seed derivation: collector + mixer.
//!
//! ```text
//! wall clock ns ─┬─> accumulator
//!                └─> chooser seed
//! readings (fixed order) ──mix──> accumulator ──> seed
//! ```
//!
//! Derivation is total. Every failed lookup has already been replaced by its
//! default by the time it reaches the mixer.

use std::panic::Location;
use std::sync::OnceLock;
use std::time::Instant;

use serde::Serialize;

use crate::collector::EntropyCollector;
use crate::config::SeedConfig;
use crate::mixer::{MixOp, SeedMixer};
use crate::source::EntropyTag;
use crate::sources::caller::CallerIdentity;
use crate::sources::helpers::wall_clock_nanos;

/// Derives seeds with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct SeedDeriver {
    collector: EntropyCollector,
}

/// One mixing step as recorded by [`SeedDeriver::explain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MixStep {
    pub tag: EntropyTag,
    pub value: i64,
    pub op: MixOp,
    /// Accumulator after this step.
    pub accumulator: i64,
}

/// Full trace of one derivation.
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    /// Wall-clock nanoseconds the accumulator and chooser started from.
    pub initial: i64,
    pub caller: Option<CallerIdentity>,
    pub steps: Vec<MixStep>,
    pub seed: i64,
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.caller {
            Some(c) => writeln!(f, "Caller:  {}:{} (site {:#x})", c.file, c.line, c.site)?,
            None => writeln!(f, "Caller:  (not resolved)")?,
        }
        writeln!(f, "Initial: {}", self.initial)?;
        writeln!(f)?;
        writeln!(
            f,
            "  {:<14} {:>2} {:>21} {:>21}",
            "Source", "Op", "Value", "Accumulator"
        )?;
        writeln!(f, "  {}", "-".repeat(61))?;
        for step in &self.steps {
            writeln!(
                f,
                "  {:<14} {:>2} {:>21} {:>21}",
                step.tag.to_string(),
                step.op.to_string(),
                step.value,
                step.accumulator
            )?;
        }
        writeln!(f)?;
        write!(f, "Seed:    {}", self.seed)
    }
}

impl SeedDeriver {
    pub fn new(config: SeedConfig) -> Self {
        Self {
            collector: EntropyCollector::new(config),
        }
    }

    pub fn collector(&self) -> &EntropyCollector {
        &self.collector
    }

    /// Derive a seed attributed to the caller of this method.
    #[track_caller]
    pub fn derive(&self) -> i64 {
        self.derive_at(Location::caller())
    }

    /// Derive a seed, falling back to `location` as the caller when the
    /// stack cannot be symbolised.
    pub fn derive_at(&self, location: &'static Location<'static>) -> i64 {
        self.run(location, |_| {}).seed
    }

    /// Derive a seed and keep every intermediate step.
    #[track_caller]
    pub fn explain(&self) -> SeedReport {
        self.explain_at(Location::caller())
    }

    pub fn explain_at(&self, location: &'static Location<'static>) -> SeedReport {
        let mut steps = Vec::with_capacity(EntropyTag::ORDER.len());
        let mut report = self.run(location, |step| steps.push(step));
        report.steps = steps;
        report
    }

    fn run<F>(&self, location: &'static Location<'static>, mut observe: F) -> SeedReport
    where
        F: FnMut(MixStep),
    {
        let started = Instant::now();
        let initial = wall_clock_nanos();
        let mut mixer = SeedMixer::new(initial);
        let caller = self.collector.resolve_caller(location);

        self.collector
            .collect_into(caller.as_ref(), started, |reading| {
                let op = mixer.mix(reading.value);
                observe(MixStep {
                    tag: reading.tag,
                    value: reading.value,
                    op,
                    accumulator: mixer.accumulator(),
                });
            });

        SeedReport {
            initial,
            caller,
            steps: Vec::new(),
            seed: mixer.finish(),
        }
    }
}

/// Process-wide deriver, configured once from the environment.
pub fn process_deriver() -> &'static SeedDeriver {
    static DERIVER: OnceLock<SeedDeriver> = OnceLock::new();
    DERIVER.get_or_init(|| SeedDeriver::new(SeedConfig::from_env()))
}

/// Derive one seed from system state, the caller's location, and the OS CSPRNG.
///
/// Never fails. Consecutive calls are distinct with overwhelming probability
/// but not by construction.
#[track_caller]
pub fn seed() -> i64 {
    process_deriver().derive_at(Location::caller())
}
