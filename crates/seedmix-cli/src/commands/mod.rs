pub mod collisions;
pub mod explain;
pub mod report;
pub mod sample;
pub mod seed;

use clap::ValueEnum;
use seedmix_core::{SeedConfig, SeedDeriver};

/// How a generator is acquired for `sample`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// A new generator with its own seed
    #[value(alias = "new")]
    Fresh,
    /// The process-wide generator
    #[value(alias = "single")]
    Singleton,
    /// A generator from the process-wide pool
    #[value(alias = "pooled")]
    Pool,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fresh => write!(f, "fresh"),
            Self::Singleton => write!(f, "singleton"),
            Self::Pool => write!(f, "pool"),
        }
    }
}

/// Build a deriver from the environment configuration plus CLI exclusions.
pub fn make_deriver(exclude: &[String]) -> SeedDeriver {
    let config = SeedConfig::from_env().with_exclusions(exclude.iter().cloned());
    log::debug!("deriver exclusions: {:?}", config.exclusions);
    SeedDeriver::new(config)
}
