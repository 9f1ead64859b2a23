//! Ordered entropy collection for one seed derivation.
//!
//! The collector emits exactly one reading per [`EntropyTag`], in
//! [`EntropyTag::ORDER`]. Readings are handed to a sink one at a time so the
//! final self-timing value is measured after everything before it has been
//! collected *and* consumed.

use std::panic::Location;
use std::time::Instant;

use crate::config::SeedConfig;
use crate::source::{EntropyReading, EntropyTag};
use crate::sources::caller::{CallerIdentity, external_caller};
use crate::sources::helpers::hash_str;
use crate::sources::{secure, system};

/// Gathers system and call-site entropy.
#[derive(Debug, Clone, Default)]
pub struct EntropyCollector {
    config: SeedConfig,
}

impl EntropyCollector {
    pub fn new(config: SeedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Resolve the first external caller on the current stack.
    ///
    /// `location` is the tracked entry point, used when the stack cannot be
    /// symbolised.
    pub fn resolve_caller(&self, location: &'static Location<'static>) -> Option<CallerIdentity> {
        let caller = external_caller(&self.config, location);
        if caller.is_none() {
            log::debug!(
                "no external caller above {}:{}, using zero defaults",
                location.file(),
                location.line()
            );
        }
        caller
    }

    /// Feed every reading, in order, to `sink`.
    ///
    /// `started` marks the beginning of the derivation; the last reading is the
    /// time elapsed since then, taken after `sink` returned for all others.
    pub fn collect_into<F>(&self, caller: Option<&CallerIdentity>, started: Instant, mut sink: F)
    where
        F: FnMut(EntropyReading),
    {
        for tag in EntropyTag::ORDER {
            let value = match tag {
                EntropyTag::ElapsedNanos => started.elapsed().as_nanos() as i64,
                other => Self::read(other, caller),
            };
            sink(EntropyReading::new(tag, value));
        }
    }

    /// All readings as a vector.
    pub fn collect(&self, caller: Option<&CallerIdentity>, started: Instant) -> Vec<EntropyReading> {
        let mut readings = Vec::with_capacity(EntropyTag::ORDER.len());
        self.collect_into(caller, started, |r| readings.push(r));
        readings
    }

    fn read(tag: EntropyTag, caller: Option<&CallerIdentity>) -> i64 {
        match tag {
            EntropyTag::SecureRandom => secure::secure_random_i32() as i64,
            EntropyTag::PageSize => system::page_size().unwrap_or_else(|| {
                log::debug!("page size unavailable, using 0");
                0
            }),
            EntropyTag::CpuCount => system::cpu_count(),
            EntropyTag::CallerLine => caller.map(CallerIdentity::line_value).unwrap_or(0),
            EntropyTag::CallerSite => caller.map(CallerIdentity::site_value).unwrap_or(0),
            EntropyTag::Hostname => {
                let name = system::hostname().unwrap_or_else(|| {
                    log::debug!("hostname lookup failed, hashing empty string");
                    String::new()
                });
                hash_str(&name)
            }
            EntropyTag::ProcessId => system::process_id(),
            EntropyTag::UserId => system::user_id(),
            EntropyTag::GroupId => system::group_id(),
            EntropyTag::WorkingDir => {
                let wd = system::working_dir().unwrap_or_else(|| {
                    log::debug!("working directory lookup failed, hashing empty string");
                    String::new()
                });
                hash_str(&wd)
            }
            // Measured by collect_into at the point of use.
            EntropyTag::ElapsedNanos => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_caller() -> CallerIdentity {
        CallerIdentity {
            site: 0xdead_beef,
            file: "src/main.rs".to_string(),
            line: 42,
        }
    }

    #[test]
    fn emits_every_tag_in_order() {
        let collector = EntropyCollector::default();
        let readings = collector.collect(None, Instant::now());
        let tags: Vec<EntropyTag> = readings.iter().map(|r| r.tag).collect();
        assert_eq!(tags, EntropyTag::ORDER.to_vec());
    }

    #[test]
    fn missing_caller_contributes_zero() {
        let collector = EntropyCollector::default();
        let readings = collector.collect(None, Instant::now());
        assert_eq!(readings[3].value, 0);
        assert_eq!(readings[4].value, 0);
    }

    #[test]
    fn caller_values_come_from_identity() {
        let collector = EntropyCollector::default();
        let caller = app_caller();
        let readings = collector.collect(Some(&caller), Instant::now());
        assert_eq!(readings[3].tag, EntropyTag::CallerLine);
        assert_eq!(readings[3].value, 42);
        assert_eq!(readings[4].value, caller.site_value());
    }

    #[test]
    fn host_values_match_system_lookups() {
        let collector = EntropyCollector::default();
        let readings = collector.collect(None, Instant::now());
        let value = |tag: EntropyTag| readings.iter().find(|r| r.tag == tag).unwrap().value;
        assert_eq!(value(EntropyTag::CpuCount), system::cpu_count());
        assert_eq!(value(EntropyTag::ProcessId), system::process_id());
        assert_eq!(
            value(EntropyTag::WorkingDir),
            hash_str(&system::working_dir().unwrap_or_default())
        );
    }

    #[test]
    fn elapsed_is_measured_after_sink() {
        let collector = EntropyCollector::default();
        let started = Instant::now();
        let mut last = None;
        collector.collect_into(None, started, |r| {
            if r.tag == EntropyTag::WorkingDir {
                std::thread::sleep(std::time::Duration::from_millis(2));
            }
            last = Some(r);
        });
        let last = last.unwrap();
        assert_eq!(last.tag, EntropyTag::ElapsedNanos);
        assert!(last.value >= 2_000_000, "elapsed {} ns", last.value);
    }

    #[test]
    fn resolve_caller_skips_library_frames() {
        // This test sits in the crate's src/, so it can never be the caller.
        let collector = EntropyCollector::default();
        if let Some(caller) = collector.resolve_caller(Location::caller()) {
            assert!(!caller.file.contains("seedmix-core/src/"), "{}", caller.file);
        }
    }

    #[test]
    fn resolve_caller_honours_empty_marker() {
        // With no marker the nearest frame above the walk is this collector.
        let collector = EntropyCollector::new(SeedConfig {
            library_marker: String::new(),
            exclusions: Vec::new(),
        });
        let caller = collector.resolve_caller(Location::caller()).unwrap();
        let file = caller.file.replace('\\', "/");
        assert!(file.ends_with("src/collector.rs"), "{file}");
    }
}
