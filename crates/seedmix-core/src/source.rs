//! Entropy value tags and readings.
//!
//! Every value folded into a seed carries an [`EntropyTag`] naming where it
//! came from. The tags have a fixed order ([`EntropyTag::ORDER`]) because
//! mixing is order-dependent: the same values folded in a different order
//! produce a different seed.

use serde::{Deserialize, Serialize};

/// Origin of a single entropy value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntropyTag {
    /// 32-bit big-endian draw from the OS CSPRNG.
    SecureRandom,
    /// OS memory page size.
    PageSize,
    /// Logical CPU count.
    CpuCount,
    /// Line number of the resolved caller.
    CallerLine,
    /// Caller file hash plus the call-site counter.
    CallerSite,
    /// Hash of the hostname.
    Hostname,
    /// Process id.
    ProcessId,
    /// Effective user id.
    UserId,
    /// Effective group id.
    GroupId,
    /// Hash of the current working directory.
    WorkingDir,
    /// Nanoseconds spent deriving the seed so far.
    ElapsedNanos,
}

impl EntropyTag {
    /// Collection and mixing order.
    pub const ORDER: [EntropyTag; 11] = [
        Self::SecureRandom,
        Self::PageSize,
        Self::CpuCount,
        Self::CallerLine,
        Self::CallerSite,
        Self::Hostname,
        Self::ProcessId,
        Self::UserId,
        Self::GroupId,
        Self::WorkingDir,
        Self::ElapsedNanos,
    ];

    /// Short human-readable description, used by the CLI breakdown.
    pub fn description(&self) -> &'static str {
        match self {
            Self::SecureRandom => "OS CSPRNG, 32-bit big-endian",
            Self::PageSize => "memory page size",
            Self::CpuCount => "logical CPU count",
            Self::CallerLine => "caller line number",
            Self::CallerSite => "caller file hash + call-site counter",
            Self::Hostname => "FNV-1 hash of hostname",
            Self::ProcessId => "process id",
            Self::UserId => "effective user id",
            Self::GroupId => "effective group id",
            Self::WorkingDir => "FNV-1 hash of working directory",
            Self::ElapsedNanos => "derivation self-time (ns)",
        }
    }
}

impl std::fmt::Display for EntropyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SecureRandom => write!(f, "secure_random"),
            Self::PageSize => write!(f, "page_size"),
            Self::CpuCount => write!(f, "cpu_count"),
            Self::CallerLine => write!(f, "caller_line"),
            Self::CallerSite => write!(f, "caller_site"),
            Self::Hostname => write!(f, "hostname"),
            Self::ProcessId => write!(f, "process_id"),
            Self::UserId => write!(f, "user_id"),
            Self::GroupId => write!(f, "group_id"),
            Self::WorkingDir => write!(f, "working_dir"),
            Self::ElapsedNanos => write!(f, "elapsed_nanos"),
        }
    }
}

/// One collected entropy value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntropyReading {
    pub tag: EntropyTag,
    pub value: i64,
}

impl EntropyReading {
    pub fn new(tag: EntropyTag, value: i64) -> Self {
        Self { tag, value }
    }
}
