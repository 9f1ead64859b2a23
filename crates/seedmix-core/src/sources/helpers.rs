//! Shared helpers used by the entropy sources and the deriver.

use std::time::{SystemTime, UNIX_EPOCH};

// ---------------------------------------------------------------------------
// Wall-clock timing
// ---------------------------------------------------------------------------

/// Current wall-clock time in nanoseconds since the Unix epoch.
///
/// Truncated to `i64`; a clock set before the epoch reads as 0.
pub fn wall_clock_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as i64
}

// ---------------------------------------------------------------------------
// String hashing
// ---------------------------------------------------------------------------

const FNV32_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV32_PRIME: u32 = 16_777_619;

/// FNV-1 (not 1a), 32-bit.
///
/// Multiply-then-xor per byte. Used to reduce strings (hostname, paths) to a
/// fixed-width entropy value. Reproducible across runs and platforms.
pub fn fnv1_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV32_OFFSET_BASIS;
    for &byte in bytes {
        hash = hash.wrapping_mul(FNV32_PRIME);
        hash ^= byte as u32;
    }
    hash
}

/// [`fnv1_32`] widened to a signed entropy value.
#[inline]
pub fn hash_str(s: &str) -> i64 {
    fnv1_32(s.as_bytes()) as i64
}
