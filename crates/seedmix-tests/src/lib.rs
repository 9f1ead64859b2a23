//! Randomness checks for derived seeds and generator output.
//!
//! Two batteries:
//! - **Byte tests** run over any byte stream (seed bytes, generator output).
//! - **Seed tests** run over a batch of `i64` seeds: collisions, per-bit
//!   balance, and avalanche between consecutive seeds.
//!
//! Each test returns a [`TestResult`] with a p-value (where applicable), a
//! pass/fail determination, and a letter grade (A through F).

use flate2::Compression;
use flate2::write::ZlibEncoder;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, DiscreteCDF, Normal, Poisson};
use statrs::function::erf::erfc;
use std::collections::HashSet;
use std::io::Write;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single randomness test.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold (default 0.01).
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    fn from_p(name: &str, p: f64, statistic: f64, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed: Self::pass_from_p(Some(p), 0.01),
            p_value: Some(p),
            statistic,
            details,
            grade: Self::grade_from_p(Some(p)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Little-endian bytes of every seed, concatenated.
pub fn seeds_to_bytes(seeds: &[i64]) -> Vec<u8> {
    seeds.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Unpack a byte slice into individual bits (MSB first per byte).
fn to_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Return a failing `TestResult` when data is too short.
fn insufficient(name: &str, needed: usize, got: usize) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed: false,
        p_value: None,
        statistic: 0.0,
        details: format!("Insufficient data: need {needed}, got {got}"),
        grade: 'F',
    }
}

/// Upper tail of the chi-squared distribution (0 for invalid degrees of freedom).
fn chi2_sf(dof: f64, statistic: f64) -> f64 {
    ChiSquared::new(dof).map(|d| d.sf(statistic)).unwrap_or(0.0)
}

/// Two-sided normal p-value for a z score.
fn two_sided_p(z: f64) -> f64 {
    let norm = Normal::standard();
    (2.0 * (1.0 - norm.cdf(z.abs()))).clamp(0.0, 1.0)
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. BYTE TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Monobit frequency -- proportion of 1s vs 0s should be ~50%.
pub fn monobit_frequency(data: &[u8]) -> TestResult {
    let name = "Monobit Frequency";
    let bits = to_bits(data);
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let s: i64 = bits
        .iter()
        .map(|&b| if b == 1 { 1i64 } else { -1i64 })
        .sum();
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = erfc(s_obs / 2.0_f64.sqrt());
    TestResult::from_p(name, p, s_obs, format!("S={s}, n={n}"))
}

/// Block frequency -- proportion of ones within 128-bit blocks, chi-squared.
pub fn block_frequency(data: &[u8]) -> TestResult {
    let name = "Block Frequency";
    let block_size: usize = 128;
    let bits = to_bits(data);
    let num_blocks = bits.len() / block_size;
    if num_blocks < 10 {
        return insufficient(name, 10 * block_size, bits.len());
    }
    let chi2: f64 = bits
        .chunks_exact(block_size)
        .map(|block| {
            let pi = block.iter().map(|&b| b as f64).sum::<f64>() / block_size as f64;
            (pi - 0.5) * (pi - 0.5)
        })
        .sum::<f64>()
        * 4.0
        * block_size as f64;
    let p = chi2_sf(num_blocks as f64, chi2);
    TestResult::from_p(name, p, chi2, format!("blocks={num_blocks}, M={block_size}"))
}

/// Byte frequency -- chi-squared on byte value distribution (256 bins).
pub fn byte_frequency(data: &[u8]) -> TestResult {
    let name = "Byte Frequency";
    let n = data.len();
    if n < 256 {
        return insufficient(name, 256, n);
    }
    let mut hist = [0u64; 256];
    for &b in data {
        hist[b as usize] += 1;
    }
    let expected = n as f64 / 256.0;
    let chi2: f64 = hist
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum();
    let p = chi2_sf(255.0, chi2);
    TestResult::from_p(name, p, chi2, format!("n={n}, expected_per_bin={expected:.1}"))
}

/// Runs test -- number of uninterrupted runs of 0s or 1s.
pub fn runs_test(data: &[u8]) -> TestResult {
    let name = "Runs Test";
    let bits = to_bits(data);
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let ones: usize = bits.iter().map(|&b| b as usize).sum();
    let prop = ones as f64 / n as f64;
    if (prop - 0.5).abs() >= 2.0 / (n as f64).sqrt() {
        return TestResult {
            name: name.to_string(),
            passed: false,
            p_value: Some(0.0),
            statistic: 0.0,
            details: format!("Pre-test failed: proportion={prop:.4}"),
            grade: 'F',
        };
    }
    let runs = 1 + bits.windows(2).filter(|w| w[0] != w[1]).count();
    let expected = 2.0 * n as f64 * prop * (1.0 - prop) + 1.0;
    let std = 2.0 * (2.0 * n as f64).sqrt() * prop * (1.0 - prop);
    let z = (runs as f64 - expected).abs() / std;
    let p = erfc(z / 2.0_f64.sqrt());
    TestResult::from_p(name, p, z, format!("runs={runs}, expected={expected:.0}"))
}

/// Compression ratio -- zlib compression ratio (random ~ 1.0+).
pub fn compression_ratio(data: &[u8]) -> TestResult {
    let name = "Compression Ratio";
    let n = data.len();
    if n < 32 {
        return insufficient(name, 32, n);
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    let written = encoder.write_all(data);
    let compressed = match written.and_then(|()| encoder.finish()) {
        Ok(c) => c,
        Err(e) => {
            return TestResult {
                name: name.to_string(),
                passed: false,
                p_value: None,
                statistic: 0.0,
                details: format!("zlib failed: {e}"),
                grade: 'F',
            };
        }
    };
    let ratio = compressed.len() as f64 / n as f64;
    let grade = if ratio > 0.95 {
        'A'
    } else if ratio > 0.85 {
        'B'
    } else if ratio > 0.7 {
        'C'
    } else if ratio > 0.5 {
        'D'
    } else {
        'F'
    };
    TestResult {
        name: name.to_string(),
        passed: ratio > 0.85,
        p_value: None,
        statistic: ratio,
        details: format!("{}/{n} = {ratio:.4}", compressed.len()),
        grade,
    }
}

/// Bit avalanche -- adjacent bytes should differ by ~4 bits (50%).
pub fn bit_avalanche(data: &[u8]) -> TestResult {
    let name = "Bit Avalanche";
    let n = data.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let pairs = n - 1;
    let total_diffs: u64 = data
        .windows(2)
        .map(|w| (w[0] ^ w[1]).count_ones() as u64)
        .sum();
    let mean_diff = total_diffs as f64 / pairs as f64;
    let std = 2.0_f64.sqrt(); // binomial std for n=8, p=0.5
    let z = (mean_diff - 4.0) / (std / (pairs as f64).sqrt());
    let p = two_sided_p(z);
    TestResult::from_p(
        name,
        p,
        mean_diff,
        format!("mean_diff={mean_diff:.3}/8 bits, expected=4.0"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. SEED TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Seed collisions -- duplicates against the birthday expectation for 64-bit values.
pub fn seed_collisions(seeds: &[i64]) -> TestResult {
    let name = "Seed Collisions";
    let n = seeds.len();
    if n < 2 {
        return insufficient(name, 2, n);
    }
    let mut seen = HashSet::with_capacity(n);
    let dups = seeds.iter().filter(|s| !seen.insert(**s)).count() as u64;

    let nf = n as f64;
    let lambda = nf * (nf - 1.0) / 2.0 / 2f64.powi(64);
    let p = if dups == 0 {
        1.0
    } else {
        Poisson::new(lambda.max(f64::MIN_POSITIVE))
            .map(|poisson| poisson.sf(dups - 1))
            .unwrap_or(0.0)
    };
    TestResult::from_p(
        name,
        p,
        dups as f64,
        format!("duplicates={dups}, expected={lambda:.2e}, n={n}"),
    )
}

/// Bit-position balance -- each of the 64 bit positions should be set in
/// ~50% of seeds. Sum of squared z scores against chi-squared(64).
pub fn bit_position_balance(seeds: &[i64]) -> TestResult {
    let name = "Bit Position Balance";
    let n = seeds.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let mut ones = [0u64; 64];
    for &s in seeds {
        let bits = s as u64;
        for (pos, count) in ones.iter_mut().enumerate() {
            *count += (bits >> pos) & 1;
        }
    }
    let nf = n as f64;
    let chi2: f64 = ones
        .iter()
        .map(|&c| {
            let z = (2.0 * c as f64 - nf) / nf.sqrt();
            z * z
        })
        .sum();
    let (worst_pos, worst) = ones
        .iter()
        .enumerate()
        .max_by(|a, b| {
            let da = (*a.1 as f64 / nf - 0.5).abs();
            let db = (*b.1 as f64 / nf - 0.5).abs();
            da.total_cmp(&db)
        })
        .map(|(pos, &c)| (pos, c as f64 / nf))
        .unwrap_or((0, 0.5));
    let p = chi2_sf(64.0, chi2);
    TestResult::from_p(
        name,
        p,
        chi2,
        format!("n={n}, worst bit {worst_pos} set {:.2}%", worst * 100.0),
    )
}

/// Seed avalanche -- consecutive seeds should differ in ~32 of 64 bits.
pub fn seed_avalanche(seeds: &[i64]) -> TestResult {
    let name = "Seed Avalanche";
    let n = seeds.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let pairs = n - 1;
    let total: u64 = seeds
        .windows(2)
        .map(|w| (w[0] ^ w[1]).count_ones() as u64)
        .sum();
    let mean = total as f64 / pairs as f64;
    let std = 4.0; // binomial std for n=64, p=0.5
    let z = (mean - 32.0) / (std / (pairs as f64).sqrt());
    let p = two_sided_p(z);
    TestResult::from_p(name, p, mean, format!("mean_diff={mean:.3}/64 bits, expected=32.0"))
}

/// Uniformity of bounded draws -- chi-squared of `draws` over `[0, bound)`.
pub fn draw_uniformity(draws: &[u64], bound: u64) -> TestResult {
    let name = "Draw Uniformity";
    let bins = bound as usize;
    if bins < 2 {
        return insufficient(name, 2, bins);
    }
    let needed = bins.saturating_mul(5);
    if draws.len() < needed {
        return insufficient(name, needed, draws.len());
    }
    let mut hist = vec![0u64; bins];
    for &d in draws {
        if let Some(slot) = hist.get_mut(d as usize) {
            *slot += 1;
        }
    }
    let out_of_range = draws.len() as u64 - hist.iter().sum::<u64>();
    if out_of_range > 0 {
        return TestResult {
            name: name.to_string(),
            passed: false,
            p_value: Some(0.0),
            statistic: out_of_range as f64,
            details: format!("{out_of_range} draw(s) outside [0, {bound})"),
            grade: 'F',
        };
    }
    let expected = draws.len() as f64 / bins as f64;
    let chi2: f64 = hist
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum();
    let p = chi2_sf((bins - 1) as f64, chi2);
    TestResult::from_p(name, p, chi2, format!("n={}, bins={bins}", draws.len()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Batteries
// ═══════════════════════════════════════════════════════════════════════════════

/// Run every byte test on a byte slice.
pub fn run_byte_tests(data: &[u8]) -> Vec<TestResult> {
    let tests: [fn(&[u8]) -> TestResult; 6] = [
        monobit_frequency,
        block_frequency,
        byte_frequency,
        runs_test,
        compression_ratio,
        bit_avalanche,
    ];
    tests.iter().map(|test_fn| test_fn(data)).collect()
}

/// Run the seed tests, then the byte tests over the seeds' little-endian bytes.
pub fn run_seed_tests(seeds: &[i64]) -> Vec<TestResult> {
    let mut results = vec![
        seed_collisions(seeds),
        bit_position_balance(seeds),
        seed_avalanche(seeds),
    ];
    results.extend(run_byte_tests(&seeds_to_bytes(seeds)));
    results
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}
