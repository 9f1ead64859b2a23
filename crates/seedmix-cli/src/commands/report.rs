use std::io;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use seedmix_tests::{TestResult, calculate_quality_score, run_seed_tests};

/// JSON document written by `report --output`.
#[derive(Debug, Serialize)]
pub struct SeedBatteryReport {
    pub seedmix_version: String,
    pub seeds: usize,
    pub score: f64,
    pub passed: usize,
    pub results: Vec<TestResult>,
}

pub fn run(seeds: usize, output_path: Option<&str>) -> io::Result<()> {
    println!("🔬 Running seed battery on {seeds} derived seeds...\n");

    let t0 = Instant::now();
    let batch: Vec<i64> = (0..seeds).map(|_| seedmix_core::seed()).collect();
    let report = build_report(&batch);
    println!(
        "  Derived and tested in {:.2}s → {:.0}/100 ({}/{} passed)\n",
        t0.elapsed().as_secs_f64(),
        report.score,
        report.passed,
        report.results.len()
    );

    println!(
        "  {:<22} {:>5} {:>10} {:>12}  Details",
        "Test", "Grade", "p-value", "Statistic"
    );
    println!("  {}", "-".repeat(72));
    for r in &report.results {
        let p = r
            .p_value
            .map(|p| format!("{p:.4}"))
            .unwrap_or_else(|| "-".to_string());
        let mark = if r.passed { "✓" } else { "✗" };
        println!(
            "{mark} {:<22} {:>5} {:>10} {:>12.4}  {}",
            r.name, r.grade, p, r.statistic, r.details
        );
    }

    if let Some(path) = output_path {
        write_report(Path::new(path), &report)?;
        println!("\n📄 Report saved to: {path}");
    }
    Ok(())
}

pub fn build_report(seeds: &[i64]) -> SeedBatteryReport {
    let results = run_seed_tests(seeds);
    SeedBatteryReport {
        seedmix_version: seedmix_core::VERSION.to_string(),
        seeds: seeds.len(),
        score: calculate_quality_score(&results),
        passed: results.iter().filter(|r| r.passed).count(),
        results,
    }
}

pub fn write_report(path: &Path, report: &SeedBatteryReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_report_counts() {
        let seeds: Vec<i64> = (0..500).map(|_| seedmix_core::seed()).collect();
        let report = build_report(&seeds);
        assert_eq!(report.seeds, 500);
        assert_eq!(report.results.len(), 9);
        assert!(report.passed <= report.results.len());
        assert!((0.0..=100.0).contains(&report.score));
        assert!(report.results[0].passed, "derived seeds collided");
    }

    #[test]
    fn test_write_report_produces_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let seeds: Vec<i64> = (0..200).map(|_| seedmix_core::seed()).collect();
        write_report(&path, &build_report(&seeds)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["seeds"], 200);
        assert_eq!(value["results"][0]["name"], "Seed Collisions");
        assert_eq!(value["seedmix_version"], seedmix_core::VERSION);
    }

    #[test]
    fn test_write_report_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let seeds: Vec<i64> = (0..10).map(|_| seedmix_core::seed()).collect();
        assert!(write_report(&path, &build_report(&seeds)).is_err());
    }
}
