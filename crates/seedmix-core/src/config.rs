//! Seed derivation configuration.
//!
//! Controls which call frames count as "inside" the library when resolving
//! the caller identity. A frame is skipped when its source path contains the
//! library marker or any exclusion entry (plain substring match).

/// Environment variable with extra comma-separated exclusion patterns.
pub const EXCLUDE_ENV: &str = "SEEDMIX_EXCLUDE";

/// Exclusions applied by default. Standard-library frames carry
/// `/rustc/<commit>/library/...` paths.
pub const DEFAULT_EXCLUSIONS: &[&str] = &["/rustc/"];

/// Configuration for [`SeedDeriver`](crate::SeedDeriver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// Path substring identifying this library's own source files.
    pub library_marker: String,
    /// Additional path substrings whose frames are never reported as caller.
    pub exclusions: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            library_marker: default_library_marker(),
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SeedConfig {
    /// Defaults plus any patterns listed in `SEEDMIX_EXCLUDE`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(EXCLUDE_ENV) {
            let extra = parse_exclusions(&raw);
            if !extra.is_empty() {
                log::debug!("{EXCLUDE_ENV}: adding {} exclusion(s)", extra.len());
            }
            config.exclusions.extend(extra);
        }
        config
    }

    /// Append exclusion patterns.
    pub fn with_exclusions<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(
            patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty()),
        );
        self
    }

    /// Whether a frame from `file` belongs to the library or the exclusion list.
    pub fn is_excluded(&self, file: &str) -> bool {
        let file = normalize_path(file);
        if !self.library_marker.is_empty() && file.contains(&self.library_marker) {
            return true;
        }
        self.exclusions
            .iter()
            .any(|pattern| file.contains(pattern.as_str()))
    }
}

/// Split a comma-separated pattern list, dropping blanks.
pub fn parse_exclusions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Directory holding this crate's sources, e.g. `crates/seedmix-core/src/`.
///
/// Taken from `file!()` so it matches however the crate was built
/// (workspace member, path dependency, or registry checkout).
fn default_library_marker() -> String {
    let this_file = normalize_path(file!());
    match this_file.strip_suffix("config.rs") {
        Some(dir) => dir.to_string(),
        None => this_file,
    }
}

pub(crate) fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
