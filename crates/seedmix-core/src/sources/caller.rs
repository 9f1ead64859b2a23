//! Call-site identity.
//!
//! The caller is found by walking the stack upward from the walk itself and
//! taking the first frame whose source file is neither library code nor on
//! the exclusion list. A wrapper the user excludes is therefore looked
//! through, and its own caller is reported instead.
//!
//! Frames are symbolised from debug info. When that is missing (stripped
//! release builds) the walk never finds itself, and the `#[track_caller]`
//! location of the public entry point is used as the only candidate.
//!
//! This is best-effort path matching. A caller whose own path happens to
//! contain the marker or an exclusion is treated as not found.

use std::collections::HashMap;
use std::panic::Location;
use std::sync::{Mutex, OnceLock, PoisonError};

use serde::Serialize;

use crate::config::{SeedConfig, normalize_path};

use super::helpers::hash_str;

/// Frames captured per walk. Callers deeper than this are not found.
const MAX_FRAMES: usize = 64;

/// Resolved call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdentity {
    /// Instruction pointer of the call site, or the address of its static
    /// location record when the stack could not be symbolised.
    pub site: u64,
    pub file: String,
    pub line: u32,
}

impl CallerIdentity {
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            site: location as *const Location<'static> as usize as u64,
            file: location.file().to_string(),
            line: location.line(),
        }
    }

    /// Entropy value for the line number.
    pub fn line_value(&self) -> i64 {
        self.line as i64
    }

    /// Entropy value combining the file hash and the site counter.
    pub fn site_value(&self) -> i64 {
        hash_str(&self.file).wrapping_add(self.site as i64)
    }
}

/// Return the first frame that is neither library code nor excluded.
pub fn resolve_caller<I>(frames: I, config: &SeedConfig) -> Option<CallerIdentity>
where
    I: IntoIterator<Item = CallerIdentity>,
{
    frames
        .into_iter()
        .find(|frame| !config.is_excluded(&frame.file))
}

/// Walk the current stack and resolve the first external frame above it.
///
/// `fallback` is consulted only when the stack carries no usable symbols.
pub fn external_caller(
    config: &SeedConfig,
    fallback: &'static Location<'static>,
) -> Option<CallerIdentity> {
    let frames = capture_frames();
    let mut symbols = frames.iter().flat_map(symbolize);

    // Unwinder frames come first, then this module, then its callers.
    let mut anchored = false;
    while let Some(frame) = symbols.next() {
        if is_walk_frame(&frame.file) {
            anchored = true;
        } else if anchored {
            return resolve_caller(std::iter::once(frame).chain(symbols), config);
        }
    }

    if anchored {
        return None;
    }
    log::debug!("stack frames carry no symbols, using tracked location");
    resolve_caller([CallerIdentity::from_location(fallback)], config)
}

#[inline(never)]
fn capture_frames() -> Vec<backtrace::Frame> {
    let mut frames = Vec::with_capacity(MAX_FRAMES);
    backtrace::trace(|frame| {
        frames.push(frame.clone());
        frames.len() < MAX_FRAMES
    });
    frames
}

/// Source positions per instruction pointer, innermost inlined frame first.
type SymbolCache = HashMap<usize, Vec<(String, u32)>>;

fn symbol_cache() -> &'static Mutex<SymbolCache> {
    static CACHE: OnceLock<Mutex<SymbolCache>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Every logical frame at `frame`'s address that has a file and line.
fn symbolize(frame: &backtrace::Frame) -> Vec<CallerIdentity> {
    let ip = frame.ip() as usize;
    let mut cache = symbol_cache()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let positions = cache.entry(ip).or_insert_with(|| {
        let mut found = Vec::new();
        backtrace::resolve_frame(frame, |symbol| {
            if let (Some(path), Some(line)) = (symbol.filename(), symbol.lineno()) {
                found.push((path.to_string_lossy().into_owned(), line));
            }
        });
        found
    });
    positions
        .iter()
        .map(|(file, line)| CallerIdentity {
            site: ip as u64,
            file: file.clone(),
            line: *line,
        })
        .collect()
}

/// Whether `file` is this module, i.e. the frame belongs to the walk itself.
fn is_walk_frame(file: &str) -> bool {
    normalize_path(file).ends_with(&normalize_path(file!()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(file: &str, line: u32) -> CallerIdentity {
        CallerIdentity {
            site: 0x1000 + line as u64,
            file: file.to_string(),
            line,
        }
    }

    fn test_config() -> SeedConfig {
        SeedConfig {
            library_marker: "seedmix-core/src/".to_string(),
            exclusions: vec!["once_lock.rs".to_string()],
        }
    }

    // -----------------------------------------------------------------------
    // Frame filtering
    // -----------------------------------------------------------------------

    #[test]
    fn skips_library_and_excluded_frames() {
        let frames = [
            frame("crates/seedmix-core/src/deriver.rs", 10),
            frame("/rustc/abc/library/std/src/sync/once_lock.rs", 20),
            frame("src/app/worker.rs", 30),
            frame("src/main.rs", 40),
        ];
        let caller = resolve_caller(frames, &test_config()).unwrap();
        assert_eq!(caller.file, "src/app/worker.rs");
        assert_eq!(caller.line, 30);
    }

    #[test]
    fn exhausted_stack_is_not_found() {
        let frames = [
            frame("crates/seedmix-core/src/generator.rs", 1),
            frame("x/once_lock.rs", 2),
        ];
        assert!(resolve_caller(frames, &test_config()).is_none());
        assert!(resolve_caller([], &test_config()).is_none());
    }

    #[test]
    fn first_external_frame_wins() {
        let frames = [frame("src/a.rs", 1), frame("src/b.rs", 2)];
        assert_eq!(resolve_caller(frames, &test_config()).unwrap().file, "src/a.rs");
    }

    // -----------------------------------------------------------------------
    // Stack walk
    // -----------------------------------------------------------------------

    #[test]
    fn walk_frame_matches_absolute_and_windows_paths() {
        let relative = normalize_path(file!());
        assert!(is_walk_frame(file!()));
        assert!(is_walk_frame(&format!("/home/dev/project/{relative}")));
        assert!(is_walk_frame(&format!("C:\\work\\{}", relative.replace('/', "\\"))));
        assert!(!is_walk_frame("crates/seedmix-core/tests/caller.rs"));
    }

    #[test]
    fn walk_never_reports_library_frames() {
        let config = SeedConfig::default();
        if let Some(caller) = external_caller(&config, Location::caller()) {
            assert!(!config.is_excluded(&caller.file), "{}", caller.file);
        }
    }

    // -----------------------------------------------------------------------
    // Identity values
    // -----------------------------------------------------------------------

    #[test]
    fn from_location_captures_this_file() {
        let here = Location::caller();
        let id = CallerIdentity::from_location(here);
        assert_eq!(id.file, file!());
        assert!(id.line > 0);
        assert_ne!(id.site, 0);
    }

    #[test]
    fn distinct_call_sites_have_distinct_identity() {
        let a = CallerIdentity::from_location(Location::caller());
        let b = CallerIdentity::from_location(Location::caller());
        assert_ne!(a.line, b.line);
        assert_ne!(a.site_value(), b.site_value());
    }

    #[test]
    fn site_value_wraps_instead_of_overflowing() {
        let id = CallerIdentity {
            site: u64::MAX,
            file: "src/main.rs".to_string(),
            line: 7,
        };
        assert_eq!(id.site_value(), hash_str("src/main.rs").wrapping_add(-1));
        assert_eq!(id.line_value(), 7);
    }
}
