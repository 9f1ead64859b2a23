//! Process and host state: page size, CPU count, hostname, ids, cwd.
//!
//! Every lookup is best-effort. A failed lookup yields `None` (or a fixed
//! fallback) and the collector folds in the default instead.

/// OS memory page size in bytes.
#[cfg(unix)]
pub fn page_size() -> Option<i64> {
    // SAFETY: sysconf() only reads a system configuration value.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 { Some(size as i64) } else { None }
}

#[cfg(not(unix))]
pub fn page_size() -> Option<i64> {
    None
}

/// Number of logical CPUs available to this process (1 if unknown).
pub fn cpu_count() -> i64 {
    std::thread::available_parallelism()
        .map(|n| n.get() as i64)
        .unwrap_or(1)
}

/// Hostname of this machine.
#[cfg(unix)]
pub fn hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    // SAFETY: buf is valid for buf.len() bytes; gethostname writes at most
    // that many and we never read past the first NUL.
    let ret = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if ret != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    Some(String::from_utf8_lossy(&buf[..end]).into_owned())
}

#[cfg(not(unix))]
pub fn hostname() -> Option<String> {
    None
}

/// Current process id.
pub fn process_id() -> i64 {
    std::process::id() as i64
}

/// Effective user id (0 where the concept does not exist).
#[cfg(unix)]
pub fn user_id() -> i64 {
    // SAFETY: geteuid() cannot fail and has no side effects.
    unsafe { libc::geteuid() as i64 }
}

#[cfg(not(unix))]
pub fn user_id() -> i64 {
    0
}

/// Effective group id (0 where the concept does not exist).
#[cfg(unix)]
pub fn group_id() -> i64 {
    // SAFETY: getegid() cannot fail and has no side effects.
    unsafe { libc::getegid() as i64 }
}

#[cfg(not(unix))]
pub fn group_id() -> i64 {
    0
}

/// Current working directory as a lossy UTF-8 string.
pub fn working_dir() -> Option<String> {
    std::env::current_dir()
        .ok()
        .map(|p| p.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_count_is_positive() {
        assert!(cpu_count() >= 1);
    }

    #[test]
    fn process_id_matches_std() {
        assert_eq!(process_id(), std::process::id() as i64);
    }

    #[test]
    #[cfg(unix)]
    fn page_size_is_power_of_two() {
        let size = page_size().expect("sysconf(_SC_PAGESIZE) failed");
        assert!(size >= 4096);
        assert_eq!(size & (size - 1), 0);
    }

    #[test]
    #[cfg(unix)]
    fn hostname_has_no_nul() {
        if let Some(name) = hostname() {
            assert!(!name.contains('\0'));
        }
    }

    #[test]
    fn working_dir_is_absolute() {
        let wd = working_dir().expect("current_dir failed");
        assert!(std::path::Path::new(&wd).is_absolute());
    }

    #[test]
    #[cfg(unix)]
    fn ids_are_non_negative() {
        assert!(user_id() >= 0);
        assert!(group_id() >= 0);
    }
}
