//! OS CSPRNG draw.

/// Read a 32-bit signed integer, big-endian, from the OS CSPRNG.
///
/// A failed read leaves the buffer zeroed and yields 0. The value still takes
/// part in mixing; only its contribution is lost.
pub fn secure_random_i32() -> i32 {
    let mut buf = [0u8; 4];
    if let Err(e) = getrandom::fill(&mut buf) {
        log::debug!("secure random read failed, using {buf:?}: {e}");
    }
    i32::from_be_bytes(buf)
}
