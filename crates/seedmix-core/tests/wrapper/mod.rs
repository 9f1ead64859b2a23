//! A user-side helper that derives on behalf of its caller.

use seedmix_core::{SeedDeriver, SeedReport};

#[inline(never)]
pub fn explain(deriver: &SeedDeriver) -> SeedReport {
    deriver.explain()
}

#[inline(never)]
pub fn explain_twice_removed(deriver: &SeedDeriver) -> SeedReport {
    explain(deriver)
}
