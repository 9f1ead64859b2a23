//! Entropy sources folded into every seed.
//!
//! Each submodule wraps one kind of ambient state. Lookups never fail the
//! caller: they return `Option`/fallback values and the collector decides the
//! default.

pub mod caller;
pub mod helpers;
pub mod secure;
pub mod system;
