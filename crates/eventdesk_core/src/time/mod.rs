//! Time-zone normalization between caller wall-clock time and stored instants.
//!
//! # Responsibility
//! - Convert local wall-clock times in a named zone (IANA or Windows id) to
//!   UTC instants.
//! - Render stored UTC instants back into a requested zone.
//! - Answer whether a zone identifier is known.
//!
//! # Invariants
//! - Storage and every validity check use UTC instants only.
//! - Conversions never fail: an unknown zone falls back to
//!   [`DEFAULT_TIME_ZONE`]. Callers that care must gate on [`is_valid_zone`].

mod windows;
pub mod zone;

pub use zone::{
    from_absolute, is_valid_zone, resolve_zone, to_absolute, LocalTime, DEFAULT_TIME_ZONE,
};
