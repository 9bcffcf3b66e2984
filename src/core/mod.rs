//! Core deterministic primitives.
//!
//! Everything here is a pure function of its inputs: the seeded PRNG that
//! drives option shuffling and the date hash that drives the daily
//! challenge. No system time, no ambient randomness.

pub mod rng;
pub mod daily;

// Re-export core types
pub use rng::{DeterministicRng, derive_session_seed};
pub use daily::{cyrb53, daily_index, today_utc, yesterday_of};
