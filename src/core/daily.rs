//! Daily Challenge Selection
//!
//! Maps a calendar date to an item index, identically for every player and
//! stable across reloads and process restarts. No session randomness is
//! involved: the index is a pure function of the ISO date string and the
//! eligible-pool size.
//!
//! Localized catalogs are sorted by numeric id at build time, so the same
//! index lands on the same logical item in every locale.

use chrono::{Duration, NaiveDate, Utc};

/// 53-bit string hash (cyrb53).
///
/// Well-mixed, fast, and dirt simple. The mixing uses 32-bit wrapping
/// multiplies over UTF-16 code units; the result combines 21 high bits and
/// 32 low bits into a 53-bit value.
///
/// The exact output is load-bearing: changing it reshuffles every past and
/// future daily item. Regression-pinned in the tests below.
pub fn cyrb53(input: &str, seed: u32) -> u64 {
    let mut h1: u32 = 0xdead_beef ^ seed;
    let mut h2: u32 = 0x41c6_ce57 ^ seed;

    for unit in input.encode_utf16() {
        let ch = unit as u32;
        h1 = (h1 ^ ch).wrapping_mul(2_654_435_761);
        h2 = (h2 ^ ch).wrapping_mul(1_597_334_677);
    }

    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(2_246_822_507)
        ^ (h2 ^ (h2 >> 13)).wrapping_mul(3_266_489_909);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(2_246_822_507)
        ^ (h1 ^ (h1 >> 13)).wrapping_mul(3_266_489_909);

    4_294_967_296u64 * (h2 & 2_097_151) as u64 + h1 as u64
}

/// Derive today's item index from a date string (`YYYY-MM-DD`).
///
/// Returns `None` when the eligible pool is empty, which the round engine
/// surfaces as an [`EmptyCandidateSet`](crate::game::round::RoundError)
/// condition rather than a crash.
pub fn daily_index(date: &str, pool_len: usize) -> Option<usize> {
    if pool_len == 0 {
        return None;
    }
    Some((cyrb53(date, 0) % pool_len as u64) as usize)
}

/// Today's date in UTC, formatted `YYYY-MM-DD`.
pub fn today_utc() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// The date one day before `date`, formatted `YYYY-MM-DD`.
///
/// Used only for the informational "yesterday's item" reveal, never as an
/// answer target. Returns `None` for unparseable input.
pub fn yesterday_of(date: &str) -> Option<String> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some((parsed - Duration::days(1)).format("%Y-%m-%d").to_string())
}

// =============================================================================
// TESTS
// =============================================================================
