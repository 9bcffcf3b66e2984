//! # Rift Quiz
//!
//! Game engine for a League of Legends item quiz: guess an item's
//! attributes, price, or recipe components, plus a shared daily
//! challenge.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       RIFT QUIZ                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Seedable Xorshift128+ PRNG                │
//! │  └── daily.rs    - Date hashing for the daily challenge      │
//! │                                                              │
//! │  catalog/        - Item data                                 │
//! │  ├── item.rs     - Item model and tag vocabulary             │
//! │  ├── store.rs    - Validated, ordered catalog                │
//! │  └── feed.rs     - Vendor feed fetch and filter pipeline     │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── round.rs    - Round and option generation               │
//! │  ├── evaluate.rs - Answer judgment                           │
//! │  ├── session.rs  - Score/lives/streak state machine          │
//! │  ├── timer.rs    - Generation-tokened countdown              │
//! │  └── rank.rs     - Score-to-tier ladder                      │
//! │                                                              │
//! │  store/          - Persistence (non-deterministic)           │
//! │  ├── local.rs    - On-disk JSON state                        │
//! │  └── profile.rs  - Remote profiles and score sync            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/`, `catalog/`, and `game/` modules are **100% deterministic**:
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time inside game logic; dates are passed in
//! - All randomness from seeded Xorshift128+
//! - Daily selection is a pure function of the date string
//!
//! Given the same catalog, seed, date, and guesses, a run produces
//! **identical rounds, scores, and events** on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod core;
pub mod game;
pub mod store;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, Item, ItemId};
pub use self::core::daily::{cyrb53, daily_index, today_utc};
pub use self::core::rng::{derive_session_seed, DeterministicRng};
pub use game::{
    evaluate, generate_round, rank_for, GameMode, Guess, Round, RoundConfig, RoundError, Session,
    SessionEvent,
};
pub use store::{LocalStore, Profile, ProfileStore, UserId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Patch the bundled catalog snapshot was built from
pub const PATCH_VERSION: &str = "15.24.1";
