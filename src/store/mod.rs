//! Persistence: device-local state on disk and named profiles behind a
//! pluggable backend.

pub mod local;
pub mod profile;

pub use local::{DailyStatus, LocalStore, Preferences};
pub use profile::{
    reconcile_high_scores, sync_high_scores, HttpProfileStore, MemoryProfileStore, Profile,
    ProfileError, ProfileStore, UserId,
};
