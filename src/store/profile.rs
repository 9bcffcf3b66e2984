//! Remote profiles
//!
//! A named profile lets high scores follow the player across devices.
//! The backend is abstracted behind [`ProfileStore`] so game code and
//! tests run against an in-memory store while the shell talks HTTP.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Deserialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::game::GameMode;

/// 128-bit profile identifier, rendered as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct UserId([u8; 16]);

impl UserId {
    /// Derive the id owned by a chosen profile name. Stable across
    /// devices: the same name always maps to the same id.
    pub fn from_name(name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"rift-quiz-user:");
        hasher.update(name.as_bytes());
        let digest = hasher.finalize();
        let mut id = [0u8; 16];
        id.copy_from_slice(&digest[..16]);
        Self(id)
    }

    /// Random id for a player who has not registered a name.
    pub fn anonymous() -> Self {
        Self(*Uuid::new_v4().as_bytes())
    }

    /// Hex form, as sent on the wire.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.to_hex())
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.to_hex()
    }
}

impl TryFrom<String> for UserId {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let bytes = hex::decode(&value)?;
        let id: [u8; 16] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(id))
    }
}

/// A player's cross-device record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Owning identifier.
    pub id: UserId,
    /// Chosen display name.
    pub name: String,
    /// Per-mode high scores.
    #[serde(default)]
    pub high_scores: BTreeMap<GameMode, u32>,
}

impl Profile {
    /// New profile for `name` with no scores yet.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: UserId::from_name(&name),
            name,
            high_scores: BTreeMap::new(),
        }
    }
}

/// Profile backend failures.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The requested name is already registered to another player.
    #[error("profile name {0:?} is taken")]
    DuplicateName(String),

    /// No profile exists for the given id.
    #[error("profile not found")]
    NotFound,

    /// The backend could not be reached. Gameplay continues on local
    /// state; callers treat this as a soft failure.
    #[error("profile backend unavailable")]
    Unavailable(#[source] reqwest::Error),

    /// The backend answered with an unexpected status.
    #[error("profile backend error: {0}")]
    Backend(String),
}

/// Storage backend for profiles.
pub trait ProfileStore {
    /// Register a new profile. Fails with
    /// [`ProfileError::DuplicateName`] when the name is taken.
    fn register(&self, profile: &Profile) -> impl std::future::Future<Output = Result<(), ProfileError>> + Send;

    /// Fetch a profile by id.
    fn fetch(&self, id: UserId) -> impl std::future::Future<Output = Result<Profile, ProfileError>> + Send;

    /// Overwrite a profile's stored state.
    fn update(&self, profile: &Profile) -> impl std::future::Future<Output = Result<(), ProfileError>> + Send;

    /// Change a profile's display name. Fails with
    /// [`ProfileError::DuplicateName`] when the name is taken; game state
    /// is unaffected either way.
    fn rename(&self, id: UserId, name: &str) -> impl std::future::Future<Output = Result<(), ProfileError>> + Send;
}

/// Merge remote scores into `local`, keeping the per-mode maximum.
///
/// Returns true when `local` now holds something the remote lacks, in
/// which case the caller should push it back.
pub fn reconcile_high_scores(
    local: &mut BTreeMap<GameMode, u32>,
    remote: &BTreeMap<GameMode, u32>,
) -> bool {
    let mut push_remote = false;
    for (mode, &value) in remote {
        let entry = local.entry(*mode).or_insert(0);
        *entry = (*entry).max(value);
    }
    for (mode, &value) in local.iter() {
        if remote.get(mode).copied().unwrap_or(0) < value {
            push_remote = true;
        }
    }
    push_remote
}

/// Pull a profile, reconcile scores into it from `local`, and push the
/// result back when the remote was behind. Backend failures are logged
/// and surfaced; local state is never lost to them.
pub async fn sync_high_scores<S: ProfileStore>(
    store: &S,
    id: UserId,
    local: &mut BTreeMap<GameMode, u32>,
) -> Result<(), ProfileError> {
    let mut profile = store.fetch(id).await?;
    let push = reconcile_high_scores(local, &profile.high_scores);
    debug!(id = %id, push, "high scores reconciled");
    if push {
        profile.high_scores = local.clone();
        store.update(&profile).await?;
    } else {
        *local = profile.high_scores;
    }
    Ok(())
}

// =============================================================================
// HTTP BACKEND
// =============================================================================

/// REST-backed profile store.
#[derive(Clone, Debug)]
pub struct HttpProfileStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProfileStore {
    /// Store talking to `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn profile_url(&self, id: UserId) -> String {
        format!("{}/profiles/{}", self.base_url, id.to_hex())
    }
}

impl ProfileStore for HttpProfileStore {
    async fn register(&self, profile: &Profile) -> Result<(), ProfileError> {
        let response = self
            .client
            .post(format!("{}/profiles", self.base_url))
            .json(profile)
            .send()
            .await
            .map_err(ProfileError::Unavailable)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::CONFLICT => {
                Err(ProfileError::DuplicateName(profile.name.clone()))
            }
            status => {
                warn!(%status, "profile registration rejected");
                Err(ProfileError::Backend(status.to_string()))
            }
        }
    }

    async fn fetch(&self, id: UserId) -> Result<Profile, ProfileError> {
        let response = self
            .client
            .get(self.profile_url(id))
            .send()
            .await
            .map_err(ProfileError::Unavailable)?;

        match response.status() {
            status if status.is_success() => response
                .json::<Profile>()
                .await
                .map_err(ProfileError::Unavailable),
            reqwest::StatusCode::NOT_FOUND => Err(ProfileError::NotFound),
            status => Err(ProfileError::Backend(status.to_string())),
        }
    }

    async fn update(&self, profile: &Profile) -> Result<(), ProfileError> {
        let response = self
            .client
            .put(self.profile_url(profile.id))
            .json(profile)
            .send()
            .await
            .map_err(ProfileError::Unavailable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProfileError::Backend(response.status().to_string()))
        }
    }

    async fn rename(&self, id: UserId, name: &str) -> Result<(), ProfileError> {
        let response = self
            .client
            .put(format!("{}/name", self.profile_url(id)))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(ProfileError::Unavailable)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::CONFLICT => Err(ProfileError::DuplicateName(name.to_string())),
            reqwest::StatusCode::NOT_FOUND => Err(ProfileError::NotFound),
            status => Err(ProfileError::Backend(status.to_string())),
        }
    }
}

// =============================================================================
// IN-MEMORY BACKEND
// =============================================================================

/// In-memory profile store for tests and offline runs.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: tokio::sync::RwLock<BTreeMap<UserId, Profile>>,
}

impl MemoryProfileStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfileStore {
    async fn register(&self, profile: &Profile) -> Result<(), ProfileError> {
        let mut profiles = self.profiles.write().await;
        if profiles.values().any(|p| p.name == profile.name) {
            return Err(ProfileError::DuplicateName(profile.name.clone()));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn fetch(&self, id: UserId) -> Result<Profile, ProfileError> {
        self.profiles
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ProfileError::NotFound)
    }

    async fn update(&self, profile: &Profile) -> Result<(), ProfileError> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(&profile.id) {
            return Err(ProfileError::NotFound);
        }
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn rename(&self, id: UserId, name: &str) -> Result<(), ProfileError> {
        let mut profiles = self.profiles.write().await;
        if profiles.values().any(|p| p.id != id && p.name == name) {
            return Err(ProfileError::DuplicateName(name.to_string()));
        }
        let profile = profiles.get_mut(&id).ok_or(ProfileError::NotFound)?;
        profile.name = name.to_string();
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_stable_for_name() {
        let a = UserId::from_name("Faker");
        let b = UserId::from_name("Faker");
        let c = UserId::from_name("faker");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_hex().len(), 32);
    }

    #[test]
    fn test_user_id_hex_roundtrip() {
        let id = UserId::from_name("Caps");
        let back = UserId::try_from(id.to_hex()).unwrap();
        assert_eq!(id, back);
        assert!(UserId::try_from("zz".to_string()).is_err());
        assert!(UserId::try_from("abcd".to_string()).is_err());
    }

    #[test]
    fn test_anonymous_ids_differ() {
        assert_ne!(UserId::anonymous(), UserId::anonymous());
    }

    #[test]
    fn test_reconcile_takes_per_mode_maximum() {
        let mut local = BTreeMap::from([(GameMode::Price, 10), (GameMode::Recipe, 2)]);
        let remote = BTreeMap::from([(GameMode::Price, 7), (GameMode::Attribute, 5)]);

        let push = reconcile_high_scores(&mut local, &remote);
        assert!(push, "local Price 10 and Recipe 2 beat the remote");
        assert_eq!(local[&GameMode::Price], 10);
        assert_eq!(local[&GameMode::Attribute], 5);
        assert_eq!(local[&GameMode::Recipe], 2);
    }

    #[test]
    fn test_reconcile_no_push_when_remote_ahead() {
        let mut local = BTreeMap::from([(GameMode::Price, 3)]);
        let remote = BTreeMap::from([(GameMode::Price, 8), (GameMode::Daily, 1)]);

        let push = reconcile_high_scores(&mut local, &remote);
        assert!(!push);
        assert_eq!(local[&GameMode::Price], 8);
    }

    #[tokio::test]
    async fn test_memory_store_register_and_fetch() {
        let store = MemoryProfileStore::new();
        let profile = Profile::new("Rekkles");
        store.register(&profile).await.unwrap();

        let fetched = store.fetch(profile.id).await.unwrap();
        assert_eq!(fetched, profile);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_duplicate_name() {
        let store = MemoryProfileStore::new();
        store.register(&Profile::new("Jankos")).await.unwrap();

        let dup = Profile::new("Jankos");
        assert!(matches!(
            store.register(&dup).await,
            Err(ProfileError::DuplicateName(name)) if name == "Jankos"
        ));
    }

    #[tokio::test]
    async fn test_rename_rejects_taken_name() {
        let store = MemoryProfileStore::new();
        let a = Profile::new("Wunder");
        let b = Profile::new("Upset");
        store.register(&a).await.unwrap();
        store.register(&b).await.unwrap();

        assert!(matches!(
            store.rename(b.id, "Wunder").await,
            Err(ProfileError::DuplicateName(_))
        ));

        // Renaming to a free name works, including back to your own
        store.rename(b.id, "Upset ").await.unwrap();
        store.rename(b.id, "Upset").await.unwrap();
        assert_eq!(store.fetch(b.id).await.unwrap().name, "Upset");
    }

    #[tokio::test]
    async fn test_sync_pushes_when_local_ahead() {
        let store = MemoryProfileStore::new();
        let mut profile = Profile::new("Perkz");
        profile.high_scores.insert(GameMode::Attribute, 4);
        store.register(&profile).await.unwrap();

        let mut local = BTreeMap::from([(GameMode::Attribute, 9)]);
        sync_high_scores(&store, profile.id, &mut local).await.unwrap();

        assert_eq!(local[&GameMode::Attribute], 9);
        let remote = store.fetch(profile.id).await.unwrap();
        assert_eq!(remote.high_scores[&GameMode::Attribute], 9);
    }

    #[tokio::test]
    async fn test_sync_pulls_when_remote_ahead() {
        let store = MemoryProfileStore::new();
        let mut profile = Profile::new("Hylissang");
        profile.high_scores.insert(GameMode::Price, 20);
        store.register(&profile).await.unwrap();

        let mut local = BTreeMap::new();
        sync_high_scores(&store, profile.id, &mut local).await.unwrap();
        assert_eq!(local[&GameMode::Price], 20);
    }

    #[tokio::test]
    async fn test_sync_missing_profile() {
        let store = MemoryProfileStore::new();
        let mut local = BTreeMap::new();
        let result = sync_high_scores(&store, UserId::anonymous(), &mut local).await;
        assert!(matches!(result, Err(ProfileError::NotFound)));
    }
}
