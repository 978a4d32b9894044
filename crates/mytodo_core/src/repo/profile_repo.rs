//! Profile repository.
//!
//! # Responsibility
//! - Load and save the profile record under its own storage key.

use super::{load_json, save_json, RepoResult};
use crate::model::profile::Profile;
use crate::storage::KeyValueStore;

/// Storage key holding the profile record.
pub const PROFILE_KEY: &str = "@myasync_todo_profile";

/// Repository interface for the profile record.
pub trait ProfileRepository {
    fn load_profile(&self) -> RepoResult<Option<Profile>>;
    fn save_profile(&self, profile: &Profile) -> RepoResult<()>;
}

/// Profile repository backed by any key-value store.
pub struct KvProfileRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvProfileRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> ProfileRepository for KvProfileRepository<S> {
    fn load_profile(&self) -> RepoResult<Option<Profile>> {
        load_json(&self.store, PROFILE_KEY)
    }

    fn save_profile(&self, profile: &Profile) -> RepoResult<()> {
        save_json(&self.store, PROFILE_KEY, profile)
    }
}
