use gloo::storage::errors::StorageError as GlooStorageError;
use gloo::storage::{LocalStorage, Storage};
use log::warn;
use shared::{Profile, ProfileStorage, StorageError};

/// Signed-in profile kept in `localStorage` under a single key
#[derive(Debug, Clone, PartialEq)]
pub struct LocalProfileStorage {
    key: String,
}

impl LocalProfileStorage {
    pub fn new(key: &str) -> Self {
        Self { key: key.to_string() }
    }
}

fn map_storage_error(err: GlooStorageError) -> StorageError {
    match err {
        GlooStorageError::SerdeError(e) => StorageError::Serialization(e.to_string()),
        other => StorageError::Unavailable(other.to_string()),
    }
}

impl ProfileStorage for LocalProfileStorage {
    fn save_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        LocalStorage::set(&self.key, profile).map_err(map_storage_error)
    }

    fn load_profile(&self) -> Option<Profile> {
        match LocalStorage::get::<Profile>(&self.key) {
            Ok(profile) => Some(profile),
            Err(GlooStorageError::KeyNotFound(_)) => None,
            Err(err) => {
                warn!("Ignoring unreadable stored profile: {}", err);
                None
            }
        }
    }

    fn clear_profile(&self) {
        LocalStorage::delete(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_profile_round_trips_through_local_storage() {
        let storage = LocalProfileStorage::new("test-profile-storage");
        storage.clear_profile();
        assert!(storage.load_profile().is_none());

        let profile = Profile::from_value(serde_json::json!({"id": "u1", "name": "Sam"})).unwrap();
        storage.save_profile(&profile).unwrap();
        assert_eq!(storage.load_profile(), Some(profile));

        storage.clear_profile();
        assert!(storage.load_profile().is_none());
    }

    #[wasm_bindgen_test]
    fn test_non_object_value_is_ignored() {
        let storage = LocalProfileStorage::new("test-profile-garbage");
        LocalStorage::set("test-profile-garbage", vec![1, 2, 3]).unwrap();
        assert!(storage.load_profile().is_none());
        storage.clear_profile();
    }
}
