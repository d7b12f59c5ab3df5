//! The record store: single source of truth for the restaurant collection.
//!
//! The store owns the canonical in-memory list and hides whether persistence
//! is a local JSON file or a remote HTTP service. Every mutating operation
//! leaves memory and the backing medium consistent: the remote backend
//! applies to memory only after the service acknowledges, the local backend
//! mirrors every mutation to disk and rolls back if the write fails.

mod local;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use crate::models::{Photo, Restaurant, RestaurantDraft, ValidationError};
use crate::sync::{ApiClient, SyncError};

pub use local::{LocalStorage, StorageError};

/// The persistence medium behind the store.
///
/// Both variants cover the same operation set; call sites never branch on
/// the medium outside this module.
#[derive(Debug)]
pub enum Backend {
    Local(LocalStorage),
    Remote(ApiClient),
}

/// Errors surfaced by store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No restaurant with id '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Canonical collection of saved restaurants over a backing medium.
///
/// Load-then-cache: `load` reads the backing medium once, `list` is a pure
/// read of cached state. One mutation is in flight at a time; overlapping
/// edits to the same id resolve last-write-wins by completion order.
#[derive(Debug)]
pub struct RestaurantStore {
    records: Vec<Restaurant>,
    backend: Backend,
}

impl RestaurantStore {
    /// Store backed by a local data directory.
    pub fn local(storage: LocalStorage) -> Self {
        Self {
            records: Vec::new(),
            backend: Backend::Local(storage),
        }
    }

    /// Store backed by the remote restaurant service.
    pub fn remote(client: ApiClient) -> Self {
        Self {
            records: Vec::new(),
            backend: Backend::Remote(client),
        }
    }

    /// Reads the backing medium and caches the collection.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.records = match &self.backend {
            Backend::Local(storage) => storage.load_restaurants()?,
            Backend::Remote(client) => client.list().await?,
        };
        debug!(count = self.records.len(), "loaded restaurant collection");
        Ok(())
    }

    /// All records currently known. Pure read of cached state.
    pub fn list(&self) -> &[Restaurant] {
        &self.records
    }

    /// Looks up a single record by id.
    pub fn get(&self, id: &str) -> Option<&Restaurant> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Creates a record from a draft.
    ///
    /// Validation failures mutate nothing. The local backend assigns a
    /// time-derived id and the current time; the remote backend accepts
    /// whatever id and timestamp the service returns.
    pub async fn create(&mut self, draft: RestaurantDraft) -> Result<Restaurant, StoreError> {
        draft.validate()?;

        let created = match &self.backend {
            Backend::Local(storage) => {
                let restaurant = Restaurant {
                    id: self.next_local_id(),
                    name: draft.name.trim().to_string(),
                    photo_url: inline_photo_url(&draft.photo),
                    memo: draft.memo,
                    location: draft.location,
                    created_at: Utc::now(),
                    is_favorite: false,
                };

                self.records.push(restaurant.clone());
                if let Err(e) = storage.save_restaurants(&self.records) {
                    self.records.pop();
                    return Err(e.into());
                }
                restaurant
            }
            Backend::Remote(client) => {
                let restaurant = client.create(&draft).await?;
                self.records.push(restaurant.clone());
                restaurant
            }
        };

        debug!(id = %created.id, name = %created.name, "created restaurant");
        Ok(created)
    }

    /// Removes the record with the given id from memory and the backing
    /// medium. Idempotent: an absent id is not an error.
    pub async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            return Ok(());
        };

        match &self.backend {
            Backend::Local(storage) => {
                let removed = self.records.remove(index);
                if let Err(e) = storage.save_restaurants(&self.records) {
                    self.records.insert(index, removed);
                    return Err(e.into());
                }
            }
            Backend::Remote(client) => {
                client.delete(id).await?;
                self.records.remove(index);
            }
        }

        debug!(id, "deleted restaurant");
        Ok(())
    }

    /// Flips the favorite flag on the record with the given id.
    ///
    /// The remote backend sends a full-record replacement and applies the
    /// service's response to memory only after the acknowledgement, so a
    /// failed round trip leaves the cached record untouched.
    pub async fn toggle_favorite(&mut self, id: &str) -> Result<Restaurant, StoreError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let updated = match &self.backend {
            Backend::Local(storage) => {
                self.records[index].is_favorite = !self.records[index].is_favorite;
                if let Err(e) = storage.save_restaurants(&self.records) {
                    self.records[index].is_favorite = !self.records[index].is_favorite;
                    return Err(e.into());
                }
                self.records[index].clone()
            }
            Backend::Remote(client) => {
                let mut replacement = self.records[index].clone();
                replacement.is_favorite = !replacement.is_favorite;

                let confirmed = client.update(&replacement).await?;
                self.records[index] = confirmed.clone();
                confirmed
            }
        };

        debug!(id, favorite = updated.is_favorite, "toggled favorite");
        Ok(updated)
    }

    /// Time-derived id, bumped past any id already in the collection so
    /// rapid creates within one millisecond stay unique.
    fn next_local_id(&self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        while self.records.iter().any(|r| r.id == millis.to_string()) {
            millis += 1;
        }
        millis.to_string()
    }
}

/// Photo reference stored by the local backend: inline data kept verbatim,
/// uploaded bytes encoded into a data URL.
fn inline_photo_url(photo: &Photo) -> String {
    match photo {
        Photo::Inline(data) => data.clone(),
        Photo::Upload { file_name, bytes } => {
            let mime = match file_name.rsplit('.').next() {
                Some("png") => "image/png",
                Some("gif") => "image/gif",
                Some("webp") => "image/webp",
                _ => "image/jpeg",
            };
            format!("data:{};base64,{}", mime, BASE64.encode(bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use tempfile::TempDir;

    fn test_store() -> (RestaurantStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_path_buf());
        (RestaurantStore::local(storage), temp_dir)
    }

    fn draft(name: &str) -> RestaurantDraft {
        RestaurantDraft::new(
            name,
            Photo::Inline("data:image/png;base64,AAAA".to_string()),
            Location::new(35.6812, 139.7671),
        )
        .with_memo("memo")
    }

    #[tokio::test]
    async fn test_create_appends_exactly_one() {
        let (mut store, _temp) = test_store();
        store.load().await.unwrap();

        let created = store.create(draft("Ichiran")).await.unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(created.name, "Ichiran");
        assert_eq!(created.memo, "memo");
        assert_eq!(created.location, Location::new(35.6812, 139.7671));
        assert!(!created.is_favorite);
        assert!(!created.id.is_empty());
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let (mut store, _temp) = test_store();
        store.load().await.unwrap();

        let created = store.create(draft("  Afuri  ")).await.unwrap();
        assert_eq!(created.name, "Afuri");
    }

    #[tokio::test]
    async fn test_invalid_draft_mutates_nothing() {
        let (mut store, _temp) = test_store();
        store.load().await.unwrap();
        store.create(draft("Keep Me")).await.unwrap();

        let mut bad = draft("");
        bad.name = "   ".to_string();
        assert!(matches!(
            store.create(bad).await,
            Err(StoreError::Validation(ValidationError::EmptyName))
        ));

        let mut bad = draft("No Photo");
        bad.photo = Photo::Inline(String::new());
        assert!(matches!(
            store.create(bad).await,
            Err(StoreError::Validation(ValidationError::MissingPhoto))
        ));

        let mut bad = draft("Nowhere");
        bad.location = Location::new(f64::NAN, 0.0);
        assert!(matches!(
            store.create(bad).await,
            Err(StoreError::Validation(ValidationError::InvalidLocation))
        ));

        assert_eq!(store.list().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_unique_for_rapid_creates() {
        let (mut store, _temp) = test_store();
        store.load().await.unwrap();

        for i in 0..5 {
            store.create(draft(&format!("Place {}", i))).await.unwrap();
        }

        let mut ids: Vec<_> = store.list().iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn test_toggle_favorite_is_its_own_inverse() {
        let (mut store, _temp) = test_store();
        store.load().await.unwrap();
        let created = store.create(draft("Torikizoku")).await.unwrap();

        let once = store.toggle_favorite(&created.id).await.unwrap();
        assert!(once.is_favorite);

        let twice = store.toggle_favorite(&created.id).await.unwrap();
        assert!(!twice.is_favorite);

        // Everything except the flag is untouched.
        assert_eq!(twice.id, created.id);
        assert_eq!(twice.name, created.name);
        assert_eq!(twice.photo_url, created.photo_url);
        assert_eq!(twice.memo, created.memo);
        assert_eq!(twice.location, created.location);
        assert_eq!(twice.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_not_found() {
        let (mut store, _temp) = test_store();
        store.load().await.unwrap();

        assert!(matches!(
            store.toggle_favorite("missing").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one_and_is_idempotent() {
        let (mut store, _temp) = test_store();
        store.load().await.unwrap();
        let a = store.create(draft("A")).await.unwrap();
        let b = store.create(draft("B")).await.unwrap();

        store.delete(&a.id).await.unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id, b.id);

        // Repeat delete is a no-op, not an error.
        store.delete(&a.id).await.unwrap();
        assert_eq!(store.list().len(), 1);
    }

    #[tokio::test]
    async fn test_mutations_survive_reload() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();

        let created = {
            let mut store = RestaurantStore::local(LocalStorage::new(dir.clone()));
            store.load().await.unwrap();
            let created = store.create(draft("Persisted")).await.unwrap();
            store.toggle_favorite(&created.id).await.unwrap();
            created
        };

        let mut reloaded = RestaurantStore::local(LocalStorage::new(dir));
        reloaded.load().await.unwrap();
        assert_eq!(reloaded.list().len(), 1);
        let record = reloaded.get(&created.id).unwrap();
        assert_eq!(record.name, "Persisted");
        assert!(record.is_favorite);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_memory_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let mut store = RestaurantStore::local(LocalStorage::new(data_dir.clone()));
        store.load().await.unwrap();
        let kept = store.create(draft("Keep Me")).await.unwrap();

        // Put a regular file where the data directory should be, so every
        // subsequent save fails.
        std::fs::remove_dir_all(&data_dir).unwrap();
        std::fs::write(&data_dir, "in the way").unwrap();

        assert!(matches!(
            store.create(draft("Never Lands")).await,
            Err(StoreError::Storage(_))
        ));
        assert_eq!(store.list().len(), 1);

        assert!(matches!(
            store.delete(&kept.id).await,
            Err(StoreError::Storage(_))
        ));
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id, kept.id);

        let was_favorite = store.get(&kept.id).unwrap().is_favorite;
        assert!(matches!(
            store.toggle_favorite(&kept.id).await,
            Err(StoreError::Storage(_))
        ));
        assert_eq!(store.get(&kept.id).unwrap().is_favorite, was_favorite);
    }

    #[tokio::test]
    async fn test_upload_photo_stored_as_data_url() {
        let (mut store, _temp) = test_store();
        store.load().await.unwrap();

        let mut d = draft("Photo Booth");
        d.photo = Photo::Upload {
            file_name: "front.png".to_string(),
            bytes: vec![1, 2, 3],
        };

        let created = store.create(d).await.unwrap();
        assert_eq!(created.photo_url, "data:image/png;base64,AQID");
    }
}
