//! Osimesi Core Library
//!
//! Models, storage and sync logic for the Osimesi restaurant bookmarker.

pub mod models;
pub mod store;
pub mod sync;
pub mod view;

pub use models::{
    Language, Location, Photo, Restaurant, RestaurantDraft, Settings, Theme, ValidationError,
};
pub use store::{Backend, LocalStorage, RestaurantStore, StorageError, StoreError};
pub use sync::{ApiClient, SyncError, DEFAULT_API_URL};
pub use view::{project, SortMode};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
