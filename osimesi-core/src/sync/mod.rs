//! Remote persistence: HTTP client, wire-shape adapter and sync errors.

mod client;
mod error;
pub mod wire;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::SyncError;
