//! Local persistent storage for restaurants and user settings.
//!
//! One directory, two values: the entire JSON-encoded collection under
//! `restaurants.json` and the user settings under `settings.json`. The
//! collection is read whole on load and overwritten whole on every mutation.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::models::{Restaurant, Settings};

const RESTAURANTS_FILE: &str = "restaurants.json";
const SETTINGS_FILE: &str = "settings.json";

/// Whole-value JSON storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    data_dir: PathBuf,
}

impl LocalStorage {
    /// Creates a storage instance with a custom data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Path of the restaurant collection file.
    pub fn restaurants_path(&self) -> PathBuf {
        self.data_dir.join(RESTAURANTS_FILE)
    }

    /// Path of the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    /// Loads the full collection.
    ///
    /// A missing file is an empty collection, not an error. Records saved
    /// before the favorite flag existed come back with it set to false.
    pub fn load_restaurants(&self) -> Result<Vec<Restaurant>, StorageError> {
        let path = self.restaurants_path();

        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::ParseError(path, e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    /// Overwrites the full collection.
    ///
    /// Creates the data directory if it doesn't exist.
    pub fn save_restaurants(&self, restaurants: &[Restaurant]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        let contents = serde_json::to_string_pretty(restaurants)
            .map_err(|e| StorageError::EncodeError(e.to_string()))?;

        let path = self.restaurants_path();
        fs::write(&path, contents).map_err(|e| StorageError::IoError(path, e))?;

        Ok(())
    }

    /// Loads the user settings, falling back to defaults when the file
    /// doesn't exist.
    pub fn load_settings(&self) -> Result<Settings, StorageError> {
        let path = self.settings_path();

        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::ParseError(path, e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    /// Overwrites the user settings.
    pub fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        let contents = serde_json::to_string_pretty(settings)
            .map_err(|e| StorageError::EncodeError(e.to_string()))?;

        let path = self.settings_path();
        fs::write(&path, contents).map_err(|e| StorageError::IoError(path, e))?;

        Ok(())
    }
}

/// Errors that can occur during local storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// Stored JSON could not be parsed.
    ParseError(PathBuf, String),
    /// Value could not be encoded to JSON.
    EncodeError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::ParseError(path, e) => {
                write!(f, "Failed to parse {}: {}", path.display(), e)
            }
            StorageError::EncodeError(e) => write!(f, "Failed to encode JSON: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            _ => None,
        }
    }
}
