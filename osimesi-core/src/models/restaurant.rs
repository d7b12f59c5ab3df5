use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A latitude/longitude pair on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// A saved restaurant entry.
///
/// `id` and `created_at` are assigned once at creation and never change.
/// `is_favorite` defaults to false when loading records persisted before
/// the field existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub photo_url: String,
    pub memo: String,
    pub location: Location,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl fmt::Display for Restaurant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let star = if self.is_favorite { " *" } else { "" };
        writeln!(f, "{}{}", self.name, star)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "Location: {}", self.location)?;
        writeln!(f, "Saved: {}", self.created_at.format("%Y-%m-%d %H:%M"))?;

        if !self.memo.is_empty() {
            writeln!(f, "\nMemo: {}", self.memo)?;
        }

        Ok(())
    }
}

/// Photo supplied with a draft.
///
/// The local backend stores `Inline` data verbatim and encodes `Upload`
/// bytes into a data URL. The remote backend sends `Upload` bytes as a
/// multipart file attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum Photo {
    /// Already-encoded image data (a data URL).
    Inline(String),
    /// Raw image bytes to be uploaded at creation time.
    Upload { file_name: String, bytes: Vec<u8> },
}

impl Photo {
    pub fn is_empty(&self) -> bool {
        match self {
            Photo::Inline(data) => data.is_empty(),
            Photo::Upload { bytes, .. } => bytes.is_empty(),
        }
    }
}

/// User-supplied fields of a restaurant prior to id/timestamp assignment.
#[derive(Debug, Clone)]
pub struct RestaurantDraft {
    pub name: String,
    pub photo: Photo,
    pub memo: String,
    pub location: Location,
}

impl RestaurantDraft {
    pub fn new(name: impl Into<String>, photo: Photo, location: Location) -> Self {
        Self {
            name: name.into(),
            photo,
            memo: String::new(),
            location,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Checks the creation requirements: a non-blank name, a photo, and
    /// finite coordinates.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.photo.is_empty() {
            return Err(ValidationError::MissingPhoto);
        }
        if !self.location.is_finite() {
            return Err(ValidationError::InvalidLocation);
        }
        Ok(())
    }
}

/// Errors for drafts that fail the creation requirements.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Restaurant name cannot be empty")]
    EmptyName,

    #[error("A photo is required")]
    MissingPhoto,

    #[error("Location coordinates must be finite numbers")]
    InvalidLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RestaurantDraft {
        RestaurantDraft::new(
            "Ramen Yokocho",
            Photo::Inline("data:image/png;base64,AAAA".to_string()),
            Location::new(35.6812, 139.7671),
        )
    }

    #[test]
    fn test_valid_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert_eq!(d.validate(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_missing_photo_rejected() {
        let mut d = draft();
        d.photo = Photo::Inline(String::new());
        assert_eq!(d.validate(), Err(ValidationError::MissingPhoto));

        d.photo = Photo::Upload {
            file_name: "x.jpg".to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(d.validate(), Err(ValidationError::MissingPhoto));
    }

    #[test]
    fn test_nonfinite_location_rejected() {
        let mut d = draft();
        d.location = Location::new(f64::NAN, 139.0);
        assert_eq!(d.validate(), Err(ValidationError::InvalidLocation));

        d.location = Location::new(35.0, f64::INFINITY);
        assert_eq!(d.validate(), Err(ValidationError::InvalidLocation));
    }

    #[test]
    fn test_with_memo() {
        let d = draft().with_memo("best tsukemen in town");
        assert_eq!(d.memo, "best tsukemen in town");
    }

    #[test]
    fn test_is_favorite_defaults_on_load() {
        // Records saved before the favorite flag existed have no such field.
        let json = r#"{
            "id": "1700000000000",
            "name": "Old Place",
            "photo_url": "data:image/png;base64,AAAA",
            "memo": "",
            "location": { "lat": 35.0, "lng": 139.0 },
            "created_at": "2023-11-14T22:13:20Z"
        }"#;

        let parsed: Restaurant = serde_json::from_str(json).unwrap();
        assert!(!parsed.is_favorite);
    }

    #[test]
    fn test_restaurant_json_roundtrip() {
        let restaurant = Restaurant {
            id: "42".to_string(),
            name: "Sushi Dai".to_string(),
            photo_url: "https://example.com/media/sushi.jpg".to_string(),
            memo: "go early".to_string(),
            location: Location::new(35.6654, 139.7707),
            created_at: Utc::now(),
            is_favorite: true,
        };

        let json = serde_json::to_string(&restaurant).unwrap();
        let parsed: Restaurant = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, restaurant);
    }

    #[test]
    fn test_restaurant_display() {
        let restaurant = Restaurant {
            id: "1".to_string(),
            name: "Curry House".to_string(),
            photo_url: "x".to_string(),
            memo: "lunch set".to_string(),
            location: Location::new(35.0, 139.0),
            created_at: Utc::now(),
            is_favorite: true,
        };

        let output = format!("{}", restaurant);
        assert!(output.contains("Curry House *"));
        assert!(output.contains("lunch set"));
    }
}
