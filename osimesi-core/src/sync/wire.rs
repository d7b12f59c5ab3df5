//! Translation between the canonical record shape and the remote service's
//! wire shape.
//!
//! The wire format uses snake_case field names, flat `lat`/`lng` coordinates
//! and a `photo` field that may hold a path relative to the service root.
//! Decoding is total: a malformed partial record degrades to safe defaults
//! instead of failing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::models::{Location, Restaurant};

/// Serialize-side wire shape, used for full-record replacement payloads.
#[derive(Debug, Clone, Serialize)]
pub struct WireRestaurant {
    pub id: String,
    pub name: String,
    pub photo: String,
    pub memo: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
    pub is_favorite: bool,
}

/// Builds a canonical record from a raw wire value.
///
/// Missing or malformed fields map to defaults: empty strings for text,
/// zero for coordinates, false for the favorite flag and the Unix epoch
/// for the timestamp. A numeric wire id is stringified.
pub fn from_wire(value: &Value, base_url: &str) -> Restaurant {
    let id = match value.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    let photo = str_field(value, "photo");

    let created_at = value
        .get("created_at")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH);

    Restaurant {
        id,
        name: str_field(value, "name"),
        photo_url: absolutize_photo(&photo, base_url),
        memo: str_field(value, "memo"),
        location: Location {
            lat: num_field(value, "lat"),
            lng: num_field(value, "lng"),
        },
        created_at,
        is_favorite: value
            .get("is_favorite")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

/// Builds the wire shape for a full-record replacement.
pub fn to_wire(restaurant: &Restaurant) -> WireRestaurant {
    WireRestaurant {
        id: restaurant.id.clone(),
        name: restaurant.name.clone(),
        photo: restaurant.photo_url.clone(),
        memo: restaurant.memo.clone(),
        lat: restaurant.location.lat,
        lng: restaurant.location.lng,
        created_at: restaurant.created_at,
        is_favorite: restaurant.is_favorite,
    }
}

/// Resolves a wire photo reference to an absolute one.
///
/// Relative media paths are prefixed with the service base address.
/// Absolute URLs and data URLs pass through unchanged, as does an empty
/// reference.
pub fn absolutize_photo(photo: &str, base_url: &str) -> String {
    if photo.is_empty()
        || photo.starts_with("http://")
        || photo.starts_with("https://")
        || photo.starts_with("data:")
    {
        return photo.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if photo.starts_with('/') {
        format!("{}{}", base, photo)
    } else {
        format!("{}/{}", base, photo)
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn num_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}
