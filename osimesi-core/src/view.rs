//! Derived orderings of the canonical collection for display.

use std::fmt;
use std::str::FromStr;

use crate::models::Restaurant;

/// How the displayed list is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Descending by creation time.
    #[default]
    Newest,
    /// Ascending by creation time.
    Oldest,
    /// Newest ordering, filtered to favorites.
    Favorites,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Newest => write!(f, "newest"),
            SortMode::Oldest => write!(f, "oldest"),
            SortMode::Favorites => write!(f, "favorites"),
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "favorites" => Ok(SortMode::Favorites),
            _ => Err(format!(
                "Invalid sort mode '{}'. Valid options: newest, oldest, favorites",
                s
            )),
        }
    }
}

/// Projects the collection into a sorted, optionally filtered sequence.
///
/// Pure: the input is never mutated, and repeated calls with a changing mode
/// need no re-fetch. The sort is stable, so records with equal timestamps
/// keep their collection order.
pub fn project(records: &[Restaurant], mode: SortMode, favorites_only: bool) -> Vec<Restaurant> {
    let mut projected: Vec<Restaurant> = records.to_vec();

    match mode {
        SortMode::Newest | SortMode::Favorites => {
            projected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        SortMode::Oldest => {
            projected.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
    }

    if favorites_only || mode == SortMode::Favorites {
        projected.retain(|r| r.is_favorite);
    }

    projected
}
