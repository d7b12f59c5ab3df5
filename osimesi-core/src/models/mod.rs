mod restaurant;
mod settings;

pub use restaurant::{Location, Photo, Restaurant, RestaurantDraft, ValidationError};
pub use settings::{Language, Settings, Theme};
