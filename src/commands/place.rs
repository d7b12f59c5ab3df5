use clap::{Args, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use osimesi_core::{project, Location, Photo, RestaurantDraft, RestaurantStore, SortMode};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct PlaceCommand {
    #[command(subcommand)]
    pub command: PlaceSubcommand,
}

#[derive(Subcommand)]
pub enum PlaceSubcommand {
    /// Save a restaurant
    Add {
        /// Name of the restaurant
        name: String,

        /// Latitude of the map pin
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the map pin
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Path to a photo file
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Already-encoded photo data (a data URL)
        #[arg(long)]
        photo_data: Option<String>,

        /// Free-text memo
        #[arg(long)]
        memo: Option<String>,
    },

    /// List saved restaurants
    List {
        /// Sort order: newest, oldest or favorites
        #[arg(long, short, default_value = "newest")]
        sort: String,

        /// Only show favorites
        #[arg(long)]
        favorites: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a saved restaurant
    Show {
        /// Restaurant ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a saved restaurant
    Delete {
        /// Restaurant ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Toggle the favorite flag on a restaurant
    Favorite {
        /// Restaurant ID
        id: String,
    },
}

impl PlaceCommand {
    pub async fn run(&self, store: &mut RestaurantStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PlaceSubcommand::Add {
                name,
                lat,
                lng,
                photo,
                photo_data,
                memo,
            } => {
                let photo = match (photo, photo_data) {
                    (Some(path), _) => {
                        let bytes = std::fs::read(path)
                            .map_err(|e| format!("Failed to read photo '{}': {}", path.display(), e))?;
                        let file_name = path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| "photo.jpg".to_string());
                        Photo::Upload { file_name, bytes }
                    }
                    (None, Some(data)) => Photo::Inline(data.clone()),
                    // Empty photo; the store rejects it with a validation error.
                    (None, None) => Photo::Inline(String::new()),
                };

                let mut draft = RestaurantDraft::new(name.as_str(), photo, Location::new(*lat, *lng));
                if let Some(memo) = memo {
                    draft = draft.with_memo(memo.as_str());
                }

                let created = store.create(draft).await?;
                println!("Saved restaurant:");
                println!("{}", created);
                Ok(())
            }

            PlaceSubcommand::List {
                sort,
                favorites,
                format,
            } => {
                let mode = SortMode::from_str(sort)?;
                let restaurants = project(store.list(), mode, *favorites);

                if restaurants.is_empty() {
                    println!("No restaurants found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&restaurants)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<16}  {:<30}  {:<17}  FAV", "ID", "NAME", "SAVED");
                        println!("{}", "-".repeat(72));
                        for restaurant in &restaurants {
                            let name = truncate(&restaurant.name, 30);
                            println!(
                                "{:<16}  {:<30}  {:<17}  {}",
                                restaurant.id,
                                name,
                                restaurant.created_at.format("%Y-%m-%d %H:%M"),
                                if restaurant.is_favorite { "*" } else { "" }
                            );
                        }
                        println!("\nTotal: {} restaurant(s)", restaurants.len());
                    }
                }
                Ok(())
            }

            PlaceSubcommand::Show { id, format } => match store.get(id) {
                Some(restaurant) => {
                    match format {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(restaurant)?);
                        }
                        OutputFormat::Text => {
                            println!("{}", restaurant);
                            println!("Photo: {}", truncate(&restaurant.photo_url, 60));
                        }
                    }
                    Ok(())
                }
                None => Err(format!("Restaurant not found: {}", id).into()),
            },

            PlaceSubcommand::Delete { id, force } => {
                let name = match store.get(id) {
                    Some(restaurant) => restaurant.name.clone(),
                    None => {
                        // Absent id: delete is a no-op, not an error.
                        println!("No restaurant with id {}", id);
                        return Ok(());
                    }
                };

                // Confirm deletion unless --force is used
                if !force {
                    print!("Delete restaurant '{}'? [y/N] ", name);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                store.delete(id).await?;
                println!("Deleted restaurant: {}", name);
                Ok(())
            }

            PlaceSubcommand::Favorite { id } => {
                let updated = store.toggle_favorite(id).await?;
                if updated.is_favorite {
                    println!("Marked '{}' as a favorite", updated.name);
                } else {
                    println!("Removed '{}' from favorites", updated.name);
                }
                Ok(())
            }
        }
    }
}

/// Shortens a string to at most `max` characters, ellipsis included.
/// Counts characters, not bytes, so multibyte names never split mid-char.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_passthrough() {
        assert_eq!(truncate("Afuri", 30), "Afuri");
        assert_eq!(truncate(&"a".repeat(30), 30), "a".repeat(30));
    }

    #[test]
    fn test_truncate_long_ascii() {
        let truncated = truncate(&"a".repeat(40), 30);
        assert_eq!(truncated, format!("{}...", "a".repeat(27)));
    }

    #[test]
    fn test_truncate_multibyte_name() {
        let name = "ABラーメン大好き小泉さん";
        assert_eq!(truncate(name, 30), name);

        let truncated = truncate(&name.repeat(3), 30);
        assert_eq!(truncated.chars().count(), 30);
        assert!(truncated.ends_with("..."));
    }
}
