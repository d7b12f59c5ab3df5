use clap::{Args, Subcommand, ValueEnum};
use std::str::FromStr;

use osimesi_core::{Language, LocalStorage, Theme};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub command: SettingsSubcommand,
}

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show current settings
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change settings
    Set {
        /// Display theme: light or dark
        #[arg(long)]
        theme: Option<String>,

        /// Display language: ja or en
        #[arg(long)]
        language: Option<String>,
    },
}

impl SettingsCommand {
    pub fn run(&self, storage: &LocalStorage) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            SettingsSubcommand::Show { format } => {
                let settings = storage.load_settings()?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&settings)?);
                    }
                    OutputFormat::Text => {
                        println!("theme: {}", settings.theme);
                        println!("language: {}", settings.language);
                    }
                }
                Ok(())
            }

            SettingsSubcommand::Set { theme, language } => {
                if theme.is_none() && language.is_none() {
                    return Err("Nothing to set. Provide --theme or --language.".into());
                }

                let mut settings = storage.load_settings()?;

                if let Some(theme) = theme {
                    settings.theme = Theme::from_str(theme)?;
                }
                if let Some(language) = language {
                    settings.language = Language::from_str(language)?;
                }

                storage.save_settings(&settings)?;
                println!("theme: {}", settings.theme);
                println!("language: {}", settings.language);
                Ok(())
            }
        }
    }
}
