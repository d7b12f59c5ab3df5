mod place;
mod settings_cmd;

pub use place::PlaceCommand;
pub use settings_cmd::SettingsCommand;
