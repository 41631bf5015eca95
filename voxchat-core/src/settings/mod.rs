pub mod config;
pub mod manager;


pub use config::{ChatSettings, ConfigError, Settings, SpeechSettings};
pub use manager::SettingsManager;
