//! Settings module - typed runtime configuration.

mod settings_model;
mod settings_service;
mod settings_traits;

// Re-export the public interface
pub use settings_model::{keys, Settings, SettingsUpdate};
pub use settings_service::SettingsService;
pub use settings_traits::{SettingsRepositoryTrait, SettingsServiceTrait};
