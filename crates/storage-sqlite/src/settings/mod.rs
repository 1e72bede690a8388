//! SQLite storage implementation for application settings.

mod model;
mod repository;

pub use model::AppSettingDB;
pub use repository::SettingsRepository;
