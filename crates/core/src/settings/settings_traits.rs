//! Settings repository and service traits.

use async_trait::async_trait;

use super::settings_model::{Settings, SettingsUpdate};
use crate::errors::Result;

/// Trait defining the contract for settings storage.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Loads all override rows merged over defaults.
    fn get_settings(&self) -> Result<Settings>;

    /// Writes the present fields of the update as override rows.
    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()>;

    /// Reads a single override row. Fails with `NotFound` when absent.
    fn get_setting(&self, key: &str) -> Result<String>;

    /// Writes a single override row.
    async fn update_setting(&self, key: &str, value: &str) -> Result<()>;
}

/// Trait defining the contract for settings service operations.
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    /// Returns the effective settings (overrides merged over defaults).
    fn get_settings(&self) -> Result<Settings>;

    /// Applies a validated partial update.
    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()>;

    /// Returns the installation's instance id, generating and persisting
    /// one on first call.
    async fn ensure_instance_id(&self) -> Result<String>;
}
