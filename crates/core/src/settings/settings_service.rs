use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use uuid::Uuid;

use super::settings_model::{keys, Settings, SettingsUpdate};
use super::settings_traits::{SettingsRepositoryTrait, SettingsServiceTrait};
use crate::errors::Result;

/// Service for reading and updating runtime settings.
pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<Settings> {
        self.settings_repository.get_settings()
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        update.validate()?;
        self.settings_repository.update_settings(update).await
    }

    async fn ensure_instance_id(&self) -> Result<String> {
        let settings = self.settings_repository.get_settings()?;
        if !settings.instance_id.is_empty() {
            return Ok(settings.instance_id);
        }

        let instance_id = Uuid::new_v4().to_string();
        debug!("Generated instance id {}", instance_id);
        self.settings_repository
            .update_setting(keys::INSTANCE_ID, &instance_id)
            .await?;
        Ok(instance_id)
    }
}
