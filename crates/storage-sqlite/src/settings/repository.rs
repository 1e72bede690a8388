use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_settings::dsl::*;
use seva_core::errors::Result;
use seva_core::settings::{keys, Settings, SettingsRepositoryTrait, SettingsUpdate};

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

fn replace_setting(
    conn: &mut SqliteConnection,
    key: &str,
    value: String,
) -> std::result::Result<(), StorageError> {
    diesel::replace_into(app_settings)
        .values(&AppSettingDB {
            setting_key: key.to_string(),
            setting_value: value,
        })
        .execute(conn)?;
    Ok(())
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_settings(&self) -> Result<Settings> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(String, String)> = app_settings
            .select((setting_key, setting_value))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;

        let overrides: HashMap<String, String> = rows.into_iter().collect();
        Ok(Settings::from_overrides(&overrides))
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        let update = update.clone();
        self.writer
            .exec(move |conn| {
                if let Some(ref organization_name) = update.organization_name {
                    replace_setting(conn, keys::ORGANIZATION_NAME, organization_name.clone())?;
                }
                if let Some(ref contact_email) = update.contact_email {
                    replace_setting(conn, keys::CONTACT_EMAIL, contact_email.clone())?;
                }
                if let Some(min_donation_amount) = update.min_donation_amount {
                    replace_setting(
                        conn,
                        keys::MIN_DONATION_AMOUNT,
                        min_donation_amount.to_string(),
                    )?;
                }
                if let Some(ref receipt_prefix) = update.receipt_prefix {
                    replace_setting(conn, keys::RECEIPT_PREFIX, receipt_prefix.clone())?;
                }
                Ok(())
            })
            .await
    }

    fn get_setting(&self, setting_key_param: &str) -> Result<String> {
        let mut conn = get_connection(&self.pool)?;
        let value = app_settings
            .filter(setting_key.eq(setting_key_param))
            .select(setting_value)
            .first(&mut conn)
            .map_err(StorageError::from)?;
        Ok(value)
    }

    async fn update_setting(
        &self,
        setting_key_param: &str,
        setting_value_param: &str,
    ) -> Result<()> {
        let key = setting_key_param.to_string();
        let value = setting_value_param.to_string();

        self.writer
            .exec(move |conn| {
                replace_setting(conn, &key, value)?;
                Ok(())
            })
            .await
    }
}
