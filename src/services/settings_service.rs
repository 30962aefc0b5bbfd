use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::{RecordStore, Table};
use crate::error::Result;
use crate::models::settings::AppSettings;
use crate::session::Session;
use crate::transform::{settings, text};

#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn RecordStore>,
    session: Arc<RwLock<Session>>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn RecordStore>, session: Arc<RwLock<Session>>) -> Self {
        Self { store, session }
    }

    pub async fn get(&self) -> AppSettings {
        self.session.read().await.settings.clone()
    }

    /// Updates the settings row, or creates it when the session is running on
    /// in-memory defaults.
    pub async fn update(&self, new_settings: AppSettings) -> Result<AppSettings> {
        let settings_id = self.session.read().await.settings_id.clone();
        let record = settings::to_record(&new_settings);
        let row = match settings_id.as_deref() {
            Some(id) => self.store.update(Table::Settings, id, record).await?,
            None => self.store.insert(Table::Settings, record).await?,
        };

        let saved = settings::from_record(&row);
        let mut session = self.session.write().await;
        session.settings = saved.clone();
        let row_id = text(&row, &["id"]);
        if !row_id.is_empty() {
            session.settings_id = Some(row_id);
        }
        tracing::info!("Agency settings updated");
        Ok(saved)
    }
}
