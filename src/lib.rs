pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod transform;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::StoreCredentials;
use crate::database::RecordStore;
use crate::error::{Error, Result};
use crate::services::ai_service::AIService;
use crate::session::Session;
use crate::utils::{id::IdGenerator, in_flight::InFlight};

const NO_CREDENTIALS: &str = "No store credentials configured";
const NOT_LOADED: &str = "Session data has not been loaded yet";

#[derive(Default)]
struct Connection {
    store: Option<Arc<dyn RecordStore>>,
    last_error: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    connection: Arc<RwLock<Connection>>,
    pub session: Arc<RwLock<Session>>,
    pub ai_service: AIService,
    pub ids: Arc<dyn IdGenerator>,
    pub in_flight: InFlight,
    /// Where a successful connect is remembered; `None` disables persistence.
    pub connection_file: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        ai_service: AIService,
        ids: Arc<dyn IdGenerator>,
        connection_file: Option<PathBuf>,
    ) -> Self {
        Self {
            connection: Arc::new(RwLock::new(Connection {
                store: None,
                last_error: Some(NO_CREDENTIALS.to_string()),
            })),
            session: Arc::new(RwLock::new(Session::default())),
            ai_service,
            ids,
            in_flight: InFlight::new(),
            connection_file,
        }
    }

    /// The connected store, or the blocked-state error.
    pub async fn store(&self) -> Result<Arc<dyn RecordStore>> {
        let connection = self.connection.read().await;
        connection.store.clone().ok_or_else(|| {
            Error::NotConnected(
                connection
                    .last_error
                    .clone()
                    .unwrap_or_else(|| NO_CREDENTIALS.to_string()),
            )
        })
    }

    /// The connected store, provided the session holds a complete load from it.
    /// Until then data commands report the load failure instead of serving
    /// partial or leftover collections.
    pub async fn data_store(&self) -> Result<Arc<dyn RecordStore>> {
        let store = self.store().await?;
        let session = self.session.read().await;
        if !session.loaded {
            return Err(Error::NotConnected(
                session
                    .load_error
                    .clone()
                    .unwrap_or_else(|| NOT_LOADED.to_string()),
            ));
        }
        Ok(store)
    }

    pub async fn connection_error(&self) -> Option<String> {
        self.connection.read().await.last_error.clone()
    }

    /// Builds a client for `credentials` and loads the session through it.
    /// A privileged key leaves the previous connection untouched.
    pub async fn connect(&self, credentials: &StoreCredentials) -> Result<()> {
        let store = match database::connect(credentials) {
            Ok(store) => store,
            Err(e) => {
                self.connection.write().await.last_error = Some(e.to_string());
                return Err(e);
            }
        };
        self.attach(store).await
    }

    /// Uses an already constructed store, e.g. an in-memory one in tests.
    /// Data from the previous store is dropped before the new one is read.
    pub async fn attach(&self, store: Arc<dyn RecordStore>) -> Result<()> {
        {
            let mut connection = self.connection.write().await;
            connection.store = Some(store);
            connection.last_error = None;
            self.session.write().await.reset();
        }
        self.refresh().await
    }

    pub async fn disconnect(&self) {
        {
            let mut connection = self.connection.write().await;
            connection.store = None;
            connection.last_error = Some(NO_CREDENTIALS.to_string());
        }
        self.session.write().await.reset();
        tracing::info!("Disconnected from record store");
    }

    /// Reloads everything from the store. On failure the previous data stays
    /// and the failure is kept as the session's load error; before the first
    /// successful load that blocks every data command.
    pub async fn refresh(&self) -> Result<()> {
        let store = self.store().await?;
        match Session::load(store.as_ref()).await {
            Ok(data) => {
                self.session.write().await.apply_loaded(data);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Loading session data failed: {}", e);
                self.session.write().await.load_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
