use crate::error::{Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_AI_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_AI_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_CONNECTION_FILE: &str = ".backoffice/connection.json";

const SECRET_KEY_PREFIX: &str = "sb_secret";
const SERVICE_ROLE_MARKER: &str = "service_role";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub store_url: Option<String>,
    pub store_key: Option<String>,
    pub ai_api_key: Option<String>,
    pub ai_base_url: String,
    pub ai_model: String,
    pub connection_file: PathBuf,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            store_url: get_env_opt("STORE_URL"),
            store_key: get_env_opt("STORE_KEY"),
            ai_api_key: get_env_opt("AI_API_KEY"),
            ai_base_url: get_env_or("AI_BASE_URL", DEFAULT_AI_BASE_URL),
            ai_model: get_env_or("AI_MODEL", DEFAULT_AI_MODEL),
            connection_file: PathBuf::from(get_env_or("CONNECTION_FILE", DEFAULT_CONNECTION_FILE)),
        })
    }

    /// Credentials from the environment, falling back to the saved connection file.
    pub async fn resolve_credentials(&self) -> Option<StoreCredentials> {
        let saved = load_saved_connection(&self.connection_file).await;
        let url = self
            .store_url
            .clone()
            .or_else(|| saved.as_ref().map(|s| s.url.clone()))?;
        let key = self
            .store_key
            .clone()
            .or_else(|| saved.and_then(|s| s.key))?;
        Some(StoreCredentials { url, key })
    }
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_env_or(name: &str, default: &str) -> String {
    get_env_opt(name).unwrap_or_else(|| default.to_string())
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCredentials {
    pub url: String,
    pub key: String,
}

impl StoreCredentials {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim().to_string(),
            key: key.into().trim().to_string(),
        }
    }

    /// Rejects privileged keys first, then checks the endpoint.
    pub fn validate(&self) -> Result<url::Url> {
        check_public_key(&self.key)?;
        url::Url::parse(&self.url)
            .map_err(|e| Error::Config(format!("Invalid store URL '{}': {}", self.url, e)))
    }
}

/// Only the anonymous public key may be used from this application.
pub fn check_public_key(key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Config("Missing store access key".to_string()));
    }
    if key.starts_with(SECRET_KEY_PREFIX) || key.contains(SERVICE_ROLE_MARKER) || jwt_role(key).as_deref() == Some(SERVICE_ROLE_MARKER) {
        tracing::warn!("Blocked attempt to use a privileged store key");
        return Err(Error::Config(
            "Secret or service-role keys are not allowed. Use the anon public key.".to_string(),
        ));
    }
    Ok(())
}

fn jwt_role(key: &str) -> Option<String> {
    let mut parts = key.split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    claims.get("role")?.as_str().map(|s| s.to_string())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedConnection {
    pub url: String,
    pub key: Option<String>,
}

pub async fn load_saved_connection(path: &Path) -> Option<SavedConnection> {
    let raw = tokio::fs::read(path).await.ok()?;
    match serde_json::from_slice(&raw) {
        Ok(saved) => Some(saved),
        Err(e) => {
            tracing::warn!("Ignoring unreadable connection file {:?}: {}", path, e);
            None
        }
    }
}

pub async fn save_connection(path: &Path, credentials: &StoreCredentials) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    let saved = SavedConnection {
        url: credentials.url.clone(),
        key: Some(credentials.key.clone()),
    };
    tokio::fs::write(path, serde_json::to_vec_pretty(&saved)?).await?;
    Ok(())
}

/// Keeps the remembered URL but drops the key.
pub async fn forget_key(path: &Path) -> Result<()> {
    let Some(mut saved) = load_saved_connection(path).await else {
        return Ok(());
    };
    saved.key = None;
    tokio::fs::write(path, serde_json::to_vec_pretty(&saved)?).await?;
    Ok(())
}
