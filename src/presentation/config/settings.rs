use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::infrastructure::audio::RecognitionProvider;

use super::Environment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub recognition: RecognitionSettings,
    pub resources: ResourceSettings,
    pub worker: WorkerSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `appsettings.{environment}.toml` (optional) under `APP_*`
    /// environment variables. Nested keys use `__`, e.g.
    /// `APP_DATABASE__URL`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let file_name = format!("appsettings.{}", environment.as_str());

        Config::builder()
            .add_source(File::with_name(&file_name).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Blank runs the service on in-memory repositories.
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecognitionSettings {
    pub provider: RecognitionProvider,
    /// Unset picks the provider's default model.
    pub model: Option<String>,
    pub precision: String,
    pub disabled: bool,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: Option<String>,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            provider: RecognitionProvider::Local,
            model: None,
            precision: "f32".to_string(),
            disabled: false,
            api_key: None,
            base_url: None,
            azure_deployment: None,
            azure_api_version: None,
        }
    }
}

impl RecognitionSettings {
    pub fn model_name(&self) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResourceSettings {
    pub fetch_timeout_secs: u64,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    pub queue_capacity: usize,
    pub max_concurrent_jobs: usize,
    /// Upper bound on one recognition call; unset means no deadline.
    pub job_deadline_secs: Option<u64>,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            max_concurrent_jobs: 2,
            job_deadline_secs: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    Local,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub enabled: bool,
    pub provider: StorageProviderSetting,
    pub local_path: String,
    pub azure_account: Option<String>,
    pub azure_access_key: Option<String>,
    pub azure_container: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: StorageProviderSetting::Local,
            local_path: "./artifacts".to_string(),
            azure_account: None,
            azure_access_key: None,
            azure_container: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}
