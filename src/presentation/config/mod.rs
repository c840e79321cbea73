mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, LoggingSettings, RecognitionSettings, ResourceSettings, ServerSettings,
    Settings, StorageProviderSetting, StorageSettings, WorkerSettings,
};
