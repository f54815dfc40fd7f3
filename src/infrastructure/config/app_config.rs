use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::paths;

/// Canonical collection (and SQLite table) holding group documents.
pub const DEFAULT_GROUP_COLLECTION: &str = "grupos";

/// Settings stored in settings.yaml in the user config directory.
/// All fields are optional - missing values use defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage backend: "sqlite" (default), "mongodb" or "memory"
    #[serde(rename = "type")]
    pub storage_type: StorageType,

    /// Collection name for groups
    pub collection: String,

    pub sqlite: SqliteSettings,

    /// MongoDB connection settings (only used when storage_type is mongodb)
    pub mongodb: MongoDbSettings,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Sqlite,
            collection: DEFAULT_GROUP_COLLECTION.to_string(),
            sqlite: SqliteSettings::default(),
            mongodb: MongoDbSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Sqlite,
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteSettings {
    /// Leave empty to use platform default path
    pub path: String,
}

impl SqliteSettings {
    pub fn effective_path(&self) -> PathBuf {
        if self.path.is_empty() {
            paths::default_sqlite_path()
        } else {
            PathBuf::from(&self.path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoDbSettings {
    pub uri: String,
    pub database: String,
}

impl Default for MongoDbSettings {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "runwithme".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Info-level console plus rolling file output when true
    pub production: bool,
}
