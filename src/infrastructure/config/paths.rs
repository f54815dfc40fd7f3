use std::path::PathBuf;

/// Get platform-specific configuration directory
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Library/Application Support/runwithme")
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("runwithme")
    }
}

pub fn default_sqlite_path() -> PathBuf {
    config_dir().join("data.db")
}

pub fn log_dir() -> PathBuf {
    config_dir().join("logs")
}

pub fn settings_file_path() -> PathBuf {
    config_dir().join("settings.yaml")
}
