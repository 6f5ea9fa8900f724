use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "wordjar";
const STATE_FILE: &str = "writing_data.json";
const LOG_FILE: &str = "wordjar.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/wordjar`, or the platform's local data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn state_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join(STATE_FILE))
            .unwrap_or_else(|| PathBuf::from(STATE_FILE))
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join(LOG_FILE))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE))
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("wordjar_config.json"))
    }
}
