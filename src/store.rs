use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;
use crate::progress::ProgressState;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where the tracker keeps its three fields between runs.
///
/// `load` never fails: anything unreadable comes back as the default state.
pub trait StateStore {
    fn load(&self) -> ProgressState;
    fn save(&self, state: &ProgressState) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::state_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for FileStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> ProgressState {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved state yet");
                return ProgressState::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read saved state");
                return ProgressState::default();
            }
        };

        match serde_json::from_slice::<ProgressState>(&bytes) {
            Ok(state) => {
                debug!(path = %self.path.display(), ?state, "loaded state");
                state
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "saved state is malformed, starting fresh");
                ProgressState::default()
            }
        }
    }

    fn save(&self, state: &ProgressState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }
        let data = serde_json::to_vec_pretty(state)?;

        // Write beside the target and rename so a crash never leaves half a file
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data).map_err(|e| self.io_err(e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_err(e));
        }

        debug!(path = %self.path.display(), "saved state");
        Ok(())
    }
}
