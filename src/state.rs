use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::StateMap;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file {path} has no parent directory")]
    InvalidPath { path: PathBuf },
    #[error("failed to write state to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// JSON-file backed URL -> status map.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Missing or unreadable files yield an empty map.
    pub fn load(&self) -> StateMap {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(target: "state", path = %self.path.display(), "no state file yet; starting empty");
                return StateMap::new();
            }
            Err(err) => {
                tracing::warn!(target: "state", path = %self.path.display(), error = %err, "failed to read state file; starting empty");
                return StateMap::new();
            }
        };

        match serde_json::from_str::<StateMap>(&contents) {
            Ok(map) => {
                tracing::info!(target: "state", path = %self.path.display(), entries = map.len(), "state loaded");
                map
            }
            Err(err) => {
                tracing::warn!(target: "state", path = %self.path.display(), error = %err, "state file is corrupt; starting empty");
                StateMap::new()
            }
        }
    }

    /// Writes to a temp file in the same directory, then renames it over the target.
    pub fn save(&self, state: &StateMap) -> Result<(), StateError> {
        let dir = match self.path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => {
                return Err(StateError::InvalidPath {
                    path: self.path.clone(),
                })
            }
        };
        let payload = serde_json::to_vec_pretty(state)?;

        let io_err = |source: io::Error| StateError::Io {
            path: self.path.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&payload).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|err| io_err(err.error))?;

        tracing::debug!(target: "state", path = %self.path.display(), entries = state.len(), "state saved");
        Ok(())
    }
}
