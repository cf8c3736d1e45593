use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::config::AppConfig;

#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub logs_dir: PathBuf,
    pub state_path: PathBuf,
}

/// Creates the log directory and the state file's parent before anything touches them.
pub fn ensure_directories(config: &AppConfig) -> Result<ResolvedPaths> {
    let logs_dir = ensure_dir(Path::new(&config.logging.logs_dir))?;

    let state_path = config.monitor.state_file.clone();
    if let Some(parent) = state_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    Ok(ResolvedPaths {
        logs_dir,
        state_path,
    })
}

fn ensure_dir(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory {}", path.display()))?;
    }
    Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_for_tests;

    #[test]
    fn creates_logs_dir_and_state_parent() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let state = dir.path().join("data/nested/last_status.json");
        let config = config_for_tests(&[
            ("LOGS_DIR", logs.to_str().unwrap()),
            ("STATE_FILE", state.to_str().unwrap()),
        ]);

        let paths = ensure_directories(&config).unwrap();
        assert!(logs.is_dir());
        assert!(state.parent().unwrap().is_dir());
        assert_eq!(paths.state_path, state);
        assert!(!state.exists());
    }
}
