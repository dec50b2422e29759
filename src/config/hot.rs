//! Scoring config with hot-reload from disk.
//!
//! On each `current()` call the file's modified time is checked and the
//! config is reloaded if it changed. A file that fails to parse keeps the
//! previous value.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
    time::SystemTime,
};
use tracing::{info, warn};

use super::{load_from, ScoreConfig, DEFAULT_CONFIG_TOML};

#[derive(Debug)]
pub struct HotReloadConfig {
    path: Option<PathBuf>,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    config: ScoreConfig,
    last_modified: Option<SystemTime>,
}

impl HotReloadConfig {
    /// Watch `path` (defaults to "config/scoring.toml" if `None`), starting
    /// from `initial` until the file is first read.
    pub fn new(path: Option<&Path>, initial: ScoreConfig) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_TOML));
        Self {
            path: Some(path),
            inner: RwLock::new(State {
                config: initial,
                last_modified: None,
            }),
        }
    }

    /// A config that never reloads.
    pub fn fixed(config: ScoreConfig) -> Self {
        Self {
            path: None,
            inner: RwLock::new(State {
                config,
                last_modified: None,
            }),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Latest config, reloading if the file changed.
    pub fn current(&self) -> ScoreConfig {
        let Some(path) = self.path.as_deref() else {
            return self.snapshot();
        };
        let needs_reload = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
                guard.last_modified != Some(mtime)
            }
            // Missing file: keep what we have.
            Err(_) => false,
        };

        if !needs_reload {
            return self.snapshot();
        }

        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // Double-check under the write lock.
        if let Ok(mtime) = fs::metadata(path).and_then(|m| m.modified()) {
            if guard.last_modified != Some(mtime) {
                match load_from(path) {
                    Ok(cfg) => {
                        info!(path = %path.display(), "scoring config reloaded");
                        guard.config = cfg;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "scoring config reload failed")
                    }
                }
                // Do not retry a broken file until it changes again.
                guard.last_modified = Some(mtime);
            }
        }
        guard.config.clone()
    }

    fn snapshot(&self) -> ScoreConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .config
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreMode;
    use std::{io::Write, thread, time::Duration};

    fn write(path: &Path, body: &str) {
        let mut f = fs::File::create(path).unwrap();
        write!(f, "{body}").unwrap();
        f.sync_all().unwrap();
    }

    #[test]
    fn fixed_never_reloads() {
        let hot = HotReloadConfig::fixed(ScoreConfig {
            a_adjust: 0.5,
            ..Default::default()
        });
        assert!(hot.path().is_none());
        assert_eq!(hot.current().a_adjust, 0.5);
    }

    #[test]
    fn missing_file_keeps_initial() {
        let tmp = tempfile::tempdir().unwrap();
        let hot = HotReloadConfig::new(
            Some(tmp.path().join("absent.toml").as_path()),
            ScoreConfig {
                negation_window: 9,
                ..Default::default()
            },
        );
        assert_eq!(hot.current().negation_window, 9);
    }

    #[test]
    fn loads_and_hot_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scoring.toml");
        write(&path, "negation_window = 3\nscore_mode = \"once\"\n");

        let hot = HotReloadConfig::new(Some(path.as_path()), ScoreConfig::default());
        let c1 = hot.current();
        assert_eq!(c1.negation_window, 3);
        assert_eq!(c1.score_mode, ScoreMode::Once);

        // Ensure different mtime (coarse filesystem granularity).
        thread::sleep(Duration::from_millis(1100));
        write(&path, "negation_window = 6\n");
        let c2 = hot.current();
        assert_eq!(c2.negation_window, 6);
        assert_eq!(c2.score_mode, ScoreMode::All);

        // Broken file: previous value survives.
        thread::sleep(Duration::from_millis(1100));
        write(&path, "negation_window = \"lots\"\n");
        assert_eq!(hot.current().negation_window, 6);
    }
}
