// src/config/options.rs
use std::fs;
use std::io;
use std::path::{ Path, PathBuf };

use serde::Deserialize;

use super::consts::*;
use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub store: StoreOptions,
    pub log: LogOptions,
}

impl AppOptions {
    /// Read options from a TOML file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
        };
        Self::from_toml(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Where the Team Registry and Resolution Table live.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub dir: PathBuf,
    pub teams: String,
    pub conformers: String,
    /// Hold an exclusive lock file while a Conformer is open.
    pub lock: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_STORE_DIR),
            teams: s!(TEAMS_FILE),
            conformers: s!(CONFORMERS_FILE),
            lock: true,
        }
    }
}

impl StoreOptions {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), ..Self::default() }
    }

    pub fn teams_path(&self) -> PathBuf { self.dir.join(&self.teams) }

    pub fn conformers_path(&self) -> PathBuf { self.dir.join(&self.conformers) }

    pub fn lock_path(&self) -> Option<PathBuf> {
        self.lock.then(|| self.dir.join(LOCK_FILE))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub file: PathBuf,
    /// Used when RUST_LOG is not set.
    pub level: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            file: PathBuf::from(LOG_FILE),
            level: s!(LOG_LEVEL),
        }
    }
}
