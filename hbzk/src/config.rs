//! Key file locations, read from the environment.

use std::env;
use std::path::{Path, PathBuf};

use primitives::constants::{PROVING_KEY_FILE_NAME, VERIFYING_KEY_FILE_NAME};

pub const KEY_DIR_VAR: &str = "HASHBLOCK_KEY_DIR";
pub const PROVING_KEY_VAR: &str = "HASHBLOCK_PROVING_KEY";
pub const VERIFYING_KEY_VAR: &str = "HASHBLOCK_VERIFYING_KEY";

/// Where the key files live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub proving_key: PathBuf,
    pub verifying_key: PathBuf,
}

impl Config {
    /// Load `.env` if present, then read the key locations from the process environment.
    ///
    /// - `HASHBLOCK_KEY_DIR`: directory of both key files (default `.`)
    /// - `HASHBLOCK_PROVING_KEY`: proving key path (default `<dir>/hashblock_zkSNARK.pk`)
    /// - `HASHBLOCK_VERIFYING_KEY`: verifying key path (default `<dir>/hashblock_zkSNARK.vk`)
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded environment file");
        }
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars<F: Fn(&str) -> Option<String>>(var: F) -> Self {
        let key_dir = var(KEY_DIR_VAR).unwrap_or_else(|| ".".to_string());
        let key_dir = Path::new(&key_dir);
        Config {
            proving_key: var(PROVING_KEY_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| key_dir.join(PROVING_KEY_FILE_NAME)),
            verifying_key: var(VERIFYING_KEY_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| key_dir.join(VERIFYING_KEY_FILE_NAME)),
        }
    }

    /// Replace the key locations given on the command line.
    pub fn with_overrides(
        mut self,
        proving_key: Option<PathBuf>,
        verifying_key: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = proving_key {
            self.proving_key = path;
        }
        if let Some(path) = verifying_key {
            self.verifying_key = path;
        }
        self
    }
}
