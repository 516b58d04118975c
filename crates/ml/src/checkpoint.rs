//! JSON persistence for trained networks.
//!
//! A checkpoint is identified by an experiment name derived from the
//! environment id and a free-form experiment label, and lives at
//! `<dir>/<name>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::nn::PolicyValueNet;
use crate::MlError;

pub fn experiment_name(env_id: &str, experiment: &str) -> String {
    format!("{env_id}-{experiment}")
}

pub fn checkpoint_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

impl PolicyValueNet {
    /// Writes the network to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), MlError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        tracing::debug!(path = %path.display(), "saved checkpoint");
        Ok(())
    }

    /// Reads a network from `path` and checks that its layers are consistent.
    pub fn load(path: &Path) -> Result<Self, MlError> {
        let bytes = fs::read(path)?;
        let net: Self = serde_json::from_slice(&bytes)?;
        net.validate()?;
        tracing::debug!(path = %path.display(), "loaded checkpoint");
        Ok(net)
    }
}
