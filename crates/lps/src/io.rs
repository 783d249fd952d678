//! JSON configuration for the tracker.

use std::fs;
use std::path::Path;

use lps_needle::{NeedleDetector, NeedleError, NeedleSpec, PoseParams, SearchParams};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum LpsIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LpsConfigError {
    #[error(transparent)]
    Needle(#[from] NeedleError),
}

/// Tracker configuration: needle geometry plus search and pose settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpsConfig {
    pub needle: NeedleSpec,
    #[serde(default)]
    pub search: SearchParams,
    #[serde(default)]
    pub pose: PoseParams,
}

impl LpsConfig {
    pub fn new(needle: NeedleSpec) -> Self {
        Self {
            needle,
            search: SearchParams::default(),
            pose: PoseParams::default(),
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LpsIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), LpsIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Calibrate the needle and build a detector from this config.
    pub fn build_detector(&self) -> Result<NeedleDetector, LpsConfigError> {
        Ok(NeedleDetector::new(
            &self.needle,
            self.search.clone(),
            self.pose.clone(),
        )?)
    }
}
