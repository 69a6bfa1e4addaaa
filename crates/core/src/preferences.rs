use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::AssetOrder;
use crate::removal::DEFAULT_WEIGHT_THRESHOLD;

pub const PREFERENCES_ENV: &str = "EYESWAP_PREFERENCES";
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("preferences io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preferences json invalid: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// File holding the replacement eye objects.
    pub eye_asset_path: String,
    pub weight_threshold: f32,
    pub asset_order: AssetOrder,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            eye_asset_path: String::new(),
            weight_threshold: DEFAULT_WEIGHT_THRESHOLD,
            asset_order: AssetOrder::Auto,
        }
    }
}

impl Preferences {
    /// `$EYESWAP_PREFERENCES`, or `<config dir>/eyeswap/preferences.json`.
    pub fn default_path() -> Result<PathBuf, PreferencesError> {
        if let Some(path) = std::env::var_os(PREFERENCES_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().ok_or(PreferencesError::NoConfigDir)?;
        Ok(dir.join("eyeswap").join(PREFERENCES_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read(path)?;
        let mut prefs: Preferences = serde_json::from_slice(&data)?;
        prefs.sanitize();
        Ok(prefs)
    }

    /// Loads from the default location, falling back to defaults on any
    /// error.
    pub fn load_or_default() -> Self {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!("preferences unavailable: {}", err);
                return Self::default();
            }
        };
        match Self::load_from(&path) {
            Ok(prefs) => {
                tracing::debug!("preferences loaded from {}", path.display());
                prefs
            }
            Err(err) => {
                tracing::warn!("failed to load preferences from {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn save(&self) -> Result<PathBuf, PreferencesError> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn has_asset_path(&self) -> bool {
        !self.eye_asset_path.trim().is_empty()
    }

    /// Threshold limited to `[0, 1]`; non-finite values fall back to the
    /// default.
    pub fn effective_threshold(&self) -> f32 {
        if self.weight_threshold.is_finite() {
            self.weight_threshold.clamp(0.0, 1.0)
        } else {
            DEFAULT_WEIGHT_THRESHOLD
        }
    }

    fn sanitize(&mut self) {
        self.weight_threshold = self.effective_threshold();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert!(!prefs.has_asset_path());
    }

    #[test]
    fn saves_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let prefs = Preferences {
            eye_asset_path: "/assets/eyes.glb".to_string(),
            weight_threshold: 0.25,
            asset_order: AssetOrder::Named,
        };
        prefs.save_to(&path).unwrap();
        assert_eq!(Preferences::load_from(&path).unwrap(), prefs);
    }

    #[test]
    fn partial_files_fill_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{ "eye_asset_path": "eyes.obj", "weight_threshold": 4.0 }"#)
            .unwrap();
        let prefs = Preferences::load_from(&path).unwrap();
        assert_eq!(prefs.eye_asset_path, "eyes.obj");
        assert_eq!(prefs.weight_threshold, 1.0);
        assert_eq!(prefs.asset_order, AssetOrder::Auto);
    }

    #[test]
    fn effective_threshold_is_bounded() {
        let mut prefs = Preferences::default();
        prefs.weight_threshold = f32::NAN;
        assert_eq!(prefs.effective_threshold(), DEFAULT_WEIGHT_THRESHOLD);
        prefs.weight_threshold = 3.0;
        assert_eq!(prefs.effective_threshold(), 1.0);
        prefs.weight_threshold = -1.0;
        assert_eq!(prefs.effective_threshold(), 0.0);
        prefs.weight_threshold = 0.3;
        assert_eq!(prefs.effective_threshold(), 0.3);
    }

    #[test]
    fn whitespace_path_counts_as_missing() {
        let prefs = Preferences {
            eye_asset_path: "   ".to_string(),
            ..Preferences::default()
        };
        assert!(!prefs.has_asset_path());
    }
}
