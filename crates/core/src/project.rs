use std::path::Path;

use eyeswap_scene::Scene;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PROJECT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("project json invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("project version {found} is newer than supported version {PROJECT_VERSION}")]
    UnsupportedVersion { found: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub version: u32,
    #[serde(default)]
    pub scene: Scene,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            version: PROJECT_VERSION,
            scene: Scene::default(),
        }
    }
}

impl Project {
    pub fn from_scene(scene: Scene) -> Self {
        Self {
            version: PROJECT_VERSION,
            scene,
        }
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, ProjectError> {
        let mut project: Project = serde_json::from_slice(data)?;
        project.migrate_to_latest()?;
        Ok(project)
    }

    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let data = std::fs::read(path)?;
        Self::from_slice(&data)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let data = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn migrate_to_latest(&mut self) -> Result<(), ProjectError> {
        if self.version > PROJECT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: self.version,
            });
        }
        self.version = PROJECT_VERSION;
        Ok(())
    }
}
