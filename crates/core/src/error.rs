use std::path::PathBuf;

use eyeswap_scene::{ObjectId, ObjectKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("object {0:?} no longer exists")]
    MissingObject(ObjectId),
    #[error("object {id:?} is {}, expected {}", with_article(*actual), with_article(*expected))]
    WrongKind {
        id: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },
    #[error("vertex {index} out of range for {count} vertices")]
    VertexOutOfRange { index: u32, count: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("no active object")]
    NoActiveObject,
    #[error("The selected object is not {}.", with_article(*expected))]
    WrongKind {
        expected: ObjectKind,
        actual: ObjectKind,
    },
    #[error("The selected object is already chosen as the {other}.")]
    SameAsOther { other: ObjectKind },
    #[error("selected {0} no longer exists")]
    MissingObject(ObjectKind),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplaceError {
    #[error("Please select both a mesh and an armature.")]
    MissingSelection,
    #[error("Invalid or missing eye asset path!")]
    MissingConfiguration,
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("joint '{joint}' not found on armature '{skeleton}'")]
    MissingJoint { skeleton: String, joint: String },
    #[error("failed to load eye assets from {}: {reason}", path.display())]
    AssetLoad { path: PathBuf, reason: String },
    #[error(transparent)]
    Host(#[from] HostError),
}

impl ReplaceError {
    pub(crate) fn asset_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ReplaceError::AssetLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn with_article(kind: ObjectKind) -> String {
    match kind {
        ObjectKind::Armature | ObjectKind::Empty => format!("an {kind}"),
        ObjectKind::Mesh => format!("a {kind}"),
    }
}
