use std::path::Path;

use eyeswap_scene::{MeshData, ObjectData, Transform};
use serde::{Deserialize, Serialize};

use crate::error::ReplaceError;
use crate::{gltf_io, obj_io, project};

pub const LEFT_EYE_ASSET: &str = "Left_Eye";
pub const RIGHT_EYE_ASSET: &str = "Right_Eye";

/// One object read from an eye asset file.
#[derive(Debug, Clone, PartialEq)]
pub struct EyeAsset {
    pub name: String,
    pub mesh: MeshData,
    /// Transform as authored in the asset file.
    pub transform: Transform,
}

/// How loaded assets are assigned to the left and right side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetOrder {
    /// Named lookup when both names exist, otherwise file order.
    #[default]
    Auto,
    /// Require objects named `Left_Eye` and `Right_Eye`.
    Named,
    /// First object is the left eye, second the right eye.
    Positional,
}

impl AssetOrder {
    pub const ALL: [AssetOrder; 3] = [AssetOrder::Auto, AssetOrder::Named, AssetOrder::Positional];

    pub fn label(self) -> &'static str {
        match self {
            AssetOrder::Auto => "Auto",
            AssetOrder::Named => "By name",
            AssetOrder::Positional => "File order",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    Name,
    Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEyes {
    pub left: EyeAsset,
    pub right: EyeAsset,
    pub resolved_by: ResolvedBy,
}

/// Loads every mesh object from an eye asset file, in file order.
/// Supported formats are glTF (`.gltf`, `.glb`), OBJ and eyeswap projects
/// (`.json`). Fewer than two objects is an error.
pub fn load_eye_assets(path: &Path) -> Result<Vec<EyeAsset>, ReplaceError> {
    if !path.is_file() {
        return Err(ReplaceError::asset_load(path, "file not found"));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    let assets = match extension.as_str() {
        "gltf" | "glb" => gltf_io::load_gltf_assets(path),
        "obj" => obj_io::load_obj_assets(path),
        "json" => load_project_assets(path),
        other => Err(format!("unsupported asset format '.{other}'")),
    }
    .map_err(|reason| ReplaceError::asset_load(path, reason))?;

    if assets.len() < 2 {
        return Err(ReplaceError::asset_load(
            path,
            format!("expected at least 2 objects, found {}", assets.len()),
        ));
    }
    tracing::info!("loaded {} eye assets from {}", assets.len(), path.display());
    Ok(assets)
}

fn load_project_assets(path: &Path) -> Result<Vec<EyeAsset>, String> {
    let project = project::Project::load(path).map_err(|err| err.to_string())?;
    Ok(project
        .scene
        .objects()
        .filter_map(|object| match &object.data {
            ObjectData::Mesh(mesh) => Some(EyeAsset {
                name: object.name.clone(),
                mesh: mesh.clone(),
                transform: object.transform,
            }),
            _ => None,
        })
        .collect())
}

/// Picks the left and right eye out of the loaded assets.
pub fn resolve_eyes(
    mut assets: Vec<EyeAsset>,
    order: AssetOrder,
    path: &Path,
) -> Result<ResolvedEyes, ReplaceError> {
    let left = assets.iter().position(|asset| asset.name == LEFT_EYE_ASSET);
    let right = assets.iter().position(|asset| asset.name == RIGHT_EYE_ASSET);

    match (order, left, right) {
        (AssetOrder::Auto | AssetOrder::Named, Some(left), Some(right)) => {
            let left_asset = assets[left].clone();
            let right_asset = assets.swap_remove(right);
            Ok(ResolvedEyes {
                left: left_asset,
                right: right_asset,
                resolved_by: ResolvedBy::Name,
            })
        }
        (AssetOrder::Named, _, _) => Err(ReplaceError::asset_load(
            path,
            format!("asset file needs objects named '{LEFT_EYE_ASSET}' and '{RIGHT_EYE_ASSET}'"),
        )),
        (AssetOrder::Auto | AssetOrder::Positional, _, _) => {
            let found = assets.len();
            let mut iter = assets.into_iter();
            let (Some(left), Some(right)) = (iter.next(), iter.next()) else {
                return Err(ReplaceError::asset_load(
                    path,
                    format!("expected at least 2 objects, found {found}"),
                ));
            };
            if order == AssetOrder::Auto {
                tracing::warn!(
                    "no '{}'/'{}' objects in {}; using file order",
                    LEFT_EYE_ASSET,
                    RIGHT_EYE_ASSET,
                    path.display()
                );
            }
            Ok(ResolvedEyes {
                left,
                right,
                resolved_by: ResolvedBy::Position,
            })
        }
    }
}
