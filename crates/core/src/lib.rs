mod assets;
mod error;
mod gltf_io;
mod host;
mod joints;
mod obj_io;
mod placement;
mod preferences;
mod project;
mod removal;
mod replace;
mod selection;

pub use assets::{
    load_eye_assets, resolve_eyes, AssetOrder, EyeAsset, ResolvedBy, ResolvedEyes,
    LEFT_EYE_ASSET, RIGHT_EYE_ASSET,
};
pub use error::{HostError, ReplaceError, SelectionError};
pub use gltf_io::{import_gltf_character, load_gltf_assets, ImportError};
pub use host::{EyeHost, JointPose};
pub use joints::{capture_joint, JointSnapshot, LEFT_EYE_JOINT, RIGHT_EYE_JOINT};
pub use obj_io::{load_obj_assets, write_scene_obj};
pub use placement::{place_replacement_eyes, EYE_YAW_DEGREES};
pub use preferences::{Preferences, PreferencesError, PREFERENCES_ENV};
pub use project::{Project, ProjectError, PROJECT_VERSION};
pub use removal::{remove_named_group, vertices_in_group, RemovalOutcome, DEFAULT_WEIGHT_THRESHOLD};
pub use replace::{replace_eyes, ReplaceReport, Side};
pub use selection::SelectionSession;

pub const VERSION_LABEL: &str = "v1.00";
