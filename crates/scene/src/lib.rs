mod armature;
mod mesh;
mod scene;
mod transform;

pub use armature::{Armature, Bone, BonePose};
pub use mesh::{edges_from_faces, GroupWeight, MeshData};
pub use scene::{Constraint, ObjectData, ObjectId, ObjectKind, Scene, SceneObject};
pub use transform::{Euler, Transform};
