use std::collections::BTreeMap;

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::armature::Armature;
use crate::mesh::MeshData;
use crate::transform::Transform;

const MAX_CONSTRAINT_DEPTH: usize = 32;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Mesh,
    Armature,
    Empty,
}

impl ObjectKind {
    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Mesh => "mesh",
            ObjectKind::Armature => "armature",
            ObjectKind::Empty => "empty",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectData {
    Mesh(MeshData),
    Armature(Armature),
    Empty,
}

impl ObjectData {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectData::Mesh(_) => ObjectKind::Mesh,
            ObjectData::Armature(_) => ObjectKind::Armature,
            ObjectData::Empty => ObjectKind::Empty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    /// Parents the owner to `target`, or to the bone `subtarget` when the
    /// target is an armature. `inverse` is captured when the constraint is
    /// created so the owner keeps its placement at the current pose.
    ChildOf {
        target: ObjectId,
        subtarget: String,
        inverse: Mat4,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub transform: Transform,
    pub data: ObjectData,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl SceneObject {
    pub fn kind(&self) -> ObjectKind {
        self.data.kind()
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        match &self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn armature(&self) -> Option<&Armature> {
        match &self.data {
            ObjectData::Armature(armature) => Some(armature),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    objects: BTreeMap<ObjectId, SceneObject>,
    active: Option<ObjectId>,
    next_object_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: BTreeMap::new(),
            active: None,
            next_object_id: 1,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .values()
            .find(|object| object.name == name)
            .map(|object| object.id)
    }

    /// Adds an object, suffixing the name with `.001`, `.002`, ... when it
    /// is already taken.
    pub fn add_object(&mut self, name: impl Into<String>, data: ObjectData) -> ObjectId {
        self.add_object_with_transform(name, data, Transform::default())
    }

    pub fn add_object_with_transform(
        &mut self,
        name: impl Into<String>,
        data: ObjectData,
        transform: Transform,
    ) -> ObjectId {
        let id = self.alloc_object_id();
        let name = self.unique_name(name.into());
        self.objects.insert(
            id,
            SceneObject {
                id,
                name,
                transform,
                data,
                constraints: Vec::new(),
            },
        );
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let removed = self.objects.remove(&id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        for object in self.objects.values_mut() {
            object.constraints.retain(|constraint| match constraint {
                Constraint::ChildOf { target, .. } => *target != id,
            });
        }
        Some(removed)
    }

    pub fn active(&self) -> Option<ObjectId> {
        self.active.filter(|id| self.objects.contains_key(id))
    }

    pub fn set_active(&mut self, id: Option<ObjectId>) -> bool {
        match id {
            Some(id) if !self.objects.contains_key(&id) => false,
            _ => {
                self.active = id;
                true
            }
        }
    }

    pub fn mesh(&self, id: ObjectId) -> Option<&MeshData> {
        self.object(id)?.mesh()
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Option<&mut MeshData> {
        match &mut self.objects.get_mut(&id)?.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn armature(&self, id: ObjectId) -> Option<&Armature> {
        self.object(id)?.armature()
    }

    pub fn armature_mut(&mut self, id: ObjectId) -> Option<&mut Armature> {
        match &mut self.objects.get_mut(&id)?.data {
            ObjectData::Armature(armature) => Some(armature),
            _ => None,
        }
    }

    /// World matrix of an object with its constraints evaluated.
    pub fn world_matrix(&self, id: ObjectId) -> Option<Mat4> {
        self.world_matrix_inner(id, 0)
    }

    /// World matrix of a posed bone.
    pub fn bone_world_matrix(&self, armature_id: ObjectId, bone: &str) -> Option<Mat4> {
        self.bone_world_matrix_inner(armature_id, bone, 0)
    }

    /// Matrix a child-of constraint parents to: the posed bone when
    /// `subtarget` names one, otherwise the target object itself.
    pub fn constraint_parent_matrix(&self, target: ObjectId, subtarget: &str) -> Option<Mat4> {
        self.parent_matrix_inner(target, subtarget, 0)
    }

    fn world_matrix_inner(&self, id: ObjectId, depth: usize) -> Option<Mat4> {
        let object = self.objects.get(&id)?;
        let mut matrix = object.transform.matrix();
        if depth >= MAX_CONSTRAINT_DEPTH {
            return Some(matrix);
        }
        for constraint in &object.constraints {
            match constraint {
                Constraint::ChildOf {
                    target,
                    subtarget,
                    inverse,
                } => {
                    if let Some(parent) = self.parent_matrix_inner(*target, subtarget, depth + 1) {
                        matrix = parent * *inverse * matrix;
                    }
                }
            }
        }
        Some(matrix)
    }

    fn parent_matrix_inner(&self, target: ObjectId, subtarget: &str, depth: usize) -> Option<Mat4> {
        if subtarget.is_empty() {
            return self.world_matrix_inner(target, depth);
        }
        self.bone_world_matrix_inner(target, subtarget, depth)
            .or_else(|| self.world_matrix_inner(target, depth))
    }

    fn bone_world_matrix_inner(&self, armature_id: ObjectId, bone: &str, depth: usize) -> Option<Mat4> {
        let armature = self.armature(armature_id)?;
        let index = armature.bone_index(bone)?;
        let pose = armature.pose_matrix(index)?;
        Some(self.world_matrix_inner(armature_id, depth)? * pose)
    }

    /// Next free id. Loaded scenes may carry a stale counter, so ids
    /// already in use are skipped.
    fn alloc_object_id(&mut self) -> ObjectId {
        let mut id = ObjectId(self.next_object_id.max(1));
        while self.objects.contains_key(&id) {
            id = ObjectId(id.0 + 1);
        }
        self.next_object_id = id.0 + 1;
        id
    }

    fn unique_name(&self, base: String) -> String {
        let base = if base.trim().is_empty() {
            "Object".to_string()
        } else {
            base
        };
        if !self.objects.values().any(|object| object.name == base) {
            return base;
        }
        (1..)
            .map(|index| format!("{base}.{index:03}"))
            .find(|candidate| !self.objects.values().any(|object| &object.name == candidate))
            .unwrap_or(base)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::{Quat, Vec3};

    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1.0e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn duplicate_names_get_suffixes() {
        let mut scene = Scene::new();
        let a = scene.add_object("Eye", ObjectData::Empty);
        let b = scene.add_object("Eye", ObjectData::Empty);
        let c = scene.add_object("Eye", ObjectData::Empty);
        assert_eq!(scene.object(a).unwrap().name, "Eye");
        assert_eq!(scene.object(b).unwrap().name, "Eye.001");
        assert_eq!(scene.object(c).unwrap().name, "Eye.002");
    }

    #[test]
    fn active_rejects_unknown_ids() {
        let mut scene = Scene::new();
        let id = scene.add_object("Cube", ObjectData::Mesh(MeshData::new()));
        assert!(scene.set_active(Some(id)));
        scene.remove_object(id);
        assert_eq!(scene.active(), None);
        assert!(!scene.set_active(Some(id)));
    }

    #[test]
    fn child_of_bone_follows_pose() {
        let mut scene = Scene::new();
        let mut armature = Armature::new();
        armature.add_bone("Head", None, Vec3::new(0.0, 0.0, 1.0), 0.2);
        let rig = scene.add_object_with_transform(
            "Rig",
            ObjectData::Armature(armature),
            Transform::from_location(Vec3::new(2.0, 0.0, 0.0)),
        );
        let eye = scene.add_object_with_transform(
            "Eye",
            ObjectData::Empty,
            Transform::from_location(Vec3::new(2.0, 0.1, 1.0)),
        );
        let parent = scene.bone_world_matrix(rig, "Head").unwrap();
        scene.object_mut(eye).unwrap().constraints.push(Constraint::ChildOf {
            target: rig,
            subtarget: "Head".to_string(),
            inverse: parent.inverse(),
        });

        let world = scene.world_matrix(eye).unwrap();
        assert_vec_close(world.w_axis.truncate(), Vec3::new(2.0, 0.1, 1.0));

        scene.armature_mut(rig).unwrap().bones[0].pose.rotation = Quat::from_rotation_z(FRAC_PI_2);
        let world = scene.world_matrix(eye).unwrap();
        assert_vec_close(world.w_axis.truncate(), Vec3::new(1.9, 0.0, 1.0));
    }

    #[test]
    fn removing_target_drops_constraints() {
        let mut scene = Scene::new();
        let rig = scene.add_object("Rig", ObjectData::Armature(Armature::new()));
        let eye = scene.add_object("Eye", ObjectData::Empty);
        scene.object_mut(eye).unwrap().constraints.push(Constraint::ChildOf {
            target: rig,
            subtarget: String::new(),
            inverse: Mat4::IDENTITY,
        });
        scene.remove_object(rig);
        assert!(scene.object(eye).unwrap().constraints.is_empty());
    }

    #[test]
    fn constraint_cycles_terminate() {
        let mut scene = Scene::new();
        let a = scene.add_object("A", ObjectData::Empty);
        let b = scene.add_object("B", ObjectData::Empty);
        for (owner, target) in [(a, b), (b, a)] {
            scene.object_mut(owner).unwrap().constraints.push(Constraint::ChildOf {
                target,
                subtarget: String::new(),
                inverse: Mat4::IDENTITY,
            });
        }
        assert!(scene.world_matrix(a).is_some());
    }

    #[test]
    fn scene_serializes_to_json() {
        let mut scene = Scene::new();
        let id = scene.add_object("Body", ObjectData::Mesh(MeshData::uv_sphere(1.0, 3, 4)));
        scene.set_active(Some(id));
        let json = serde_json::to_string(&scene).unwrap();
        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(back.active(), Some(id));
        let object = back.object(id).unwrap();
        assert_eq!(object.name, "Body");
        assert_eq!(object.mesh().unwrap().faces, scene.mesh(id).unwrap().faces);
    }

    #[test]
    fn stale_id_counter_never_overwrites_objects() {
        let mut scene = Scene::new();
        let rig = scene.add_object("Rig", ObjectData::Armature(Armature::new()));
        let body = scene.add_object("Body", ObjectData::Mesh(MeshData::new()));
        let mut json = serde_json::to_value(&scene).unwrap();
        json["next_object_id"] = serde_json::json!(1);
        let mut loaded: Scene = serde_json::from_value(json).unwrap();

        let eye = loaded.add_object("Eye", ObjectData::Empty);
        assert_eq!(loaded.len(), 3);
        assert!(eye != rig && eye != body);
        assert_eq!(loaded.object(rig).unwrap().kind(), ObjectKind::Armature);
        assert_eq!(loaded.object(body).unwrap().kind(), ObjectKind::Mesh);
        let next = loaded.add_object("Eye", ObjectData::Empty);
        assert!(next.raw() > eye.raw());
    }
}
