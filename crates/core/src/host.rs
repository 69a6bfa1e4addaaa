//! Capabilities the eye-replacement pipeline needs from a 3D host.
//!
//! The pipeline only ever talks to [`EyeHost`]; [`Scene`] is the in-memory
//! implementation used by the app, the headless runner and the tests.

use eyeswap_scene::{Constraint, Euler, GroupWeight, ObjectData, ObjectId, ObjectKind, Scene};
use glam::{Mat4, Quat, Vec3};

use crate::assets::EyeAsset;
use crate::error::HostError;

/// Raw pose data for one joint, as read from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPose {
    pub skeleton_world: Mat4,
    /// Posed head position in skeleton space.
    pub head: Vec3,
    /// Local pose rotation of the joint (its basis rotation).
    pub basis_rotation: Quat,
}

pub trait EyeHost {
    fn active_object(&self) -> Option<ObjectId>;

    fn object_kind(&self, id: ObjectId) -> Option<ObjectKind>;

    fn object_name(&self, id: ObjectId) -> Option<&str>;

    fn vertex_group_index(&self, mesh: ObjectId, name: &str) -> Result<Option<usize>, HostError>;

    /// Per-vertex group memberships, parallel to the mesh's vertices.
    fn vertex_weights(&self, mesh: ObjectId) -> Result<&[Vec<GroupWeight>], HostError>;

    fn vertex_count(&self, mesh: ObjectId) -> Result<usize, HostError>;

    /// Deletes the vertices and every edge or face using them in one batch.
    fn delete_vertices(&mut self, mesh: ObjectId, vertices: &[u32]) -> Result<usize, HostError>;

    fn joint_pose(&self, skeleton: ObjectId, joint: &str) -> Result<Option<JointPose>, HostError>;

    /// Adds a loaded asset to the active scene and returns its handle.
    fn link_object(&mut self, asset: &EyeAsset) -> ObjectId;

    fn set_transform(
        &mut self,
        id: ObjectId,
        location: Vec3,
        rotation: Euler,
    ) -> Result<(), HostError>;

    /// Adds a child-of constraint from `id` to the joint `subtarget` of
    /// `target`.
    fn add_child_of(
        &mut self,
        id: ObjectId,
        target: ObjectId,
        subtarget: &str,
    ) -> Result<(), HostError>;
}

fn expect_kind(scene: &Scene, id: ObjectId, expected: ObjectKind) -> Result<(), HostError> {
    let object = scene.object(id).ok_or(HostError::MissingObject(id))?;
    if object.kind() != expected {
        return Err(HostError::WrongKind {
            id,
            expected,
            actual: object.kind(),
        });
    }
    Ok(())
}

impl EyeHost for Scene {
    fn active_object(&self) -> Option<ObjectId> {
        self.active()
    }

    fn object_kind(&self, id: ObjectId) -> Option<ObjectKind> {
        self.object(id).map(|object| object.kind())
    }

    fn object_name(&self, id: ObjectId) -> Option<&str> {
        self.object(id).map(|object| object.name.as_str())
    }

    fn vertex_group_index(&self, mesh: ObjectId, name: &str) -> Result<Option<usize>, HostError> {
        expect_kind(self, mesh, ObjectKind::Mesh)?;
        Ok(self
            .mesh(mesh)
            .and_then(|data| data.vertex_group_index(name)))
    }

    fn vertex_weights(&self, mesh: ObjectId) -> Result<&[Vec<GroupWeight>], HostError> {
        expect_kind(self, mesh, ObjectKind::Mesh)?;
        Ok(self
            .mesh(mesh)
            .map(|data| data.weights.as_slice())
            .unwrap_or_default())
    }

    fn vertex_count(&self, mesh: ObjectId) -> Result<usize, HostError> {
        expect_kind(self, mesh, ObjectKind::Mesh)?;
        Ok(self.mesh(mesh).map_or(0, |data| data.vertex_count()))
    }

    fn delete_vertices(&mut self, mesh: ObjectId, vertices: &[u32]) -> Result<usize, HostError> {
        expect_kind(self, mesh, ObjectKind::Mesh)?;
        let data = self.mesh_mut(mesh).ok_or(HostError::MissingObject(mesh))?;
        let count = data.vertex_count();
        if let Some(&index) = vertices.iter().find(|&&index| index as usize >= count) {
            return Err(HostError::VertexOutOfRange { index, count });
        }
        Ok(data.delete_vertices(vertices))
    }

    fn joint_pose(&self, skeleton: ObjectId, joint: &str) -> Result<Option<JointPose>, HostError> {
        expect_kind(self, skeleton, ObjectKind::Armature)?;
        let skeleton_world = self
            .world_matrix(skeleton)
            .ok_or(HostError::MissingObject(skeleton))?;
        let Some(armature) = self.armature(skeleton) else {
            return Ok(None);
        };
        let Some(index) = armature.bone_index(joint) else {
            return Ok(None);
        };
        let head = armature.pose_head(index).unwrap_or(Vec3::ZERO);
        Ok(Some(JointPose {
            skeleton_world,
            head,
            basis_rotation: armature.bones[index].pose.rotation,
        }))
    }

    fn link_object(&mut self, asset: &EyeAsset) -> ObjectId {
        self.add_object_with_transform(
            asset.name.clone(),
            ObjectData::Mesh(asset.mesh.clone()),
            asset.transform,
        )
    }

    fn set_transform(
        &mut self,
        id: ObjectId,
        location: Vec3,
        rotation: Euler,
    ) -> Result<(), HostError> {
        let object = self.object_mut(id).ok_or(HostError::MissingObject(id))?;
        object.transform.location = location;
        object.transform.rotation_euler = rotation;
        Ok(())
    }

    fn add_child_of(
        &mut self,
        id: ObjectId,
        target: ObjectId,
        subtarget: &str,
    ) -> Result<(), HostError> {
        if self.object(id).is_none() {
            return Err(HostError::MissingObject(id));
        }
        // Set-inverse: the owner stays where it is at the current pose.
        let parent = self
            .constraint_parent_matrix(target, subtarget)
            .ok_or(HostError::MissingObject(target))?;
        let object = self.object_mut(id).ok_or(HostError::MissingObject(id))?;
        object.constraints.push(Constraint::ChildOf {
            target,
            subtarget: subtarget.to_string(),
            inverse: parent.inverse(),
        });
        Ok(())
    }
}
