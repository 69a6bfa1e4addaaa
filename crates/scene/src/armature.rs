use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Local pose of a bone relative to its rest orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonePose {
    pub location: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for BonePose {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl BonePose {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.location)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Rest matrix in armature space. Bones point along their local +Y.
    pub rest: Mat4,
    pub length: f32,
    #[serde(default)]
    pub pose: BonePose,
}

impl Bone {
    pub fn head(&self) -> Vec3 {
        self.rest.w_axis.truncate()
    }

    pub fn tail(&self) -> Vec3 {
        self.rest.transform_point3(Vec3::Y * self.length)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Armature {
    pub bones: Vec<Bone>,
}

impl Armature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bone whose rest frame sits at `head` with no rotation.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<usize>,
        head: Vec3,
        length: f32,
    ) -> usize {
        self.add_bone_with_rest(name, parent, Mat4::from_translation(head), length)
    }

    pub fn add_bone_with_rest(
        &mut self,
        name: impl Into<String>,
        parent: Option<usize>,
        rest: Mat4,
        length: f32,
    ) -> usize {
        let parent = parent.filter(|index| *index < self.bones.len());
        self.bones.push(Bone {
            name: name.into(),
            parent,
            rest,
            length,
            pose: BonePose::default(),
        });
        self.bones.len() - 1
    }

    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|bone| bone.name == name)
    }

    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|bone| bone.name == name)
    }

    pub fn bone_mut(&mut self, name: &str) -> Option<&mut Bone> {
        self.bones.iter_mut().find(|bone| bone.name == name)
    }

    /// Posed bone matrix in armature space:
    /// `parent_pose * parent_rest^-1 * rest * basis`.
    pub fn pose_matrix(&self, index: usize) -> Option<Mat4> {
        self.pose_matrix_inner(index, 0)
    }

    fn pose_matrix_inner(&self, index: usize, depth: usize) -> Option<Mat4> {
        let bone = self.bones.get(index)?;
        let local = bone.rest * bone.pose.matrix();
        match bone.parent {
            Some(parent) if parent != index && depth < self.bones.len() => {
                let parent_bone = self.bones.get(parent)?;
                let parent_pose = self.pose_matrix_inner(parent, depth + 1)?;
                Some(parent_pose * parent_bone.rest.inverse() * local)
            }
            _ => Some(local),
        }
    }

    /// Head position of the posed bone in armature space.
    pub fn pose_head(&self, index: usize) -> Option<Vec3> {
        self.pose_matrix(index)
            .map(|matrix| matrix.w_axis.truncate())
    }

    pub fn reset_pose(&mut self) {
        for bone in &mut self.bones {
            bone.pose = BonePose::default();
        }
    }
}
