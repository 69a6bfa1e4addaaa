use eyeswap_scene::{Euler, ObjectId};
use glam::{Quat, Vec3};

use crate::error::ReplaceError;
use crate::host::{EyeHost, JointPose};

pub const LEFT_EYE_JOINT: &str = "L_Eyeball";
pub const RIGHT_EYE_JOINT: &str = "R_Eyeball";

/// World placement of one joint at the moment it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct JointSnapshot {
    pub joint_name: String,
    pub location: Vec3,
    /// Joint pose rotation with the skeleton's own world rotation removed.
    pub rotation: Quat,
    pub rotation_euler: Euler,
}

impl JointSnapshot {
    pub fn from_pose(joint_name: impl Into<String>, pose: &JointPose) -> Self {
        let location = pose.skeleton_world.transform_point3(pose.head);
        let (_, skeleton_rotation, _) = pose.skeleton_world.to_scale_rotation_translation();
        let rotation = (skeleton_rotation.inverse() * pose.basis_rotation).normalize();
        Self {
            joint_name: joint_name.into(),
            location,
            rotation,
            rotation_euler: Euler::from_quat(rotation),
        }
    }
}

pub fn capture_joint(
    host: &impl EyeHost,
    skeleton: ObjectId,
    joint_name: &str,
) -> Result<JointSnapshot, ReplaceError> {
    let Some(pose) = host.joint_pose(skeleton, joint_name)? else {
        return Err(ReplaceError::MissingJoint {
            skeleton: host.object_name(skeleton).unwrap_or("?").to_string(),
            joint: joint_name.to_string(),
        });
    };
    let snapshot = JointSnapshot::from_pose(joint_name, &pose);
    tracing::debug!(
        "captured {} at {:?} rot {:?}",
        joint_name,
        snapshot.location.to_array(),
        snapshot.rotation_euler.to_degrees()
    );
    Ok(snapshot)
}
