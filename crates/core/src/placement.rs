use eyeswap_scene::{Euler, ObjectId};

use crate::assets::{EyeAsset, ResolvedEyes};
use crate::error::ReplaceError;
use crate::host::EyeHost;
use crate::joints::JointSnapshot;

/// Z rotation every placed eye receives, matching how eye assets are
/// authored.
pub const EYE_YAW_DEGREES: f32 = 90.0;

/// Links both eyes into the scene at the captured joint transforms and
/// constrains each one to its joint. Returns `[left, right]`.
pub fn place_replacement_eyes(
    host: &mut impl EyeHost,
    eyes: &ResolvedEyes,
    left: &JointSnapshot,
    right: &JointSnapshot,
    skeleton: ObjectId,
) -> Result<[ObjectId; 2], ReplaceError> {
    let left_id = place_eye(host, &eyes.left, left, skeleton)?;
    let right_id = place_eye(host, &eyes.right, right, skeleton)?;
    Ok([left_id, right_id])
}

fn place_eye(
    host: &mut impl EyeHost,
    asset: &EyeAsset,
    joint: &JointSnapshot,
    skeleton: ObjectId,
) -> Result<ObjectId, ReplaceError> {
    let id = host.link_object(asset);
    let rotation = Euler {
        z: EYE_YAW_DEGREES.to_radians(),
        ..joint.rotation_euler
    };
    host.set_transform(id, joint.location, rotation)?;
    host.add_child_of(id, skeleton, &joint.joint_name)?;
    tracing::info!(
        "placed '{}' on joint '{}' at {:?}",
        host.object_name(id).unwrap_or(&asset.name),
        joint.joint_name,
        joint.location.to_array()
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use eyeswap_scene::{Armature, Constraint, MeshData, ObjectData, Scene, Transform};
    use glam::{Quat, Vec3};

    use super::*;
    use crate::assets::ResolvedBy;
    use crate::joints::{capture_joint, LEFT_EYE_JOINT, RIGHT_EYE_JOINT};

    fn eye(name: &str) -> EyeAsset {
        EyeAsset {
            name: name.to_string(),
            mesh: MeshData::uv_sphere(0.012, 4, 6),
            transform: Transform::default(),
        }
    }

    fn rig() -> (Scene, ObjectId) {
        let mut armature = Armature::new();
        let head = armature.add_bone("Head", None, Vec3::new(0.0, 0.0, 1.6), 0.3);
        let left = armature.add_bone(LEFT_EYE_JOINT, Some(head), Vec3::new(0.03, -0.08, 1.7), 0.02);
        armature.add_bone(RIGHT_EYE_JOINT, Some(head), Vec3::new(-0.03, -0.08, 1.7), 0.02);
        armature.bones[left].pose.rotation = Quat::from_rotation_x(0.3);

        let mut scene = Scene::new();
        let rig = scene.add_object("Rig", ObjectData::Armature(armature));
        (scene, rig)
    }

    fn place(scene: &mut Scene, rig: ObjectId) -> [ObjectId; 2] {
        let left = capture_joint(scene, rig, LEFT_EYE_JOINT).unwrap();
        let right = capture_joint(scene, rig, RIGHT_EYE_JOINT).unwrap();
        let eyes = ResolvedEyes {
            left: eye("Left_Eye"),
            right: eye("Right_Eye"),
            resolved_by: ResolvedBy::Name,
        };
        place_replacement_eyes(scene, &eyes, &left, &right, rig).unwrap()
    }

    #[test]
    fn places_two_constrained_objects() {
        let (mut scene, rig) = rig();
        let [left, right] = place(&mut scene, rig);
        assert_eq!(scene.len(), 3);

        for (id, joint) in [(left, LEFT_EYE_JOINT), (right, RIGHT_EYE_JOINT)] {
            let object = scene.object(id).unwrap();
            assert_eq!(object.constraints.len(), 1);
            let Constraint::ChildOf {
                target, subtarget, ..
            } = &object.constraints[0];
            assert_eq!(*target, rig);
            assert_eq!(subtarget, joint);
            assert_eq!(object.transform.rotation_euler.z, EYE_YAW_DEGREES.to_radians());
        }
        assert_eq!(scene.object(left).unwrap().name, "Left_Eye");
        assert!(scene.object(rig).unwrap().constraints.is_empty());
    }

    #[test]
    fn keeps_captured_pitch_and_roll() {
        let (mut scene, rig) = rig();
        let captured = capture_joint(&scene, rig, LEFT_EYE_JOINT).unwrap();
        let [left, _] = place(&mut scene, rig);
        let placed = scene.object(left).unwrap().transform.rotation_euler;
        assert_eq!(placed.x, captured.rotation_euler.x);
        assert_eq!(placed.y, captured.rotation_euler.y);
    }

    #[test]
    fn eyes_stay_put_then_follow_the_joint() {
        let (mut scene, rig) = rig();
        let [left, _] = place(&mut scene, rig);
        let start = scene.world_matrix(left).unwrap().w_axis.truncate();
        assert!((start - Vec3::new(0.03, -0.08, 1.7)).length() < 1.0e-4);

        scene.object_mut(rig).unwrap().transform.location = Vec3::new(0.0, 0.0, 1.0);
        let moved = scene.world_matrix(left).unwrap().w_axis.truncate();
        assert!((moved - Vec3::new(0.03, -0.08, 2.7)).length() < 1.0e-4);
    }
}
