use eyeswap_scene::{ObjectId, ObjectKind};

use crate::error::SelectionError;
use crate::host::EyeHost;

/// The skeleton and mesh the user picked for the next replacement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionSession {
    skeleton: Option<ObjectId>,
    mesh: Option<ObjectId>,
    skeleton_selected: bool,
    mesh_selected: bool,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skeleton(&self) -> Option<ObjectId> {
        self.skeleton
    }

    pub fn mesh(&self) -> Option<ObjectId> {
        self.mesh
    }

    pub fn skeleton_selected(&self) -> bool {
        self.skeleton_selected
    }

    pub fn mesh_selected(&self) -> bool {
        self.mesh_selected
    }

    pub fn is_complete(&self) -> bool {
        self.skeleton.is_some() && self.mesh.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Stores the host's active object as the skeleton.
    pub fn select_skeleton(&mut self, host: &impl EyeHost) -> Result<ObjectId, SelectionError> {
        let id = self.pick(host, ObjectKind::Armature, self.mesh)?;
        self.skeleton = Some(id);
        self.skeleton_selected = true;
        tracing::info!("armature selected: {}", host.object_name(id).unwrap_or("?"));
        Ok(id)
    }

    /// Stores the host's active object as the mesh.
    pub fn select_mesh(&mut self, host: &impl EyeHost) -> Result<ObjectId, SelectionError> {
        let id = self.pick(host, ObjectKind::Mesh, self.skeleton)?;
        self.mesh = Some(id);
        self.mesh_selected = true;
        tracing::info!("mesh selected: {}", host.object_name(id).unwrap_or("?"));
        Ok(id)
    }

    /// Returns `(skeleton, mesh)` after checking that both still exist with
    /// the right kinds.
    pub fn validated(
        &self,
        host: &impl EyeHost,
    ) -> Result<Option<(ObjectId, ObjectId)>, SelectionError> {
        let (Some(skeleton), Some(mesh)) = (self.skeleton, self.mesh) else {
            return Ok(None);
        };
        check_kind(host, skeleton, ObjectKind::Armature)?;
        check_kind(host, mesh, ObjectKind::Mesh)?;
        Ok(Some((skeleton, mesh)))
    }

    fn pick(
        &self,
        host: &impl EyeHost,
        expected: ObjectKind,
        other: Option<ObjectId>,
    ) -> Result<ObjectId, SelectionError> {
        let id = host
            .active_object()
            .ok_or(SelectionError::NoActiveObject)?;
        if Some(id) == other {
            return Err(SelectionError::SameAsOther {
                other: match expected {
                    ObjectKind::Armature => ObjectKind::Mesh,
                    _ => ObjectKind::Armature,
                },
            });
        }
        let actual = host
            .object_kind(id)
            .ok_or(SelectionError::NoActiveObject)?;
        if actual != expected {
            return Err(SelectionError::WrongKind { expected, actual });
        }
        Ok(id)
    }
}

fn check_kind(host: &impl EyeHost, id: ObjectId, expected: ObjectKind) -> Result<(), SelectionError> {
    match host.object_kind(id) {
        Some(kind) if kind == expected => Ok(()),
        Some(actual) => Err(SelectionError::WrongKind { expected, actual }),
        None => Err(SelectionError::MissingObject(expected)),
    }
}

#[cfg(test)]
mod tests {
    use eyeswap_scene::{Armature, MeshData, ObjectData, Scene};

    use super::*;

    fn scene_with_rig_and_body() -> (Scene, ObjectId, ObjectId) {
        let mut scene = Scene::new();
        let rig = scene.add_object("Rig", ObjectData::Armature(Armature::new()));
        let body = scene.add_object("Body", ObjectData::Mesh(MeshData::new()));
        (scene, rig, body)
    }

    #[test]
    fn selects_matching_kinds() {
        let (mut scene, rig, body) = scene_with_rig_and_body();
        let mut session = SelectionSession::new();
        scene.set_active(Some(rig));
        assert_eq!(session.select_skeleton(&scene), Ok(rig));
        scene.set_active(Some(body));
        assert_eq!(session.select_mesh(&scene), Ok(body));
        assert!(session.skeleton_selected() && session.mesh_selected());
        assert_eq!(session.validated(&scene), Ok(Some((rig, body))));
    }

    #[test]
    fn wrong_kind_leaves_state_unchanged() {
        let (mut scene, rig, body) = scene_with_rig_and_body();
        let mut session = SelectionSession::new();
        scene.set_active(Some(rig));
        session.select_skeleton(&scene).unwrap();

        scene.set_active(Some(body));
        let before = session;
        let err = session.select_skeleton(&scene).unwrap_err();
        assert_eq!(
            err,
            SelectionError::WrongKind {
                expected: ObjectKind::Armature,
                actual: ObjectKind::Mesh,
            }
        );
        assert_eq!(session, before);
        assert_eq!(err.to_string(), "The selected object is not an armature.");
    }

    #[test]
    fn same_object_cannot_fill_both_slots() {
        let (mut scene, rig, _) = scene_with_rig_and_body();
        let mut session = SelectionSession::new();
        scene.set_active(Some(rig));
        session.select_skeleton(&scene).unwrap();

        let err = session.select_mesh(&scene).unwrap_err();
        assert!(matches!(err, SelectionError::SameAsOther { .. }));
        assert_eq!(session.mesh(), None);
        assert!(!session.mesh_selected());
    }

    #[test]
    fn no_active_object_is_rejected() {
        let (scene, _, _) = scene_with_rig_and_body();
        let mut session = SelectionSession::new();
        assert_eq!(
            session.select_mesh(&scene),
            Err(SelectionError::NoActiveObject)
        );
    }

    #[test]
    fn validated_detects_removed_objects() {
        let (mut scene, rig, body) = scene_with_rig_and_body();
        let mut session = SelectionSession::new();
        scene.set_active(Some(rig));
        session.select_skeleton(&scene).unwrap();
        scene.set_active(Some(body));
        session.select_mesh(&scene).unwrap();

        scene.remove_object(body);
        assert_eq!(
            session.validated(&scene),
            Err(SelectionError::MissingObject(ObjectKind::Mesh))
        );

        session.clear();
        assert_eq!(session.validated(&scene), Ok(None));
    }
}
