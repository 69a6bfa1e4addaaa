use std::path::Path;

use eyeswap_core::{import_gltf_character, write_scene_obj, Project};
use eyeswap_scene::Scene;
use rfd::FileDialog;

use super::EyeSwapApp;

impl EyeSwapApp {
    pub(super) fn new_scene(&mut self) {
        self.replace_scene(Scene::new(), None);
        tracing::info!("new scene created");
    }

    pub(super) fn save_project_to(&self, path: &Path) -> Result<(), String> {
        Project::from_scene(self.scene.clone())
            .save(path)
            .map_err(|err| err.to_string())
    }

    pub(super) fn load_project_from(&mut self, path: &Path) -> Result<(), String> {
        let project = Project::load(path).map_err(|err| err.to_string())?;
        self.replace_scene(project.scene, Some(path.to_path_buf()));
        Ok(())
    }

    /// Adds a glTF character to the current scene.
    pub(super) fn import_character_from(&mut self, path: &Path) -> Result<usize, String> {
        let created =
            import_gltf_character(path, &mut self.scene).map_err(|err| err.to_string())?;
        Ok(created.len())
    }

    pub(super) fn open_project_dialog(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Eyeswap Project", &["json"])
            .pick_file()
        {
            match self.load_project_from(&path) {
                Ok(()) => self.info(format!("Opened {}.", path.display())),
                Err(err) => self.warn(format!("Failed to open project: {err}")),
            }
        }
    }

    pub(super) fn save_project(&mut self) {
        let Some(path) = self.project_path.clone() else {
            self.save_project_dialog();
            return;
        };
        match self.save_project_to(&path) {
            Ok(()) => self.info(format!("Saved {}.", path.display())),
            Err(err) => self.warn(format!("Failed to save project: {err}")),
        }
    }

    pub(super) fn save_project_dialog(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Eyeswap Project", &["json"])
            .set_file_name("project.json")
            .save_file()
        {
            match self.save_project_to(&path) {
                Ok(()) => {
                    self.info(format!("Saved {}.", path.display()));
                    self.project_path = Some(path);
                }
                Err(err) => self.warn(format!("Failed to save project: {err}")),
            }
        }
    }

    pub(super) fn import_character_dialog(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("glTF", &["gltf", "glb"])
            .pick_file()
        {
            match self.import_character_from(&path) {
                Ok(count) => self.info(format!("Imported {count} objects from {}.", path.display())),
                Err(err) => self.warn(format!("Import failed: {err}")),
            }
        }
    }

    pub(super) fn export_obj_dialog(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Wavefront OBJ", &["obj"])
            .set_file_name("scene.obj")
            .save_file()
        {
            match write_scene_obj(&path, &self.scene) {
                Ok(count) => self.info(format!("Exported {count} meshes to {}.", path.display())),
                Err(err) => self.warn(format!("OBJ export failed: {err}")),
            }
        }
    }

    pub(super) fn browse_asset_path(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Eye assets", &["gltf", "glb", "obj", "json"])
            .pick_file()
        {
            self.preferences.eye_asset_path = path.to_string_lossy().into_owned();
        }
    }

    pub(super) fn save_preferences(&mut self) {
        match self.preferences.save() {
            Ok(path) => tracing::info!("preferences saved to {}", path.display()),
            Err(err) => self.warn(format!("Failed to save preferences: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU8;
    use std::sync::Arc;

    use eyeswap_core::Preferences;
    use eyeswap_scene::{MeshData, ObjectData};

    use crate::app::ConsoleBuffer;
    use super::*;

    #[test]
    fn project_save_and_load_restore_scene() {
        let mut app = EyeSwapApp::new(
            ConsoleBuffer::new(),
            Arc::new(AtomicU8::new(3)),
            Preferences::default(),
        );
        app.scene
            .add_object("Body", ObjectData::Mesh(MeshData::uv_sphere(1.0, 3, 4)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        app.save_project_to(&path).unwrap();

        app.new_scene();
        assert!(app.scene.is_empty());
        app.load_project_from(&path).unwrap();
        assert!(app.scene.find_by_name("Body").is_some());
        assert_eq!(app.project_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn missing_project_is_an_error() {
        let mut app = EyeSwapApp::new(
            ConsoleBuffer::new(),
            Arc::new(AtomicU8::new(3)),
            Preferences::default(),
        );
        assert!(app.load_project_from(Path::new("/no/such/project.json")).is_err());
        assert!(app.project_path.is_none());
    }
}
