use std::io::{self, BufWriter, Write};
use std::path::Path;

use eyeswap_scene::{MeshData, Scene, Transform};

use crate::assets::EyeAsset;

/// Reads every model of an OBJ file as a separate eye asset, in file order.
pub fn load_obj_assets(path: &Path) -> Result<Vec<EyeAsset>, String> {
    let options = tobj::LoadOptions {
        triangulate: false,
        single_index: true,
        ..Default::default()
    };
    let (models, _) =
        tobj::load_obj(path, &options).map_err(|err| format!("OBJ load failed: {err}"))?;

    let mut assets = Vec::with_capacity(models.len());
    for (index, model) in models.into_iter().enumerate() {
        let mesh = mesh_from_model(&model.mesh)?;
        if mesh.positions.is_empty() {
            continue;
        }
        let name = if model.name.trim().is_empty() {
            format!("Eye.{index:03}")
        } else {
            model.name
        };
        assets.push(EyeAsset {
            name,
            mesh,
            transform: Transform::default(),
        });
    }
    Ok(assets)
}

fn mesh_from_model(mesh: &tobj::Mesh) -> Result<MeshData, String> {
    if mesh.positions.len() % 3 != 0 {
        return Err("OBJ has malformed positions".to_string());
    }
    let positions: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|v| [v[0], v[1], v[2]])
        .collect();

    let mut faces = Vec::new();
    if mesh.face_arities.is_empty() {
        faces.extend(mesh.indices.chunks_exact(3).map(|tri| tri.to_vec()));
    } else {
        let mut start = 0usize;
        for &arity in &mesh.face_arities {
            let end = start + arity as usize;
            let Some(face) = mesh.indices.get(start..end) else {
                return Err("OBJ face indices out of range".to_string());
            };
            faces.push(face.to_vec());
            start = end;
        }
    }
    if faces
        .iter()
        .flatten()
        .any(|&index| index as usize >= positions.len())
    {
        return Err("OBJ face references a missing vertex".to_string());
    }
    Ok(MeshData::with_faces(positions, faces))
}

/// Writes every mesh object in world space, one `o` block per object.
pub fn write_scene_obj(path: &Path, scene: &Scene) -> io::Result<usize> {
    let file = std::fs::File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "# eyeswap export")?;

    let mut written = 0usize;
    let mut offset = 1u32;
    for object in scene.objects() {
        let Some(mesh) = object.mesh() else {
            continue;
        };
        let matrix = scene.world_matrix(object.id).unwrap_or_default();
        writeln!(out, "o {}", object.name)?;
        for p in mesh.transformed_positions(matrix) {
            writeln!(out, "v {} {} {}", p[0], p[1], p[2])?;
        }
        for face in &mesh.faces {
            if face.len() < 3 {
                continue;
            }
            write!(out, "f")?;
            for index in face {
                write!(out, " {}", index + offset)?;
            }
            writeln!(out)?;
        }
        offset += mesh.positions.len() as u32;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use eyeswap_scene::ObjectData;
    use glam::Vec3;

    use super::*;

    const TWO_EYES: &str = "\
o Left_Eye
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
o Right_Eye
v 2 0 0
v 3 0 0
v 3 1 0
f 5 6 7
";

    #[test]
    fn loads_each_model_as_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eyes.obj");
        std::fs::write(&path, TWO_EYES).unwrap();

        let assets = load_obj_assets(&path).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].name, "Left_Eye");
        assert_eq!(assets[0].mesh.faces, vec![vec![0, 1, 2, 3]]);
        assert_eq!(assets[1].name, "Right_Eye");
        assert_eq!(assets[1].mesh.positions.len(), 3);
    }

    #[test]
    fn export_writes_world_positions() {
        let mut scene = Scene::new();
        let mesh = MeshData::with_faces(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![vec![0, 1, 2]],
        );
        scene.add_object_with_transform(
            "Tri",
            ObjectData::Mesh(mesh),
            Transform::from_location(Vec3::new(0.0, 0.0, 5.0)),
        );
        scene.add_object("Rig", ObjectData::Empty);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.obj");
        assert_eq!(write_scene_obj(&path, &scene).unwrap(), 1);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("o Tri"));
        assert!(text.contains("v 1 0 5"));
        assert!(text.contains("f 1 2 3"));
    }
}
