use std::collections::HashMap;
use std::path::Path;

use eyeswap_scene::{Armature, MeshData, ObjectData, ObjectId, Scene, Transform};
use glam::Mat4;
use thiserror::Error;

use crate::assets::EyeAsset;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("glTF load failed: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF has no scene")]
    NoScene,
    #[error("glTF primitive missing POSITION attribute")]
    MissingPositions,
    #[error("glTF has no triangle geometry")]
    NoGeometry,
}

struct NodeInfo {
    global: Mat4,
    parent: Option<usize>,
}

/// Reads every mesh node of the default scene as an eye asset, in
/// depth-first document order.
pub fn load_gltf_assets(path: &Path) -> Result<Vec<EyeAsset>, String> {
    let (document, buffers, _) =
        gltf::import(path).map_err(|err| format!("glTF load failed: {err}"))?;
    let nodes = collect_nodes(&document).map_err(|err| err.to_string())?;

    let mut assets = Vec::new();
    for node in traversal_order(&document) {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let data = mesh_from_gltf(&mesh, &buffers, None).map_err(|err| err.to_string())?;
        if data.positions.is_empty() {
            continue;
        }
        let name = node
            .name()
            .or_else(|| mesh.name())
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("Eye.{:03}", assets.len()));
        let transform = nodes
            .get(&node.index())
            .map(|info| Transform::from_matrix(info.global))
            .unwrap_or_default();
        assets.push(EyeAsset {
            name,
            mesh: data,
            transform,
        });
    }
    Ok(assets)
}

/// Imports a character into `scene`. Every skin becomes an armature whose
/// bones are the skin joints; skinned meshes get one vertex group per joint
/// filled from `JOINTS_0`/`WEIGHTS_0`. Returns the new objects in creation
/// order.
pub fn import_gltf_character(path: &Path, scene: &mut Scene) -> Result<Vec<ObjectId>, ImportError> {
    let (document, buffers, _) = gltf::import(path)?;
    let nodes = collect_nodes(&document)?;
    let mut created = Vec::new();

    for skin in document.skins() {
        let armature = armature_from_skin(&skin, &nodes);
        let name = skin.name().unwrap_or("Armature").to_string();
        tracing::info!("imported armature '{}' with {} bones", name, armature.bones.len());
        created.push(scene.add_object(name, ObjectData::Armature(armature)));
    }

    let mut mesh_count = 0usize;
    for node in traversal_order(&document) {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let skin = node.skin();
        let data = mesh_from_gltf(&mesh, &buffers, skin.as_ref())?;
        if data.positions.is_empty() {
            continue;
        }
        let name = node
            .name()
            .or_else(|| mesh.name())
            .unwrap_or("Mesh")
            .to_string();
        let transform = nodes
            .get(&node.index())
            .map(|info| Transform::from_matrix(info.global))
            .unwrap_or_default();
        tracing::info!(
            "imported mesh '{}' ({} vertices, {} groups)",
            name,
            data.positions.len(),
            data.vertex_groups.len()
        );
        created.push(scene.add_object_with_transform(name, ObjectData::Mesh(data), transform));
        mesh_count += 1;
    }

    if mesh_count == 0 {
        return Err(ImportError::NoGeometry);
    }
    Ok(created)
}

fn collect_nodes(document: &gltf::Document) -> Result<HashMap<usize, NodeInfo>, ImportError> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(ImportError::NoScene)?;
    let mut nodes = HashMap::new();
    let mut stack: Vec<(gltf::Node, Mat4, Option<usize>)> = scene
        .nodes()
        .map(|node| (node, Mat4::IDENTITY, None))
        .collect();
    while let Some((node, parent_matrix, parent)) = stack.pop() {
        let local = Mat4::from_cols_array_2d(&node.transform().matrix());
        let global = parent_matrix * local;
        for child in node.children() {
            stack.push((child, global, Some(node.index())));
        }
        nodes.insert(node.index(), NodeInfo { global, parent });
    }
    Ok(nodes)
}

fn traversal_order(document: &gltf::Document) -> Vec<gltf::Node<'_>> {
    let Some(scene) = document
        .default_scene()
        .or_else(|| document.scenes().next())
    else {
        return Vec::new();
    };
    let mut order = Vec::new();
    let mut stack: Vec<gltf::Node> = scene.nodes().collect();
    stack.reverse();
    while let Some(node) = stack.pop() {
        let mut children: Vec<gltf::Node> = node.children().collect();
        children.reverse();
        stack.extend(children);
        order.push(node);
    }
    order
}

fn armature_from_skin(skin: &gltf::Skin, nodes: &HashMap<usize, NodeInfo>) -> Armature {
    let joints: Vec<gltf::Node> = skin.joints().collect();
    let joint_slot: HashMap<usize, usize> = joints
        .iter()
        .enumerate()
        .map(|(slot, joint)| (joint.index(), slot))
        .collect();

    let mut armature = Armature::new();
    for (slot, joint) in joints.iter().enumerate() {
        let info = nodes.get(&joint.index());
        let rest = info.map_or(Mat4::IDENTITY, |info| info.global);

        let mut parent = info.and_then(|info| info.parent);
        let parent_slot = loop {
            match parent {
                Some(index) => {
                    if let Some(found) = joint_slot.get(&index) {
                        break Some(*found);
                    }
                    parent = nodes.get(&index).and_then(|info| info.parent);
                }
                None => break None,
            }
        };
        // Bones are added in joint order, so only earlier joints can be
        // referenced as parents.
        let parent_slot = parent_slot.filter(|found| *found < slot);

        let head = rest.w_axis.truncate();
        let length = joint
            .children()
            .filter_map(|child| nodes.get(&child.index()))
            .map(|child| child.global.w_axis.truncate().distance(head))
            .find(|length| *length > 1.0e-6)
            .unwrap_or(0.1);
        armature.add_bone_with_rest(
            joint.name().unwrap_or("Bone").to_string(),
            parent_slot,
            rest,
            length,
        );
    }
    armature
}

fn mesh_from_gltf(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    skin: Option<&gltf::Skin>,
) -> Result<MeshData, ImportError> {
    let mut data = MeshData::new();
    if let Some(skin) = skin {
        for joint in skin.joints() {
            let name = joint
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("joint_{}", joint.index()));
            data.vertex_groups.push(name);
        }
    }

    let mut memberships = Vec::new();
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            continue;
        }
        let reader =
            primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
        let prim_positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or(ImportError::MissingPositions)?
            .collect();
        if prim_positions.is_empty() {
            continue;
        }
        let base = data.positions.len() as u32;
        let count = prim_positions.len();
        data.positions.extend(prim_positions);

        let prim_indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..count as u32).collect(),
        };
        data.faces.extend(
            prim_indices
                .chunks_exact(3)
                .filter(|tri| tri.iter().all(|&idx| (idx as usize) < count))
                .map(|tri| tri.iter().map(|idx| idx + base).collect::<Vec<u32>>()),
        );

        let joints: Vec<[u16; 4]> = match (skin, reader.read_joints(0)) {
            (Some(_), Some(joints)) => joints.into_u16().collect(),
            _ => Vec::new(),
        };
        let weights: Vec<[f32; 4]> = match (skin, reader.read_weights(0)) {
            (Some(_), Some(weights)) => weights.into_f32().collect(),
            _ => Vec::new(),
        };
        for vertex in 0..count {
            let mut entries = Vec::new();
            if let (Some(joint), Some(weight)) = (joints.get(vertex), weights.get(vertex)) {
                for (group, value) in joint.iter().zip(weight.iter()) {
                    if *value > 0.0 && (*group as usize) < data.vertex_groups.len() {
                        entries.push((*group as usize, *value));
                    }
                }
            }
            memberships.push(entries);
        }
    }

    data.edges = eyeswap_scene::edges_from_faces(&data.faces);
    data.weights = vec![Vec::new(); data.positions.len()];
    for (vertex, entries) in memberships.into_iter().enumerate() {
        for (group, weight) in entries {
            data.assign(group, vertex as u32, weight);
        }
    }
    Ok(data)
}
