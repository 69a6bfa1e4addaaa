use std::collections::BTreeSet;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupWeight {
    pub group: u32,
    pub weight: f32,
}

/// Polygon mesh with weighted vertex groups. `weights` is parallel to
/// `positions`; each entry lists the groups that vertex belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub edges: Vec<[u32; 2]>,
    pub faces: Vec<Vec<u32>>,
    pub vertex_groups: Vec<String>,
    pub weights: Vec<Vec<GroupWeight>>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faces(positions: Vec<[f32; 3]>, faces: Vec<Vec<u32>>) -> Self {
        let edges = edges_from_faces(&faces);
        let weights = vec![Vec::new(); positions.len()];
        Self {
            positions,
            edges,
            faces,
            vertex_groups: Vec::new(),
            weights,
        }
    }

    pub fn from_triangles(positions: Vec<[f32; 3]>, indices: &[u32]) -> Self {
        let faces = indices
            .chunks_exact(3)
            .map(|tri| tri.to_vec())
            .collect();
        Self::with_faces(positions, faces)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn vertex_group_index(&self, name: &str) -> Option<usize> {
        self.vertex_groups.iter().position(|group| group == name)
    }

    pub fn add_vertex_group(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(index) = self.vertex_group_index(&name) {
            return index;
        }
        self.vertex_groups.push(name);
        self.vertex_groups.len() - 1
    }

    /// Sets the weight of `vertex` in `group`, replacing an existing
    /// membership. Returns false when the vertex or group is out of range.
    pub fn assign(&mut self, group: usize, vertex: u32, weight: f32) -> bool {
        if group >= self.vertex_groups.len() {
            return false;
        }
        self.weights.resize(self.positions.len(), Vec::new());
        let Some(memberships) = self.weights.get_mut(vertex as usize) else {
            return false;
        };
        let weight = weight.clamp(0.0, 1.0);
        match memberships.iter_mut().find(|entry| entry.group == group as u32) {
            Some(entry) => entry.weight = weight,
            None => memberships.push(GroupWeight {
                group: group as u32,
                weight,
            }),
        }
        true
    }

    pub fn group_weight(&self, vertex: u32, group: usize) -> Option<f32> {
        self.weights
            .get(vertex as usize)?
            .iter()
            .find(|entry| entry.group == group as u32)
            .map(|entry| entry.weight)
    }

    /// Deletes the given vertices together with every edge and face that
    /// references one of them, then compacts the remaining indices.
    /// Duplicate and out-of-range entries are ignored. Returns the number
    /// of vertices removed.
    pub fn delete_vertices(&mut self, vertices: &[u32]) -> usize {
        let count = self.positions.len();
        let mut keep = vec![true; count];
        let mut removed = 0;
        for &vertex in vertices {
            if let Some(slot) = keep.get_mut(vertex as usize) {
                if *slot {
                    *slot = false;
                    removed += 1;
                }
            }
        }
        if removed == 0 {
            return 0;
        }

        let (mapping, kept) = build_index_mapping(&keep);
        self.positions = kept.iter().map(|&old| self.positions[old]).collect();
        self.weights.resize(count, Vec::new());
        self.weights = kept
            .iter()
            .map(|&old| std::mem::take(&mut self.weights[old]))
            .collect();

        self.edges = self
            .edges
            .iter()
            .filter_map(|edge| {
                let a = *mapping.get(edge[0] as usize)?;
                let b = *mapping.get(edge[1] as usize)?;
                (a != u32::MAX && b != u32::MAX).then_some([a, b])
            })
            .collect();

        self.faces = self
            .faces
            .iter()
            .filter_map(|face| {
                face.iter()
                    .map(|&index| {
                        mapping
                            .get(index as usize)
                            .copied()
                            .filter(|mapped| *mapped != u32::MAX)
                    })
                    .collect::<Option<Vec<u32>>>()
            })
            .collect();

        removed
    }

    pub fn transformed_positions(&self, matrix: Mat4) -> Vec<[f32; 3]> {
        self.positions
            .iter()
            .map(|p| matrix.transform_point3(Vec3::from(*p)).to_array())
            .collect()
    }

    pub fn uv_sphere(radius: f32, rows: u32, cols: u32) -> Self {
        let rows = rows.max(3);
        let cols = cols.max(3);
        let mut positions = Vec::new();
        positions.push([0.0, radius, 0.0]);
        for r in 1..rows {
            let theta = r as f32 / rows as f32 * std::f32::consts::PI;
            let (sin_theta, cos_theta) = theta.sin_cos();
            for c in 0..cols {
                let phi = c as f32 / cols as f32 * std::f32::consts::TAU;
                let (sin_phi, cos_phi) = phi.sin_cos();
                positions.push([
                    sin_theta * cos_phi * radius,
                    cos_theta * radius,
                    sin_theta * sin_phi * radius,
                ]);
            }
        }
        positions.push([0.0, -radius, 0.0]);

        let bottom = positions.len() as u32 - 1;
        let ring = |r: u32, c: u32| 1 + (r - 1) * cols + (c % cols);
        let mut faces = Vec::new();
        for c in 0..cols {
            faces.push(vec![0, ring(1, c + 1), ring(1, c)]);
        }
        for r in 1..rows - 1 {
            for c in 0..cols {
                faces.push(vec![
                    ring(r, c),
                    ring(r, c + 1),
                    ring(r + 1, c + 1),
                    ring(r + 1, c),
                ]);
            }
        }
        for c in 0..cols {
            faces.push(vec![bottom, ring(rows - 1, c), ring(rows - 1, c + 1)]);
        }
        Self::with_faces(positions, faces)
    }
}

pub fn edges_from_faces(faces: &[Vec<u32>]) -> Vec<[u32; 2]> {
    let mut edges = BTreeSet::new();
    for face in faces {
        if face.len() < 2 {
            continue;
        }
        for (idx, &a) in face.iter().enumerate() {
            let b = face[(idx + 1) % face.len()];
            if a != b {
                edges.insert([a.min(b), a.max(b)]);
            }
        }
    }
    edges.into_iter().collect()
}

fn build_index_mapping(used: &[bool]) -> (Vec<u32>, Vec<usize>) {
    let mut mapping = vec![u32::MAX; used.len()];
    let mut kept = Vec::new();
    let mut next = 0u32;
    for (idx, keep) in used.iter().copied().enumerate() {
        if keep {
            mapping[idx] = next;
            kept.push(idx);
            next += 1;
        }
    }
    (mapping, kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_strip() -> MeshData {
        // 0--1--2
        // |  |  |
        // 3--4--5
        MeshData::with_faces(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [2.0, 1.0, 0.0],
            ],
            vec![vec![0, 1, 4, 3], vec![1, 2, 5, 4]],
        )
    }

    #[test]
    fn edges_are_deduplicated() {
        let mesh = quad_strip();
        assert_eq!(mesh.edges.len(), 7);
    }

    #[test]
    fn delete_removes_dependent_faces_and_compacts() {
        let mut mesh = quad_strip();
        let removed = mesh.delete_vertices(&[2, 5, 2]);
        assert_eq!(removed, 2);
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.faces, vec![vec![0, 1, 3, 2]]);
        assert_eq!(mesh.edges.len(), 4);
        assert!(mesh
            .edges
            .iter()
            .all(|edge| edge.iter().all(|&index| (index as usize) < 4)));
    }

    #[test]
    fn delete_keeps_weights_aligned() {
        let mut mesh = quad_strip();
        let group = mesh.add_vertex_group("Tag");
        assert!(mesh.assign(group, 4, 0.5));
        mesh.delete_vertices(&[0]);
        assert_eq!(mesh.weights.len(), mesh.positions.len());
        assert_eq!(mesh.group_weight(3, group), Some(0.5));
        assert_eq!(mesh.group_weight(0, group), None);
    }

    #[test]
    fn delete_keeps_weights_when_list_is_short() {
        let mut mesh = quad_strip();
        let group = mesh.add_vertex_group("Tag");
        assert!(mesh.assign(group, 4, 0.5));
        mesh.weights.truncate(5);

        mesh.delete_vertices(&[0]);
        assert_eq!(mesh.weights.len(), 5);
        assert_eq!(mesh.group_weight(3, group), Some(0.5));
        assert_eq!(mesh.group_weight(4, group), None);
    }

    #[test]
    fn delete_ignores_out_of_range() {
        let mut mesh = quad_strip();
        assert_eq!(mesh.delete_vertices(&[99]), 0);
        assert_eq!(mesh.positions.len(), 6);
    }

    #[test]
    fn assign_rejects_unknown_group() {
        let mut mesh = quad_strip();
        assert!(!mesh.assign(3, 0, 1.0));
    }

    #[test]
    fn sphere_is_closed() {
        let mesh = MeshData::uv_sphere(1.0, 4, 8);
        assert_eq!(mesh.positions.len(), 2 + 3 * 8);
        assert_eq!(mesh.faces.len(), 8 + 2 * 8 + 8);
        // Euler characteristic of a sphere.
        let euler = mesh.positions.len() as i64 - mesh.edges.len() as i64 + mesh.faces.len() as i64;
        assert_eq!(euler, 2);
    }
}
