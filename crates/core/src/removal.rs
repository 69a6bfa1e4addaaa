use eyeswap_scene::{GroupWeight, ObjectId};

use crate::error::HostError;
use crate::host::EyeHost;

pub const DEFAULT_WEIGHT_THRESHOLD: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed { count: usize },
    MissingGroup,
}

impl RemovalOutcome {
    pub fn removed(self) -> usize {
        match self {
            RemovalOutcome::Removed { count } => count,
            RemovalOutcome::MissingGroup => 0,
        }
    }
}

/// Indices of vertices whose weight in `group` is strictly above
/// `threshold`, in ascending order.
pub fn vertices_in_group(weights: &[Vec<GroupWeight>], group: usize, threshold: f32) -> Vec<u32> {
    weights
        .iter()
        .enumerate()
        .filter(|(_, memberships)| {
            memberships
                .iter()
                .any(|entry| entry.group as usize == group && entry.weight > threshold)
        })
        .map(|(index, _)| index as u32)
        .collect()
}

/// Deletes every vertex weighted above `threshold` to `group_name`, along
/// with the edges and faces that use them. A missing group is logged and
/// leaves the mesh untouched.
pub fn remove_named_group(
    host: &mut impl EyeHost,
    mesh: ObjectId,
    group_name: &str,
    threshold: f32,
) -> Result<RemovalOutcome, HostError> {
    let Some(group) = host.vertex_group_index(mesh, group_name)? else {
        tracing::warn!(
            "vertex group '{}' not found on {}",
            group_name,
            host.object_name(mesh).unwrap_or("?")
        );
        return Ok(RemovalOutcome::MissingGroup);
    };

    let marked = vertices_in_group(host.vertex_weights(mesh)?, group, threshold);
    if marked.is_empty() {
        tracing::debug!("vertex group '{}' has no vertices above {}", group_name, threshold);
        return Ok(RemovalOutcome::Removed { count: 0 });
    }

    let count = host.delete_vertices(mesh, &marked)?;
    tracing::info!("removed {} vertices weighted to '{}'", count, group_name);
    Ok(RemovalOutcome::Removed { count })
}
