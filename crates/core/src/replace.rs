use std::path::Path;

use eyeswap_scene::ObjectId;

use crate::assets::{load_eye_assets, resolve_eyes, ResolvedBy};
use crate::error::ReplaceError;
use crate::host::EyeHost;
use crate::joints::{capture_joint, LEFT_EYE_JOINT, RIGHT_EYE_JOINT};
use crate::placement::place_replacement_eyes;
use crate::preferences::Preferences;
use crate::removal::{remove_named_group, RemovalOutcome};
use crate::selection::SelectionSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn joint_name(self) -> &'static str {
        match self {
            Side::Left => LEFT_EYE_JOINT,
            Side::Right => RIGHT_EYE_JOINT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceReport {
    pub left_removal: RemovalOutcome,
    pub right_removal: RemovalOutcome,
    /// Handles of the placed `[left, right]` eyes.
    pub placed: [ObjectId; 2],
    pub resolved_by: ResolvedBy,
}

impl ReplaceReport {
    pub fn removed_vertices(&self) -> usize {
        self.left_removal.removed() + self.right_removal.removed()
    }

    pub fn missing_groups(&self) -> Vec<Side> {
        [(Side::Left, self.left_removal), (Side::Right, self.right_removal)]
            .into_iter()
            .filter(|(_, outcome)| *outcome == RemovalOutcome::MissingGroup)
            .map(|(side, _)| side)
            .collect()
    }

    pub fn summary(&self) -> String {
        let mut text = format!(
            "Eyes replaced: removed {} vertices, placed 2 eyes ({}).",
            self.removed_vertices(),
            match self.resolved_by {
                ResolvedBy::Name => "by name",
                ResolvedBy::Position => "by file order",
            }
        );
        for side in self.missing_groups() {
            text.push_str(&format!(" No '{}' group.", side.joint_name()));
        }
        text
    }
}

/// Runs the full replacement: every lookup that can fail (selection,
/// configuration, joints, asset file) happens before the mesh is touched.
pub fn replace_eyes(
    host: &mut impl EyeHost,
    session: &SelectionSession,
    prefs: &Preferences,
) -> Result<ReplaceReport, ReplaceError> {
    if !session.is_complete() {
        return Err(ReplaceError::MissingSelection);
    }
    let Some((skeleton, mesh)) = session.validated(host)? else {
        return Err(ReplaceError::MissingSelection);
    };
    if !prefs.has_asset_path() {
        return Err(ReplaceError::MissingConfiguration);
    }
    let asset_path = Path::new(prefs.eye_asset_path.trim());

    let left = capture_joint(host, skeleton, LEFT_EYE_JOINT)?;
    let right = capture_joint(host, skeleton, RIGHT_EYE_JOINT)?;
    let assets = load_eye_assets(asset_path)?;
    let eyes = resolve_eyes(assets, prefs.asset_order, asset_path)?;

    let threshold = prefs.effective_threshold();
    let left_removal = remove_named_group(host, mesh, LEFT_EYE_JOINT, threshold)?;
    let right_removal = remove_named_group(host, mesh, RIGHT_EYE_JOINT, threshold)?;

    let placed = place_replacement_eyes(host, &eyes, &left, &right, skeleton)?;
    let report = ReplaceReport {
        left_removal,
        right_removal,
        placed,
        resolved_by: eyes.resolved_by,
    };
    tracing::info!("{}", report.summary());
    Ok(report)
}
