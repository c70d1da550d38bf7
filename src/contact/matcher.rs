//! Tagged-pair contact matching
//!
//! Pairs up named selections that share a tag id: the `Target` side
//! against the contact side, one group per id, one contact pair per
//! target-face x source-face combination. Planning is pure and runs on a
//! selection snapshot; [`build_contact_groups`] applies a plan to a host.

use log::{info, warn};
use serde::Serialize;

use crate::config::ContactConfig;
use crate::contact::naming;
use crate::error::Result;
use crate::host::{
    with_batch, BatchScope, ConnectionStore, ContactBehavior, ContactPairSpec, FaceId,
    NamedSelection, SelectionStore,
};

/// Everything needed to emit one contact group
#[derive(Debug, Clone, PartialEq)]
pub struct ContactGroupPlan {
    /// Pairing id shared by both sides
    pub id: String,

    /// Group name, `[ContGroup]_[<id>]`
    pub group_name: String,

    /// Resolved target-side selection name
    pub target_selection: String,

    /// Resolved contact-side selection name (first spelling that matched)
    pub source_selection: String,

    /// Target faces, in selection order
    pub target_faces: Vec<FaceId>,

    /// Source faces, in selection order
    pub source_faces: Vec<FaceId>,
}

impl ContactGroupPlan {
    /// Number of pairs this plan emits
    pub fn pair_count(&self) -> usize {
        self.target_faces.len() * self.source_faces.len()
    }

    /// Materialize the pair specs: target-major order, run numbers from 1
    pub fn pairs(&self, behavior: ContactBehavior, friction: f64) -> Vec<ContactPairSpec> {
        let mut specs = Vec::with_capacity(self.pair_count());
        let mut run = 1;
        for &target in &self.target_faces {
            for &source in &self.source_faces {
                specs.push(ContactPairSpec {
                    name: naming::pair_name(&self.id, run),
                    target,
                    source,
                    behavior,
                    friction,
                });
                run += 1;
            }
        }
        specs
    }
}

/// An id that could not be paired, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedId {
    pub id: String,
    pub reason: String,
}

/// Summary of one matching pass
#[derive(Debug, Clone, Serialize)]
pub struct ContactOutcome {
    /// Pre-existing groups deleted before emission
    pub groups_cleared: usize,

    /// Groups created this pass
    pub groups_created: usize,

    /// Pairs created this pass
    pub pairs_created: usize,

    /// Ids dropped because one side was missing or empty
    pub skipped: Vec<SkippedId>,
}

/// Ids of all target-tagged selections, deduplicated and sorted
///
/// Ids are opaque strings and sort lexicographically: `"12"` comes
/// before `"7"`.
pub fn scan_target_ids(selections: &[NamedSelection]) -> Vec<String> {
    let mut ids: Vec<String> = selections
        .iter()
        .filter_map(|ns| naming::parse_contact_tag(&ns.name))
        .filter(|tag| tag.is_target())
        .map(|tag| tag.id)
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Plan one group per pairable id; unpairable ids are reported, not built
///
/// An id is pairable when its target selection has faces and some
/// configured contact-side spelling names a selection with faces. The
/// first spelling in the list that yields faces wins. A dropped id
/// produces no group at all, not an empty container.
pub fn plan_contact_groups(
    selections: &[NamedSelection],
    spellings: &[String],
) -> (Vec<ContactGroupPlan>, Vec<SkippedId>) {
    let mut plans = Vec::new();
    let mut skipped = Vec::new();

    for id in scan_target_ids(selections) {
        let target_selection = naming::target_selection_name(&id);
        let target_faces = faces_of(selections, &target_selection);
        if target_faces.is_empty() {
            skipped.push(SkippedId {
                id,
                reason: format!("target selection '{}' has no faces", target_selection),
            });
            continue;
        }

        let source = spellings.iter().find_map(|spelling| {
            let name = naming::contact_selection_name(spelling, &id);
            let faces = faces_of(selections, &name);
            if faces.is_empty() {
                None
            } else {
                Some((name, faces))
            }
        });

        match source {
            Some((source_selection, source_faces)) => plans.push(ContactGroupPlan {
                group_name: naming::group_name(&id),
                id,
                target_selection,
                source_selection,
                target_faces,
                source_faces,
            }),
            None => skipped.push(SkippedId {
                id,
                reason: format!(
                    "no contact-side selection with faces under {} accepted spelling(s)",
                    spellings.len()
                ),
            }),
        }
    }

    (plans, skipped)
}

/// Faces of the first selection with this exact name; empty when absent
fn faces_of(selections: &[NamedSelection], name: &str) -> Vec<FaceId> {
    selections
        .iter()
        .find(|ns| ns.name == name)
        .map(|ns| ns.faces.clone())
        .unwrap_or_default()
}

/// Apply a matching pass to the host
///
/// When `clear_existing` is set, every group in the connections store is
/// deleted first, so reruns replace rather than accumulate. Clearing and
/// emission each run inside their own batch scope.
pub fn build_contact_groups<H>(host: &mut H, config: &ContactConfig) -> Result<ContactOutcome>
where
    H: SelectionStore + ConnectionStore + BatchScope,
{
    let selections = host.named_selections()?;
    let (plans, skipped) = plan_contact_groups(&selections, &config.contact_spellings);

    for skip in &skipped {
        warn!("Skipping id '{}': {}", skip.id, skip.reason);
    }
    if plans.is_empty() && skipped.is_empty() {
        warn!("No target-tagged named selections found");
    }

    let mut groups_cleared = 0;
    if config.clear_existing {
        let existing = host.contact_groups()?;
        groups_cleared = existing.len();
        with_batch(host, |h| {
            for group in &existing {
                h.delete_contact_group(group.id)?;
            }
            Ok(())
        })?;
        if groups_cleared > 0 {
            info!("Cleared {} existing contact groups", groups_cleared);
        }
    }

    let mut pairs_created = 0;
    with_batch(host, |h| {
        for plan in &plans {
            let group = h.add_contact_group(&plan.group_name)?;
            for pair in plan.pairs(config.behavior, config.friction) {
                h.add_contact_pair(group, &pair)?;
            }
            pairs_created += plan.pair_count();
            info!(
                "Created group {} ({} pairs from {} x {})",
                plan.group_name,
                plan.pair_count(),
                plan.target_selection,
                plan.source_selection
            );
        }
        Ok(())
    })?;

    Ok(ContactOutcome {
        groups_cleared,
        groups_created: plans.len(),
        pairs_created,
        skipped,
    })
}
