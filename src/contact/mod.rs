//! Tagged-pair contact matching
//!
//! Turns the `[Cont]_[<role>]_[<id>]` naming convention on named
//! selections into contact groups: one group per id, one pair per
//! target-face x source-face combination.

pub mod matcher;
pub mod naming;

pub use matcher::{
    build_contact_groups, plan_contact_groups, scan_target_ids, ContactGroupPlan, ContactOutcome,
    SkippedId,
};
pub use naming::{parse_contact_tag, ContactTag};
