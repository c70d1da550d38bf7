//! Contact tag grammar
//!
//! Named selections participate in contact matching through their names:
//! `[Cont]_[<role>]_[<id>]`, where the role token is alphabetic and the id
//! is any non-empty run of characters without a closing bracket. The id is
//! an opaque string; ids sort lexicographically, not numerically.

use once_cell::sync::Lazy;
use regex::Regex;

/// Role token of the target side, always spelled this way
pub const TARGET_ROLE: &str = "Target";

/// Canonical role token of the contact side
pub const CONTACT_SPELLING: &str = "Contact";

/// Misspelled contact-side role tokens found in legacy models
pub const TOLERATED_MISSPELLINGS: [&str; 2] = ["Conatct", "Conyacy"];

static CONTACT_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[Cont\]_\[([A-Za-z]+)\]_\[([^\]]+)\]$").expect("CONTACT_TAG_REGEX is invalid")
});

/// A parsed selection tag: role token plus pairing id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactTag {
    pub role: String,
    pub id: String,
}

impl ContactTag {
    /// Whether this tag marks the target side
    pub fn is_target(&self) -> bool {
        self.role == TARGET_ROLE
    }
}

/// Parse a selection name against the tag grammar
pub fn parse_contact_tag(name: &str) -> Option<ContactTag> {
    CONTACT_TAG_REGEX.captures(name).map(|caps| ContactTag {
        role: caps[1].to_string(),
        id: caps[2].to_string(),
    })
}

/// Whether a role token belongs to the known vocabulary, misspellings included
pub fn is_known_role(role: &str) -> bool {
    role == TARGET_ROLE || role == CONTACT_SPELLING || TOLERATED_MISSPELLINGS.contains(&role)
}

/// Name of the target-side selection for an id
pub fn target_selection_name(id: &str) -> String {
    format!("[Cont]_[{}]_[{}]", TARGET_ROLE, id)
}

/// Name of the contact-side selection for an id under one spelling
pub fn contact_selection_name(spelling: &str, id: &str) -> String {
    format!("[Cont]_[{}]_[{}]", spelling, id)
}

/// Name of the contact group emitted for an id
pub fn group_name(id: &str) -> String {
    format!("[ContGroup]_[{}]", id)
}

/// Name of the nth pair in a group, counting from 1
pub fn pair_name(id: &str, run: usize) -> String {
    format!("Pair_{}_Run_{}", id, run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_tag() {
        let tag = parse_contact_tag("[Cont]_[Target]_[7]").unwrap();
        assert_eq!(tag.role, "Target");
        assert_eq!(tag.id, "7");
        assert!(tag.is_target());
    }

    #[test]
    fn test_parse_contact_tag_with_word_id() {
        let tag = parse_contact_tag("[Cont]_[Contact]_[pin house A]").unwrap();
        assert_eq!(tag.role, "Contact");
        assert_eq!(tag.id, "pin house A");
        assert!(!tag.is_target());
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        // No tag prefix
        assert!(parse_contact_tag("[BC]_[Disp]_Top Face").is_none());
        // Empty id
        assert!(parse_contact_tag("[Cont]_[Target]_[]").is_none());
        // Non-alphabetic role
        assert!(parse_contact_tag("[Cont]_[Targ3t]_[7]").is_none());
        // Trailing garbage
        assert!(parse_contact_tag("[Cont]_[Target]_[7] copy").is_none());
        // Closing bracket inside the id
        assert!(parse_contact_tag("[Cont]_[Target]_[7]x]").is_none());
    }

    #[test]
    fn test_format_helpers_round_trip() {
        let name = target_selection_name("12");
        let tag = parse_contact_tag(&name).unwrap();
        assert!(tag.is_target());
        assert_eq!(tag.id, "12");

        let name = contact_selection_name("Conatct", "12");
        let tag = parse_contact_tag(&name).unwrap();
        assert_eq!(tag.role, "Conatct");
    }

    #[test]
    fn test_group_and_pair_names() {
        assert_eq!(group_name("7"), "[ContGroup]_[7]");
        assert_eq!(pair_name("7", 1), "Pair_7_Run_1");
        assert_eq!(pair_name("7", 6), "Pair_7_Run_6");
    }

    #[test]
    fn test_known_roles() {
        assert!(is_known_role("Target"));
        assert!(is_known_role("Contact"));
        assert!(is_known_role("Conatct"));
        assert!(is_known_role("Conyacy"));
        assert!(!is_known_role("Bolt"));
    }
}
