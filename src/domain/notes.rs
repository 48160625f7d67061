//! Markdown release notes rendered from a classified change set.

use crate::domain::{ChangeSet, Version};

const BREAKING_HEADER: &str = "### BREAKING CHANGES";
const MINOR_HEADER: &str = "### Minor Changes";
const PATCH_HEADER: &str = "### Patch Changes";

/// Render release notes for `version`.
///
/// The document opens with `## Release vX.Y.Z`; each non-empty bucket gets
/// its own section with one list item per change, in collection order.
pub fn render_release_notes(changes: &ChangeSet, version: &Version) -> String {
    let mut notes = format!("## Release {}\n", version);

    for (header, entries) in [
        (BREAKING_HEADER, &changes.breaking),
        (MINOR_HEADER, &changes.features),
        (PATCH_HEADER, &changes.fixes),
    ] {
        if entries.is_empty() {
            continue;
        }

        notes.push('\n');
        notes.push_str(header);
        notes.push('\n');
        for entry in entries {
            notes.push_str(&format!("- {}\n", entry));
        }
    }

    notes
}

/// Fixed tag annotation used when release notes are disabled
pub fn release_message(version: &Version) -> String {
    format!("Release {}", version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_all_sections() {
        let changes = ChangeSet {
            breaking: vec!["drop v1 API".to_string()],
            features: vec!["add export".to_string(), "add import".to_string()],
            fixes: vec!["handle empty list".to_string()],
        };

        let notes = render_release_notes(&changes, &Version::new(2, 0, 0));
        assert_eq!(
            notes,
            "## Release v2.0.0\n\
             \n### BREAKING CHANGES\n- drop v1 API\n\
             \n### Minor Changes\n- add export\n- add import\n\
             \n### Patch Changes\n- handle empty list\n"
        );
    }

    #[test]
    fn test_empty_buckets_are_omitted() {
        let changes = ChangeSet {
            breaking: vec![],
            features: vec!["add export button".to_string()],
            fixes: vec![],
        };

        let notes = render_release_notes(&changes, &Version::new(1, 3, 0));
        assert!(notes.starts_with("## Release v1.3.0\n"));
        assert!(!notes.contains("BREAKING CHANGES"));
        assert!(!notes.contains("Patch Changes"));
        assert_eq!(notes.matches("\n- ").count(), 1);
    }

    #[test]
    fn test_render_is_deterministic() {
        let changes = ChangeSet {
            breaking: vec![],
            features: vec!["a".to_string()],
            fixes: vec!["b".to_string()],
        };
        let version = Version::new(0, 2, 0);
        assert_eq!(
            render_release_notes(&changes, &version),
            render_release_notes(&changes, &version)
        );
    }

    #[test]
    fn test_release_message() {
        assert_eq!(release_message(&Version::new(1, 2, 3)), "Release v1.2.3");
    }
}
