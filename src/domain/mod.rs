//! Domain logic - pure release rules independent of git and the hosted API

pub mod commit;
pub mod notes;
pub mod version;

pub use commit::{determine_increment, ChangeKind, ChangeSet, ClassifiedLine, CommitGrammar};
pub use notes::{release_message, render_release_notes};
pub use version::{next_version, Increment, Version};
