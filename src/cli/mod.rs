//! Release workflow entry points

pub mod orchestration;

pub use orchestration::{ReleaseOutcome, ReleaseWorkflow};
