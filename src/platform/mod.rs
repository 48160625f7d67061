//! Hosted repository API used to read commits and publish the release
//!
//! [Platform] is the seam between the release workflow and GitHub;
//! [GitHubPlatform] talks to the REST API and [MockPlatform] records calls
//! in memory for tests.

mod github;
mod mock;

pub use github::GitHubPlatform;
pub use mock::{CreateRefCall, CreateTagCall, MockPlatform};

use crate::error::Result;
use async_trait::async_trait;

/// A commit as returned by the hosted API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
}

/// An annotated tag object created on the hosted repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    pub tag: String,
    /// SHA of the tag object, which the tag ref points at
    pub sha: String,
}

/// Hosted API operations a release needs
#[async_trait]
pub trait Platform: Send + Sync {
    /// Message of a single commit
    async fn commit_message(&self, sha: &str) -> Result<String>;

    /// Every commit belonging to a pull request, oldest first
    async fn pull_request_commits(&self, number: u64) -> Result<Vec<CommitInfo>>;

    /// Create an annotated tag object pointing at commit `sha`
    async fn create_tag(&self, tag: &str, message: &str, sha: &str) -> Result<CreatedTag>;

    /// Create a reference (e.g. `refs/tags/v1.0.0`) pointing at `sha`
    async fn create_ref(&self, reference: &str, sha: &str) -> Result<()>;
}
