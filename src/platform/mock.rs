//! In-memory platform for tests

use crate::error::{ReleaseError, Result};
use crate::platform::{CommitInfo, CreatedTag, Platform};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `create_tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTagCall {
    pub tag: String,
    pub message: String,
    pub sha: String,
}

/// Call record for `create_ref`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRefCall {
    pub reference: String,
    pub sha: String,
}

/// Mock platform with canned commits, call tracking and error injection
#[derive(Default)]
pub struct MockPlatform {
    commit_messages: HashMap<String, String>,
    pull_request_commits: HashMap<u64, Vec<CommitInfo>>,
    error_on_create_ref: Option<String>,
    create_tag_calls: Mutex<Vec<CreateTagCall>>,
    create_ref_calls: Mutex<Vec<CreateRefCall>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the message returned for commit `sha`
    pub fn with_commit(mut self, sha: impl Into<String>, message: impl Into<String>) -> Self {
        self.commit_messages.insert(sha.into(), message.into());
        self
    }

    /// Register the commits of pull request `number`
    pub fn with_pull_request(mut self, number: u64, commits: Vec<CommitInfo>) -> Self {
        self.pull_request_commits.insert(number, commits);
        self
    }

    /// Make `create_ref` fail, e.g. to simulate an existing tag
    pub fn with_create_ref_error(mut self, message: impl Into<String>) -> Self {
        self.error_on_create_ref = Some(message.into());
        self
    }

    pub fn create_tag_calls(&self) -> Vec<CreateTagCall> {
        self.create_tag_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn create_ref_calls(&self) -> Vec<CreateRefCall> {
        self.create_ref_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn commit_message(&self, sha: &str) -> Result<String> {
        self.commit_messages
            .get(sha)
            .cloned()
            .ok_or_else(|| ReleaseError::event(format!("unknown commit {}", sha)))
    }

    async fn pull_request_commits(&self, number: u64) -> Result<Vec<CommitInfo>> {
        Ok(self
            .pull_request_commits
            .get(&number)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_tag(&self, tag: &str, message: &str, sha: &str) -> Result<CreatedTag> {
        if let Ok(mut calls) = self.create_tag_calls.lock() {
            calls.push(CreateTagCall {
                tag: tag.to_string(),
                message: message.to_string(),
                sha: sha.to_string(),
            });
        }

        Ok(CreatedTag {
            tag: tag.to_string(),
            sha: format!("tagobject-{}", tag),
        })
    }

    async fn create_ref(&self, reference: &str, sha: &str) -> Result<()> {
        if let Some(message) = &self.error_on_create_ref {
            return Err(ReleaseError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                message.clone(),
            )));
        }

        if let Ok(mut calls) = self.create_ref_calls.lock() {
            calls.push(CreateRefCall {
                reference: reference.to_string(),
                sha: sha.to_string(),
            });
        }
        Ok(())
    }
}
