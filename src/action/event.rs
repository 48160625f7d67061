use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// The pull request a run was triggered by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub merged: bool,
    /// Tip of the pull request branch
    pub head_sha: String,
    /// Triggering commit; the release tag points here
    pub sha: String,
}

#[derive(Deserialize)]
struct Payload {
    pull_request: Option<PullRequestPayload>,
    repository: Option<RepositoryPayload>,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    number: u64,
    #[serde(default)]
    merged: bool,
    head: HeadPayload,
    merge_commit_sha: Option<String>,
}

#[derive(Deserialize)]
struct HeadPayload {
    sha: String,
}

#[derive(Deserialize)]
struct RepositoryPayload {
    name: String,
    owner: OwnerPayload,
}

#[derive(Deserialize)]
struct OwnerPayload {
    login: String,
}

impl PullRequestEvent {
    /// Parses a webhook payload.
    ///
    /// Returns `Ok(None)` when the payload does not describe a pull request.
    /// `repository` (`owner/name`) is used when the payload lacks one; `sha`
    /// falls back to the merge commit, then to the head commit.
    pub fn from_payload(
        payload: &str,
        repository: Option<&str>,
        sha: Option<&str>,
    ) -> Result<Option<Self>> {
        let payload: Payload = serde_json::from_str(payload)
            .map_err(|e| ReleaseError::event(format!("invalid event payload: {}", e)))?;

        let Some(pull_request) = payload.pull_request else {
            return Ok(None);
        };

        let (owner, repo) = match (payload.repository, repository) {
            (Some(repository), _) => (repository.owner.login, repository.name),
            (None, Some(full_name)) => split_repository(full_name)?,
            (None, None) => {
                return Err(ReleaseError::event(
                    "repository is missing from both the payload and GITHUB_REPOSITORY",
                ))
            }
        };

        let sha = sha
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or(pull_request.merge_commit_sha)
            .unwrap_or_else(|| pull_request.head.sha.clone());

        Ok(Some(PullRequestEvent {
            owner,
            repo,
            number: pull_request.number,
            merged: pull_request.merged,
            head_sha: pull_request.head.sha,
            sha,
        }))
    }
}

/// Loads the triggering event from the payload file at `event_path`.
///
/// A missing path means the run has no event at all.
pub fn load_event(
    event_path: Option<&Path>,
    repository: Option<&str>,
    sha: Option<&str>,
) -> Result<Option<PullRequestEvent>> {
    let Some(path) = event_path else {
        return Ok(None);
    };

    let payload = fs::read_to_string(path).map_err(|e| {
        ReleaseError::event(format!(
            "cannot read event payload '{}': {}",
            path.display(),
            e
        ))
    })?;

    PullRequestEvent::from_payload(&payload, repository, sha)
}

fn split_repository(full_name: &str) -> Result<(String, String)> {
    match full_name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ReleaseError::event(format!(
            "repository '{}' is not in owner/name form",
            full_name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MERGED_PAYLOAD: &str = r#"{
        "action": "closed",
        "number": 42,
        "pull_request": {
            "number": 42,
            "merged": true,
            "head": { "sha": "headsha" },
            "merge_commit_sha": "mergesha"
        },
        "repository": { "name": "widgets", "owner": { "login": "acme" } }
    }"#;

    #[test]
    fn test_parse_merged_pull_request() {
        let event = PullRequestEvent::from_payload(MERGED_PAYLOAD, None, Some("triggersha"))
            .unwrap()
            .unwrap();

        assert_eq!(event.owner, "acme");
        assert_eq!(event.repo, "widgets");
        assert_eq!(event.number, 42);
        assert!(event.merged);
        assert_eq!(event.head_sha, "headsha");
        assert_eq!(event.sha, "triggersha");
    }

    #[test]
    fn test_sha_falls_back_to_merge_commit() {
        let event = PullRequestEvent::from_payload(MERGED_PAYLOAD, None, Some(""))
            .unwrap()
            .unwrap();
        assert_eq!(event.sha, "mergesha");
    }

    #[test]
    fn test_push_payload_is_not_a_pull_request() {
        let payload = r#"{ "ref": "refs/heads/main", "after": "abc" }"#;
        assert_eq!(PullRequestEvent::from_payload(payload, None, None).unwrap(), None);
    }

    #[test]
    fn test_repository_from_environment() {
        let payload = r#"{ "pull_request": { "number": 1, "head": { "sha": "h" } } }"#;
        let event = PullRequestEvent::from_payload(payload, Some("acme/widgets"), None)
            .unwrap()
            .unwrap();

        assert_eq!((event.owner.as_str(), event.repo.as_str()), ("acme", "widgets"));
        assert!(!event.merged);
        assert_eq!(event.sha, "h");
    }

    #[test]
    fn test_missing_repository_is_an_error() {
        let payload = r#"{ "pull_request": { "number": 1, "head": { "sha": "h" } } }"#;
        assert!(PullRequestEvent::from_payload(payload, None, None).is_err());
        assert!(PullRequestEvent::from_payload(payload, Some("no-slash"), None).is_err());
    }

    #[test]
    fn test_invalid_json() {
        let err = PullRequestEvent::from_payload("{not json", None, None).unwrap_err();
        assert!(matches!(err, ReleaseError::Event(_)));
    }

    #[test]
    fn test_load_event_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MERGED_PAYLOAD.as_bytes()).unwrap();

        let event = load_event(Some(file.path()), None, Some("abc")).unwrap();
        assert_eq!(event.map(|e| e.number), Some(42));
    }

    #[test]
    fn test_load_event_without_path() {
        assert_eq!(load_event(None, Some("acme/widgets"), None).unwrap(), None);
    }
}
