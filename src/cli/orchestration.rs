//! Release workflow orchestration
//!
//! Sequences the release stages against explicit collaborators: the hosted
//! platform, the local tag source and the configuration. Nothing is read
//! from process-global state here.

use crate::action::PullRequestEvent;
use crate::boundary::BoundaryWarning;
use crate::config::{Config, ReleaseMode};
use crate::domain::{release_message, render_release_notes, Increment, Version};
use crate::error::{ReleaseError, Result};
use crate::git::{resolve_current_tag, CurrentTag, TagSource};
use crate::platform::Platform;
use crate::ui;

/// Failure message when the run was not triggered by a pull request
pub const NOT_A_PULL_REQUEST: &str = "This action can only be run on Pull Request";

/// Failure message when merge mode sees an unmerged pull request
pub const NOT_MERGED: &str = "Pull Request is not merged";

/// Result of a successful release run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Tag the version was computed from
    pub previous_tag: String,

    /// True when no tag existed and the default version was used
    pub previous_was_default: bool,

    pub increment: Increment,

    pub version: Version,

    /// Name of the tag, `vX.Y.Z`
    pub tag: String,

    /// Tag annotation: rendered notes or `Release vX.Y.Z`
    pub notes: String,

    /// Whether the tag and ref were created (false on dry runs)
    pub published: bool,
}

/// One release run over its collaborators
pub struct ReleaseWorkflow<'a, P: ?Sized, T: ?Sized> {
    platform: &'a P,
    tags: &'a T,
    config: &'a Config,
}

impl<'a, P, T> ReleaseWorkflow<'a, P, T>
where
    P: Platform + ?Sized,
    T: TagSource + ?Sized,
{
    pub fn new(platform: &'a P, tags: &'a T, config: &'a Config) -> Self {
        ReleaseWorkflow {
            platform,
            tags,
            config,
        }
    }

    /// Main release workflow
    ///
    /// 1. Check the event preconditions
    /// 2. Read the current version tag
    /// 3. Read and classify the commit message
    /// 4. Compute the next version and its annotation
    /// 5. Create the tag object and its ref
    ///
    /// Tag creation is the only remote mutation and happens last.
    pub async fn run(&self, event: Option<&PullRequestEvent>) -> Result<ReleaseOutcome> {
        let event = event.ok_or_else(|| ReleaseError::precondition(NOT_A_PULL_REQUEST))?;

        if self.config.release.mode == ReleaseMode::Merge && !event.merged {
            return Err(ReleaseError::precondition(NOT_MERGED));
        }

        ui::display_status(&format!(
            "Releasing {}/{} from pull request #{}",
            event.owner, event.repo, event.number
        ));

        let current = self.current_tag()?;

        let message = self.commit_message(event).await?;
        let grammar = self.config.commits.grammar()?;
        let changes = grammar.classify(&message);
        let increment = changes.increment();

        if increment == Increment::None {
            return Err(ReleaseError::classification(format!(
                "no line of the commit message starts with a recognised prefix \
                 (minor: {}; patch: {})",
                self.config.commits.minor_prefixes.join(", "),
                self.config.commits.patch_prefixes.join(", ")
            )));
        }
        ui::display_change_set(&changes);

        let version = Version::parse(&current.tag)?.bump(increment)?;
        let tag = version.tag_name();
        let previous = (!current.is_default).then_some(current.tag.as_str());
        ui::display_version_change(previous, &version, increment);

        let notes = if self.config.release.release_notes {
            render_release_notes(&changes, &version)
        } else {
            release_message(&version)
        };

        let published = if self.config.dry_run {
            ui::display_status(&format!("Dry run: would create tag {} at {}", tag, event.sha));
            false
        } else {
            self.publish(&tag, &notes, &event.sha).await?;
            true
        };

        Ok(ReleaseOutcome {
            previous_tag: current.tag,
            previous_was_default: current.is_default,
            increment,
            version,
            tag,
            notes,
            published,
        })
    }

    fn current_tag(&self) -> Result<CurrentTag> {
        let version_config = &self.config.version;

        if version_config.fetch_tags {
            ui::display_status(&format!("Fetching tags from {}...", version_config.remote));
            if let Err(e) = self.tags.fetch_tags(&version_config.remote) {
                ui::display_boundary_warning(&BoundaryWarning::FetchFailed {
                    remote: version_config.remote.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let current = resolve_current_tag(
            self.tags,
            version_config.source,
            &version_config.default_tag,
        )?;

        for warning in &current.warnings {
            ui::display_boundary_warning(warning);
        }
        tracing::info!(tag = %current.tag, source = %version_config.source, "current version");

        Ok(current)
    }

    async fn commit_message(&self, event: &PullRequestEvent) -> Result<String> {
        match self.config.release.mode {
            ReleaseMode::Merge => self.platform.commit_message(&event.sha).await,
            ReleaseMode::Squash => {
                let commits = self.platform.pull_request_commits(event.number).await?;
                match <[_; 1]>::try_from(commits) {
                    Ok([commit]) => Ok(commit.message),
                    Err(commits) => Err(ReleaseError::precondition(format!(
                        "Pull Request must be squashed into a single commit (found {})",
                        commits.len()
                    ))),
                }
            }
        }
    }

    async fn publish(&self, tag: &str, notes: &str, sha: &str) -> Result<()> {
        ui::display_status(&format!("Creating tag: {}", tag));
        let created = self.platform.create_tag(tag, notes, sha).await?;

        let reference = format!("refs/tags/{}", created.tag);
        self.platform.create_ref(&reference, &created.sha).await?;

        ui::display_success(&format!("Created tag: {} at {}", tag, sha));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockTagSource;
    use crate::platform::{CommitInfo, MockPlatform};

    fn event(merged: bool) -> PullRequestEvent {
        PullRequestEvent {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            number: 7,
            merged,
            head_sha: "head".to_string(),
            sha: "merge".to_string(),
        }
    }

    #[tokio::test]
    async fn test_no_event_is_a_precondition_failure() {
        let platform = MockPlatform::new();
        let tags = MockTagSource::new();
        let config = Config::default();

        let err = ReleaseWorkflow::new(&platform, &tags, &config)
            .run(None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), NOT_A_PULL_REQUEST);
        assert!(platform.create_tag_calls().is_empty());
        assert!(tags.fetched_remotes().is_empty());
    }

    #[tokio::test]
    async fn test_unmerged_pull_request_in_merge_mode() {
        let platform = MockPlatform::new().with_commit("merge", "feat: x");
        let tags = MockTagSource::new();
        let config = Config::default();

        let err = ReleaseWorkflow::new(&platform, &tags, &config)
            .run(Some(&event(false)))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), NOT_MERGED);
    }

    #[tokio::test]
    async fn test_squash_mode_ignores_merged_flag() {
        let platform = MockPlatform::new().with_pull_request(
            7,
            vec![CommitInfo {
                sha: "c1".to_string(),
                message: "fix: one".to_string(),
            }],
        );
        let tags = MockTagSource::new().with_tags(&["v1.0.0"]);
        let mut config = Config::default();
        config.release.mode = ReleaseMode::Squash;

        let outcome = ReleaseWorkflow::new(&platform, &tags, &config)
            .run(Some(&event(false)))
            .await
            .unwrap();

        assert_eq!(outcome.tag, "v1.0.1");
    }

    #[tokio::test]
    async fn test_publish_creates_tag_then_ref() {
        let platform = MockPlatform::new().with_commit("merge", "fix!: drop flag");
        let tags = MockTagSource::new().with_tags(&["v1.4.2"]);
        let config = Config::default();

        let outcome = ReleaseWorkflow::new(&platform, &tags, &config)
            .run(Some(&event(true)))
            .await
            .unwrap();

        assert_eq!(outcome.version, Version::new(2, 0, 0));
        assert!(outcome.published);

        let ref_calls = platform.create_ref_calls();
        assert_eq!(ref_calls.len(), 1);
        assert_eq!(ref_calls[0].reference, "refs/tags/v2.0.0");
        assert_eq!(ref_calls[0].sha, "tagobject-v2.0.0");
    }
}
