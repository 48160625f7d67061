//! Local version-control access for reading the current version
//!
//! The [TagSource] trait covers the three git queries a release needs:
//! fetching tags, listing them and describing the nearest one. The concrete
//! implementations are:
//!
//! - [repository::Git2TagSource]: libgit2 through the `git2` crate
//! - [mock::MockTagSource]: an in-memory source for tests
//!
//! [resolve_current_tag] turns a source into the tag the next version is
//! computed from.

pub mod mock;
pub mod repository;

pub use mock::MockTagSource;
pub use repository::Git2TagSource;

use crate::boundary::BoundaryWarning;
use crate::config::VersionSource;
use crate::error::Result;

/// Git queries used to find the current version
pub trait TagSource {
    /// Fetch all tags from `remote` into the local repository
    fn fetch_tags(&self, remote: &str) -> Result<()>;

    /// Names of every tag in the repository, in no particular order
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Nearest tag reachable from HEAD (`git describe --tags --abbrev=0`)
    ///
    /// # Returns
    /// * `Ok(None)` - If no tag is reachable
    fn nearest_tag(&self) -> Result<Option<String>>;
}

/// The tag a release starts from
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentTag {
    pub tag: String,
    /// True when no tag was found and the configured default is used
    pub is_default: bool,
    pub warnings: Vec<BoundaryWarning>,
}

/// Picks the current version tag with the given strategy.
///
/// Finding no tag is not an error: the result carries `default_tag` and a
/// [BoundaryWarning::NoVersionTag].
pub fn resolve_current_tag<S: TagSource + ?Sized>(
    source: &S,
    strategy: VersionSource,
    default_tag: &str,
) -> Result<CurrentTag> {
    let mut warnings = Vec::new();

    let found = match strategy {
        VersionSource::Latest => {
            let tags = source.list_tags()?;
            let (latest, ignored) = latest_version_tag(&tags);
            if !ignored.is_empty() {
                warnings.push(BoundaryWarning::IgnoredTags { tags: ignored });
            }
            latest
        }
        VersionSource::Nearest => source.nearest_tag()?,
    };

    tracing::debug!(?strategy, tag = ?found, "resolved current version tag");

    match found {
        Some(tag) => Ok(CurrentTag {
            tag,
            is_default: false,
            warnings,
        }),
        None => {
            warnings.push(BoundaryWarning::NoVersionTag {
                default_tag: default_tag.to_string(),
            });
            Ok(CurrentTag {
                tag: default_tag.to_string(),
                is_default: true,
                warnings,
            })
        }
    }
}

/// Highest plain semantic version among `tags`.
///
/// An optional leading `v` is allowed. Pre-release and build tags, and tags
/// that are not versions at all, are returned in the second element.
pub fn latest_version_tag(tags: &[String]) -> (Option<String>, Vec<String>) {
    let mut versions = Vec::new();
    let mut ignored = Vec::new();

    for tag in tags {
        let bare = tag.strip_prefix('v').unwrap_or(tag);
        match semver::Version::parse(bare) {
            Ok(version) if version.pre.is_empty() && version.build.is_empty() => {
                versions.push((version, tag));
            }
            _ => ignored.push(tag.clone()),
        }
    }

    versions.sort();
    let latest = versions.last().map(|(_, tag)| (*tag).clone());
    (latest, ignored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_latest_uses_semver_order() {
        let (latest, ignored) = latest_version_tag(&tags(&["v1.9.0", "v1.10.0", "v1.2.3"]));
        assert_eq!(latest.as_deref(), Some("v1.10.0"));
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_latest_skips_non_versions_and_prereleases() {
        let (latest, ignored) =
            latest_version_tag(&tags(&["nightly", "v2.0.0-rc.1", "v1.4.0", "release-3"]));
        assert_eq!(latest.as_deref(), Some("v1.4.0"));
        assert_eq!(ignored, tags(&["nightly", "v2.0.0-rc.1", "release-3"]));
    }

    #[test]
    fn test_latest_of_nothing() {
        assert_eq!(latest_version_tag(&[]), (None, vec![]));
    }

    #[test]
    fn test_resolve_latest() {
        let source = MockTagSource::new()
            .with_tags(&["v0.9.0", "v1.2.3", "v1.0.0"])
            .with_nearest("v1.0.0");

        let current = resolve_current_tag(&source, VersionSource::Latest, "v0.1.0").unwrap();
        assert_eq!(current.tag, "v1.2.3");
        assert!(!current.is_default);
        assert!(current.warnings.is_empty());
    }

    #[test]
    fn test_resolve_nearest_can_differ_from_latest() {
        let source = MockTagSource::new()
            .with_tags(&["v1.0.0", "v1.2.3"])
            .with_nearest("v1.0.0");

        let current = resolve_current_tag(&source, VersionSource::Nearest, "v0.1.0").unwrap();
        assert_eq!(current.tag, "v1.0.0");
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let source = MockTagSource::new();

        for strategy in [VersionSource::Latest, VersionSource::Nearest] {
            let current = resolve_current_tag(&source, strategy, "v0.1.0").unwrap();
            assert_eq!(current.tag, "v0.1.0");
            assert!(current.is_default);
            assert_eq!(
                current.warnings,
                vec![BoundaryWarning::NoVersionTag {
                    default_tag: "v0.1.0".to_string()
                }]
            );
        }
    }
}
