use std::fmt;

/// Non-fatal conditions met while reading the current version.
/// These are reported to the user but never fail the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No version tag exists yet; the default version is used
    NoVersionTag { default_tag: String },
    /// Tags could not be fetched; local tags are used
    FetchFailed { remote: String, reason: String },
    /// Tags that are not plain `vX.Y.Z` versions were skipped
    IgnoredTags { tags: Vec<String> },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoVersionTag { default_tag } => {
                write!(f, "No version tag found, starting from '{}'", default_tag)
            }
            BoundaryWarning::FetchFailed { remote, reason } => {
                write!(
                    f,
                    "Could not fetch tags from remote '{}': {}. Using local tags.",
                    remote, reason
                )
            }
            BoundaryWarning::IgnoredTags { tags } => {
                const SHOWN: usize = 5;
                let listed = tags
                    .iter()
                    .take(SHOWN)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if tags.len() > SHOWN {
                    write!(
                        f,
                        "Ignored {} non-version tags: {} and {} more",
                        tags.len(),
                        listed,
                        tags.len() - SHOWN
                    )
                } else {
                    write!(f, "Ignored {} non-version tags: {}", tags.len(), listed)
                }
            }
        }
    }
}
