use crate::error::{ReleaseError, Result};
use std::fmt;

/// Semantic version representation, serialized as `vMAJOR.MINOR.PATCH`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// Magnitude of a version bump, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Increment {
    None,
    Patch,
    Minor,
    Major,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse version from a tag string (e.g., "v1.2.3" -> Version(1,2,3))
    ///
    /// A single leading `v` is optional; exactly three all-digit components
    /// are required.
    pub fn parse(tag: &str) -> Result<Self> {
        let clean_tag = tag.strip_prefix('v').unwrap_or(tag);

        let parts: Vec<&str> = clean_tag.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::version(format!(
                "Invalid version format: '{}' - expected vX.Y.Z",
                tag
            )));
        }

        let major = parse_component(parts[0], "major", tag)?;
        let minor = parse_component(parts[1], "minor", tag)?;
        let patch = parse_component(parts[2], "patch", tag)?;

        Ok(Version {
            major,
            minor,
            patch,
        })
    }

    /// Bump version according to the increment
    ///
    /// Lower components reset to zero. `Increment::None` is rejected, as is
    /// a component already at `u64::MAX`.
    pub fn bump(&self, increment: Increment) -> Result<Self> {
        match increment {
            Increment::Major => Ok(Version {
                major: self.next_component(self.major, "major")?,
                minor: 0,
                patch: 0,
            }),
            Increment::Minor => Ok(Version {
                major: self.major,
                minor: self.next_component(self.minor, "minor")?,
                patch: 0,
            }),
            Increment::Patch => Ok(Version {
                major: self.major,
                minor: self.minor,
                patch: self.next_component(self.patch, "patch")?,
            }),
            Increment::None => Err(ReleaseError::InvalidIncrement(increment)),
        }
    }

    fn next_component(&self, value: u64, name: &str) -> Result<u64> {
        value.checked_add(1).ok_or_else(|| {
            ReleaseError::version(format!(
                "{} version of {} cannot be incremented",
                name, self
            ))
        })
    }

    /// Name of the tag recording this version
    pub fn tag_name(&self) -> String {
        self.to_string()
    }
}

fn parse_component(part: &str, name: &str, tag: &str) -> Result<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReleaseError::version(format!(
            "Invalid {} version '{}' in '{}'",
            name, part, tag
        )));
    }

    part.parse::<u64>().map_err(|_| {
        ReleaseError::version(format!("{} version out of range in '{}'", name, tag))
    })
}

/// Computes the version following `current` for the given increment.
///
/// # Errors
/// * `Version` - `current` is not a `[v]X.Y.Z` string
/// * `InvalidIncrement` - `increment` is `Increment::None`
pub fn next_version(current: &str, increment: Increment) -> Result<Version> {
    Version::parse(current)?.bump(increment)
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Increment::Major => "major",
            Increment::Minor => "minor",
            Increment::Patch => "patch",
            Increment::None => "none",
        };
        f.write_str(name)
    }
}
