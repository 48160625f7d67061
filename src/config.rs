use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::action::ActionInputs;
use crate::domain::{CommitGrammar, Version};
use crate::error::{ReleaseError, Result};

/// File name searched in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "release.toml";

/// File name searched in the user configuration directory.
pub const USER_CONFIG_FILE: &str = "pr-release.toml";

/// Represents the complete configuration for pr-release.
///
/// Contains the commit prefix grammar, version source settings and release behavior.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub commits: CommitsConfig,

    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    /// Skip publishing; everything else still runs
    #[serde(default)]
    pub dry_run: bool,
}

/// Returns the default prefixes for minor-level changes.
fn default_minor_prefixes() -> Vec<String> {
    vec!["feat".to_string()]
}

/// Returns the default prefixes for patch-level changes.
fn default_patch_prefixes() -> Vec<String> {
    vec!["fix".to_string()]
}

fn default_tag() -> String {
    "v0.1.0".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_true() -> bool {
    true
}

/// Prefix grammar used to classify commit message lines.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitsConfig {
    #[serde(default = "default_minor_prefixes")]
    pub minor_prefixes: Vec<String>,

    #[serde(default = "default_patch_prefixes")]
    pub patch_prefixes: Vec<String>,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        CommitsConfig {
            minor_prefixes: default_minor_prefixes(),
            patch_prefixes: default_patch_prefixes(),
        }
    }
}

impl CommitsConfig {
    /// Build the line grammar for these prefixes
    pub fn grammar(&self) -> Result<CommitGrammar> {
        CommitGrammar::new(&self.minor_prefixes, &self.patch_prefixes)
    }
}

/// How the current version tag is chosen.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VersionSource {
    /// Highest semantic version among all tags
    #[default]
    Latest,
    /// Nearest tag reachable from HEAD
    Nearest,
}

/// Settings for reading the current version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionConfig {
    #[serde(default)]
    pub source: VersionSource,

    /// Version assumed when no tag exists yet
    #[serde(default = "default_tag")]
    pub default_tag: String,

    /// Remote tags are fetched from
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_true")]
    pub fetch_tags: bool,
}

impl Default for VersionConfig {
    fn default() -> Self {
        VersionConfig {
            source: VersionSource::default(),
            default_tag: default_tag(),
            remote: default_remote(),
            fetch_tags: true,
        }
    }
}

/// Which commit message a release is derived from.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseMode {
    /// Merged pull request; the merge commit message is classified
    #[default]
    Merge,
    /// Single-commit pull request; that commit's message is classified
    Squash,
}

/// Settings for the published release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default)]
    pub mode: ReleaseMode,

    /// Annotate the tag with rendered notes instead of `Release vX.Y.Z`
    #[serde(default = "default_true")]
    pub release_notes: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            mode: ReleaseMode::default(),
            release_notes: true,
        }
    }
}

impl Config {
    /// Checks values that serde cannot validate on its own.
    pub fn validate(&self) -> Result<()> {
        self.commits.grammar()?;

        Version::parse(&self.version.default_tag).map_err(|e| {
            ReleaseError::config(format!(
                "default_tag '{}' is not a version: {}",
                self.version.default_tag, e
            ))
        })?;

        if self.version.remote.trim().is_empty() {
            return Err(ReleaseError::config("remote must not be empty"));
        }

        Ok(())
    }

    /// Overlays the CI action inputs that were provided.
    pub fn apply_inputs(&mut self, inputs: &ActionInputs) {
        if let Some(prefixes) = &inputs.minor_prefixes {
            self.commits.minor_prefixes = prefixes.clone();
        }
        if let Some(prefixes) = &inputs.patch_prefixes {
            self.commits.patch_prefixes = prefixes.clone();
        }
        if let Some(mode) = inputs.mode {
            self.release.mode = mode;
        }
        if let Some(source) = inputs.version_source {
            self.version.source = source;
        }
        if let Some(notes) = inputs.release_notes {
            self.release.release_notes = notes;
        }
        if let Some(dry_run) = inputs.dry_run {
            self.dry_run = dry_run;
        }
    }
}

impl FromStr for VersionSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latest" => Ok(VersionSource::Latest),
            "nearest" => Ok(VersionSource::Nearest),
            other => Err(format!(
                "unknown version source '{}' (expected 'latest' or 'nearest')",
                other
            )),
        }
    }
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSource::Latest => f.write_str("latest"),
            VersionSource::Nearest => f.write_str("nearest"),
        }
    }
}

impl FromStr for ReleaseMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(ReleaseMode::Merge),
            "squash" => Ok(ReleaseMode::Squash),
            other => Err(format!(
                "unknown release mode '{}' (expected 'merge' or 'squash')",
                other
            )),
        }
    }
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseMode::Merge => f.write_str("merge"),
            ReleaseMode::Squash => f.write_str("squash"),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `pr-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            ReleaseError::config(format!("cannot read config file '{}': {}", path, e))
        })?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses configuration from TOML text.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| ReleaseError::config(e.to_string()))
}
