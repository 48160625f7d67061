//! GitHub Actions plumbing
//!
//! Reads `INPUT_*` variables, writes step outputs to the `GITHUB_OUTPUT`
//! file and emits workflow commands (`::error::`, `::warning::`, ...).
//! Nothing here knows about versions or commits.

pub mod event;

pub use event::{load_event, PullRequestEvent};

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{ReleaseMode, VersionSource};
use crate::error::{ReleaseError, Result};

/// Message reported when a failure carries no text of its own
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Inputs declared by the action, all optional at this layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionInputs {
    pub github_token: Option<String>,
    pub config: Option<String>,
    pub minor_prefixes: Option<Vec<String>>,
    pub patch_prefixes: Option<Vec<String>>,
    pub mode: Option<ReleaseMode>,
    pub version_source: Option<VersionSource>,
    pub release_notes: Option<bool>,
    pub dry_run: Option<bool>,
}

impl ActionInputs {
    /// Reads every known input from the process environment
    pub fn from_env() -> Result<Self> {
        Ok(ActionInputs {
            github_token: get_input("github-token"),
            config: get_input("config"),
            minor_prefixes: get_list_input("minor-prefixes"),
            patch_prefixes: get_list_input("patch-prefixes"),
            mode: get_parsed_input("mode")?,
            version_source: get_parsed_input("version-source")?,
            release_notes: get_bool_input("release-notes")?,
            dry_run: get_bool_input("dry-run")?,
        })
    }
}

/// Environment variable holding an input: `INPUT_` + upper-cased name, spaces as `_`
pub fn input_variable(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Trimmed input value; unset and blank inputs are `None`
pub fn get_input(name: &str) -> Option<String> {
    env::var(input_variable(name))
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Input holding a comma- or newline-separated list
pub fn get_list_input(name: &str) -> Option<Vec<String>> {
    get_input(name).map(|value| split_list(&value))
}

/// Input holding a YAML 1.2 core boolean (`true`/`True`/`TRUE`, `false`/...)
pub fn get_bool_input(name: &str) -> Result<Option<bool>> {
    match get_input(name) {
        None => Ok(None),
        Some(value) => match value.as_str() {
            "true" | "True" | "TRUE" => Ok(Some(true)),
            "false" | "False" | "FALSE" => Ok(Some(false)),
            _ => Err(ReleaseError::config(format!(
                "input '{}' must be true or false, got '{}'",
                name, value
            ))),
        },
    }
}

fn get_parsed_input<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    get_input(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| ReleaseError::config(format!("input '{}': {}", name, e)))
        })
        .transpose()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Escapes a workflow command payload
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn issue_command(command: &str, message: &str) {
    println!("::{}::{}", command, escape_data(message));
}

/// Emits an error annotation
pub fn error(message: &str) {
    issue_command("error", message);
}

/// Emits a warning annotation
pub fn warning(message: &str) {
    issue_command("warning", message);
}

/// Emits a notice annotation
pub fn notice(message: &str) {
    issue_command("notice", message);
}

/// Text reported for a failed run, including its context chain
pub fn failure_message(err: &anyhow::Error) -> String {
    let message = format!("{:#}", err);
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// Reports the failure signal: an error annotation carrying the message
pub fn set_failed(err: &anyhow::Error) {
    error(&failure_message(err));
}

/// Appends a step output to the `GITHUB_OUTPUT` file.
///
/// Outside of Actions, where the variable is unset, the output is dropped.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    let Some(path) = env::var_os("GITHUB_OUTPUT").filter(|p| !p.is_empty()) else {
        tracing::debug!(name, "GITHUB_OUTPUT not set, skipping output");
        return Ok(());
    };

    let mut file = OpenOptions::new().append(true).create(true).open(path)?;
    write_output(&mut file, name, value, &output_delimiter())?;
    Ok(())
}

/// Writes `name<<DELIM\nvalue\nDELIM\n`
pub fn write_output<W: Write>(
    writer: &mut W,
    name: &str,
    value: &str,
    delimiter: &str,
) -> io::Result<()> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("output '{}' contains the delimiter '{}'", name, delimiter),
        ));
    }

    write!(writer, "{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

fn output_delimiter() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("ghadelimiter_{}_{}", std::process::id(), nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_input_variable_name() {
        assert_eq!(input_variable("github-token"), "INPUT_GITHUB-TOKEN");
        assert_eq!(input_variable("minor prefixes"), "INPUT_MINOR_PREFIXES");
    }

    #[test]
    #[serial]
    fn test_inputs_from_env() {
        env::set_var("INPUT_GITHUB-TOKEN", "  secret  ");
        env::set_var("INPUT_MINOR-PREFIXES", "feat, perf\nrefactor");
        env::set_var("INPUT_MODE", "squash");
        env::set_var("INPUT_RELEASE-NOTES", "False");
        env::set_var("INPUT_DRY-RUN", "");

        let inputs = ActionInputs::from_env().unwrap();

        env::remove_var("INPUT_GITHUB-TOKEN");
        env::remove_var("INPUT_MINOR-PREFIXES");
        env::remove_var("INPUT_MODE");
        env::remove_var("INPUT_RELEASE-NOTES");
        env::remove_var("INPUT_DRY-RUN");

        assert_eq!(inputs.github_token.as_deref(), Some("secret"));
        assert_eq!(
            inputs.minor_prefixes,
            Some(vec![
                "feat".to_string(),
                "perf".to_string(),
                "refactor".to_string()
            ])
        );
        assert_eq!(inputs.patch_prefixes, None);
        assert_eq!(inputs.mode, Some(ReleaseMode::Squash));
        assert_eq!(inputs.release_notes, Some(false));
        assert_eq!(inputs.dry_run, None);
    }

    #[test]
    #[serial]
    fn test_invalid_bool_input() {
        env::set_var("INPUT_DRY-RUN", "yes");
        let result = ActionInputs::from_env();
        env::remove_var("INPUT_DRY-RUN");

        assert!(matches!(result, Err(ReleaseError::Config(_))));
    }

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("100% done\r\nnext"), "100%25 done%0D%0Anext");
    }

    #[test]
    fn test_failure_message_falls_back() {
        let err = anyhow::anyhow!("");
        assert_eq!(failure_message(&err), UNKNOWN_ERROR);

        let err = anyhow::anyhow!("tag already exists");
        assert_eq!(failure_message(&err), "tag already exists");

        let err = anyhow::anyhow!("not found").context("Failed to open repository");
        assert_eq!(failure_message(&err), "Failed to open repository: not found");
    }

    #[test]
    fn test_write_output_heredoc() {
        let mut buffer = Vec::new();
        write_output(&mut buffer, "release-notes", "## Release v1.0.0\n- a", "EOF").unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "release-notes<<EOF\n## Release v1.0.0\n- a\nEOF\n"
        );
    }

    #[test]
    fn test_write_output_rejects_delimiter_in_value() {
        let mut buffer = Vec::new();
        assert!(write_output(&mut buffer, "tag", "x EOF y", "EOF").is_err());
    }

    #[test]
    #[serial]
    fn test_set_output_appends_to_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        env::set_var("GITHUB_OUTPUT", file.path());

        set_output("version", "v1.3.0").unwrap();
        set_output("tag", "v1.3.0").unwrap();

        env::remove_var("GITHUB_OUTPUT");

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.starts_with("version<<ghadelimiter_"));
        assert!(contents.contains("\nv1.3.0\n"));
        assert!(contents.contains("tag<<ghadelimiter_"));
    }
}
