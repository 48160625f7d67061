use regex::Regex;

use crate::domain::Increment;
use crate::error::{ReleaseError, Result};

/// Bucket a single classified line falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Breaking,
    Feature,
    Fix,
}

/// A commit message line that matched one of the prefix grammars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub kind: ChangeKind,
    pub description: String,
}

/// Change descriptions bucketed by severity, in message order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub breaking: Vec<String>,
    pub features: Vec<String>,
    pub fixes: Vec<String>,
}

impl ChangeSet {
    /// Highest severity present; `Increment::None` when nothing matched
    pub fn increment(&self) -> Increment {
        if !self.breaking.is_empty() {
            Increment::Major
        } else if !self.features.is_empty() {
            Increment::Minor
        } else if !self.fixes.is_empty() {
            Increment::Patch
        } else {
            Increment::None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.breaking.is_empty() && self.features.is_empty() && self.fixes.is_empty()
    }

    /// Total number of classified lines
    pub fn len(&self) -> usize {
        self.breaking.len() + self.features.len() + self.fixes.len()
    }

    fn push(&mut self, line: ClassifiedLine) {
        let bucket = match line.kind {
            ChangeKind::Breaking => &mut self.breaking,
            ChangeKind::Feature => &mut self.features,
            ChangeKind::Fix => &mut self.fixes,
        };
        bucket.push(line.description);
    }
}

/// Line-anchored prefix grammars for minor-level and patch-level changes.
///
/// A line matches when it reads, from its first character:
/// an optional `* ` bullet, one of the prefixes, an optional `(scope)`,
/// an optional `!`, then `: ` followed by the description.
///
/// A matching line containing `!` anywhere is a breaking change, whichever
/// grammar it matched.
#[derive(Debug, Clone)]
pub struct CommitGrammar {
    minor: Regex,
    patch: Regex,
}

impl CommitGrammar {
    /// Build the grammar from the configured prefix lists
    ///
    /// # Errors
    /// * `Config` - if either list is empty or contains a blank prefix
    pub fn new<S: AsRef<str>>(minor_prefixes: &[S], patch_prefixes: &[S]) -> Result<Self> {
        Ok(CommitGrammar {
            minor: build_line_pattern("minor", minor_prefixes)?,
            patch: build_line_pattern("patch", patch_prefixes)?,
        })
    }

    /// Classify one line of a commit message
    pub fn classify_line(&self, line: &str) -> Option<ClassifiedLine> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        let (captures, kind) = if let Some(captures) = self.minor.captures(line) {
            (captures, ChangeKind::Feature)
        } else if let Some(captures) = self.patch.captures(line) {
            (captures, ChangeKind::Fix)
        } else {
            return None;
        };

        let kind = if line.contains('!') {
            ChangeKind::Breaking
        } else {
            kind
        };

        let description = captures
            .name("description")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        Some(ClassifiedLine { kind, description })
    }

    /// Classify every line of a commit message
    pub fn classify(&self, message: &str) -> ChangeSet {
        let mut changes = ChangeSet::default();
        for line in message.split('\n').filter_map(|l| self.classify_line(l)) {
            changes.push(line);
        }
        changes
    }

    /// Classify several commit messages into one change set, preserving order
    pub fn classify_all<S: AsRef<str>>(&self, messages: &[S]) -> ChangeSet {
        let mut changes = ChangeSet::default();
        for message in messages {
            for line in message
                .as_ref()
                .split('\n')
                .filter_map(|l| self.classify_line(l))
            {
                changes.push(line);
            }
        }
        changes
    }
}

fn build_line_pattern<S: AsRef<str>>(level: &str, prefixes: &[S]) -> Result<Regex> {
    if prefixes.is_empty() {
        return Err(ReleaseError::config(format!(
            "at least one {} prefix is required",
            level
        )));
    }

    let mut alternatives = Vec::with_capacity(prefixes.len());
    for prefix in prefixes {
        let prefix = prefix.as_ref().trim();
        if prefix.is_empty() {
            return Err(ReleaseError::config(format!(
                "{} prefixes must not be blank",
                level
            )));
        }
        alternatives.push(regex::escape(prefix));
    }

    let pattern = format!(
        r"^(?:\* )?(?:{})(?:\([^)]*\))?!?: (?P<description>.*)$",
        alternatives.join("|")
    );

    Regex::new(&pattern)
        .map_err(|e| ReleaseError::config(format!("invalid {} prefix pattern: {}", level, e)))
}

/// Determine the increment a commit message requires
pub fn determine_increment(message: &str, grammar: &CommitGrammar) -> Increment {
    grammar.classify(message).increment()
}
