use crate::error::{ReleaseError, Result};
use crate::git::TagSource;
use std::sync::Mutex;

/// Mock tag source for testing without a repository
#[derive(Default)]
pub struct MockTagSource {
    tags: Vec<String>,
    nearest: Option<String>,
    fetch_error: Option<String>,
    fetched_remotes: Mutex<Vec<String>>,
}

impl MockTagSource {
    /// Create a new source with no tags
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags returned by `list_tags`
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Tag returned by `nearest_tag`
    pub fn with_nearest(mut self, tag: impl Into<String>) -> Self {
        self.nearest = Some(tag.into());
        self
    }

    /// Make `fetch_tags` fail with this message
    pub fn with_fetch_error(mut self, message: impl Into<String>) -> Self {
        self.fetch_error = Some(message.into());
        self
    }

    /// Remotes `fetch_tags` was called with
    pub fn fetched_remotes(&self) -> Vec<String> {
        self.fetched_remotes
            .lock()
            .map(|remotes| remotes.clone())
            .unwrap_or_default()
    }
}

impl TagSource for MockTagSource {
    fn fetch_tags(&self, remote: &str) -> Result<()> {
        if let Ok(mut remotes) = self.fetched_remotes.lock() {
            remotes.push(remote.to_string());
        }
        match &self.fetch_error {
            Some(message) => Err(ReleaseError::Git(git2::Error::from_str(message))),
            None => Ok(()),
        }
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }

    fn nearest_tag(&self) -> Result<Option<String>> {
        Ok(self.nearest.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_fetches() {
        let source = MockTagSource::new();
        source.fetch_tags("origin").unwrap();
        source.fetch_tags("upstream").unwrap();
        assert_eq!(source.fetched_remotes(), vec!["origin", "upstream"]);
    }

    #[test]
    fn test_mock_fetch_error() {
        let source = MockTagSource::new().with_fetch_error("network down");
        let err = source.fetch_tags("origin").unwrap_err();
        assert!(err.to_string().contains("network down"));
    }

    #[test]
    fn test_mock_default_is_empty() {
        let source = MockTagSource::default();
        assert!(source.list_tags().unwrap().is_empty());
        assert_eq!(source.nearest_tag().unwrap(), None);
    }
}
