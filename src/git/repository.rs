use crate::error::{ReleaseError, Result};
use crate::git::TagSource;
use git2::{
    Cred, CredentialType, DescribeFormatOptions, DescribeOptions, ErrorClass, ErrorCode,
    FetchOptions, RemoteCallbacks, Repository as Git2Repo,
};
use std::path::Path;

/// User name GitHub accepts alongside an access token over HTTPS
const TOKEN_USERNAME: &str = "x-access-token";

/// Tag source backed by a libgit2 repository
pub struct Git2TagSource {
    repo: Git2Repo,
    token: Option<String>,
}

impl Git2TagSource {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2TagSource { repo, token: None })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2TagSource { repo, token: None }
    }

    /// Authenticate HTTPS fetches with an access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn remote_callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();
        let token = self.token.as_deref();

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = token {
                    return Cred::userpass_plaintext(TOKEN_USERNAME, token);
                }
            }

            if allowed_types.contains(CredentialType::SSH_KEY) {
                return Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
            }

            Cred::default()
        });

        callbacks
    }
}

impl TagSource for Git2TagSource {
    fn fetch_tags(&self, remote: &str) -> Result<()> {
        let mut remote_handle = self.repo.find_remote(remote).map_err(|e| {
            ReleaseError::Git(git2::Error::from_str(&format!(
                "Cannot find remote '{}': {}",
                remote, e
            )))
        })?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(self.remote_callbacks());

        remote_handle.fetch(
            &["+refs/tags/*:refs/tags/*"],
            Some(&mut fetch_options),
            None,
        )?;

        tracing::debug!(remote, "fetched tags");
        Ok(())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn nearest_tag(&self) -> Result<Option<String>> {
        let mut describe_options = DescribeOptions::new();
        describe_options.describe_tags();

        let describe = match self.repo.describe(&describe_options) {
            Ok(describe) => describe,
            // libgit2 reports "no reference found" as a generic describe error
            Err(e) if e.code() == ErrorCode::NotFound || e.class() == ErrorClass::Describe => {
                tracing::debug!(error = %e, "no tag reachable from HEAD");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut format_options = DescribeFormatOptions::new();
        format_options.abbreviated_size(0);

        Ok(Some(describe.format(Some(&format_options))?))
    }
}
