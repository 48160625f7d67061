//! GitHub platform implementation

use crate::error::Result;
use crate::platform::{CommitInfo, CreatedTag, Platform};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use serde_json::json;

const PER_PAGE: u8 = 100;

/// GitHub REST API client scoped to one repository
pub struct GitHubPlatform {
    client: Octocrab,
    owner: String,
    repo: String,
}

#[derive(Deserialize)]
struct CommitResponse {
    sha: String,
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    message: String,
}

#[derive(Deserialize)]
struct TagResponse {
    sha: String,
    tag: String,
}

#[derive(Deserialize)]
struct RefResponse {
    #[serde(rename = "ref")]
    reference: String,
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

impl GitHubPlatform {
    /// Create a client authenticated with `token`.
    ///
    /// `api_url` overrides the API root, e.g. for GitHub Enterprise.
    pub fn new(
        token: &str,
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_url: Option<&str>,
    ) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(url) = api_url {
            builder = builder.base_uri(url)?;
        }

        Ok(Self {
            client: builder.build()?,
            owner: owner.into(),
            repo: repo.into(),
        })
    }

    fn route(&self, path: &str) -> String {
        format!("/repos/{}/{}/{}", self.owner, self.repo, path)
    }
}

#[async_trait]
impl Platform for GitHubPlatform {
    async fn commit_message(&self, sha: &str) -> Result<String> {
        let response: CommitResponse = self
            .client
            .get(self.route(&format!("commits/{}", sha)), None::<&()>)
            .await?;

        tracing::debug!(sha = %response.sha, "fetched commit");
        Ok(response.commit.message)
    }

    async fn pull_request_commits(&self, number: u64) -> Result<Vec<CommitInfo>> {
        let route = self.route(&format!("pulls/{}/commits", number));
        let mut commits = Vec::new();
        let mut page = 1;

        loop {
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            let batch: Vec<CommitResponse> = self.client.get(&route, Some(&params)).await?;
            let done = batch.len() < usize::from(PER_PAGE);

            commits.extend(batch.into_iter().map(|c| CommitInfo {
                sha: c.sha,
                message: c.commit.message,
            }));

            if done {
                break;
            }
            page += 1;
        }

        tracing::debug!(number, count = commits.len(), "listed pull request commits");
        Ok(commits)
    }

    async fn create_tag(&self, tag: &str, message: &str, sha: &str) -> Result<CreatedTag> {
        let body = json!({
            "tag": tag,
            "message": message,
            "object": sha,
            "type": "commit",
        });

        let response: TagResponse = self.client.post(self.route("git/tags"), Some(&body)).await?;

        Ok(CreatedTag {
            tag: response.tag,
            sha: response.sha,
        })
    }

    async fn create_ref(&self, reference: &str, sha: &str) -> Result<()> {
        let body = json!({
            "ref": reference,
            "sha": sha,
        });

        let response: RefResponse = self.client.post(self.route("git/refs"), Some(&body)).await?;

        tracing::debug!(reference = %response.reference, "created ref");
        Ok(())
    }
}
