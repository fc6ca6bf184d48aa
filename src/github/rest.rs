//! The [`RepoGateway`] implementation over the GitHub REST API.
//!
//! Uses octocrab's typed endpoints where they cover the operation (contents
//! reads, pull request creation) and raw requests with per-endpoint serde
//! structs where they don't (branch lookup, ref creation, contents writes).
//! Every operation goes through the transient-error retry loop; 404s on
//! lookups surface as `Ok(None)` rather than errors.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::gateway::{
    BranchDescriptor, CommitAuthor, FileSnapshot, GatewayError, PullRequestHandle, RepoGateway,
};
use crate::types::{PrNumber, Sha};

use super::client::GithubClient;
use super::error::{categorize, is_not_found};
use super::retry::{RetryConfig, retry_with_backoff};

impl RepoGateway for GithubClient {
    async fn get_file(
        &self,
        path: &str,
        reference: &str,
    ) -> Result<Option<FileSnapshot>, GatewayError> {
        retry_with_backoff(RetryConfig::DEFAULT, || get_file_once(self, path, reference)).await
    }

    async fn get_branch(&self, name: &str) -> Result<Option<BranchDescriptor>, GatewayError> {
        retry_with_backoff(RetryConfig::DEFAULT, || get_branch_once(self, name)).await
    }

    async fn create_branch(&self, name: &str, at: &Sha) -> Result<(), GatewayError> {
        retry_with_backoff(RetryConfig::DEFAULT, || create_branch_once(self, name, at)).await
    }

    async fn create_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        content: &str,
        author: &CommitAuthor,
    ) -> Result<(), GatewayError> {
        retry_with_backoff(RetryConfig::DEFAULT, || {
            put_contents_once(self, path, branch, message, content, None, author)
        })
        .await
    }

    async fn update_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        content: &str,
        expected_sha: &Sha,
        author: &CommitAuthor,
    ) -> Result<(), GatewayError> {
        retry_with_backoff(RetryConfig::DEFAULT, || {
            put_contents_once(
                self,
                path,
                branch,
                message,
                content,
                Some(expected_sha),
                author,
            )
        })
        .await
    }

    async fn create_pull_request(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<PullRequestHandle, GatewayError> {
        retry_with_backoff(RetryConfig::DEFAULT, || {
            create_pull_request_once(self, title, body, head, base)
        })
        .await
    }
}

// ─── Contents Reads ───────────────────────────────────────────────────────────

async fn get_file_once(
    client: &GithubClient,
    path: &str,
    reference: &str,
) -> Result<Option<FileSnapshot>, GatewayError> {
    let result = client
        .inner()
        .repos(client.owner(), client.repo_name())
        .get_content()
        .path(path)
        .r#ref(reference)
        .send()
        .await;

    match result {
        Ok(contents) => {
            let Some(item) = contents.items.into_iter().next() else {
                return Ok(None);
            };
            let content = item.decoded_content().ok_or_else(|| {
                GatewayError::permanent(format!("no content returned for {path} on {reference}"))
            })?;
            Ok(Some(FileSnapshot {
                path: path.to_string(),
                sha: Sha::new(item.sha),
                content,
            }))
        }
        Err(e) if is_not_found(&e) => Ok(None),
        Err(e) => Err(categorize(e)),
    }
}

// ─── Branch Lookup ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct BranchResponse {
    name: String,
    commit: BranchCommit,
}

#[derive(Debug, Deserialize)]
struct BranchCommit {
    sha: String,
}

async fn get_branch_once(
    client: &GithubClient,
    name: &str,
) -> Result<Option<BranchDescriptor>, GatewayError> {
    // Branch names can contain '/' (the pre-85 release naming scheme), so
    // the path segment must be percent-encoded.
    let route = format!(
        "/repos/{}/{}/branches/{}",
        client.owner(),
        client.repo_name(),
        urlencoding::encode(name)
    );

    let result: Result<BranchResponse, _> = client.inner().get(&route, None::<&()>).await;

    match result {
        Ok(branch) => Ok(Some(BranchDescriptor {
            name: branch.name,
            head_sha: Sha::new(branch.commit.sha),
        })),
        Err(e) if is_not_found(&e) => Ok(None),
        Err(e) => Err(categorize(e)),
    }
}

// ─── Ref Creation ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    full_ref: String,
    sha: &'a str,
}

async fn create_branch_once(
    client: &GithubClient,
    name: &str,
    at: &Sha,
) -> Result<(), GatewayError> {
    let route = format!(
        "/repos/{}/{}/git/refs",
        client.owner(),
        client.repo_name()
    );
    let request = CreateRefRequest {
        full_ref: format!("refs/heads/{name}"),
        sha: at.as_str(),
    };

    let result: Result<serde_json::Value, _> = client.inner().post(&route, Some(&request)).await;

    match result {
        Ok(_) => Ok(()),
        Err(e) => Err(categorize(e)),
    }
}

// ─── Contents Writes ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AuthorPayload<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    /// File content, base64-encoded as the contents API requires.
    content: String,
    branch: &'a str,
    /// Expected blob SHA; present only for updates. A stale value makes
    /// GitHub reject the write with 409.
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    author: AuthorPayload<'a>,
}

async fn put_contents_once(
    client: &GithubClient,
    path: &str,
    branch: &str,
    message: &str,
    content: &str,
    expected_sha: Option<&Sha>,
    author: &CommitAuthor,
) -> Result<(), GatewayError> {
    let route = format!(
        "/repos/{}/{}/contents/{}",
        client.owner(),
        client.repo_name(),
        path
    );
    let request = PutContentsRequest {
        message,
        content: BASE64.encode(content.as_bytes()),
        branch,
        sha: expected_sha.map(Sha::as_str),
        author: AuthorPayload {
            name: &author.name,
            email: &author.email,
        },
    };

    let result: Result<serde_json::Value, _> = client.inner().put(&route, Some(&request)).await;

    match result {
        Ok(_) => Ok(()),
        Err(e) => Err(categorize(e)),
    }
}

// ─── Pull Requests ────────────────────────────────────────────────────────────

async fn create_pull_request_once(
    client: &GithubClient,
    title: &str,
    body: &str,
    head: &str,
    base: &str,
) -> Result<PullRequestHandle, GatewayError> {
    let result = client
        .inner()
        .pulls(client.owner(), client.repo_name())
        .create(title, head, base)
        .body(body)
        .send()
        .await;

    match result {
        Ok(pr) => Ok(PullRequestHandle {
            number: PrNumber(pr.number),
            url: pr.html_url.map(|u| u.to_string()),
        }),
        Err(e) => Err(categorize(e)),
    }
}
