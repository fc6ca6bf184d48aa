//! The remote repository gateway.
//!
//! Everything the synchronizer needs from the hosting platform is expressed
//! as six operations on this trait, with typed result values. Absence is a
//! domain signal, not an error: lookups return `Ok(None)` for a missing
//! branch or file, so callers can never mistake a transport failure for
//! legitimate absence (or vice versa).
//!
//! The production implementation lives in [`crate::github`]; tests use mock
//! implementations with scripted contents.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PrNumber, Sha};

/// The state of a file on a branch at the moment it was fetched.
///
/// Two snapshots hold the same content iff their SHAs match; the SHA doubles
/// as the expected-current-state token for optimistic-concurrency updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSnapshot {
    /// Repository-relative path.
    pub path: String,
    /// Blob SHA of the content.
    pub sha: Sha,
    /// Decoded file content.
    pub content: String,
}

/// A branch and its current head commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchDescriptor {
    pub name: String,
    pub head_sha: Sha,
}

/// Handle to a pull request created by this tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestHandle {
    pub number: PrNumber,
    /// Browser URL, when the host reports one.
    pub url: Option<String>,
}

/// The identity commits are attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

impl CommitAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        CommitAuthor {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// How a gateway operation failed, categorized for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Safe to retry with backoff: 5xx, rate limits, network failures.
    Transient,

    /// Requires human intervention: auth failures, most 4xx responses,
    /// malformed requests.
    Permanent,

    /// The expected-current-state token was stale: the file changed on the
    /// remote between snapshot and write. Retrying with the same token
    /// would fail again, so this propagates as a run failure.
    Conflict,
}

impl GatewayErrorKind {
    /// Whether a plain retry can help.
    ///
    /// `Conflict` returns false: the write needs a fresh snapshot, not a
    /// repeat of the same request.
    pub fn is_retriable(&self) -> bool {
        matches!(self, GatewayErrorKind::Transient)
    }
}

/// A failed gateway operation.
#[derive(Debug, Error)]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    /// HTTP status, if one was observed.
    pub status_code: Option<u16>,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "gateway error (HTTP {}): {}", code, self.message),
            None => write!(f, "gateway error: {}", self.message),
        }
    }
}

impl GatewayError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::without_source(GatewayErrorKind::Transient, message)
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self::without_source(GatewayErrorKind::Permanent, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::without_source(GatewayErrorKind::Conflict, message)
    }

    fn without_source(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        GatewayError {
            kind,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn is_retriable(&self) -> bool {
        self.kind.is_retriable()
    }
}

/// The six operations the synchronizer performs against the remote host.
///
/// Implementations are scoped to a single repository; paths and branch
/// names are repository-relative.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct MockGateway {
///     files: HashMap<(String, String), FileSnapshot>,
/// }
///
/// impl RepoGateway for MockGateway {
///     async fn get_file(&self, path: &str, reference: &str)
///         -> Result<Option<FileSnapshot>, GatewayError>
///     {
///         Ok(self.files.get(&(reference.into(), path.into())).cloned())
///     }
///     // ...
/// }
/// ```
pub trait RepoGateway {
    /// Fetches a file snapshot at `path` on `reference`, or `None` if the
    /// path does not exist there.
    fn get_file(
        &self,
        path: &str,
        reference: &str,
    ) -> impl Future<Output = Result<Option<FileSnapshot>, GatewayError>> + Send;

    /// Fetches a branch descriptor by name, or `None` if the branch does
    /// not exist.
    fn get_branch(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<BranchDescriptor>, GatewayError>> + Send;

    /// Creates a branch pointing at the given commit.
    fn create_branch(
        &self,
        name: &str,
        at: &Sha,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Creates a file that does not yet exist on `branch`.
    fn create_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        content: &str,
        author: &CommitAuthor,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Overwrites an existing file on `branch`.
    ///
    /// `expected_sha` is the blob SHA the file is believed to have; the
    /// write fails with [`GatewayErrorKind::Conflict`] if the file changed
    /// since that snapshot was taken.
    fn update_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        content: &str,
        expected_sha: &Sha,
        author: &CommitAuthor,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Opens a pull request from `head` into `base`.
    fn create_pull_request(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> impl Future<Output = Result<PullRequestHandle, GatewayError>> + Send;
}
