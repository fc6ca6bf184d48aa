//! The sequential sync run.
//!
//! A run is a straight line: resolve the release branch, gate on beta,
//! load the manifest, snapshot both branches, diff, then stage and propose
//! the updates. Every gateway call is awaited in order; the remote content
//! SHAs are the only concurrency guard, so concurrent runs against the same
//! branch must be serialized externally.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::gateway::{BranchDescriptor, CommitAuthor, GatewayError, PullRequestHandle, RepoGateway};
use crate::manifest::{L10nManifest, MANIFEST_PATH};
use crate::release::{VERSION_FILE_PATH, is_beta_version, release_branch_name};

use super::plan::{ChangeSet, commit_message, pr_body, pr_title, working_branch_name};

/// The branch localized strings are synced from.
pub const MAIN_BRANCH_NAME: &str = "master";

/// Why a sync run failed.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The release branch for the requested version does not exist.
    #[error("release branch {name} not found")]
    BranchNotFound { name: String },

    /// A file that must exist (version descriptor, manifest) is missing.
    #[error("{path} not found on branch {branch}")]
    MissingFile { path: String, branch: String },

    /// The manifest references a path that does not exist on the main
    /// branch. This is an inconsistency in the source repository, not
    /// something to skip over.
    #[error("{path} is referenced by the release manifest but does not exist on {branch}")]
    MissingSourceFile { path: String, branch: String },

    /// The manifest fetched fine but is not valid TOML (or lacks the
    /// locales list).
    #[error("failed to parse {path}: {source}")]
    ManifestParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A gateway operation failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The release branch is no longer in beta; nothing was touched.
    NotBeta {
        release_branch: String,
        version: String,
    },

    /// Everything already matched; no branch or pull request was created.
    UpToDate { release_branch: String },

    /// Dry run: these paths would have been updated, but nothing was
    /// written.
    DryRun {
        release_branch: String,
        would_update: Vec<String>,
    },

    /// Updates were staged and proposed.
    Synced {
        release_branch: String,
        working_branch: String,
        pull_request: PullRequestHandle,
        updated_paths: Vec<String>,
    },
}

/// Syncs strings to the active Fenix beta release branch.
///
/// Resolves the release branch for `major_version`, verifies it is still in
/// beta, and hands over to [`sync_strings`]. A non-beta branch is a
/// successful no-op: released versions get string updates manually or not
/// at all.
pub async fn sync_fenix_strings<G: RepoGateway>(
    gateway: &G,
    major_version: u64,
    author: &CommitAuthor,
    dry_run: bool,
) -> Result<SyncOutcome, SyncError> {
    let branch_name = release_branch_name(major_version);
    let release_branch =
        gateway
            .get_branch(&branch_name)
            .await?
            .ok_or_else(|| SyncError::BranchNotFound {
                name: branch_name.clone(),
            })?;

    let version_file = gateway
        .get_file(VERSION_FILE_PATH, &release_branch.name)
        .await?
        .ok_or_else(|| SyncError::MissingFile {
            path: VERSION_FILE_PATH.to_string(),
            branch: release_branch.name.clone(),
        })?;

    if !is_beta_version(&version_file.content) {
        info!(
            branch = %release_branch.name,
            version = %version_file.content.trim(),
            "not syncing strings: branch is not in beta"
        );
        return Ok(SyncOutcome::NotBeta {
            release_branch: release_branch.name,
            version: version_file.content,
        });
    }

    sync_strings(
        gateway,
        &release_branch,
        "Fenix",
        major_version,
        author,
        dry_run,
    )
    .await
}

/// Syncs the manifest-listed string resources from the main branch to the
/// given release branch.
pub async fn sync_strings<G: RepoGateway>(
    gateway: &G,
    release_branch: &BranchDescriptor,
    product_name: &str,
    major_version: u64,
    author: &CommitAuthor,
    dry_run: bool,
) -> Result<SyncOutcome, SyncError> {
    info!(
        from = MAIN_BRANCH_NAME,
        to = %release_branch.name,
        "syncing strings"
    );

    // The manifest is authoritative for which locales ship, but it is not
    // itself part of the sync set.
    let manifest_file = gateway
        .get_file(MANIFEST_PATH, MAIN_BRANCH_NAME)
        .await?
        .ok_or_else(|| SyncError::MissingFile {
            path: MANIFEST_PATH.to_string(),
            branch: MAIN_BRANCH_NAME.to_string(),
        })?;
    let manifest =
        L10nManifest::parse(&manifest_file.content).map_err(|source| SyncError::ManifestParse {
            path: MANIFEST_PATH.to_string(),
            source,
        })?;

    let candidate_paths = manifest.candidate_paths();

    // Snapshot the main branch first: a manifest entry with no backing file
    // aborts the run before the release branch is even consulted.
    let mut sources = Vec::with_capacity(candidate_paths.len());
    for path in &candidate_paths {
        let snapshot = gateway.get_file(path, MAIN_BRANCH_NAME).await?.ok_or_else(|| {
            SyncError::MissingSourceFile {
                path: path.clone(),
                branch: MAIN_BRANCH_NAME.to_string(),
            }
        })?;
        sources.push(snapshot);
    }

    // On the release branch absence is fine: it just means the file is new
    // there.
    let mut pairs = Vec::with_capacity(sources.len());
    for source in sources {
        let destination = gateway.get_file(&source.path, &release_branch.name).await?;
        pairs.push((source, destination));
    }

    let changes = ChangeSet::compute(pairs);
    if changes.is_empty() {
        info!(branch = %release_branch.name, "strings already up to date");
        return Ok(SyncOutcome::UpToDate {
            release_branch: release_branch.name.clone(),
        });
    }

    for entry in changes.entries() {
        info!(
            path = %entry.path,
            action = if entry.is_creation() { "create" } else { "update" },
            "needs update"
        );
    }

    if dry_run {
        info!(
            count = changes.len(),
            "dry run: not creating a branch or pull request"
        );
        return Ok(SyncOutcome::DryRun {
            release_branch: release_branch.name.clone(),
            would_update: changes.paths(),
        });
    }

    let working_branch = working_branch_name(Utc::now().timestamp());
    gateway
        .create_branch(&working_branch, &release_branch.head_sha)
        .await?;
    info!(
        branch = %working_branch,
        at = %release_branch.head_sha,
        "created working branch"
    );

    match apply_and_propose(
        gateway,
        release_branch,
        product_name,
        major_version,
        author,
        &working_branch,
        &changes,
    )
    .await
    {
        Ok(pull_request) => {
            info!(
                pr = %pull_request.number,
                url = pull_request.url.as_deref().unwrap_or("<unknown>"),
                "created pull request"
            );
            Ok(SyncOutcome::Synced {
                release_branch: release_branch.name.clone(),
                working_branch,
                pull_request,
                updated_paths: changes.paths(),
            })
        }
        Err(e) => {
            // No compensating cleanup: deleting the ref could fail halfway
            // too. Name it so a human can.
            warn!(
                branch = %working_branch,
                "run failed after branch creation; the working branch is left for manual cleanup"
            );
            Err(e)
        }
    }
}

/// Applies the change set on the working branch and opens the pull request.
async fn apply_and_propose<G: RepoGateway>(
    gateway: &G,
    release_branch: &BranchDescriptor,
    product_name: &str,
    major_version: u64,
    author: &CommitAuthor,
    working_branch: &str,
    changes: &ChangeSet,
) -> Result<PullRequestHandle, SyncError> {
    for entry in changes.entries() {
        let message = commit_message(&entry.path);
        match &entry.destination {
            Some(destination) => {
                info!(path = %entry.path, "updating");
                gateway
                    .update_file(
                        &entry.path,
                        working_branch,
                        &message,
                        &entry.source.content,
                        &destination.sha,
                        author,
                    )
                    .await?;
            }
            None => {
                info!(path = %entry.path, "creating");
                gateway
                    .create_file(
                        &entry.path,
                        working_branch,
                        &message,
                        &entry.source.content,
                        author,
                    )
                    .await?;
            }
        }
    }

    let pull_request = gateway
        .create_pull_request(
            &pr_title(product_name, major_version),
            &pr_body(
                product_name,
                MAIN_BRANCH_NAME,
                &release_branch.name,
                changes,
            ),
            working_branch,
            &release_branch.name,
        )
        .await?;

    Ok(pull_request)
}
