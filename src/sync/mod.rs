//! The string synchronization orchestrator.
//!
//! One run mirrors the localized resources listed by the main branch's
//! manifest onto a beta release branch, staging the updates on an ephemeral
//! working branch and proposing them as a pull request.
//!
//! - [`plan`]: pure planning — change set computation, branch and commit
//!   naming, pull request text
//! - [`run`]: the sequential run itself, generic over the gateway

pub mod plan;
pub mod run;


pub use plan::{ChangeEntry, ChangeSet};
pub use run::{MAIN_BRANCH_NAME, SyncError, SyncOutcome, sync_fenix_strings, sync_strings};
