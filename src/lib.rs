//! strsync - keeps localized string resources on beta release branches in
//! sync with the main development branch.
//!
//! This library provides the synchronization logic and the repository
//! gateway it runs against; the binary in `main.rs` wires them to GitHub.

pub mod config;
pub mod gateway;
pub mod github;
pub mod locale;
pub mod manifest;
pub mod release;
pub mod sync;
pub mod types;
