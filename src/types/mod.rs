//! Domain types shared across the crate.

mod ids;

pub use ids::{PrNumber, RepoId, Sha};
