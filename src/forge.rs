//! GitHub access for the label and release automation.
//!
//! Every operation goes straight to the API: label sets, branch tips and
//! the open release pull request are re-read right before they are
//! mutated, and absence is reported as [`types::Lookup::NotFound`] rather
//! than as an error.

/// Connection configuration and API constants.
pub mod config;

/// GitHub API client implementation.
pub mod github;

/// Forge trait consumed by the label and release logic.
pub mod traits;

/// Normalized entities and request types.
pub mod types;
