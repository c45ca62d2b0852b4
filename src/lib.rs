pub mod cli;
pub mod command;
pub mod config;
pub mod credentials;
pub mod error;
pub mod forge;
pub mod jira;
pub mod labels;
pub mod release;
pub mod report;
pub mod slack;

pub use error::{Result, StewardError};

#[cfg(test)]
pub mod test_helpers;
