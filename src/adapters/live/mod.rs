//! Live adapters for real external interactions.

pub mod github;
pub mod jira;

pub use github::GithubHost;
pub use jira::JiraTracker;
