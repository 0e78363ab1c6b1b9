pub mod git;
pub mod linear;

use crate::data::{Issue, Organization, Priority, State, Viewer};
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::time::Duration;

pub use linear::LinearClient;

/// Shared HTTP client for all API requests to enable connection pooling
pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(5)
        .build()
        .expect("Failed to create HTTP client")
});

/// Remote issue tracker operations used by the session and the hand-off.
///
/// Every call either returns typed data or an error; nothing is partially applied.
#[async_trait]
pub trait Tracker: Send + Sync {
    async fn viewer(&self) -> Result<Viewer>;

    /// Team workflow states in the order the tracker returns them.
    async fn team_states(&self, team_id: &str) -> Result<Vec<State>>;

    async fn my_issues(&self, team_id: &str) -> Result<Vec<Issue>>;

    async fn all_team_issues(&self, team_id: &str) -> Result<Vec<Issue>>;

    /// The issue with comments and attachments populated.
    async fn issue_with_context(&self, issue_id: &str) -> Result<Issue>;

    async fn create_comment(&self, issue_id: &str, body: &str) -> Result<()>;

    async fn update_title(&self, issue_id: &str, title: &str) -> Result<()>;

    async fn update_priority(&self, issue_id: &str, priority: Priority) -> Result<()>;

    async fn update_state(&self, issue_id: &str, state_id: &str) -> Result<()>;

    async fn organization(&self) -> Result<Organization> {
        Ok(self.viewer().await?.organization)
    }
}
