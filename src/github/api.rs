//! Webhook API abstraction
//!
//! The sweep only talks to GitHub through this trait, which lets tests
//! drive it with an in-memory fake instead of a live API.

use crate::github::error::Result;
use crate::github::types::Hook;
use async_trait::async_trait;

/// Operations the activation sweep needs from the hosting API
#[async_trait]
pub trait WebhookApi: Send + Sync {
    /// List repository names owned by `org`
    async fn list_org_repos(&self, org: &str) -> Result<Vec<String>>;

    /// List organization-level webhooks of `org`
    async fn list_org_hooks(&self, org: &str) -> Result<Vec<Hook>>;

    /// Set `active = true` on an organization webhook
    async fn activate_org_hook(&self, org: &str, hook_id: u64) -> Result<()>;

    /// List webhooks of `owner/repo`
    async fn list_repo_hooks(&self, owner: &str, repo: &str) -> Result<Vec<Hook>>;

    /// Set `active = true` on a repository webhook
    async fn activate_repo_hook(&self, owner: &str, repo: &str, hook_id: u64) -> Result<()>;
}
