//! Webhook Activation Sweep
//!
//! Walks every configured organization, turning on disabled webhooks at
//! organization scope first and then in each of the organization's
//! repositories.
//!
//! Everything runs strictly in sequence: each API call is awaited before the
//! next one is issued. Failed activations are recorded and the sweep moves
//! on. A failed listing call stops the sweep; the failures gathered up to
//! that point are still returned in the [`SweepOutcome`].

use crate::github::{GithubError, Hook, WebhookApi};
use std::fmt;
use tracing::{error, info};

/// Where a webhook lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookTarget {
    Org { org: String },
    Repo { owner: String, repo: String },
}

impl HookTarget {
    pub fn org(org: impl Into<String>) -> Self {
        HookTarget::Org { org: org.into() }
    }

    pub fn repo(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        HookTarget::Repo {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    async fn list<A: WebhookApi + ?Sized>(&self, api: &A) -> Result<Vec<Hook>, GithubError> {
        match self {
            HookTarget::Org { org } => api.list_org_hooks(org).await,
            HookTarget::Repo { owner, repo } => api.list_repo_hooks(owner, repo).await,
        }
    }

    async fn activate<A: WebhookApi + ?Sized>(
        &self,
        api: &A,
        hook_id: u64,
    ) -> Result<(), GithubError> {
        match self {
            HookTarget::Org { org } => api.activate_org_hook(org, hook_id).await,
            HookTarget::Repo { owner, repo } => {
                api.activate_repo_hook(owner, repo, hook_id).await
            }
        }
    }
}

impl fmt::Display for HookTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookTarget::Org { org } => write!(f, "org \"{}\"", org),
            HookTarget::Repo { owner, repo } => write!(f, "\"{}/{}\"", owner, repo),
        }
    }
}

/// A webhook whose activation call returned an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationFailure {
    pub target: HookTarget,
    pub hook_id: u64,
    pub error: String,
}

impl fmt::Display for ActivationFailure {
    /// `Org hook {org}:{id}` or `Repo hook {org}/{repo}:{id}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            HookTarget::Org { org } => write!(f, "Org hook {}:{}", org, self.hook_id),
            HookTarget::Repo { owner, repo } => {
                write!(f, "Repo hook {}/{}:{}", owner, repo, self.hook_id)
            }
        }
    }
}

/// Listing failure that stopped the sweep
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Failed to list webhooks for {target}: {source}")]
    ListHooks {
        target: HookTarget,
        source: GithubError,
    },

    #[error("Failed to list repositories for org \"{org}\": {source}")]
    ListRepos { org: String, source: GithubError },
}

/// Overall result of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStatus {
    /// Every inactive webhook was activated
    Complete,
    /// The sweep finished but some activations failed
    Partial,
    /// A listing call failed and the sweep stopped early
    Aborted,
}

/// Everything a sweep produced
#[derive(Debug, Default)]
pub struct SweepOutcome {
    /// Failed activations, in the order they happened
    pub failures: Vec<ActivationFailure>,

    /// Successful activation calls
    pub activated: usize,

    /// Webhooks that were already active
    pub skipped: usize,

    /// Repositories whose webhooks were processed
    pub repositories: usize,

    /// Set when a listing call stopped the sweep
    pub aborted: Option<SweepError>,
}

impl SweepOutcome {
    pub fn status(&self) -> SweepStatus {
        if self.aborted.is_some() {
            SweepStatus::Aborted
        } else if self.failures.is_empty() {
            SweepStatus::Complete
        } else {
            SweepStatus::Partial
        }
    }

    /// Failure records in their printed form
    pub fn failure_records(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }

    /// Digest of failed activations, `None` when there were none
    pub fn failure_report(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }

        let mut report = String::from("Failed to activate webhooks:");
        for failure in &self.failures {
            report.push_str("\n\t");
            report.push_str(&failure.to_string());
        }
        Some(report)
    }
}

/// Activate every inactive webhook of `organizations` and their repositories
pub async fn run<A: WebhookApi + ?Sized>(api: &A, organizations: &[String]) -> SweepOutcome {
    let mut outcome = SweepOutcome::default();

    for org in organizations {
        if let Err(err) = sweep_org(api, org, &mut outcome).await {
            error!("{}", err);
            outcome.aborted = Some(err);
            break;
        }
    }

    info!(
        "Sweep finished: {} activated, {} skipped, {} failed, {} repositories",
        outcome.activated,
        outcome.skipped,
        outcome.failures.len(),
        outcome.repositories
    );
    outcome
}

async fn sweep_org<A: WebhookApi + ?Sized>(
    api: &A,
    org: &str,
    outcome: &mut SweepOutcome,
) -> Result<(), SweepError> {
    info!("Activating webhooks for org \"{}\"", org);
    activate_all(api, HookTarget::org(org), outcome).await?;

    let repos = api
        .list_org_repos(org)
        .await
        .map_err(|source| SweepError::ListRepos {
            org: org.to_string(),
            source,
        })?;

    info!("Processing repo webhooks for org \"{}\" ({} repositories)", org, repos.len());
    for repo in repos {
        info!("Activating webhooks for repo \"{}/{}\"", org, repo);
        activate_all(api, HookTarget::repo(org, repo), outcome).await?;
        outcome.repositories += 1;
    }

    Ok(())
}

async fn activate_all<A: WebhookApi + ?Sized>(
    api: &A,
    target: HookTarget,
    outcome: &mut SweepOutcome,
) -> Result<(), SweepError> {
    let listed = target.list(api).await;
    let hooks = match listed {
        Ok(hooks) => hooks,
        Err(source) => return Err(SweepError::ListHooks { target, source }),
    };

    for hook in hooks {
        if hook.active {
            info!(
                "Skipping webhook \"{}\" for {} (already active)",
                hook.id, target
            );
            outcome.skipped += 1;
            continue;
        }

        info!("Activating webhook \"{}\" for {}", hook.id, target);
        match target.activate(api, hook.id).await {
            Ok(()) => outcome.activated += 1,
            Err(err) => {
                error!("ERROR: {}", err);
                outcome.failures.push(ActivationFailure {
                    target: target.clone(),
                    hook_id: hook.id,
                    error: err.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod fake;


#[cfg(test)]
mod proptests;
