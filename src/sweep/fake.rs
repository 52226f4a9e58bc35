// In-memory WebhookApi used by the sweep tests.
//
// Activations flip the stored hook to active, so a second sweep over the
// same fake sees the state the first one left behind.

use crate::github::{GithubError, Hook, WebhookApi};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListOrgRepos(String),
    ListOrgHooks(String),
    ActivateOrgHook(String, u64),
    ListRepoHooks(String, String),
    ActivateRepoHook(String, String, u64),
}

#[derive(Default)]
struct State {
    org_hooks: HashMap<String, Vec<Hook>>,
    repos: HashMap<String, Vec<String>>,
    repo_hooks: HashMap<(String, String), Vec<Hook>>,
    failing_hooks: HashSet<u64>,
    failing_repo_listings: HashSet<String>,
    failing_hook_listings: HashSet<String>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

fn api_error(status: u16, message: &str) -> GithubError {
    GithubError::Api {
        status,
        message: message.to_string(),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_org_hooks(self, org: &str, hooks: &[(u64, bool)]) -> Self {
        self.state.lock().unwrap().org_hooks.insert(
            org.to_string(),
            hooks.iter().map(|&(id, active)| Hook { id, active }).collect(),
        );
        self
    }

    pub fn with_repo(self, org: &str, repo: &str, hooks: &[(u64, bool)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state
                .repos
                .entry(org.to_string())
                .or_default()
                .push(repo.to_string());
            state.repo_hooks.insert(
                (org.to_string(), repo.to_string()),
                hooks.iter().map(|&(id, active)| Hook { id, active }).collect(),
            );
        }
        self
    }

    /// Activation of this hook id fails wherever it appears
    pub fn failing_activation(self, hook_id: u64) -> Self {
        self.state.lock().unwrap().failing_hooks.insert(hook_id);
        self
    }

    pub fn failing_repo_listing(self, org: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_repo_listings
            .insert(org.to_string());
        self
    }

    /// `scope` is either an org name or `owner/repo`
    pub fn failing_hook_listing(self, scope: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_hook_listings
            .insert(scope.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn activation_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::ActivateOrgHook(..) | Call::ActivateRepoHook(..)))
            .collect()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.state.lock().unwrap().calls)
    }
}

fn set_active(hooks: Option<&mut Vec<Hook>>, hook_id: u64) {
    if let Some(hook) = hooks.and_then(|h| h.iter_mut().find(|h| h.id == hook_id)) {
        hook.active = true;
    }
}

#[async_trait]
impl WebhookApi for FakeApi {
    async fn list_org_repos(&self, org: &str) -> Result<Vec<String>, GithubError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListOrgRepos(org.to_string()));
        if state.failing_repo_listings.contains(org) {
            return Err(api_error(500, "repository listing failed"));
        }
        Ok(state.repos.get(org).cloned().unwrap_or_default())
    }

    async fn list_org_hooks(&self, org: &str) -> Result<Vec<Hook>, GithubError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListOrgHooks(org.to_string()));
        if state.failing_hook_listings.contains(org) {
            return Err(api_error(404, "Not Found"));
        }
        Ok(state.org_hooks.get(org).cloned().unwrap_or_default())
    }

    async fn activate_org_hook(&self, org: &str, hook_id: u64) -> Result<(), GithubError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ActivateOrgHook(org.to_string(), hook_id));
        if state.failing_hooks.contains(&hook_id) {
            return Err(api_error(422, "Validation Failed"));
        }
        set_active(state.org_hooks.get_mut(org), hook_id);
        Ok(())
    }

    async fn list_repo_hooks(&self, owner: &str, repo: &str) -> Result<Vec<Hook>, GithubError> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::ListRepoHooks(owner.to_string(), repo.to_string()));
        if state
            .failing_hook_listings
            .contains(&format!("{}/{}", owner, repo))
        {
            return Err(api_error(404, "Not Found"));
        }
        Ok(state
            .repo_hooks
            .get(&(owner.to_string(), repo.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn activate_repo_hook(
        &self,
        owner: &str,
        repo: &str,
        hook_id: u64,
    ) -> Result<(), GithubError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ActivateRepoHook(
            owner.to_string(),
            repo.to_string(),
            hook_id,
        ));
        if state.failing_hooks.contains(&hook_id) {
            return Err(api_error(422, "Validation Failed"));
        }
        set_active(
            state
                .repo_hooks
                .get_mut(&(owner.to_string(), repo.to_string())),
            hook_id,
        );
        Ok(())
    }
}
