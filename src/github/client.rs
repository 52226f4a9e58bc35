//! GitHub REST client
//!
//! Thin `reqwest` wrapper over the handful of endpoints the sweep uses.
//! Every request carries the pinned API version header and a bearer
//! token. Listing calls issue a single request and accept whatever page
//! GitHub returns.
//!
//! # Example
//!
//! ```ignore
//! use webhook_activator::github::{ClientOptions, Credentials, GithubClient};
//!
//! let client = GithubClient::connect(
//!     "https://api.github.com",
//!     &Credentials::Token("ghp_...".to_string()),
//!     &ClientOptions::default(),
//! )
//! .await?;
//! let hooks = client.list_org_hooks("acme").await?;
//! ```

use crate::github::api::WebhookApi;
use crate::github::auth::{app_jwt, Credentials};
use crate::github::error::{GithubError, Result};
use crate::github::types::{ActivateHook, ApiErrorBody, Hook, InstallationToken, Repository};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST API revision every request is pinned to
pub const API_VERSION: &str = "2022-11-28";

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

/// HTTP settings for the client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout
    pub timeout: Duration,

    /// GitHub rejects requests without a User-Agent
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("webhook-activator/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Authenticated GitHub REST client
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GithubClient {
    /// Build a client, exchanging app credentials for an installation token if needed
    pub async fn connect(
        base_url: &str,
        credentials: &Credentials,
        options: &ClientOptions,
    ) -> Result<Self> {
        let http = build_http(options)?;
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(GithubError::InvalidUrl(base_url));
        }

        let token = match credentials {
            Credentials::Token(token) => token.clone(),
            Credentials::App {
                app_id,
                private_key,
                installation_id,
            } => {
                info!(
                    "Requesting installation token for app {} (installation {})",
                    app_id, installation_id
                );
                let jwt = app_jwt(app_id, private_key)?;
                let url = format!(
                    "{}/app/installations/{}/access_tokens",
                    base_url, installation_id
                );
                let response: InstallationToken =
                    read_json(http.post(&url).bearer_auth(jwt)).await?;
                response.token
            }
        };

        debug!("GitHub client ready for {} using {}", base_url, credentials.kind());

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// API base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        self.http.request(method, url).bearer_auth(&self.token)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        read_json(self.request(Method::GET, path)).await
    }

    async fn activate(&self, path: &str) -> Result<()> {
        let request = self.request(Method::PATCH, path).json(&ActivateHook::new());
        let response = request.send().await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl WebhookApi for GithubClient {
    async fn list_org_repos(&self, org: &str) -> Result<Vec<String>> {
        let repos: Vec<Repository> = self.get(&format!("/orgs/{}/repos", org)).await?;
        Ok(repos.into_iter().map(|r| r.name).collect())
    }

    async fn list_org_hooks(&self, org: &str) -> Result<Vec<Hook>> {
        self.get(&format!("/orgs/{}/hooks", org)).await
    }

    async fn activate_org_hook(&self, org: &str, hook_id: u64) -> Result<()> {
        self.activate(&format!("/orgs/{}/hooks/{}", org, hook_id))
            .await
    }

    async fn list_repo_hooks(&self, owner: &str, repo: &str) -> Result<Vec<Hook>> {
        self.get(&format!("/repos/{}/{}/hooks", owner, repo)).await
    }

    async fn activate_repo_hook(&self, owner: &str, repo: &str, hook_id: u64) -> Result<()> {
        self.activate(&format!("/repos/{}/{}/hooks/{}", owner, repo, hook_id))
            .await
    }
}

fn build_http(options: &ClientOptions) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_JSON));
    headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

    let client = reqwest::Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .default_headers(headers)
        .build()?;
    Ok(client)
}

async fn read_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = check_status(request.send().await?).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Turn non-2xx responses into `GithubError::Api`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body
            }
        });

    Err(GithubError::Api {
        status: status.as_u16(),
        message,
    })
}
