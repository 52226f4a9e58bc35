// GitHub REST payloads
//
// Only the fields the sweep needs are deserialized; serde ignores the rest
// of the upstream resource.

use serde::{Deserialize, Serialize};

/// Webhook descriptor, projected from an org or repo hook resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    pub id: u64,
    pub active: bool,
}

/// Repository listing entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name: String,
}

/// Body of a hook update that turns the hook on
#[derive(Debug, Serialize)]
pub(crate) struct ActivateHook {
    pub active: bool,
}

impl ActivateHook {
    pub(crate) fn new() -> Self {
        Self { active: true }
    }
}

/// Response of `POST /app/installations/{id}/access_tokens`
#[derive(Debug, Deserialize)]
pub(crate) struct InstallationToken {
    pub token: String,
}

/// Error body GitHub returns alongside 4xx/5xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
