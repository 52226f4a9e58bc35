//! GitHub REST API access
//!
//! # Architecture
//!
//! 1. **Types** (`types`): projections of the hook and repository resources
//! 2. **Auth** (`auth`): token and GitHub App credentials
//! 3. **Api** (`api`): the `WebhookApi` trait the sweep is written against
//! 4. **Client** (`client`): `reqwest` implementation of `WebhookApi`

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use api::WebhookApi;
pub use auth::Credentials;
pub use client::{ClientOptions, GithubClient, API_VERSION, DEFAULT_API_URL};
pub use error::GithubError;
pub use types::{Hook, Repository};
