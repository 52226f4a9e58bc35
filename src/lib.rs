//! Webhook Activator Library
//!
//! This library provides the pieces behind the `webhook-activator` binary:
//! configuration and credential resolution, a GitHub REST client, and the
//! sweep that re-activates disabled organization and repository webhooks.

pub mod config;
pub mod github;
pub mod sweep;

pub use config::{Config, ResolvedConfig};
pub use sweep::{run, SweepOutcome, SweepStatus};
