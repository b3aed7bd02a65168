//! NotificationPermissions port - the platform permission prompt.
//!
//! The platform exposes two things: a prompt that asks the user once and
//! answers with a boolean, and a status that can be read at any time
//! without asking. The AuthorizationGate caches what it learns from both;
//! this port does no caching of its own.
//!
//! # Implementations
//! - the platform notification center in the app
//! - `impls::ScriptedPermissions` for tests and the demo binary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the platform currently reports for notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformAuthorization {
    /// The user was never asked.
    NotDetermined,
    Denied,
    Authorized,
}

/// The prompt could not be shown or did not answer.
///
/// The gate treats this like a denial: nothing is scheduled until the user
/// asks again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("permission prompt failed: {0}")]
pub struct PermissionError(pub String);

/// NotificationPermissions asks for, and reads, notification permission.
///
/// # Contract
/// - `request` may show UI and suspend until the user answers
/// - `current` never shows UI
/// - after a granted `request`, `current` reports `Authorized`
#[async_trait]
pub trait NotificationPermissions: Send + Sync {
    /// Show the permission prompt (alert, badge, sound). `Ok(true)` when granted.
    async fn request(&self) -> Result<bool, PermissionError>;

    /// Read the current permission without prompting.
    async fn current(&self) -> PlatformAuthorization;
}
