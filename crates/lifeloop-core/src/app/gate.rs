//! AuthorizationGate - tracks whether reminders may be delivered at all.
//!
//! # States
//! - `Unknown`: process start, nothing asked or learned yet
//! - `Authorized`: prompt granted (or platform already reported it)
//! - `Denied`: prompt declined, prompt failed, or permission revoked
//!
//! # Transitions
//! - `request_authorization` (explicit user action) prompts unless already
//!   `Authorized`
//! - `authorize_for_scheduling` (engine path) prompts at most once per
//!   process and only while `Unknown`; never loops
//! - `refresh_status` adopts the platform status from `Unknown`, can move
//!   `Authorized -> Denied`, and never re-grants

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::ports::{NotificationPermissions, PlatformAuthorization};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationState {
    Unknown,
    Authorized,
    Denied,
}

struct GateState {
    state: AuthorizationState,
    auto_prompted: bool,
}

pub struct AuthorizationGate {
    permissions: Arc<dyn NotificationPermissions>,
    auto_prompt: bool,
    // Held across the prompt so concurrent callers never double-prompt.
    inner: Mutex<GateState>,
}

impl AuthorizationGate {
    pub fn new(permissions: Arc<dyn NotificationPermissions>) -> Self {
        Self {
            permissions,
            auto_prompt: true,
            inner: Mutex::new(GateState {
                state: AuthorizationState::Unknown,
                auto_prompted: false,
            }),
        }
    }

    /// Disable the engine-initiated prompt; only explicit requests prompt.
    pub fn without_auto_prompt(mut self) -> Self {
        self.auto_prompt = false;
        self
    }

    pub async fn state(&self) -> AuthorizationState {
        self.inner.lock().await.state
    }

    /// Prompt on behalf of an explicit user action.
    pub async fn request_authorization(&self) -> AuthorizationState {
        let mut inner = self.inner.lock().await;
        if inner.state == AuthorizationState::Authorized {
            return inner.state;
        }
        inner.state = self.prompt().await;
        inner.state
    }

    /// Whether the engine may schedule right now. While `Unknown`, prompts
    /// once per process lifetime; afterwards answers from the cached state.
    pub async fn authorize_for_scheduling(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.state == AuthorizationState::Unknown && self.auto_prompt && !inner.auto_prompted {
            inner.auto_prompted = true;
            inner.state = self.prompt().await;
        }
        inner.state == AuthorizationState::Authorized
    }

    /// Re-validate against the platform (e.g. on app activation).
    pub async fn refresh_status(&self) -> AuthorizationState {
        let platform = self.permissions.current().await;
        let mut inner = self.inner.lock().await;
        let next = match (inner.state, platform) {
            (AuthorizationState::Unknown, PlatformAuthorization::Authorized) => {
                AuthorizationState::Authorized
            }
            (AuthorizationState::Unknown, PlatformAuthorization::Denied) => {
                AuthorizationState::Denied
            }
            (AuthorizationState::Unknown, PlatformAuthorization::NotDetermined) => {
                AuthorizationState::Unknown
            }
            (AuthorizationState::Authorized, PlatformAuthorization::Authorized) => {
                AuthorizationState::Authorized
            }
            (AuthorizationState::Authorized, _) => AuthorizationState::Denied,
            // sticky until the user asks again
            (AuthorizationState::Denied, _) => AuthorizationState::Denied,
        };
        if next != inner.state {
            tracing::info!(from = ?inner.state, to = ?next, "notification authorization changed");
        }
        inner.state = next;
        next
    }

    async fn prompt(&self) -> AuthorizationState {
        match self.permissions.request().await {
            Ok(true) => {
                tracing::info!("notification authorization granted");
                AuthorizationState::Authorized
            }
            Ok(false) => {
                tracing::info!("notification authorization denied");
                AuthorizationState::Denied
            }
            Err(e) => {
                tracing::warn!(error = %e, "notification authorization prompt failed");
                AuthorizationState::Denied
            }
        }
    }
}
