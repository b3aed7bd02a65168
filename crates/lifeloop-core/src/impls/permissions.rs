//! ScriptedPermissions - a permission prompt whose answers are set by the caller.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::ports::{NotificationPermissions, PermissionError, PlatformAuthorization};

/// What the fake user answers when prompted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAnswer {
    Grant,
    Deny,
    Fail(String),
}

/// Permission prompt backed by a script.
///
/// Granting or denying through the prompt also updates the platform status,
/// the way the OS remembers the user's choice. `revoke` simulates the user
/// turning notifications off in system settings.
pub struct ScriptedPermissions {
    answer: Mutex<PromptAnswer>,
    platform: Mutex<PlatformAuthorization>,
    prompts: AtomicUsize,
}

impl ScriptedPermissions {
    pub fn new(answer: PromptAnswer) -> Self {
        Self {
            answer: Mutex::new(answer),
            platform: Mutex::new(PlatformAuthorization::NotDetermined),
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn granting() -> Self {
        Self::new(PromptAnswer::Grant)
    }

    pub fn denying() -> Self {
        Self::new(PromptAnswer::Deny)
    }

    pub async fn set_answer(&self, answer: PromptAnswer) {
        *self.answer.lock().await = answer;
    }

    pub async fn set_platform(&self, status: PlatformAuthorization) {
        *self.platform.lock().await = status;
    }

    pub async fn revoke(&self) {
        self.set_platform(PlatformAuthorization::Denied).await;
    }

    /// Number of times the prompt was shown.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationPermissions for ScriptedPermissions {
    async fn request(&self) -> Result<bool, PermissionError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        let answer = self.answer.lock().await.clone();
        let mut platform = self.platform.lock().await;
        match answer {
            PromptAnswer::Grant => {
                *platform = PlatformAuthorization::Authorized;
                Ok(true)
            }
            PromptAnswer::Deny => {
                *platform = PlatformAuthorization::Denied;
                Ok(false)
            }
            PromptAnswer::Fail(reason) => Err(PermissionError(reason)),
        }
    }

    async fn current(&self) -> PlatformAuthorization {
        *self.platform.lock().await
    }
}
