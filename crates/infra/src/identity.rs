use std::sync::RwLock;

use rightgate_core::UserId;
use rightgate_engine::IdentityProvider;

/// Programmable identity provider for tests/dev.
///
/// Models the external authentication component: whoever is set here is
/// "the session's authenticated user". Switch users or log out at any time
/// to simulate authentication transitions.
#[derive(Debug, Default)]
pub struct FixedIdentity {
    user: RwLock<Option<(UserId, String)>>,
}

impl FixedIdentity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn logged_in(user_id: UserId, login: impl Into<String>) -> Self {
        Self {
            user: RwLock::new(Some((user_id, login.into()))),
        }
    }

    /// Authenticate as the given user.
    pub fn log_in(&self, user_id: UserId, login: impl Into<String>) {
        if let Ok(mut user) = self.user.write() {
            *user = Some((user_id, login.into()));
        }
    }

    /// Drop the authenticated user.
    pub fn log_out(&self) {
        if let Ok(mut user) = self.user.write() {
            *user = None;
        }
    }
}

impl IdentityProvider for FixedIdentity {
    fn is_logged(&self) -> bool {
        self.user.read().map(|u| u.is_some()).unwrap_or(false)
    }

    fn user_id(&self) -> Option<UserId> {
        self.user.read().ok()?.as_ref().map(|(id, _)| *id)
    }

    fn user_login(&self) -> Option<String> {
        self.user.read().ok()?.as_ref().map(|(_, login)| login.clone())
    }
}
