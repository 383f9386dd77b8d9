//! Authentication lifecycle integration.

use crate::engine::RightsService;
use crate::error::RightsResult;
use crate::session::SessionContext;

/// Authentication transition relevant to the rights cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// A log-in just completed for this session.
    LoginCompleted,
    /// The session's current user is about to log out.
    LogoutStarting,
}

/// Observer for authentication lifecycle transitions.
///
/// The external authentication component delivers an event at each
/// login/logout boundary. Handling them keeps the cross-session-safety
/// invariant: a session cache never serves a previous user's rights past
/// such a boundary.
pub trait AuthListener: Send + Sync {
    fn on_auth_event(&self, ctx: &mut SessionContext, event: AuthEvent) -> RightsResult<()>;
}

impl AuthListener for RightsService {
    fn on_auth_event(&self, ctx: &mut SessionContext, event: AuthEvent) -> RightsResult<()> {
        match event {
            // Eager refresh for the newly authenticated user. Flushing
            // first means an identity provider that reports nobody logged
            // in still cannot leave stale rights behind.
            AuthEvent::LoginCompleted => self.refresh(ctx),
            AuthEvent::LogoutStarting => self.flush_rights_cache(ctx),
        }
    }
}
