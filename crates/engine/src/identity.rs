use std::sync::Arc;

use rightgate_core::UserId;

/// The authenticated identity attached to a session.
///
/// This is the boundary to the external authentication component. The
/// engine only ever asks three questions: is someone logged in, who are
/// they, and what should log records call them.
pub trait IdentityProvider: Send + Sync {
    /// Whether a user is currently authenticated in this session.
    fn is_logged(&self) -> bool;

    /// The authenticated user's identifier, if any.
    fn user_id(&self) -> Option<UserId>;

    /// Display name for log records, if any.
    fn user_login(&self) -> Option<String>;
}

impl<P> IdentityProvider for Arc<P>
where
    P: IdentityProvider + ?Sized,
{
    fn is_logged(&self) -> bool {
        (**self).is_logged()
    }

    fn user_id(&self) -> Option<UserId> {
        (**self).user_id()
    }

    fn user_login(&self) -> Option<String> {
        (**self).user_login()
    }
}
