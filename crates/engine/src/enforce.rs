//! Enforcement on top of the decision engine.
//!
//! The engine itself only answers yes/no; this layer turns a "no" into the
//! denial policy: one audit log record, the registered denial actions, and
//! a redirect instruction for the request-handling layer.

use rightgate_core::Scope;

use crate::engine::RightsService;
use crate::error::RightsResult;
use crate::session::SessionContext;

/// Zero-argument side-effecting hook run on denial, in registration order.
pub type DenialAction = Box<dyn Fn() + Send + Sync>;

/// Outcome of an enforcement check.
///
/// Denial carries the redirect instruction; the caller decides how to
/// terminate the request. The engine never halts control flow itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(RedirectTarget),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }
}

/// Where to send a denied request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    location: String,
}

impl RedirectTarget {
    /// The redirect destination: the configured error page plus the
    /// originally requested URL under the configured parameter name.
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl core::fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.location)
    }
}

impl RightsService {
    /// Enforce `right` for the session's current user.
    ///
    /// Returns [`Access::Allowed`] with no side effects when the right
    /// holds. On denial: emits exactly one info-level audit record naming
    /// the denied user, right and scope, runs the registered denial actions
    /// in order, then returns [`Access::Denied`] with the redirect target
    /// carrying `requested_url` percent-encoded for post-redirect
    /// continuation.
    pub fn redirect_not_authorized(
        &self,
        ctx: &mut SessionContext,
        right: &str,
        scope: Option<&Scope>,
        requested_url: &str,
    ) -> RightsResult<Access> {
        if self.is_allowed(ctx, right, scope)? {
            return Ok(Access::Allowed);
        }

        let user = ctx
            .identity()
            .user_login()
            .unwrap_or_else(|| "<anonymous>".to_string());
        match scope {
            None => {
                tracing::info!(%user, right, "access denied: user does not have the right");
            }
            Some(scope) => {
                tracing::info!(
                    %user,
                    right,
                    %scope,
                    "access denied: user does not have the right on the required scope",
                );
            }
        }

        for action in &self.denial_actions {
            action();
        }

        Ok(Access::Denied(self.redirect_target(requested_url)))
    }

    fn redirect_target(&self, requested_url: &str) -> RedirectTarget {
        let location = format!(
            "{}?{}={}",
            self.config.error_page_url(),
            self.config.redirect_parameter(),
            urlencoding::encode(requested_url),
        );
        RedirectTarget { location }
    }
}
