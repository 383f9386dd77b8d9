use std::sync::Arc;

use rightgate_core::{RightName, Scope};

use crate::engine::RightsService;
use crate::error::RightsResult;
use crate::session::SessionContext;

/// A boolean guard evaluated against a session.
///
/// For composition with generic conditional/guard frameworks: anything that
/// can answer "does this hold for the current session?" fits behind it.
pub trait Condition: Send + Sync {
    fn is_ok(&self, ctx: &mut SessionContext) -> RightsResult<bool>;
}

/// Condition that holds iff the session's user has a fixed right.
///
/// Wraps a (right name, optional scope) pair chosen at construction time
/// behind the [`Condition`] predicate.
pub struct RightCondition {
    service: Arc<RightsService>,
    right: RightName,
    scope: Option<Scope>,
}

impl RightCondition {
    pub fn new(service: Arc<RightsService>, right: impl Into<RightName>) -> Self {
        Self {
            service,
            right: right.into(),
            scope: None,
        }
    }

    /// Restrict the condition to a scope.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }
}

impl Condition for RightCondition {
    fn is_ok(&self, ctx: &mut SessionContext) -> RightsResult<bool> {
        self.service
            .is_allowed(ctx, self.right.as_str(), self.scope.as_ref())
    }
}
