use std::sync::Arc;

use thiserror::Error;

use rightgate_core::{Right, UserId};

/// Failure while querying the rights data source.
#[derive(Debug, Error)]
pub enum RightsSourceError {
    /// The backing store (database, directory, file) could not be reached.
    #[error("rights data unavailable: {0}")]
    Unavailable(String),

    /// The backing store answered with data that does not describe rights.
    #[error("invalid rights data: {0}")]
    InvalidData(String),
}

impl RightsSourceError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }
}

/// Resolves a user identity to the rights granted to that user.
///
/// Implementations sit in front of whatever actually stores rights (a
/// database table, a directory, a flat file). Reads must be idempotent:
/// the engine may call them again at any login boundary or after a cache
/// flush. Retry policy, if any, belongs to the implementation; the engine
/// propagates failures as-is.
pub trait RightsSource: Send + Sync {
    /// All rights granted to the user, as one complete list.
    ///
    /// The engine persists the result wholesale, so a partial answer must
    /// be reported as an error rather than returned.
    fn rights_for_user(&self, user_id: UserId) -> Result<Vec<Right>, RightsSourceError>;

    /// The single named right granted to the user, or `None` if the user
    /// does not hold it.
    fn right_for_user(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<Right>, RightsSourceError>;
}

impl<S> RightsSource for Arc<S>
where
    S: RightsSource + ?Sized,
{
    fn rights_for_user(&self, user_id: UserId) -> Result<Vec<Right>, RightsSourceError> {
        (**self).rights_for_user(user_id)
    }

    fn right_for_user(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<Right>, RightsSourceError> {
        (**self).right_for_user(user_id, name)
    }
}
