//! Engine error model.

use thiserror::Error;

use crate::session::SessionStoreError;
use crate::source::RightsSourceError;

/// Result type used across the decision engine.
pub type RightsResult<T> = Result<T, RightsError>;

/// Infrastructure failure during an authorization decision.
///
/// Denial is **never** an error: unauthenticated callers, unknown rights
/// and unmatched scopes are ordinary `false` results. Only collaborator
/// failures surface here, so operators can tell "denied" from "broken".
#[derive(Debug, Error)]
pub enum RightsError {
    /// The rights data source could not be queried.
    #[error("rights source failure")]
    Source(#[from] RightsSourceError),

    /// The session store could not be read or written.
    #[error("session store failure")]
    Session(#[from] SessionStoreError),

    /// The session-persisted rights map could not be encoded or decoded.
    #[error("corrupt rights cache entry: {0}")]
    CorruptCache(serde_json::Error),
}
