//! Per-session state: the durable store boundary, the transport form of
//! cached rights, and the context object handed to the engine.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use rightgate_core::{Right, Scope};

use crate::identity::IdentityProvider;

/// Failure in the per-session key/value store.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// The store backing this session could not be reached.
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// The store could not encode or decode an entry.
    #[error("session entry codec failure: {0}")]
    Codec(String),
}

impl SessionStoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }
}

/// Durable per-session key/value store.
///
/// One store instance corresponds to one user session and survives across
/// requests within it. The engine keeps the serialized rights map under a
/// single configurable key and always writes the map as a whole, so
/// implementations only need atomic set/get/delete per key. Serializing
/// concurrent access to one session is the hosting environment's job, not
/// re-implemented here.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, SessionStoreError>;

    fn set(&self, key: &str, value: JsonValue) -> Result<(), SessionStoreError>;

    /// Remove the entry. Deleting an absent key is a no-op.
    fn delete(&self, key: &str) -> Result<(), SessionStoreError>;
}

impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<JsonValue>, SessionStoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), SessionStoreError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), SessionStoreError> {
        (**self).delete(key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport representation
// ─────────────────────────────────────────────────────────────────────────────

/// Plain transport form of a [`Right`] for session persistence.
///
/// The storage layer never sees the domain type: a right is persisted as
/// name + scope list and reconstructed on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightRecord {
    pub name: String,
    #[serde(default)]
    pub scopes: Vec<JsonValue>,
}

impl From<&Right> for RightRecord {
    fn from(right: &Right) -> Self {
        Self {
            name: right.name().as_str().to_string(),
            scopes: right.scopes().iter().map(|s| s.as_value().clone()).collect(),
        }
    }
}

impl From<RightRecord> for Right {
    fn from(record: RightRecord) -> Self {
        Right::scoped(record.name, record.scopes.into_iter().map(Scope::from))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rights map
// ─────────────────────────────────────────────────────────────────────────────

/// A user's resolved rights, keyed by right name.
///
/// Built in one piece from a single rights-source answer; there is no way
/// to observe a partially populated map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RightsMap {
    rights: HashMap<String, Right>,
}

impl RightsMap {
    pub fn from_rights(rights: Vec<Right>) -> Self {
        let rights = rights
            .into_iter()
            .map(|r| (r.name().as_str().to_string(), r))
            .collect();
        Self { rights }
    }

    pub fn get(&self, name: &str) -> Option<&Right> {
        self.rights.get(name)
    }

    pub fn len(&self) -> usize {
        self.rights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rights.is_empty()
    }

    /// Encode for session persistence (name → transport record).
    pub(crate) fn to_session_value(&self) -> Result<JsonValue, serde_json::Error> {
        let records: HashMap<&str, RightRecord> = self
            .rights
            .iter()
            .map(|(name, right)| (name.as_str(), RightRecord::from(right)))
            .collect();
        serde_json::to_value(records)
    }

    /// Decode a session-persisted map back into domain rights.
    pub(crate) fn from_session_value(value: JsonValue) -> Result<Self, serde_json::Error> {
        let records: HashMap<String, RightRecord> = serde_json::from_value(value)?;
        let rights = records
            .into_iter()
            .map(|(name, record)| (name, Right::from(record)))
            .collect();
        Ok(Self { rights })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session context
// ─────────────────────────────────────────────────────────────────────────────

/// Per-session context handed to the decision engine.
///
/// Bundles the session's identity, its durable store, and the in-process
/// mirror of the cached rights map. A context is owned exclusively by the
/// request currently executing for its session (`&mut` access); the engine
/// itself stays shareable across sessions.
pub struct SessionContext {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn SessionStore>,
    mirror: Option<RightsMap>,
}

impl SessionContext {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            identity,
            store,
            mirror: None,
        }
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    pub(crate) fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// The cached right by name, if the mirror is populated and holds it.
    pub(crate) fn cached_right(&self, name: &str) -> Option<&Right> {
        self.mirror.as_ref().and_then(|m| m.get(name))
    }

    pub(crate) fn mirror(&self) -> Option<&RightsMap> {
        self.mirror.as_ref()
    }

    pub(crate) fn set_mirror(&mut self, map: RightsMap) {
        self.mirror = Some(map);
    }

    pub(crate) fn clear_mirror(&mut self) {
        self.mirror = None;
    }
}

impl core::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionContext")
            .field("mirrored_rights", &self.mirror.as_ref().map(RightsMap::len))
            .finish_non_exhaustive()
    }
}
