//! The authorization decision engine.

use std::sync::Arc;

use rightgate_core::{Scope, UserId};

use crate::config::{ConfigError, RightsConfig};
use crate::enforce::DenialAction;
use crate::error::{RightsError, RightsResult};
use crate::session::{RightsMap, SessionContext};
use crate::source::RightsSource;

/// Decides whether a user is allowed to exercise a named right, caching the
/// user's resolved rights in their session between requests.
///
/// The engine is `Send + Sync` and shared across sessions; all per-session
/// state lives in the [`SessionContext`] passed to each call.
///
/// # Cache states
///
/// Per session the cache is either **cold** (no persisted rights map) or
/// **warm** (map persisted as a whole from a single rights-source query).
/// The persisted entry's existence is the only warm/cold signal; a
/// partially populated map cannot be observed. A warm session served by a
/// process whose in-memory mirror is empty rehydrates from the session
/// store without re-querying the rights source.
pub struct RightsService {
    pub(crate) source: Arc<dyn RightsSource>,
    pub(crate) config: RightsConfig,
    pub(crate) denial_actions: Vec<DenialAction>,
}

impl RightsService {
    /// Build the engine, validating configuration up front.
    ///
    /// Misconfiguration surfaces here as a [`ConfigError`] rather than at
    /// decision time.
    pub fn new(source: Arc<dyn RightsSource>, config: RightsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            denial_actions: Vec::new(),
        })
    }

    pub fn config(&self) -> &RightsConfig {
        &self.config
    }

    /// Register a hook to run when an enforcement check denies access.
    ///
    /// Hooks run in registration order, after the denial has been logged.
    pub fn register_denial_action(&mut self, action: impl Fn() + Send + Sync + 'static) {
        self.denial_actions.push(Box::new(action));
    }

    /// Whether the session's current user holds `right`, optionally within
    /// `scope`.
    ///
    /// Unauthenticated callers, unknown rights and unmatched scopes are all
    /// ordinary `Ok(false)` results; only collaborator failures error.
    pub fn is_allowed(
        &self,
        ctx: &mut SessionContext,
        right: &str,
        scope: Option<&Scope>,
    ) -> RightsResult<bool> {
        // A user must be logged in first. Nothing else is touched otherwise.
        let Some(user_id) = logged_user(ctx) else {
            return Ok(false);
        };

        self.ensure_warm(ctx, user_id)?;

        match ctx.cached_right(right) {
            Some(r) => Ok(r.has_scope(scope)),
            None => Ok(false),
        }
    }

    /// Whether `user_id` holds `right`, optionally within `scope`.
    ///
    /// For checks about users other than the session's own: queries the
    /// rights source directly for the single named right. The session cache
    /// is neither read nor written; this method does not even take a
    /// session context.
    pub fn is_user_allowed(
        &self,
        user_id: UserId,
        right: &str,
        scope: Option<&Scope>,
    ) -> RightsResult<bool> {
        match self.source.right_for_user(user_id, right)? {
            Some(r) => Ok(r.has_scope(scope)),
            None => Ok(false),
        }
    }

    /// Purge the session's cached rights (Warm→Cold). Idempotent.
    ///
    /// Useful when the rights previously fetched for the current user are
    /// known to have changed.
    pub fn flush_rights_cache(&self, ctx: &mut SessionContext) -> RightsResult<()> {
        ctx.store().delete(&self.config.session_key())?;
        ctx.clear_mirror();
        Ok(())
    }

    /// Drop anything cached and eagerly repopulate for the session's
    /// current user, if one is authenticated.
    pub(crate) fn refresh(&self, ctx: &mut SessionContext) -> RightsResult<()> {
        self.flush_rights_cache(ctx)?;
        if let Some(user_id) = logged_user(ctx) {
            self.populate(ctx, user_id)?;
        }
        Ok(())
    }

    /// Make sure the session is warm and the mirror is populated.
    fn ensure_warm(&self, ctx: &mut SessionContext, user_id: UserId) -> RightsResult<()> {
        if ctx.mirror().is_some() {
            return Ok(());
        }

        let key = self.config.session_key();
        match ctx.store().get(&key)? {
            // Warm session, empty mirror: rehydrate without re-querying.
            Some(value) => {
                let map =
                    RightsMap::from_session_value(value).map_err(RightsError::CorruptCache)?;
                ctx.set_mirror(map);
                Ok(())
            }
            // Cold session: one full query, one whole-map write.
            None => self.populate(ctx, user_id),
        }
    }

    /// Cold→Warm transition: fetch the full right list, persist the map as
    /// a whole, and mirror it for this request.
    fn populate(&self, ctx: &mut SessionContext, user_id: UserId) -> RightsResult<()> {
        let rights = self.source.rights_for_user(user_id)?;
        let map = RightsMap::from_rights(rights);
        let value = map.to_session_value().map_err(RightsError::CorruptCache)?;
        ctx.store().set(&self.config.session_key(), value)?;
        tracing::debug!(user = %user_id, rights = map.len(), "rights cache populated");
        ctx.set_mirror(map);
        Ok(())
    }
}

fn logged_user(ctx: &SessionContext) -> Option<UserId> {
    if !ctx.identity().is_logged() {
        return None;
    }
    ctx.identity().user_id()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, RwLock};

    use serde_json::Value as JsonValue;

    use rightgate_core::Right;

    use super::*;
    use crate::identity::IdentityProvider;
    use crate::session::{SessionStore, SessionStoreError};
    use crate::source::RightsSourceError;

    struct CountingSource {
        rights: HashMap<UserId, Vec<Right>>,
        list_calls: AtomicUsize,
    }

    impl CountingSource {
        fn new(rights: HashMap<UserId, Vec<Right>>) -> Self {
            Self {
                rights,
                list_calls: AtomicUsize::new(0),
            }
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    impl RightsSource for CountingSource {
        fn rights_for_user(&self, user_id: UserId) -> Result<Vec<Right>, RightsSourceError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rights.get(&user_id).cloned().unwrap_or_default())
        }

        fn right_for_user(
            &self,
            user_id: UserId,
            name: &str,
        ) -> Result<Option<Right>, RightsSourceError> {
            Ok(self
                .rights
                .get(&user_id)
                .and_then(|rights| rights.iter().find(|r| r.name().as_str() == name))
                .cloned())
        }
    }

    struct FailingSource;

    impl RightsSource for FailingSource {
        fn rights_for_user(&self, _: UserId) -> Result<Vec<Right>, RightsSourceError> {
            Err(RightsSourceError::unavailable("database down"))
        }

        fn right_for_user(&self, _: UserId, _: &str) -> Result<Option<Right>, RightsSourceError> {
            Err(RightsSourceError::unavailable("database down"))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        entries: RwLock<HashMap<String, JsonValue>>,
    }

    impl MemoryStore {
        fn entry_count(&self) -> usize {
            self.entries.read().unwrap().len()
        }
    }

    impl SessionStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<JsonValue>, SessionStoreError> {
            Ok(self.entries.read().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: JsonValue) -> Result<(), SessionStoreError> {
            self.entries.write().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        fn delete(&self, key: &str) -> Result<(), SessionStoreError> {
            self.entries.write().unwrap().remove(key);
            Ok(())
        }
    }

    struct TestIdentity {
        user: RwLock<Option<(UserId, String)>>,
    }

    impl TestIdentity {
        fn logged_in(user_id: UserId, login: &str) -> Self {
            Self {
                user: RwLock::new(Some((user_id, login.to_string()))),
            }
        }

        fn anonymous() -> Self {
            Self {
                user: RwLock::new(None),
            }
        }
    }

    impl IdentityProvider for TestIdentity {
        fn is_logged(&self) -> bool {
            self.user.read().unwrap().is_some()
        }

        fn user_id(&self) -> Option<UserId> {
            self.user.read().unwrap().as_ref().map(|(id, _)| *id)
        }

        fn user_login(&self) -> Option<String> {
            self.user.read().unwrap().as_ref().map(|(_, login)| login.clone())
        }
    }

    fn service(source: Arc<dyn RightsSource>) -> RightsService {
        RightsService::new(source, RightsConfig::new("error/403")).unwrap()
    }

    fn ctx_for(identity: Arc<dyn IdentityProvider>, store: Arc<dyn SessionStore>) -> SessionContext {
        SessionContext::new(identity, store)
    }

    #[test]
    fn unauthenticated_caller_is_denied_without_collaborator_contact() {
        let source = Arc::new(CountingSource::new(HashMap::new()));
        let store = Arc::new(MemoryStore::default());
        let svc = service(source.clone());
        let mut ctx = ctx_for(Arc::new(TestIdentity::anonymous()), store.clone());

        assert!(!svc.is_allowed(&mut ctx, "AnyRight", None).unwrap());
        assert_eq!(source.list_calls(), 0);
        assert_eq!(store.entry_count(), 0);
    }

    #[test]
    fn first_check_populates_the_cache_exactly_once() {
        let user = UserId::new();
        let source = Arc::new(CountingSource::new(HashMap::from([(
            user,
            vec![Right::global("Publish")],
        )])));
        let svc = service(source.clone());
        let mut ctx = ctx_for(
            Arc::new(TestIdentity::logged_in(user, "alice")),
            Arc::new(MemoryStore::default()),
        );

        assert!(svc.is_allowed(&mut ctx, "Publish", None).unwrap());
        assert!(!svc.is_allowed(&mut ctx, "Unknown", None).unwrap());
        assert_eq!(source.list_calls(), 1);
    }

    #[test]
    fn warm_session_rehydrates_mirror_without_requerying() {
        let user = UserId::new();
        let source = Arc::new(CountingSource::new(HashMap::from([(
            user,
            vec![Right::global("Publish")],
        )])));
        let identity: Arc<dyn IdentityProvider> = Arc::new(TestIdentity::logged_in(user, "alice"));
        let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
        let svc = service(source.clone());

        let mut first_request = ctx_for(identity.clone(), store.clone());
        assert!(svc.is_allowed(&mut first_request, "Publish", None).unwrap());

        // A later request in the same session starts with an empty mirror.
        let mut second_request = ctx_for(identity, store);
        assert!(svc.is_allowed(&mut second_request, "Publish", None).unwrap());
        assert_eq!(source.list_calls(), 1);
    }

    #[test]
    fn flush_is_idempotent() {
        let user = UserId::new();
        let source = Arc::new(CountingSource::new(HashMap::from([(
            user,
            vec![Right::global("Publish")],
        )])));
        let store = Arc::new(MemoryStore::default());
        let svc = service(source.clone());
        let mut ctx = ctx_for(Arc::new(TestIdentity::logged_in(user, "alice")), store.clone());

        assert!(svc.is_allowed(&mut ctx, "Publish", None).unwrap());
        assert_eq!(store.entry_count(), 1);

        svc.flush_rights_cache(&mut ctx).unwrap();
        svc.flush_rights_cache(&mut ctx).unwrap();
        assert_eq!(store.entry_count(), 0);

        // Next check repopulates from the source.
        assert!(svc.is_allowed(&mut ctx, "Publish", None).unwrap());
        assert_eq!(source.list_calls(), 2);
    }

    #[test]
    fn corrupt_session_payload_surfaces_as_error() {
        let user = UserId::new();
        let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
        let svc = service(Arc::new(CountingSource::new(HashMap::new())));
        store
            .set(&svc.config().session_key(), serde_json::json!(42))
            .unwrap();

        let mut ctx = ctx_for(Arc::new(TestIdentity::logged_in(user, "alice")), store);
        let err = svc.is_allowed(&mut ctx, "Publish", None).unwrap_err();
        assert!(matches!(err, RightsError::CorruptCache(_)));
    }

    #[test]
    fn source_failure_propagates_instead_of_reading_as_denial() {
        let user = UserId::new();
        let svc = service(Arc::new(FailingSource));
        let mut ctx = ctx_for(
            Arc::new(TestIdentity::logged_in(user, "alice")),
            Arc::new(MemoryStore::default()),
        );

        let err = svc.is_allowed(&mut ctx, "Publish", None).unwrap_err();
        assert!(matches!(err, RightsError::Source(_)));
    }

    #[test]
    fn is_user_allowed_bypasses_the_session_cache() {
        let session_user = UserId::new();
        let other_user = UserId::new();
        let source = Arc::new(CountingSource::new(HashMap::from([
            (session_user, vec![Right::global("Publish")]),
            (other_user, vec![Right::global("AdminProject")]),
        ])));
        let store = Arc::new(MemoryStore::default());
        let svc = service(source.clone());

        assert!(svc.is_user_allowed(other_user, "AdminProject", None).unwrap());
        assert!(!svc.is_user_allowed(other_user, "Publish", None).unwrap());

        // No cache was read or written, and the full-list query never ran.
        assert_eq!(store.entry_count(), 0);
        assert_eq!(source.list_calls(), 0);
    }

    #[test]
    fn all_rights_from_one_query_land_in_the_cache() {
        let user = UserId::new();
        let source = Arc::new(CountingSource::new(HashMap::from([(
            user,
            vec![
                Right::global("Publish"),
                Right::scoped("EditProject", [rightgate_core::Scope::from("proj1")]),
                Right::global("ViewReports"),
            ],
        )])));
        let svc = service(source);
        let mut ctx = ctx_for(
            Arc::new(TestIdentity::logged_in(user, "alice")),
            Arc::new(MemoryStore::default()),
        );

        assert!(svc.is_allowed(&mut ctx, "Publish", None).unwrap());
        assert!(svc.is_allowed(&mut ctx, "ViewReports", None).unwrap());
        assert!(
            svc.is_allowed(&mut ctx, "EditProject", Some(&rightgate_core::Scope::from("proj1")))
                .unwrap()
        );
    }
}
