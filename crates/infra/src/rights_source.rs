use std::collections::HashMap;
use std::sync::RwLock;

use rightgate_core::{Right, UserId};
use rightgate_engine::{RightsSource, RightsSourceError};

/// In-memory rights data source.
///
/// Intended for tests/dev. Grants can be edited at any time; the engine
/// only observes changes after a cache flush or a login boundary, which is
/// exactly the production behavior this fake needs to reproduce.
#[derive(Debug, Default)]
pub struct InMemoryRightsSource {
    grants: RwLock<HashMap<UserId, Vec<Right>>>,
}

impl InMemoryRightsSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `right` to the user, replacing any same-named grant.
    pub fn grant(&self, user_id: UserId, right: Right) {
        if let Ok(mut grants) = self.grants.write() {
            let rights = grants.entry(user_id).or_default();
            rights.retain(|r| r.name() != right.name());
            rights.push(right);
        }
    }

    /// Remove every grant for the user.
    pub fn revoke_all(&self, user_id: UserId) {
        if let Ok(mut grants) = self.grants.write() {
            grants.remove(&user_id);
        }
    }
}

impl RightsSource for InMemoryRightsSource {
    fn rights_for_user(&self, user_id: UserId) -> Result<Vec<Right>, RightsSourceError> {
        let grants = self
            .grants
            .read()
            .map_err(|_| RightsSourceError::unavailable("lock poisoned"))?;
        Ok(grants.get(&user_id).cloned().unwrap_or_default())
    }

    fn right_for_user(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<Right>, RightsSourceError> {
        let grants = self
            .grants
            .read()
            .map_err(|_| RightsSourceError::unavailable("lock poisoned"))?;
        Ok(grants
            .get(&user_id)
            .and_then(|rights| rights.iter().find(|r| r.name().as_str() == name))
            .cloned())
    }
}
