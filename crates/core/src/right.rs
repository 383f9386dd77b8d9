use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Scope;

/// Right identifier.
///
/// Rights are modeled as opaque names (e.g. "AdminProject"). A name is
/// unique within one user's right set, not globally across users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RightName(Cow<'static, str>);

impl RightName {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RightName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for RightName {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RightName {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// A named permission, optionally restricted to a finite set of scopes.
///
/// A right can cover anything from displaying a button to accessing a page.
/// An empty scope set means the right is **global**: it applies in every
/// scope, including when no scope is asked about at all. A non-empty scope
/// set restricts the right to exactly those scope values.
///
/// # Invariants
/// - Immutable after construction.
/// - `has_scope(None)` is true iff the right is global.
/// - For a scoped right, `has_scope(Some(s))` is true iff `s` is in the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Right {
    name: RightName,
    scopes: Vec<Scope>,
}

impl Right {
    /// A right that applies in every scope.
    pub fn global(name: impl Into<RightName>) -> Self {
        Self {
            name: name.into(),
            scopes: Vec::new(),
        }
    }

    /// A right restricted to the given scope values.
    ///
    /// An empty iterator yields a global right, same as [`Right::global`].
    pub fn scoped(name: impl Into<RightName>, scopes: impl IntoIterator<Item = Scope>) -> Self {
        Self {
            name: name.into(),
            scopes: scopes.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &RightName {
        &self.name
    }

    /// The scope values this right is restricted to. Empty means global.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn is_global(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Whether this right applies to the queried scope.
    ///
    /// Total function, no side effects:
    /// - no scope list → true (global right matches everything);
    /// - scoped right queried without a scope → false;
    /// - otherwise, equality membership in the scope set.
    pub fn has_scope(&self, scope: Option<&Scope>) -> bool {
        // No scope list = global scope.
        if self.scopes.is_empty() {
            return true;
        }

        // A scoped right never matches an unscoped query.
        match scope {
            None => false,
            Some(scope) => self.scopes.contains(scope),
        }
    }
}
