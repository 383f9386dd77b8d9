//! `rightgate-engine` — rights resolution, session caching, and the
//! authorization decision engine.
//!
//! The engine answers "is this user allowed right R in scope S?" against a
//! pluggable rights source, caching each user's resolved rights in their
//! session between requests. It is intentionally decoupled from HTTP and
//! storage; those concerns arrive as trait implementations.

pub mod condition;
pub mod config;
pub mod enforce;
pub mod engine;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod session;
pub mod source;

pub use condition::{Condition, RightCondition};
pub use config::{ConfigError, DEFAULT_REDIRECT_PARAMETER, RightsConfig};
pub use enforce::{Access, DenialAction, RedirectTarget};
pub use engine::RightsService;
pub use error::{RightsError, RightsResult};
pub use identity::IdentityProvider;
pub use lifecycle::{AuthEvent, AuthListener};
pub use session::{RightRecord, RightsMap, SessionContext, SessionStore, SessionStoreError};
pub use source::{RightsSource, RightsSourceError};
