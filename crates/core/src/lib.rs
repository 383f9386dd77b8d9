//! `rightgate-core` — domain values for rights-based authorization.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod id;
pub mod right;
pub mod scope;

pub use id::UserId;
pub use right::{Right, RightName};
pub use scope::Scope;
