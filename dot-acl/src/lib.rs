//! # Dot ACL
//!
//! Role-based access control for actions written in dot notation.
//!
//! ## Overview
//!
//! The dot-acl crate handles:
//! - **Actions**: `"resource.access"` strings, split on the first `.`
//! - **Rules**: allow/deny facts per role, with `*` as a wildcard on either side
//! - **Roles**: ordered multiple inheritance, cycles allowed
//! - **Default access**: the outcome when no rule applies
//!
//! ## Architecture
//!
//! ```text
//! Rule = Role + Resource pattern + Access pattern -> allow | deny
//!
//! Examples:
//!   allow("superadmin", "*.*")       - everything
//!   allow("user", "user.*")          - any access on "user"
//!   allow("operator", "*.read")      - "read" on any resource
//!   allow("user", "!admin.*")        - same as deny("user", "admin.*")
//! ```
//!
//! A check for `(role, "resource.access")` looks at the role's own rules
//! first, most specific key first. If the role has no matching rule, its
//! parents are searched depth-first in the order they were added, and the
//! first role with a matching rule decides. When no role decides, the
//! default access applies.
//!
//! ## Usage
//!
//! ```rust
//! use dot_acl::Acl;
//!
//! let mut acl = Acl::new();
//! acl.set_default_action(false);
//!
//! acl.add_role("Unauthorized", Vec::<&str>::new())
//!     .add_role("Authorized", ["Unauthorized"])
//!     .add_role("Administrator", ["Authorized"]);
//!
//! acl.allow("Unauthorized", "routes.*")
//!     .allow("Unauthorized", "!user.me")
//!     .allow("Authorized", "user.me")
//!     .allow("Administrator", "*.*");
//!
//! assert!(acl.is_allowed("Authorized", "routes.root"));
//! assert!(!acl.is_allowed("Unauthorized", "user.me"));
//! assert!(acl.is_allowed("Administrator", "photo.find"));
//!
//! assert_eq!(acl.allowed_roles("user.me"), vec!["Authorized", "Administrator"]);
//! ```
//!
//! ## Concurrency
//!
//! [`Acl`] is a plain value: definitions need `&mut`, checks need `&`. Use
//! [`SharedAcl`] to share one engine between threads behind a reader/writer
//! lock.
//!
//! ## Logging
//!
//! Rule definitions are logged at `debug` and individual decisions at
//! `trace` through `tracing`. No subscriber is installed by this crate.

pub mod acl;
pub mod action;
pub mod config;
pub mod error;
pub mod resolver;
pub mod roles;
pub mod rules;
pub mod shared;

// Re-export main types for convenience
pub use acl::{Acl, Decision, DecisionSource};
pub use action::{Action, Pattern, RuleSpec};
pub use config::{AclConfig, PolicyDocument, RoleDefinition};
pub use error::{AclError, AclResult};
pub use roles::{RoleId, RoleRegistry};
pub use rules::{MatchKind, RuleStore};
pub use shared::SharedAcl;
