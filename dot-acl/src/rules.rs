//! # Rules
//!
//! Storage for explicit allow/deny facts and the single-role matcher.
//!
//! Each rule is keyed by `(role, resource pattern, access pattern)`. Keys are
//! unique: defining the same key again replaces the stored outcome.
//!
//! ## Lookup order
//!
//! For one role, a query `(resource, access)` probes four keys and stops at
//! the first one present:
//!
//! ```text
//! 1. (resource, access)   exact
//! 2. (resource, *)        any access
//! 3. (*,        access)   any resource
//! 4. (*,        *)        anything
//! ```
//!
//! An exact rule therefore always wins over a wildcard rule for the same role,
//! regardless of the order in which they were defined.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::action::{Pattern, RuleSpec};
use crate::roles::RoleId;

/// Which probe of the lookup order produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// `(resource, access)`
    Exact,
    /// `(resource, *)`
    AnyAccess,
    /// `(*, access)`
    AnyResource,
    /// `(*, *)`
    Anything,
}

impl MatchKind {
    /// All probes, in lookup order.
    pub fn all() -> [MatchKind; 4] {
        [
            MatchKind::Exact,
            MatchKind::AnyAccess,
            MatchKind::AnyResource,
            MatchKind::Anything,
        ]
    }

    /// Rebuild the stored key that answered a query.
    ///
    /// # Arguments
    ///
    /// * `resource` - The queried resource
    /// * `access` - The queried access
    ///
    /// # Returns
    ///
    /// The `(resource, access)` patterns of the matching rule
    pub fn patterns(&self, resource: &str, access: &str) -> (Pattern, Pattern) {
        let literal = |token: &str| Pattern::Literal(token.to_string());
        match self {
            MatchKind::Exact => (literal(resource), literal(access)),
            MatchKind::AnyAccess => (literal(resource), Pattern::Any),
            MatchKind::AnyResource => (Pattern::Any, literal(access)),
            MatchKind::Anything => (Pattern::Any, Pattern::Any),
        }
    }
}

/// A stored outcome found by [`RuleStore::match_role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    /// The probe that hit.
    pub kind: MatchKind,
    /// The stored outcome.
    pub allowed: bool,
}

/// Outcomes keyed by access pattern, for one resource pattern.
#[derive(Debug, Clone, Default)]
struct AccessRules {
    literal: HashMap<String, bool>,
    any: Option<bool>,
}

impl AccessRules {
    fn set(&mut self, access: Pattern, allowed: bool) -> Option<bool> {
        match access {
            Pattern::Any => self.any.replace(allowed),
            Pattern::Literal(token) => self.literal.insert(token, allowed),
        }
    }

    fn get(&self, access: &Pattern) -> Option<bool> {
        match access {
            Pattern::Any => self.any,
            Pattern::Literal(token) => self.literal(token),
        }
    }

    fn literal(&self, access: &str) -> Option<bool> {
        self.literal.get(access).copied()
    }
}

/// All rules of one role.
#[derive(Debug, Clone, Default)]
pub struct RoleRules {
    literal: HashMap<String, AccessRules>,
    any: AccessRules,
}

impl RoleRules {
    /// Store an outcome, returning the one it replaced.
    pub fn set(&mut self, resource: Pattern, access: Pattern, allowed: bool) -> Option<bool> {
        match resource {
            Pattern::Any => self.any.set(access, allowed),
            Pattern::Literal(token) => self
                .literal
                .entry(token)
                .or_default()
                .set(access, allowed),
        }
    }

    /// Outcome stored for exactly this key.
    pub fn get(&self, resource: &Pattern, access: &Pattern) -> Option<bool> {
        match resource {
            Pattern::Any => self.any.get(access),
            Pattern::Literal(token) => self.literal.get(token)?.get(access),
        }
    }

    /// Probe the four keys for a query, most specific first.
    pub fn lookup(&self, resource: &str, access: &str) -> Option<RuleMatch> {
        let by_resource = self.literal.get(resource);

        let hit = |kind: MatchKind, allowed: Option<bool>| {
            allowed.map(|allowed| RuleMatch { kind, allowed })
        };

        by_resource
            .and_then(|rules| hit(MatchKind::Exact, rules.literal(access)))
            .or_else(|| by_resource.and_then(|rules| hit(MatchKind::AnyAccess, rules.any)))
            .or_else(|| hit(MatchKind::AnyResource, self.any.literal(access)))
            .or_else(|| hit(MatchKind::Anything, self.any.any))
    }
}

/// Explicit allow/deny facts for every role.
///
/// # Example
///
/// ```
/// use dot_acl::action::RuleSpec;
/// use dot_acl::roles::RoleRegistry;
/// use dot_acl::rules::{MatchKind, RuleStore};
///
/// let mut roles = RoleRegistry::new();
/// let developer = roles.ensure("Developer");
///
/// let mut rules = RuleStore::new();
/// rules.insert(developer, RuleSpec::parse("album.browse", true));
/// rules.insert(developer, RuleSpec::parse("!*.browse", true));
///
/// let exact = rules.match_role(developer, "album", "browse").unwrap();
/// assert_eq!(exact.kind, MatchKind::Exact);
/// assert!(exact.allowed);
///
/// let wildcard = rules.match_role(developer, "photo", "browse").unwrap();
/// assert_eq!(wildcard.kind, MatchKind::AnyResource);
/// assert!(!wildcard.allowed);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: HashMap<RoleId, RoleRules>,
    len: usize,
}

impl RuleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a rule for `role`, replacing any outcome stored for the same key.
    ///
    /// # Returns
    ///
    /// The replaced outcome, if the key was already present
    pub fn insert(&mut self, role: RoleId, rule: RuleSpec) -> Option<bool> {
        let previous = self
            .rules
            .entry(role)
            .or_default()
            .set(rule.resource, rule.access, rule.allowed);

        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Outcome stored for exactly this key, with no wildcard fallback.
    pub fn get(&self, role: RoleId, resource: &Pattern, access: &Pattern) -> Option<bool> {
        self.rules.get(&role)?.get(resource, access)
    }

    /// Find the most specific rule of `role` that answers a query.
    ///
    /// # Returns
    ///
    /// `None` when the role has no rule for any of the four probed keys
    pub fn match_role(&self, role: RoleId, resource: &str, access: &str) -> Option<RuleMatch> {
        self.rules.get(&role)?.lookup(resource, access)
    }

    /// Number of distinct stored keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no rule is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
