//! # Access control list
//!
//! The policy engine: a role registry, a rule store and the default outcome,
//! evaluated through the [`Resolver`].
//!
//! Mutators return `&mut Self` so that setup reads as a chain.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::action::{Action, Pattern, RuleSpec};
use crate::config::AclConfig;
use crate::resolver::{Resolution, Resolver};
use crate::roles::RoleRegistry;
use crate::rules::RuleStore;

/// Role-based access control for dot-notation actions.
///
/// # Example
///
/// ```
/// use dot_acl::Acl;
///
/// let mut acl = Acl::new();
/// acl.set_default_action(false)
///     .add_role("Authorized", ["Unauthorized"])
///     .allow("Unauthorized", "routes.*")
///     .allow("Unauthorized", "!user.me")
///     .allow("Authorized", "user.me");
///
/// assert!(acl.is_allowed("Unauthorized", "routes.root"));
/// assert!(!acl.is_allowed("Unauthorized", "user.me"));
/// assert!(acl.is_allowed("Authorized", "user.me"));
/// assert!(acl.is_allowed("Authorized", "routes.root"));
/// assert!(!acl.is_allowed("Authorized", "routes2.root"));
/// ```
#[derive(Debug, Clone)]
pub struct Acl {
    default_access: bool,
    roles: RoleRegistry,
    rules: RuleStore,
}

impl Default for Acl {
    fn default() -> Self {
        Self::with_config(&AclConfig::default())
    }
}

impl Acl {
    /// Create an empty ACL that allows by default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ACL from configuration.
    pub fn with_config(config: &AclConfig) -> Self {
        Self {
            default_access: config.default_access,
            roles: RoleRegistry::new(),
            rules: RuleStore::new(),
        }
    }

    /// Set the outcome used when no rule applies.
    pub fn set_default_action(&mut self, default_access: bool) -> &mut Self {
        self.default_access = default_access;
        self
    }

    /// Get the outcome used when no rule applies.
    pub fn default_action(&self) -> bool {
        self.default_access
    }

    /// Register a role and the roles it inherits from.
    ///
    /// # Arguments
    ///
    /// * `role` - The role to register
    /// * `parents` - Zero or more parents; earlier parents are consulted first
    pub fn add_role<I, S>(&mut self, role: &str, parents: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.roles.add_role(role, parents);
        self
    }

    /// Make `role` inherit from `parent`, registering both.
    ///
    /// A role inheriting from itself is ignored.
    pub fn add_inherit(&mut self, role: &str, parent: &str) -> &mut Self {
        self.roles.add_inherit(role, parent);
        self
    }

    /// All known roles in registration order.
    pub fn roles(&self) -> Vec<&str> {
        self.roles.roles()
    }

    /// Direct parents of `role`, first-added first.
    pub fn parents(&self, role: &str) -> Vec<&str> {
        self.roles.parents(role)
    }

    /// Allow `role` to perform `action`.
    ///
    /// `*` may replace the resource, the access, or both. A leading `!` turns
    /// the rule into a deny: `allow(role, "!admin.*")` equals
    /// `deny(role, "admin.*")`.
    pub fn allow(&mut self, role: &str, action: &str) -> &mut Self {
        self.define(role, action, true)
    }

    /// Deny `role` from performing `action`.
    ///
    /// Accepts the same patterns as [`Acl::allow`]; a leading `!` turns the
    /// rule into an allow.
    pub fn deny(&mut self, role: &str, action: &str) -> &mut Self {
        self.define(role, action, false)
    }

    fn define(&mut self, role: &str, action: &str, allowed: bool) -> &mut Self {
        let id = self.roles.ensure(role);
        let rule = RuleSpec::parse(action, allowed);

        debug!(
            role = %role,
            resource = %rule.resource,
            access = %rule.access,
            allowed = rule.allowed,
            "Defined ACL rule"
        );

        if let Some(previous) = self.rules.insert(id, rule) {
            trace!(role = %role, action = %action, previous, "Replaced ACL rule");
        }
        self
    }

    /// Outcome stored for exactly this rule pattern, without inheritance or
    /// wildcard fallback.
    ///
    /// `pattern` is read as written: a leading `!` is part of the resource.
    pub fn rule(&self, role: &str, pattern: &str) -> Option<bool> {
        let id = self.roles.id(role)?;
        let action = Action::parse(pattern);
        self.rules.get(
            id,
            &Pattern::parse(action.resource),
            &Pattern::parse(action.access),
        )
    }

    /// Number of stored rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Check whether `role` may perform `action`.
    ///
    /// Unknown roles and actions without a matching rule fall back to
    /// [`Acl::default_action`].
    pub fn is_allowed(&self, role: &str, action: &str) -> bool {
        let allowed = self
            .resolve(role, Action::parse(action))
            .map_or(self.default_access, |resolution| resolution.allowed());

        trace!(role = %role, action = %action, allowed, "ACL decision");
        allowed
    }

    /// Roles that may perform `action`, in registration order.
    pub fn allowed_roles(&self, action: &str) -> Vec<&str> {
        let parsed = Action::parse(action);
        let resolver = self.resolver();

        let allowed: Vec<&str> = self
            .roles
            .iter()
            .filter(|&(id, _)| {
                resolver
                    .resolve(id, parsed.resource, parsed.access)
                    .map_or(self.default_access, |resolution| resolution.allowed())
            })
            .map(|(_, name)| name)
            .collect();

        debug!(action = %action, count = allowed.len(), "Listed allowed roles");
        allowed
    }

    /// Decide like [`Acl::is_allowed`] and report which rule decided.
    ///
    /// # Example
    ///
    /// ```
    /// use dot_acl::{Acl, DecisionSource};
    /// use dot_acl::action::Pattern;
    ///
    /// let mut acl = Acl::new();
    /// acl.add_role("Developer", ["Authorized"]);
    /// acl.allow("Authorized", "user.*");
    ///
    /// let decision = acl.explain("Developer", "user.me");
    /// assert!(decision.allowed);
    /// assert_eq!(
    ///     decision.source,
    ///     DecisionSource::Rule {
    ///         role: "Authorized".to_string(),
    ///         resource: Pattern::Literal("user".to_string()),
    ///         access: Pattern::Any,
    ///     }
    /// );
    /// ```
    pub fn explain(&self, role: &str, action: &str) -> Decision {
        let parsed = Action::parse(action);

        let (allowed, source) = match self.resolve(role, parsed) {
            Some(resolution) => {
                let (resource, access) = resolution
                    .matched
                    .kind
                    .patterns(parsed.resource, parsed.access);
                let source = DecisionSource::Rule {
                    role: self.roles.name(resolution.role).to_string(),
                    resource,
                    access,
                };
                (resolution.allowed(), source)
            }
            None => (self.default_access, DecisionSource::Default),
        };

        Decision {
            role: role.to_string(),
            action: action.to_string(),
            allowed,
            source,
        }
    }

    /// Borrow the role registry.
    pub fn registry(&self) -> &RoleRegistry {
        &self.roles
    }

    /// Borrow the rule store.
    pub fn rule_store(&self) -> &RuleStore {
        &self.rules
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.roles, &self.rules)
    }

    fn resolve(&self, role: &str, action: Action<'_>) -> Option<Resolution> {
        let id = self.roles.id(role)?;
        self.resolver().resolve(id, action.resource, action.access)
    }
}

/// Outcome of [`Acl::explain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Queried role.
    pub role: String,
    /// Queried action.
    pub action: String,
    /// Whether the action is allowed.
    pub allowed: bool,
    /// What decided the outcome.
    pub source: DecisionSource,
}

impl Decision {
    /// Check if the default outcome applied.
    pub fn is_default(&self) -> bool {
        matches!(self.source, DecisionSource::Default)
    }
}

/// What decided an access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionSource {
    /// A stored rule of `role` (the queried role or an ancestor).
    Rule {
        /// Role owning the rule.
        role: String,
        /// Resource pattern of the rule.
        resource: Pattern,
        /// Access pattern of the rule.
        access: Pattern,
    },

    /// No rule matched; the default outcome applied.
    Default,
}
