//! # Actions
//!
//! Parsing for actions written in dot notation (`"resource.access"`) and for
//! the rule definitions built from them.
//!
//! Only the first `.` is significant: `"export.documentation.json"` has the
//! resource `export` and the access `documentation.json`. An action without a
//! `.` has an empty resource and uses the whole string as its access.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token matching any resource or any access in a rule definition.
pub const WILDCARD: &str = "*";

/// Prefix that inverts the outcome of a rule definition.
pub const NEGATION: char = '!';

/// One side (resource or access) of a stored rule.
///
/// The wildcard is its own variant so that a rule for "any resource" can never
/// collide with a resource that is literally named `*`.
///
/// # Example
///
/// ```
/// use dot_acl::action::Pattern;
///
/// assert_eq!(Pattern::parse("*"), Pattern::Any);
/// assert_eq!(Pattern::parse("user"), Pattern::Literal("user".to_string()));
/// assert_eq!(Pattern::Any.as_str(), "*");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Matches any token.
    Any,

    /// Matches exactly this token.
    Literal(String),
}

impl Pattern {
    /// Parse a token from a rule definition.
    ///
    /// # Arguments
    ///
    /// * `token` - A resource or access token; `*` becomes [`Pattern::Any`]
    pub fn parse(token: &str) -> Self {
        if token == WILDCARD {
            Pattern::Any
        } else {
            Pattern::Literal(token.to_string())
        }
    }

    /// Check if this is the wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Pattern::Any)
    }

    /// Get the token as written in a rule definition.
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Any => WILDCARD,
            Pattern::Literal(token) => token,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action being checked, split into resource and access.
///
/// Lookup tokens are always literal. A query for `"*.read"` asks about a
/// resource named `*`, which only wildcard rules can answer.
///
/// # Example
///
/// ```
/// use dot_acl::action::Action;
///
/// let action = Action::parse("album.browse");
/// assert_eq!(action.resource, "album");
/// assert_eq!(action.access, "browse");
///
/// let action = Action::parse("browse");
/// assert_eq!(action.resource, "");
/// assert_eq!(action.access, "browse");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action<'a> {
    /// The subject of the action.
    pub resource: &'a str,
    /// The operation performed on the resource.
    pub access: &'a str,
}

impl<'a> Action<'a> {
    /// Split an action string on its first `.`.
    pub fn parse(action: &'a str) -> Self {
        match action.split_once('.') {
            Some((resource, access)) => Self { resource, access },
            None => Self {
                resource: "",
                access: action,
            },
        }
    }
}

impl fmt::Display for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.access)
    }
}

/// A parsed rule definition: the patterns to store and the outcome to store
/// for them.
///
/// # Example
///
/// ```
/// use dot_acl::action::{Pattern, RuleSpec};
///
/// // "!" inverts the outcome being defined.
/// let rule = RuleSpec::parse("!admin.*", true);
/// assert_eq!(rule.resource, Pattern::Literal("admin".to_string()));
/// assert_eq!(rule.access, Pattern::Any);
/// assert!(!rule.allowed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSpec {
    /// Resource side of the rule key.
    pub resource: Pattern,
    /// Access side of the rule key.
    pub access: Pattern,
    /// Outcome stored for the key.
    pub allowed: bool,
}

impl RuleSpec {
    /// Parse a rule definition such as `"user.*"` or `"!*.browse"`.
    ///
    /// # Arguments
    ///
    /// * `spec` - The action pattern, optionally prefixed with `!`
    /// * `allowed` - The outcome requested by the caller (`true` for allow)
    ///
    /// # Returns
    ///
    /// The rule to store; a single leading `!` is consumed and flips `allowed`.
    pub fn parse(spec: &str, allowed: bool) -> Self {
        let (body, allowed) = match spec.strip_prefix(NEGATION) {
            Some(rest) => (rest, !allowed),
            None => (spec, allowed),
        };
        let action = Action::parse(body);

        Self {
            resource: Pattern::parse(action.resource),
            access: Pattern::parse(action.access),
            allowed,
        }
    }
}
