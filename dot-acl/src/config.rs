//! Configuration for the ACL.
//!
//! Two sources are supported:
//!
//! - [`AclConfig`]: engine settings, loaded from environment variables with
//!   defaults for local development.
//! - [`PolicyDocument`]: a JSON description of roles, inheritance and rules
//!   used to seed a fresh [`Acl`] at startup.
//!
//! # Policy document format
//!
//! ```json
//! {
//!   "default_access": false,
//!   "roles": [
//!     { "name": "Unauthorized", "allow": ["routes.*"], "deny": ["user.me"] },
//!     { "name": "Authorized", "inherits": ["Unauthorized"], "allow": ["user.me"] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::acl::Acl;
use crate::error::{AclError, AclResult};

/// Environment variable holding the default outcome.
pub const DEFAULT_ACCESS_ENV: &str = "DOT_ACL_DEFAULT_ACCESS";

/// Engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclConfig {
    /// Outcome used when no rule applies.
    #[serde(default = "default_access")]
    pub default_access: bool,
}

fn default_access() -> bool {
    true
}

impl Default for AclConfig {
    /// Allows by default.
    fn default() -> Self {
        Self {
            default_access: default_access(),
        }
    }
}

impl AclConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DOT_ACL_DEFAULT_ACCESS`: default outcome, one of `true`/`false`,
    ///   `1`/`0`, `yes`/`no`, `allow`/`deny` (default: true)
    pub fn from_env() -> AclResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value of a variable, or `None` when unset
    pub fn from_lookup<F>(lookup: F) -> AclResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let default_access = match lookup(DEFAULT_ACCESS_ENV) {
            Some(value) => parse_flag(DEFAULT_ACCESS_ENV, &value)?,
            None => default.default_access,
        };

        Ok(Self { default_access })
    }
}

fn parse_flag(key: &str, value: &str) -> AclResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "allow" => Ok(true),
        "false" | "0" | "no" | "deny" => Ok(false),
        other => Err(AclError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {:?}", other),
        }),
    }
}

/// Declarative description of roles and rules.
///
/// # Examples
///
/// ```
/// use dot_acl::config::PolicyDocument;
///
/// let policy = PolicyDocument::from_json(r#"{
///     "default_access": false,
///     "roles": [
///         { "name": "Unauthorized", "allow": ["routes.*", "!user.me"] },
///         { "name": "Authorized", "inherits": ["Unauthorized"], "allow": ["user.me"] }
///     ]
/// }"#).unwrap();
///
/// let acl = policy.build();
/// assert!(acl.is_allowed("Authorized", "routes.root"));
/// assert!(acl.is_allowed("Authorized", "user.me"));
/// assert!(!acl.is_allowed("Unauthorized", "user.me"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Default outcome; overrides the engine configuration when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_access: Option<bool>,

    /// Roles in registration order.
    #[serde(default)]
    pub roles: Vec<RoleDefinition>,
}

/// One role of a [`PolicyDocument`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Role identifier.
    pub name: String,

    /// Roles to inherit from, first consulted first.
    #[serde(default)]
    pub inherits: Vec<String>,

    /// Actions to allow (`!` prefix denies).
    #[serde(default)]
    pub allow: Vec<String>,

    /// Actions to deny (`!` prefix allows). Applied after `allow`.
    #[serde(default)]
    pub deny: Vec<String>,
}

impl PolicyDocument {
    /// Parse a policy document from JSON.
    pub fn from_json(json: &str) -> AclResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build an ACL from this document with the default engine settings.
    pub fn build(&self) -> Acl {
        self.build_with(&AclConfig::default())
    }

    /// Build an ACL from this document on top of `config`.
    pub fn build_with(&self, config: &AclConfig) -> Acl {
        let mut acl = Acl::with_config(config);
        self.apply(&mut acl);
        acl
    }

    /// Apply roles and rules to an existing ACL, in document order.
    pub fn apply(&self, acl: &mut Acl) {
        if let Some(default_access) = self.default_access {
            acl.set_default_action(default_access);
        }

        for role in &self.roles {
            acl.add_role(&role.name, &role.inherits);
            for action in &role.allow {
                acl.allow(&role.name, action);
            }
            for action in &role.deny {
                acl.deny(&role.name, action);
            }
        }
    }
}

impl TryFrom<&str> for PolicyDocument {
    type Error = AclError;

    fn try_from(json: &str) -> AclResult<Self> {
        Self::from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AclConfig::default();
        assert!(config.default_access);

        let config = AclConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.default_access);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = AclConfig::from_lookup(lookup(&[(DEFAULT_ACCESS_ENV, "deny")])).unwrap();
        assert!(!config.default_access);

        let config = AclConfig::from_lookup(lookup(&[(DEFAULT_ACCESS_ENV, " FALSE ")])).unwrap();
        assert!(!config.default_access);

        let config = AclConfig::from_lookup(lookup(&[(DEFAULT_ACCESS_ENV, "1")])).unwrap();
        assert!(config.default_access);
    }

    #[test]
    fn test_config_invalid_value() {
        let err = AclConfig::from_lookup(lookup(&[(DEFAULT_ACCESS_ENV, "maybe")])).unwrap_err();
        assert!(matches!(err, AclError::InvalidValue { ref key, .. } if key == DEFAULT_ACCESS_ENV));
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: AclConfig = serde_json::from_str("{}").unwrap();
        assert!(config.default_access);
    }

    #[test]
    fn test_policy_document_build() {
        let policy = PolicyDocument::from_json(
            r#"{
                "default_access": false,
                "roles": [
                    { "name": "Unauthorized", "allow": ["routes.*"], "deny": ["user.me"] },
                    { "name": "Authorized", "inherits": ["Unauthorized"], "allow": ["user.me"] },
                    { "name": "Master", "inherits": ["Developer", "Authorized"] }
                ]
            }"#,
        )
        .unwrap();

        let acl = policy.build();
        assert!(!acl.default_action());
        assert_eq!(
            acl.roles(),
            vec!["Unauthorized", "Authorized", "Master", "Developer"]
        );
        assert_eq!(acl.parents("Master"), vec!["Developer", "Authorized"]);
        assert!(!acl.is_allowed("Unauthorized", "user.me"));
        assert!(acl.is_allowed("Master", "user.me"));
        assert!(acl.is_allowed("Master", "routes.root"));
        assert!(!acl.is_allowed("Master", "photo.find"));
    }

    #[test]
    fn test_policy_deny_applied_after_allow() {
        let policy = PolicyDocument {
            default_access: None,
            roles: vec![RoleDefinition {
                name: "Dev".to_string(),
                allow: vec!["Album.find".to_string()],
                deny: vec!["Album.find".to_string()],
                ..Default::default()
            }],
        };

        let acl = policy.build_with(&AclConfig {
            default_access: false,
        });
        assert!(!acl.default_action());
        assert!(!acl.is_allowed("Dev", "Album.find"));
    }

    #[test]
    fn test_policy_invalid_json() {
        let err = PolicyDocument::try_from("{\"roles\": 3}").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_POLICY");
    }
}
