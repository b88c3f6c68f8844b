//! Role registry
//!
//! Tracks known roles in first-seen order together with their direct
//! inheritance edges. Roles are created on first reference and never removed.

use std::collections::HashMap;

/// Dense handle for a registered role.
///
/// Handles are assigned in registration order, starting at zero, so a
/// handle doubles as the role's position in [`RoleRegistry::roles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleId(usize);

impl RoleId {
    /// Position of the role in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Known roles and the parents each one inherits from.
///
/// # Examples
///
/// ```
/// use dot_acl::roles::RoleRegistry;
///
/// let mut registry = RoleRegistry::new();
/// registry.add_role("Master", ["Developer", "Programmer"]);
/// registry.add_inherit("Developer", "Authorized");
///
/// assert_eq!(
///     registry.roles(),
///     vec!["Master", "Developer", "Programmer", "Authorized"]
/// );
/// assert_eq!(registry.parents("Master"), vec!["Developer", "Programmer"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    names: Vec<String>,
    index: HashMap<String, RoleId>,
    /// Parents per role, indexed by `RoleId`, in the order they were added.
    parents: Vec<Vec<RoleId>>,
}

impl RoleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the handle for `role`, registering it if it is new.
    pub fn ensure(&mut self, role: &str) -> RoleId {
        if let Some(&id) = self.index.get(role) {
            return id;
        }

        let id = RoleId(self.names.len());
        self.names.push(role.to_string());
        self.index.insert(role.to_string(), id);
        self.parents.push(Vec::new());
        id
    }

    /// Register `role` and make it inherit from each of `parents`, in order.
    ///
    /// # Arguments
    ///
    /// * `role` - The role to register
    /// * `parents` - Zero or more roles to inherit from
    ///
    /// # Returns
    ///
    /// The handle of `role`
    pub fn add_role<I, S>(&mut self, role: &str, parents: I) -> RoleId
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = self.ensure(role);
        for parent in parents {
            self.add_inherit(role, parent.as_ref());
        }
        id
    }

    /// Register both roles and append `parent` to the parents of `role`.
    ///
    /// A role never inherits from itself; such an edge is dropped. Repeated
    /// edges are kept, they only make traversal revisit an already seen role.
    ///
    /// # Returns
    ///
    /// `true` if an edge was recorded, `false` for a self-edge
    pub fn add_inherit(&mut self, role: &str, parent: &str) -> bool {
        let child = self.ensure(role);
        let parent = self.ensure(parent);

        if child == parent {
            return false;
        }

        self.parents[child.index()].push(parent);
        true
    }

    /// Look up the handle of a known role.
    pub fn id(&self, role: &str) -> Option<RoleId> {
        self.index.get(role).copied()
    }

    /// Name of a registered role.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this registry.
    pub fn name(&self, id: RoleId) -> &str {
        &self.names[id.index()]
    }

    /// Direct parents of a registered role, first-added first.
    pub fn parents_of(&self, id: RoleId) -> &[RoleId] {
        self.parents
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Direct parents of `role` by name; empty for unknown roles.
    pub fn parents(&self, role: &str) -> Vec<&str> {
        self.id(role)
            .map(|id| {
                self.parents_of(id)
                    .iter()
                    .map(|&parent| self.name(parent))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All known roles in registration order.
    pub fn roles(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    /// Iterate over handles and names in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (RoleId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (RoleId(index), name.as_str()))
    }

    /// Check if `role` is known.
    pub fn contains(&self, role: &str) -> bool {
        self.index.contains_key(role)
    }

    /// Number of known roles.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no role is known.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
