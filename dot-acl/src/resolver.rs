//! # Resolver
//!
//! Inheritance-aware evaluation of a query.
//!
//! Resolution walks the inheritance graph depth-first from the queried role,
//! parents left to right in the order they were added, and stops at the first
//! role that has any matching rule (allowing or denying). Outcomes from
//! different branches are never merged.
//!
//! One visited set spans the whole query. A role reachable through several
//! paths is evaluated once, through the first path that reaches it, and cyclic
//! inheritance cannot loop.
//!
//! ```text
//!        Master
//!       /      \
//!  Developer  Programmer      visit order from Master:
//!       \      /              Master, Developer, Authorized,
//!      Authorized             Unauthorized, Programmer
//!          |
//!     Unauthorized
//! ```

use crate::roles::{RoleId, RoleRegistry};
use crate::rules::{RuleMatch, RuleStore};

/// Depth-first preorder over a role and its ancestors, each role once.
///
/// Parents are pushed when their child is yielded, so stopping early skips
/// the rest of the graph.
#[derive(Debug)]
pub struct Traversal<'a> {
    registry: &'a RoleRegistry,
    visited: Vec<bool>,
    pending: Vec<RoleId>,
}

impl<'a> Traversal<'a> {
    /// Start a traversal at `root`.
    pub fn new(registry: &'a RoleRegistry, root: RoleId) -> Self {
        Self {
            registry,
            visited: vec![false; registry.len()],
            pending: vec![root],
        }
    }
}

impl Iterator for Traversal<'_> {
    type Item = RoleId;

    fn next(&mut self) -> Option<RoleId> {
        while let Some(role) = self.pending.pop() {
            let Some(seen) = self.visited.get_mut(role.index()) else {
                continue;
            };
            if *seen {
                continue;
            }
            *seen = true;

            // Reversed so the first-added parent is popped first.
            self.pending
                .extend(self.registry.parents_of(role).iter().rev().copied());
            return Some(role);
        }
        None
    }
}

/// The rule that decided a query and the role it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Role whose rule matched: the queried role or one of its ancestors.
    pub role: RoleId,
    /// The matching rule.
    pub matched: RuleMatch,
}

impl Resolution {
    /// The decided outcome.
    pub fn allowed(&self) -> bool {
        self.matched.allowed
    }
}

/// Evaluates queries against a registry and a rule store.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a RoleRegistry,
    rules: &'a RuleStore,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over borrowed engine state.
    pub fn new(registry: &'a RoleRegistry, rules: &'a RuleStore) -> Self {
        Self { registry, rules }
    }

    /// Find the rule that decides `(resource, access)` for `role`.
    ///
    /// # Returns
    ///
    /// `None` when no role in the inheritance closure has a matching rule;
    /// the caller then applies its default
    pub fn resolve(&self, role: RoleId, resource: &str, access: &str) -> Option<Resolution> {
        self.traverse(role).find_map(|candidate| {
            self.rules
                .match_role(candidate, resource, access)
                .map(|matched| Resolution {
                    role: candidate,
                    matched,
                })
        })
    }

    /// Roles in the order resolution would visit them if none had a rule.
    pub fn traverse(&self, role: RoleId) -> Traversal<'a> {
        Traversal::new(self.registry, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::RuleSpec;

    fn names<'r>(registry: &'r RoleRegistry, ids: impl Iterator<Item = RoleId>) -> Vec<&'r str> {
        ids.map(|id| registry.name(id)).collect()
    }

    fn fixture() -> RoleRegistry {
        let mut registry = RoleRegistry::new();
        registry.add_role("Unauthorized", Vec::<&str>::new());
        registry.add_role("Authorized", ["Unauthorized"]);
        registry.add_role("Developer", ["Authorized"]);
        registry.add_role("Programmer", ["Authorized"]);
        registry.add_role("Master", ["Developer", "Programmer"]);
        registry
    }

    #[test]
    fn test_traversal_diamond_preorder() {
        let registry = fixture();
        let rules = RuleStore::new();
        let resolver = Resolver::new(&registry, &rules);
        let master = registry.id("Master").unwrap();

        assert_eq!(
            names(&registry, resolver.traverse(master)),
            vec!["Master", "Developer", "Authorized", "Unauthorized", "Programmer"]
        );
    }

    #[test]
    fn test_traversal_cycle_terminates() {
        let mut registry = RoleRegistry::new();
        registry.add_inherit("A", "B");
        registry.add_inherit("B", "C");
        registry.add_inherit("C", "A");
        let rules = RuleStore::new();
        let resolver = Resolver::new(&registry, &rules);

        let b = registry.id("B").unwrap();
        assert_eq!(names(&registry, resolver.traverse(b)), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_traversal_duplicate_edges_visit_once() {
        let mut registry = RoleRegistry::new();
        registry.add_role("Editor", ["Viewer", "Viewer", "Guest"]);
        let rules = RuleStore::new();
        let resolver = Resolver::new(&registry, &rules);

        let editor = registry.id("Editor").unwrap();
        assert_eq!(
            names(&registry, resolver.traverse(editor)),
            vec!["Editor", "Viewer", "Guest"]
        );
    }

    #[test]
    fn test_resolve_stops_at_first_role_with_rule() {
        let registry = fixture();
        let mut rules = RuleStore::new();
        let developer = registry.id("Developer").unwrap();
        let unauthorized = registry.id("Unauthorized").unwrap();
        let programmer = registry.id("Programmer").unwrap();

        rules.insert(unauthorized, RuleSpec::parse("user.me", false));
        rules.insert(programmer, RuleSpec::parse("user.me", true));

        let resolver = Resolver::new(&registry, &rules);
        let master = registry.id("Master").unwrap();

        // Unauthorized is reached through Developer before Programmer is visited.
        let resolution = resolver.resolve(master, "user", "me").unwrap();
        assert_eq!(resolution.role, unauthorized);
        assert!(!resolution.allowed());

        // Developer reaches the same deny through Authorized.
        assert_eq!(
            resolver.resolve(developer, "user", "me").map(|r| r.role),
            Some(unauthorized)
        );
    }

    #[test]
    fn test_resolve_own_rule_before_parents() {
        let registry = fixture();
        let mut rules = RuleStore::new();
        let authorized = registry.id("Authorized").unwrap();
        let unauthorized = registry.id("Unauthorized").unwrap();

        rules.insert(unauthorized, RuleSpec::parse("!user.me", true));
        rules.insert(authorized, RuleSpec::parse("user.*", true));

        let resolver = Resolver::new(&registry, &rules);
        let resolution = resolver.resolve(authorized, "user", "me").unwrap();
        assert_eq!(resolution.role, authorized);
        assert!(resolution.allowed());
    }

    #[test]
    fn test_resolve_cycle_finds_rule_on_other_role() {
        let mut registry = RoleRegistry::new();
        registry.add_inherit("A", "B");
        registry.add_inherit("B", "A");
        let b = registry.id("B").unwrap();
        let a = registry.id("A").unwrap();

        let mut rules = RuleStore::new();
        rules.insert(b, RuleSpec::parse("post.view", true));

        let resolver = Resolver::new(&registry, &rules);
        assert_eq!(resolver.resolve(a, "post", "view").map(|r| r.role), Some(b));
        assert!(resolver.resolve(a, "post", "edit").is_none());
    }
}
