//! Thread-safe ACL handle
//!
//! [`Acl`] has no internal synchronization. [`SharedAcl`] puts one behind a
//! single reader/writer lock: checks share the read lock, definitions take
//! the write lock. Clones share the same engine.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::acl::{Acl, Decision};

/// Cloneable, lock-guarded [`Acl`].
///
/// # Example
///
/// ```
/// use dot_acl::{Acl, SharedAcl};
///
/// let shared = SharedAcl::new(Acl::new());
/// shared.set_default_action(false);
/// shared.allow("Operator", "*.read");
///
/// let reader = shared.clone();
/// let handle = std::thread::spawn(move || reader.is_allowed("Operator", "report.read"));
/// assert!(handle.join().unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedAcl {
    inner: Arc<RwLock<Acl>>,
}

impl SharedAcl {
    /// Wrap an ACL.
    pub fn new(acl: Acl) -> Self {
        Self {
            inner: Arc::new(RwLock::new(acl)),
        }
    }

    /// Run `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Acl) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Run `f` under the write lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut Acl) -> R) -> R {
        f(&mut *self.inner.write())
    }

    /// See [`Acl::is_allowed`].
    pub fn is_allowed(&self, role: &str, action: &str) -> bool {
        self.inner.read().is_allowed(role, action)
    }

    /// See [`Acl::allowed_roles`].
    pub fn allowed_roles(&self, action: &str) -> Vec<String> {
        self.inner
            .read()
            .allowed_roles(action)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// See [`Acl::explain`].
    pub fn explain(&self, role: &str, action: &str) -> Decision {
        self.inner.read().explain(role, action)
    }

    /// See [`Acl::roles`].
    pub fn roles(&self) -> Vec<String> {
        self.inner
            .read()
            .roles()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// See [`Acl::default_action`].
    pub fn default_action(&self) -> bool {
        self.inner.read().default_action()
    }

    /// See [`Acl::set_default_action`].
    pub fn set_default_action(&self, default_access: bool) -> &Self {
        self.inner.write().set_default_action(default_access);
        self
    }

    /// See [`Acl::add_role`].
    pub fn add_role<I, S>(&self, role: &str, parents: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.write().add_role(role, parents);
        self
    }

    /// See [`Acl::add_inherit`].
    pub fn add_inherit(&self, role: &str, parent: &str) -> &Self {
        self.inner.write().add_inherit(role, parent);
        self
    }

    /// See [`Acl::allow`].
    pub fn allow(&self, role: &str, action: &str) -> &Self {
        self.inner.write().allow(role, action);
        self
    }

    /// See [`Acl::deny`].
    pub fn deny(&self, role: &str, action: &str) -> &Self {
        self.inner.write().deny(role, action);
        self
    }
}

impl From<Acl> for SharedAcl {
    fn from(acl: Acl) -> Self {
        Self::new(acl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> SharedAcl {
        let shared = SharedAcl::default();
        shared
            .set_default_action(false)
            .add_role("Authorized", ["Unauthorized"])
            .allow("Unauthorized", "routes.*")
            .allow("Authorized", "user.me");
        shared
    }

    #[test]
    fn test_shared_reads() {
        let shared = policy();
        assert!(!shared.default_action());
        assert!(shared.is_allowed("Authorized", "routes.root"));
        assert_eq!(shared.roles(), vec!["Authorized", "Unauthorized"]);
        assert_eq!(shared.allowed_roles("user.me"), vec!["Authorized"]);
        assert!(shared.explain("Unauthorized", "user.me").is_default());
    }

    #[test]
    fn test_clones_share_state() {
        let shared = policy();
        let other = shared.clone();

        other.deny("Authorized", "routes.admin");
        assert!(!shared.is_allowed("Authorized", "routes.admin"));
        assert!(shared.is_allowed("Authorized", "routes.root"));
    }

    #[test]
    fn test_read_and_write_closures() {
        let shared = policy();
        let count = shared.write(|acl| {
            acl.add_inherit("Admin", "Authorized").allow("Admin", "*.*");
            acl.rule_count()
        });
        assert_eq!(count, 3);
        assert!(shared.read(|acl| acl.is_allowed("Admin", "billing.update")));
    }

    #[tokio::test]
    async fn test_concurrent_readers_and_writer() {
        let shared = policy();

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let acl = shared.clone();
                tokio::spawn(async move {
                    for _ in 0..100 {
                        assert!(acl.is_allowed("Authorized", "user.me"));
                        assert!(!acl.is_allowed("Unauthorized", "user.me"));
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        let writer = {
            let acl = shared.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    acl.allow("Authorized", &format!("report{}.read", i));
                    tokio::task::yield_now().await;
                }
            })
        };

        for reader in readers {
            reader.await.unwrap();
        }
        writer.await.unwrap();

        assert_eq!(shared.read(Acl::rule_count), 52);
        assert!(shared.is_allowed("Authorized", "report49.read"));
    }
}
