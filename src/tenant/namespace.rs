//! Tenant identifiers and the per-request isolation scope.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

/// Longest accepted tenant identifier.
const MAX_TENANT_ID_LEN: usize = 100;

/// A resolved tenant identifier fails the namespace validity check.
///
/// This is a platform-level misconfiguration, not a user error; callers
/// must fail the request before any tree or namespace access occurs.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid tenant id {raw:?}: {reason}")]
pub struct InvalidTenantId {
    pub raw: String,
    pub reason: &'static str,
}

/// An opaque, validated tenant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    /// Validate a raw identifier. Namespace validity: non-empty, bounded
    /// length, characters limited to `[0-9A-Za-z._-]`.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidTenantId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidTenantId {
                raw,
                reason: "empty",
            });
        }
        if raw.len() > MAX_TENANT_ID_LEN {
            return Err(InvalidTenantId {
                raw,
                reason: "too long",
            });
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
        {
            return Err(InvalidTenantId {
                raw,
                reason: "disallowed character",
            });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The platform service holding the active storage/execution namespace.
///
/// Collaborators (tree, script runner) observe the namespace through this
/// service; the dispatcher switches it per request via [`ScopeGuard`].
pub trait NamespaceManager: Send + Sync {
    /// The currently active namespace, `None` for the default namespace.
    fn current(&self) -> Option<TenantId>;

    /// Replace the active namespace.
    fn set(&self, namespace: Option<TenantId>);
}

tokio::task_local! {
    static ACTIVE_NAMESPACE: RefCell<Option<TenantId>>;
}

/// Run `fut` with its own namespace slot.
///
/// Each scoped future carries its own slot, so concurrently polled
/// requests never observe or clobber each other's namespace.
pub async fn scoped<F>(fut: F) -> F::Output
where
    F: Future,
{
    ACTIVE_NAMESPACE.scope(RefCell::new(None), fut).await
}

/// Namespace manager backed by the [`scoped`] task-local slot.
///
/// Every instance reads the slot of whichever scope is currently being
/// polled. Outside a scope, reads see the default namespace and writes
/// are dropped.
#[derive(Default)]
pub struct TaskLocalNamespaces;

impl NamespaceManager for TaskLocalNamespaces {
    fn current(&self) -> Option<TenantId> {
        ACTIVE_NAMESPACE
            .try_with(|slot| slot.borrow().clone())
            .ok()
            .flatten()
    }

    fn set(&self, namespace: Option<TenantId>) {
        let _ = ACTIVE_NAMESPACE.try_with(|slot| *slot.borrow_mut() = namespace);
    }
}

/// Scoped namespace switch with guaranteed restore.
///
/// Saves the prior namespace on entry and restores it on drop, so every
/// exit path (early return, `?`, panic unwind) restores exactly once.
pub struct ScopeGuard {
    manager: Arc<dyn NamespaceManager>,
    saved: Option<TenantId>,
}

impl ScopeGuard {
    /// Switch the active namespace, returning a guard that restores the
    /// prior value when dropped.
    pub fn enter(manager: Arc<dyn NamespaceManager>, namespace: Option<TenantId>) -> Self {
        let saved = manager.current();
        manager.set(namespace);
        Self { manager, saved }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.manager.set(self.saved.take());
    }
}
