//! Sticky tenant fallback store.
//!
//! A best-effort memory of the most recently resolved query-parameter
//! tenant id, consulted when no other resolution signal is present. The
//! slot is a single value, overwritten on each discovery, and is only
//! sound in single-worker deployments; production wires
//! [`DisabledStickyStore`].

use std::sync::Mutex;

/// Injected single-slot store for the sticky tenant id.
pub trait StickyTenantStore: Send + Sync {
    /// The most recently recorded tenant id, if any.
    fn load(&self) -> Option<String>;

    /// Overwrite the slot with a newly discovered tenant id.
    fn record(&self, tenant_id: &str);
}

/// In-memory slot for single-worker/dev deployments.
#[derive(Default)]
pub struct InMemoryStickyStore {
    slot: Mutex<Option<String>>,
}

impl StickyTenantStore for InMemoryStickyStore {
    fn load(&self) -> Option<String> {
        self.slot.lock().expect("sticky mutex poisoned").clone()
    }

    fn record(&self, tenant_id: &str) {
        *self.slot.lock().expect("sticky mutex poisoned") = Some(tenant_id.to_string());
    }
}

/// Production implementation: remembers nothing, returns nothing.
pub struct DisabledStickyStore;

impl StickyTenantStore for DisabledStickyStore {
    fn load(&self) -> Option<String> {
        None
    }

    fn record(&self, _tenant_id: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_slot_is_overwritten() {
        let store = InMemoryStickyStore::default();
        assert_eq!(store.load(), None);

        store.record("acme");
        assert_eq!(store.load().as_deref(), Some("acme"));

        store.record("globex");
        assert_eq!(store.load().as_deref(), Some("globex"));
    }

    #[test]
    fn disabled_store_stays_empty() {
        let store = DisabledStickyStore;
        store.record("acme");
        assert_eq!(store.load(), None);
    }
}
