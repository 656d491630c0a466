//! Scoped registration of global input listeners.
//!
//! Registering returns a [`ListenerGuard`]; the listener stays installed
//! exactly as long as the guard lives.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    KeyDown,
    PointerMove,
    PointerUp,
}

#[derive(Debug, Default)]
struct Registrations {
    next_id: u64,
    active: Vec<(u64, ListenerKind)>,
}

/// Stand-in for the host's global listener table (window/document)
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Registrations>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, kind: ListenerKind) -> ListenerGuard {
        let mut registrations = lock(&self.inner);
        let id = registrations.next_id;
        registrations.next_id += 1;
        registrations.active.push((id, kind));
        tracing::trace!(id, ?kind, "Listener registered");

        ListenerGuard {
            registry: Arc::downgrade(&self.inner),
            id,
            kind,
        }
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.count(kind) > 0
    }

    pub fn count(&self, kind: ListenerKind) -> usize {
        lock(&self.inner)
            .active
            .iter()
            .filter(|(_, k)| *k == kind)
            .count()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock(inner: &Mutex<Registrations>) -> MutexGuard<'_, Registrations> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Deregisters its listener on drop
#[derive(Debug)]
pub struct ListenerGuard {
    registry: Weak<Mutex<Registrations>>,
    id: u64,
    kind: ListenerKind,
}

impl ListenerGuard {
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            lock(&inner).active.retain(|(id, _)| *id != self.id);
            tracing::trace!(id = self.id, kind = ?self.kind, "Listener removed");
        }
    }
}
