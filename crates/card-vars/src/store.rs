//! Shared variable store.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, RwLock};

use crate::event::{ChangeOrigin, VariableEvent, VariableReceiver};
use crate::key::RenderKey;
use crate::set::VariableSet;

/// Current bindings with their render key.
struct Snapshot {
    vars: Arc<VariableSet>,
    key: RenderKey,
}

struct Inner {
    /// Current snapshot (atomically swappable).
    current: RwLock<Snapshot>,
    /// Serializes writers so generations advance one at a time.
    write_lock: Mutex<()>,
    subscribers: Mutex<Vec<mpsc::Sender<VariableEvent>>>,
}

/// Shared store of variable bindings.
///
/// Cloning the store yields another handle to the same bindings, so every
/// origin of changes (manual edits, the structured editor, title lookup) can
/// hold one.
///
/// # Thread Safety
///
/// - Readers get an `Arc<VariableSet>` snapshot that is never partially updated
/// - Writers replace the snapshot whole; an upsert is a copy-on-write replacement
/// - Each write advances the generation by exactly one
#[derive(Clone)]
pub struct VariableStore {
    inner: Arc<Inner>,
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableStore {
    /// Create a store holding an empty set at generation 0.
    #[must_use]
    pub fn new() -> Self {
        Self::with_variables(VariableSet::new())
    }

    /// Create a store with initial bindings at generation 0.
    #[must_use]
    pub fn with_variables(vars: VariableSet) -> Self {
        let key = RenderKey::compute(0, &vars);
        Self {
            inner: Arc::new(Inner {
                current: RwLock::new(Snapshot {
                    vars: Arc::new(vars),
                    key,
                }),
                write_lock: Mutex::new(()),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Current bindings.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Arc<VariableSet> {
        Arc::clone(&self.inner.current.read().unwrap().vars)
    }

    /// Current render key.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn render_key(&self) -> RenderKey {
        self.inner.current.read().unwrap().key.clone()
    }

    /// Bindings and render key read under one lock.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn snapshot_with_key(&self) -> (Arc<VariableSet>, RenderKey) {
        let current = self.inner.current.read().unwrap();
        (Arc::clone(&current.vars), current.key.clone())
    }

    /// Replace all bindings.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn replace(&self, vars: VariableSet, origin: ChangeOrigin) -> RenderKey {
        let _guard = self.inner.write_lock.lock().unwrap();
        self.commit(vars, origin)
    }

    /// Insert or overwrite a single binding.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn upsert(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
        origin: ChangeOrigin,
    ) -> RenderKey {
        let _guard = self.inner.write_lock.lock().unwrap();
        let mut vars = VariableSet::clone(&self.snapshot());
        vars.insert(name, value);
        self.commit(vars, origin)
    }

    /// Subscribe to change events.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn subscribe(&self) -> VariableReceiver {
        let (tx, rx) = mpsc::channel();
        self.inner.subscribers.lock().unwrap().push(tx);
        VariableReceiver::new(rx)
    }

    /// Swap in the new snapshot and notify subscribers. Caller holds `write_lock`.
    fn commit(&self, vars: VariableSet, origin: ChangeOrigin) -> RenderKey {
        let key = {
            let mut current = self.inner.current.write().unwrap();
            let key = RenderKey::compute(current.key.generation() + 1, &vars);
            *current = Snapshot {
                vars: Arc::new(vars),
                key: key.clone(),
            };
            key
        };

        tracing::debug!(key = %key, ?origin, "Variables replaced");

        let event = VariableEvent {
            key: key.clone(),
            origin,
        };
        self.inner
            .subscribers
            .lock()
            .unwrap()
            .retain(|tx| tx.send(event.clone()).is_ok());

        key
    }
}
