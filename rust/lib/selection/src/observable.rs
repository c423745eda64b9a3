use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Callback type for value change notifications.
pub type ChangeHandler<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

/// Unique handle for a subscription, returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// A single observable value with late-subscriber delivery.
///
/// - `get()` reads the current snapshot (Arc clone, no data copy).
/// - `subscribe(handler)` calls the handler with the current snapshot right
///   away, then with every published value in order.
/// - `unsubscribe(id)` removes a handler.
///
/// Clones share the same value and subscriber list. Only the owning crate can
/// publish, so a handle given to a presentation layer is read-only.
///
/// Handlers run synchronously on the publishing thread. A handler must not
/// call `subscribe` on the same observable.
pub struct Observable<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    /// Latest published snapshot.
    value: RwLock<Arc<T>>,
    /// Active handlers in subscription order.
    handlers: RwLock<Vec<HandlerEntry<T>>>,
    /// Held while delivering, so a new subscriber's initial snapshot and a
    /// concurrent publish cannot reach it out of order. Guards no data, so a
    /// handler panic leaves nothing to recover.
    delivery: Mutex<()>,
    /// Monotonic counter for subscription IDs.
    next_id: AtomicU64,
}

struct HandlerEntry<T> {
    id: SubscriptionId,
    handler: ChangeHandler<T>,
}

impl<T> Clone for HandlerEntry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: self.handler.clone(),
        }
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(Arc::new(initial)),
                handlers: RwLock::new(Vec::new()),
                delivery: Mutex::new(()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Current snapshot.
    pub fn get(&self) -> Arc<T> {
        self.inner.value.read().unwrap().clone()
    }

    /// Register a handler. It receives the current snapshot before this call
    /// returns, then every later value.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        let _delivery = self.inner.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let handler: ChangeHandler<T> = Arc::new(handler);
        self.inner.handlers.write().unwrap().push(HandlerEntry {
            id,
            handler: handler.clone(),
        });

        let current = self.get();
        handler(&current);
        id
    }

    /// Remove a handler. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.handlers.write().unwrap().retain(|entry| entry.id != id);
    }

    /// Number of active handlers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.read().unwrap().len()
    }

    /// Replace the value and notify every handler.
    pub(crate) fn publish(&self, value: T) {
        let _delivery = self.inner.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        let value = Arc::new(value);
        *self.inner.value.write().unwrap() = value.clone();

        // Snapshot the list so a handler may unsubscribe itself.
        let entries = self.inner.handlers.read().unwrap().clone();
        for entry in entries {
            (entry.handler)(&value);
        }
    }

    /// Drop every handler.
    pub(crate) fn clear(&self) {
        self.inner.handlers.write().unwrap().clear();
    }
}
