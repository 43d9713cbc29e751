//! Change Subscriptions
//!
//! Collaborators (typically a rendering layer) watch a set of properties
//! and are called once per propagation cycle in which at least one of them
//! actually changed.
//!
//! Registering returns a [`Subscription`]. Dropping it unregisters the
//! callback; [`Subscription::detach`] keeps the callback for the lifetime
//! of the model instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use smallvec::SmallVec;

use super::model::Model;
use crate::graph::PropertyId;

/// Unique identifier for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Callback invoked after a propagation cycle.
pub type ChangeCallback = Arc<dyn Fn(&Model, &ChangeSet) + Send + Sync>;

/// The properties whose value changed during one propagation cycle, in
/// commit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    ids: Vec<PropertyId>,
    names: Vec<String>,
}

impl ChangeSet {
    pub(crate) fn new(ids: Vec<PropertyId>, names: Vec<String>) -> Self {
        Self { ids, names }
    }

    pub fn ids(&self) -> &[PropertyId] {
        &self.ids
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

struct Subscriber {
    id: SubscriberId,
    watched: SmallVec<[PropertyId; 4]>,
    callback: ChangeCallback,
}

type Shared = Arc<Mutex<Vec<Subscriber>>>;

/// Subscribers of one model instance.
#[derive(Default)]
pub(crate) struct SubscriberList {
    inner: Shared,
}

impl SubscriberList {
    pub(crate) fn add(
        &self,
        watched: SmallVec<[PropertyId; 4]>,
        callback: ChangeCallback,
    ) -> Subscription {
        let id = SubscriberId::new();
        self.inner.lock().push(Subscriber {
            id,
            watched,
            callback,
        });
        Subscription {
            id,
            list: Some(Arc::downgrade(&self.inner)),
        }
    }

    /// Callbacks watching any property in `changes`, in registration order.
    ///
    /// The list lock is released before the callbacks run, so a callback may
    /// drop its own subscription.
    pub(crate) fn interested(&self, changes: &ChangeSet) -> Vec<ChangeCallback> {
        self.inner
            .lock()
            .iter()
            .filter(|s| s.watched.iter().any(|w| changes.ids().contains(w)))
            .map(|s| s.callback.clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

/// Handle to a registered change callback.
#[must_use = "dropping a Subscription unregisters its callback"]
pub struct Subscription {
    id: SubscriberId,
    list: Option<Weak<Mutex<Vec<Subscriber>>>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Unregister now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}

    /// Keep the callback registered for as long as the model lives.
    pub fn detach(mut self) {
        self.list = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(list) = self.list.take().and_then(|weak| weak.upgrade()) {
            list.lock().retain(|s| s.id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.list.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn noop() -> ChangeCallback {
        Arc::new(|_: &Model, _: &ChangeSet| {})
    }

    fn id(i: usize) -> PropertyId {
        PropertyId::from_index(i)
    }

    #[test]
    fn subscriber_ids_are_unique() {
        let id1 = SubscriberId::new();
        let id2 = SubscriberId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn drop_unregisters() {
        let list = SubscriberList::default();
        let sub = list.add(smallvec![id(0)], noop());
        assert_eq!(list.len(), 1);

        drop(sub);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn detach_keeps_callback() {
        let list = SubscriberList::default();
        list.add(smallvec![id(0)], noop()).detach();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn filters_by_watched_properties() {
        let list = SubscriberList::default();
        let _a = list.add(smallvec![id(0)], noop());
        let _b = list.add(smallvec![id(1), id(2)], noop());

        let changes = ChangeSet::new(vec![id(2)], vec!["c".into()]);
        assert_eq!(list.interested(&changes).len(), 1);

        let none = ChangeSet::new(vec![id(3)], vec!["d".into()]);
        assert!(list.interested(&none).is_empty());
    }
}
