//! Weak listener registries.
//!
//! A [`ListenerSet`] keeps non-owning handles to its observers, so membership
//! never extends the lifetime of either side. Entries are identified by the
//! address of the shared allocation, which makes inserting the same listener
//! twice a no-op. Dead entries are purged on every mutation.
//!
//! [`Notifier`] wraps a set in a `RefCell` and dispatches on a snapshot: the
//! borrow is released before any listener runs, so listeners may subscribe,
//! unsubscribe or trigger nested notifications from inside a callback.

use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

fn address_of<L: ?Sized>(listener: &Weak<L>) -> usize {
    Weak::as_ptr(listener) as *const () as usize
}

pub struct ListenerSet<L: ?Sized> {
    entries: Vec<(usize, Weak<L>)>,
}

impl<L: ?Sized> fmt::Debug for ListenerSet<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("entry_count", &self.entries.len())
            .finish()
    }
}

impl<L: ?Sized> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> ListenerSet<L> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns `false` if the listener was already present.
    pub fn insert(&mut self, listener: Weak<L>) -> bool {
        self.purge();
        let address = address_of(&listener);
        if self.entries.iter().any(|(existing, _)| *existing == address) {
            return false;
        }
        self.entries.push((address, listener));
        true
    }

    /// Returns `true` if the listener was present.
    pub fn remove(&mut self, listener: &Weak<L>) -> bool {
        self.purge();
        let address = address_of(listener);
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != address);
        self.entries.len() != before
    }

    pub fn contains(&self, listener: &Weak<L>) -> bool {
        let address = address_of(listener);
        self.entries
            .iter()
            .any(|(existing, weak)| *existing == address && weak.strong_count() > 0)
    }

    /// Upgrade every live listener, in insertion order.
    pub fn snapshot(&self) -> SmallVec<[Rc<L>; 4]> {
        self.entries
            .iter()
            .filter_map(|(_, weak)| weak.upgrade())
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.alive_count() == 0
    }

    fn purge(&mut self) {
        self.entries.retain(|(_, weak)| weak.strong_count() > 0);
    }
}

/// Interior-mutable listener set with snapshot dispatch.
pub struct Notifier<L: ?Sized> {
    listeners: RefCell<ListenerSet<L>>,
}

impl<L: ?Sized> fmt::Debug for Notifier<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.borrow().alive_count())
            .finish()
    }
}

impl<L: ?Sized> Default for Notifier<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> Notifier<L> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(ListenerSet::new()),
        }
    }

    pub fn subscribe(&self, listener: Weak<L>) -> bool {
        self.listeners.borrow_mut().insert(listener)
    }

    pub fn unsubscribe(&self, listener: &Weak<L>) -> bool {
        self.listeners.borrow_mut().remove(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().alive_count()
    }

    pub fn for_each(&self, mut f: impl FnMut(&L)) {
        let snapshot = self.listeners.borrow().snapshot();
        for listener in snapshot.iter() {
            f(listener);
        }
    }
}

#[cfg(test)]
#[path = "tests/listener_set_tests.rs"]
mod tests;
