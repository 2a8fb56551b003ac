//! Event listener registry
//!
//! Callbacks run synchronously, in registration order, on the thread that
//! ticks the hub.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Token returned by [`Listeners::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ListenerHandle(u32);

type Callback<E> = Box<dyn FnMut(&E)>;

/// Ordered set of callbacks for one event type
pub struct Listeners<E> {
    entries: Vec<(ListenerHandle, Callback<E>)>,
    next_handle: u32,
}

impl<E> Listeners<E> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_handle: 0,
        }
    }

    /// Register a callback
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerHandle
    where
        F: FnMut(&E) + 'static,
    {
        let handle = ListenerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.entries.push((handle, Box::new(callback)));
        handle
    }

    /// Remove a callback; returns false if the handle was not registered
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        self.entries.len() != before
    }

    /// Call every listener with `event`
    pub fn emit(&mut self, event: &E) {
        for (_, callback) in self.entries.iter_mut() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}
