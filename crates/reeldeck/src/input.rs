use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use slab::Slab;

/// Arrow keys the carousel reacts to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NavKey {
    Up,
    Down,
}

/// Viewport wide input, already translated from the windowing toolkit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedInput {
    /// Positive `delta_y` scrolls towards the next item.
    Wheel { delta_y: f32 },
    Key(NavKey),
    TouchStart { y: f32 },
    TouchMove { y: f32 },
    TouchEnd,
    TouchCancel,
}

type Listener<E> = Box<dyn FnMut(&E)>;
type Listeners<E> = Rc<RefCell<Slab<Listener<E>>>>;

/// A single threaded input bus. Subscribers hold a [`ListenerHandle`]; the
/// listener is removed when the handle drops.
pub struct InputChannel<E> {
    listeners: Listeners<E>,
}

impl<E> Default for InputChannel<E> {
    fn default() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Slab::new())),
        }
    }
}

impl<E> InputChannel<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&E) + 'static) -> ListenerHandle<E> {
        let key = self.listeners.borrow_mut().insert(Box::new(listener));
        ListenerHandle {
            key,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Calls every live listener in subscription order.
    ///
    /// Listeners must not subscribe or drop handles while being dispatched to.
    pub fn dispatch(&self, event: &E) {
        let mut listeners = self.listeners.borrow_mut();
        for (_, listener) in listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Owned subscription to an [`InputChannel`].
pub struct ListenerHandle<E> {
    key: usize,
    listeners: Weak<RefCell<Slab<Listener<E>>>>,
}

impl<E> ListenerHandle<E> {
    pub fn is_attached(&self) -> bool {
        self.listeners
            .upgrade()
            .is_some_and(|l| l.borrow().contains(self.key))
    }
}

impl<E> Drop for ListenerHandle<E> {
    fn drop(&mut self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };

        let mut listeners = listeners.borrow_mut();
        if !listeners.contains(self.key) {
            return;
        }

        // release the borrow before running the listener's destructor
        let listener = listeners.remove(self.key);
        drop(listeners);
        drop(listener);
    }
}

impl<E> fmt::Debug for ListenerHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("key", &self.key)
            .field("attached", &self.is_attached())
            .finish()
    }
}
