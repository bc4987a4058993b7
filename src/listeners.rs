//! Step listener registry.
//!
//! Consumers subscribe to step events through an explicit observer
//! registry. Notification is synchronous, in registration order, and works
//! on a snapshot of the registry taken at the start of each round: a
//! listener may unregister itself or others mid-round without affecting
//! delivery to the listeners still pending in that round.
//!
//! The registry is not thread-safe. The handle is `Rc`-based and meant to
//! live on the thread that feeds the detector.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::trace;

use crate::error::ListenerError;
use crate::types::StepEvent;

/// Receives step notifications.
///
/// Callbacks run on the detector's calling thread, inside `process_sample`.
/// Keep them fast. An error aborts the round and propagates to the caller.
pub trait StepListener {
    fn on_step_detected(&self, event: &StepEvent) -> Result<(), ListenerError>;

    fn on_step_count_updated(&self, step_count: u64) -> Result<(), ListenerError>;
}

/// Handle returned by registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Entries {
    next_id: u64,
    listeners: Vec<(ListenerId, Rc<dyn StepListener>)>,
}

/// Insertion-ordered set of step listeners.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Entries>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. The same listener may be registered twice and
    /// is then notified twice.
    pub fn register(&self, listener: Rc<dyn StepListener>) -> ListenerId {
        let mut entries = self.inner.borrow_mut();
        let id = ListenerId(entries.next_id);
        entries.next_id += 1;
        entries.listeners.push((id, listener));
        trace!("registered step listener {:?}", id);
        id
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut entries = self.inner.borrow_mut();
        let before = entries.listeners.len();
        entries.listeners.retain(|(entry_id, _)| *entry_id != id);
        let removed = entries.listeners.len() != before;
        trace!("unregistered step listener {:?}: {}", id, removed);
        removed
    }

    pub fn unregister_all(&self) {
        self.inner.borrow_mut().listeners.clear();
        trace!("unregistered all step listeners");
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().listeners.is_empty()
    }

    /// Deliver one step to every listener registered when the round starts.
    ///
    /// Each listener receives the event and then the updated count before
    /// the next listener is called.
    pub fn notify(&self, event: &StepEvent, step_count: u64) -> Result<(), ListenerError> {
        let snapshot: Vec<Rc<dyn StepListener>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener.on_step_detected(event)?;
            listener.on_step_count_updated(step_count)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}

/// A listener that records everything it is told.
#[derive(Debug, Default)]
pub struct StepLog {
    events: RefCell<Vec<StepEvent>>,
    last_count: Cell<u64>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StepEvent> {
        self.events.borrow().clone()
    }

    pub fn last_count(&self) -> u64 {
        self.last_count.get()
    }
}

impl StepListener for StepLog {
    fn on_step_detected(&self, event: &StepEvent) -> Result<(), ListenerError> {
        self.events.borrow_mut().push(*event);
        Ok(())
    }

    fn on_step_count_updated(&self, step_count: u64) -> Result<(), ListenerError> {
        self.last_count.set(step_count);
        Ok(())
    }
}
