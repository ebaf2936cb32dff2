//! Observable selection store
//!
//! Owns the one [`SelectionState`] of a running viewer. Every state change is
//! pushed to subscribers; reads are plain snapshots.

use tracing::debug;

use crate::selection::{ManipulationMode, Propagation, SelectionEvent, SelectionState, transition};

/// Old and new state handed to subscribers after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: SelectionState,
    pub current: SelectionState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&SelectionChange)>;

#[derive(Default)]
pub struct SelectionStore {
    state: SelectionState,
    revision: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn snapshot(&self) -> SelectionState {
        self.state.clone()
    }

    pub fn current(&self) -> Option<&str> {
        self.state.current.as_deref()
    }

    pub fn mode(&self) -> ManipulationMode {
        self.state.mode
    }

    /// Bumped on every change; lets renderers tell whether anything moved.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&SelectionChange) + 'static,
    ) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Runs one event through the state machine and notifies on change.
    pub fn dispatch(&mut self, event: SelectionEvent<'_>) -> Propagation {
        let (next, propagation) = transition(&self.state, event);
        if next != self.state {
            debug!(
                ?event,
                from = ?self.state.current,
                to = ?next.current,
                mode = %next.mode,
                "selection changed"
            );
            let change = SelectionChange {
                previous: std::mem::replace(&mut self.state, next),
                current: self.state.clone(),
            };
            self.revision += 1;
            for (_, subscriber) in &mut self.subscribers {
                subscriber(&change);
            }
        }
        propagation
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::selection::MissKind;

    #[test]
    fn subscribers_see_every_change() {
        let mut store = SelectionStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |change| sink.borrow_mut().push(change.current.clone()));

        store.dispatch(SelectionEvent::Click("DNA"));
        store.dispatch(SelectionEvent::ContextMenu("DNA"));
        store.dispatch(SelectionEvent::PointerMissed(MissKind::Click));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], SelectionState::selected("DNA", ManipulationMode::Translate));
        assert_eq!(seen[1], SelectionState::selected("DNA", ManipulationMode::Rotate));
        assert_eq!(seen[2].current, None);
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn no_op_events_do_not_notify() {
        let mut store = SelectionStore::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        store.subscribe(move |_| *c.borrow_mut() += 1);

        store.dispatch(SelectionEvent::PointerMissed(MissKind::Click));
        store.dispatch(SelectionEvent::ContextMenu("DNA"));
        store.dispatch(SelectionEvent::PointerEnter("DNA"));
        assert_eq!(*count.borrow(), 0);
        assert_eq!(store.revision(), 0);

        store.dispatch(SelectionEvent::Click("DNA"));
        store.dispatch(SelectionEvent::Click("DNA"));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving() {
        let mut store = SelectionStore::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let id = store.subscribe(move |_| *c.borrow_mut() += 1);

        store.dispatch(SelectionEvent::Click("DNA"));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(SelectionEvent::Click("Table"));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut store = SelectionStore::new();
        store.dispatch(SelectionEvent::Click("DNA"));
        let snap = store.snapshot();
        store.dispatch(SelectionEvent::Click("Curly"));
        assert_eq!(snap.current.as_deref(), Some("DNA"));
        assert_eq!(store.current(), Some("Curly"));
    }
}
