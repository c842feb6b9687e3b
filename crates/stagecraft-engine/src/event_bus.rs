//! Synchronous, multi-listener event bus.
//!
//! Listeners subscribe to an event kind and run inline during `emit`, in
//! the order they were attached. A listener receives the event and a
//! mutable context; events it wants to raise are queued on the context
//! and dispatched, FIFO, before the outer `emit` returns.

use std::hash::Hash;

/// An event that can be routed by kind.
pub trait Event {
    type Kind: Copy + Eq + Hash;

    fn kind(&self) -> Self::Kind;
}

impl Event for stagecraft_core::events::GameEvent {
    type Kind = stagecraft_core::events::EventKind;

    fn kind(&self) -> Self::Kind {
        stagecraft_core::events::GameEvent::kind(self)
    }
}

/// A context that can collect events raised by listeners.
pub trait EventQueue<E> {
    /// Take the events queued since the last call.
    fn drain_queued(&mut self) -> Vec<E>;
}

/// Handle returned by `on`, used to detach the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Handler<E, C> = Box<dyn FnMut(&E, &mut C)>;

struct Listener<E: Event, C> {
    id: ListenerId,
    kind: E::Kind,
    handler: Handler<E, C>,
}

/// Dispatcher over a closed event type `E`, handing listeners a `C`.
pub struct EventBus<E: Event, C> {
    listeners: Vec<Listener<E, C>>,
    next_id: u64,
}

impl<E: Event, C> Default for EventBus<E, C> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E: Event, C: EventQueue<E>> EventBus<E, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener for one event kind.
    pub fn on<F>(&mut self, kind: E::Kind, handler: F) -> ListenerId
    where
        F: FnMut(&E, &mut C) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Detach a listener. Returns false if it was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener of its kind, then deliver any
    /// events those listeners queued, until the queue is empty.
    pub fn emit(&mut self, event: E, ctx: &mut C) {
        let mut pending = std::collections::VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            let kind = event.kind();
            for listener in self.listeners.iter_mut().filter(|l| l.kind == kind) {
                (listener.handler)(&event, ctx);
            }
            pending.extend(ctx.drain_queued());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listener_count_for(&self, kind: E::Kind) -> usize {
        self.listeners.iter().filter(|l| l.kind == kind).count()
    }
}
