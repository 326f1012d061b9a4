//! Event bus routing helpers.

use crate::payloads::{DEFAULT_REPLAY_CAPACITY, EventEnvelope, EventId, UiEvent};
use chrono::Utc;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Handler = Rc<dyn Fn(&EventEnvelope)>;

struct BusState {
    next_id: EventId,
    next_subscriber: u64,
    replay: VecDeque<EventEnvelope>,
    replay_capacity: usize,
    subscribers: Vec<(u64, Handler)>,
    pending: VecDeque<EventEnvelope>,
    dispatching: bool,
}

/// Shared, single-threaded event bus for widgets living on the UI event loop.
#[derive(Clone)]
pub struct EventBus {
    state: Rc<RefCell<BusState>>,
}

impl EventBus {
    /// Construct a bus with a custom replay capacity.
    ///
    /// A capacity of zero disables replay. The ring grows on demand past
    /// [`DEFAULT_REPLAY_CAPACITY`] instead of reserving it up front.
    #[must_use]
    pub fn with_capacity(replay_capacity: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(BusState {
                next_id: 1,
                next_subscriber: 1,
                replay: VecDeque::with_capacity(replay_capacity.min(DEFAULT_REPLAY_CAPACITY)),
                replay_capacity,
                subscribers: Vec::new(),
                pending: VecDeque::new(),
                dispatching: false,
            })),
        }
    }

    /// Construct a bus with the default replay capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPLAY_CAPACITY)
    }

    /// Register a handler for every subsequently published event.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// dropped.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn subscribe(&self, handler: impl Fn(&EventEnvelope) + 'static) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_subscriber;
        state.next_subscriber = state.next_subscriber.saturating_add(1);
        state.subscribers.push((id, Rc::new(handler)));
        Subscription {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    /// Publish a new event to all subscribers and return its identifier.
    ///
    /// When called from inside a handler the event is queued and delivered
    /// after the in-flight dispatch finishes, preserving publish order.
    pub fn publish(&self, event: UiEvent) -> EventId {
        let envelope = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id = state.next_id.saturating_add(1);
            let envelope = EventEnvelope {
                id,
                timestamp: Utc::now(),
                event,
            };
            if state.replay_capacity > 0 {
                if state.replay.len() == state.replay_capacity {
                    let _ = state.replay.pop_front();
                }
                state.replay.push_back(envelope.clone());
            }
            state.pending.push_back(envelope.clone());
            if state.dispatching {
                tracing::trace!(id, kind = envelope.event.kind(), "queued nested event");
                return id;
            }
            state.dispatching = true;
            envelope
        };
        let id = envelope.id;
        self.drain();
        id
    }

    /// Last event id observed in the replay buffer.
    #[must_use]
    pub fn last_event_id(&self) -> Option<EventId> {
        self.state.borrow().replay.back().map(|env| env.id)
    }

    /// Collect a backlog of events emitted after the specified id.
    #[must_use]
    pub fn backlog_since(&self, id: EventId) -> Vec<EventEnvelope> {
        self.state
            .borrow()
            .replay
            .iter()
            .filter(|env| env.id > id)
            .cloned()
            .collect()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }

    fn drain(&self) {
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                match state.pending.pop_front() {
                    Some(envelope) => {
                        let handlers = state
                            .subscribers
                            .iter()
                            .map(|(_, handler)| Rc::clone(handler))
                            .collect::<Vec<_>>();
                        Some((envelope, handlers))
                    }
                    None => {
                        state.dispatching = false;
                        None
                    }
                }
            };
            let Some((envelope, handlers)) = next else {
                break;
            };
            tracing::debug!(
                id = envelope.id,
                kind = envelope.event.kind(),
                subscribers = handlers.len(),
                "dispatching ui event"
            );
            for handler in handlers {
                handler(&envelope);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`EventBus::subscribe`]; unregisters on drop.
pub struct Subscription {
    id: u64,
    state: Weak<RefCell<BusState>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.state.upgrade()
            && let Ok(mut state) = shared.try_borrow_mut()
        {
            state.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::{DriverSelection, SelectorSlot};
    use std::cell::Cell;

    fn theme(name: &str) -> UiEvent {
        UiEvent::ThemeChanged {
            theme: name.to_string(),
        }
    }

    #[test]
    fn publish_and_replay_from_id() {
        let bus = EventBus::with_capacity(4);
        let first = bus.publish(theme("default"));
        let second = bus.publish(UiEvent::TableCollapsed { collapsed: true });

        assert_eq!(bus.last_event_id(), Some(second));
        let backlog = bus.backlog_since(first);
        assert_eq!(backlog.len(), 1);
        assert_eq!(backlog[0].id, second);
    }

    #[test]
    fn replay_ring_drops_oldest_events() {
        let bus = EventBus::with_capacity(2);
        for name in ["default", "ferrari", "mclaren"] {
            let _ = bus.publish(theme(name));
        }
        let backlog = bus.backlog_since(0);
        assert_eq!(backlog.len(), 2);
        assert_eq!(backlog[0].id, 2);
        assert_eq!(backlog[1].event, theme("mclaren"));
    }

    #[test]
    fn zero_capacity_disables_replay_but_still_delivers() {
        let bus = EventBus::with_capacity(0);
        let seen = Rc::new(Cell::new(0));
        let _sub = bus.subscribe({
            let seen = Rc::clone(&seen);
            move |_| seen.set(seen.get() + 1)
        });
        let _ = bus.publish(theme("ferrari"));
        assert_eq!(seen.get(), 1);
        assert_eq!(bus.last_event_id(), None);
    }

    #[test]
    fn oversized_capacity_allocates_lazily() {
        let bus = EventBus::with_capacity(usize::MAX);
        assert!(bus.state.borrow().replay.capacity() <= DEFAULT_REPLAY_CAPACITY);
        let first = bus.publish(theme("default"));
        let _ = bus.publish(theme("ferrari"));
        assert_eq!(bus.backlog_since(0).len(), 2);
        assert_eq!(bus.backlog_since(first).len(), 1);
    }

    #[test]
    fn subscribers_receive_events_in_order() {
        let bus = EventBus::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let _sub = bus.subscribe({
            let received = Rc::clone(&received);
            move |env| received.borrow_mut().push(env.id)
        });
        let a = bus.publish(theme("default"));
        let b = bus.publish(theme("mclaren"));
        assert_eq!(*received.borrow(), vec![a, b]);
    }

    #[test]
    fn dropping_subscription_unregisters_handler() {
        let bus = EventBus::new();
        let seen = Rc::new(Cell::new(0));
        let sub = bus.subscribe({
            let seen = Rc::clone(&seen);
            move |_| seen.set(seen.get() + 1)
        });
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        let _ = bus.publish(theme("default"));
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn nested_publish_is_delivered_after_current_dispatch() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let _relay = bus.subscribe({
            let bus = bus.clone();
            move |env| {
                if let UiEvent::DriverSelected(selection) = &env.event {
                    let _ = bus.publish(UiEvent::ComparisonReady {
                        driver1: selection.driver.clone(),
                        driver2: "verstappen".into(),
                    });
                }
            }
        });
        let _log = bus.subscribe({
            let order = Rc::clone(&order);
            move |env| order.borrow_mut().push(env.event.kind())
        });

        let _ = bus.publish(UiEvent::DriverSelected(DriverSelection {
            driver: "hamilton".into(),
            selector: SelectorSlot::First,
        }));

        assert_eq!(
            *order.borrow(),
            vec!["driver_selected", "comparison_ready"]
        );
    }
}
