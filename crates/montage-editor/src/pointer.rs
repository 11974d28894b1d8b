//! Global pointer-move stream.
//!
//! The UI publishes raw client-space pointer positions on a [`PointerBus`].
//! Consumers hold a [`PointerSubscription`] for exactly as long as they need
//! the stream; dropping it unsubscribes.

use std::sync::{Arc, Weak};

use crossbeam_channel::{Receiver, Sender};
use montage_core::Point;
use parking_lot::Mutex;
use tracing::trace;

/// One pointer-move event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMove {
    pub client: Point,
}

#[derive(Debug, Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<(u64, Sender<PointerMove>)>,
}

/// Fan-out of pointer-move events to live subscriptions. Clones share subscribers.
#[derive(Debug, Default, Clone)]
pub struct PointerBus {
    inner: Arc<Mutex<BusInner>>,
}

impl PointerBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start receiving pointer moves.
    pub fn subscribe(&self) -> PointerSubscription {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, sender));
        trace!(subscription = id, "Pointer subscribed");
        PointerSubscription {
            id,
            receiver,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver a pointer move to every subscriber. Returns how many received it.
    pub fn publish(&self, client_x: f64, client_y: f64) -> usize {
        let event = PointerMove {
            client: Point::new(client_x, client_y),
        };
        let inner = self.inner.lock();
        inner
            .subscribers
            .iter()
            .filter(|(_, sender)| sender.send(event).is_ok())
            .count()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

/// A live registration on a [`PointerBus`].
#[derive(Debug)]
pub struct PointerSubscription {
    id: u64,
    receiver: Receiver<PointerMove>,
    bus: Weak<Mutex<BusInner>>,
}

impl PointerSubscription {
    /// Most recent event since the last call, discarding older ones.
    pub fn latest(&self) -> Option<PointerMove> {
        self.receiver.try_iter().last()
    }
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.lock().subscribers.retain(|(id, _)| *id != self.id);
            trace!(subscription = self.id, "Pointer unsubscribed");
        }
    }
}
