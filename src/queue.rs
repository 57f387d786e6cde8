//! Single-consumer event queue in front of the engine.
//!
//! Producers (discovery workers, the command layer, the viewer's location
//! stream) each hold an [`EventSender`]. One thread owns the engine and the
//! [`EventReceiver`], and applies events strictly in arrival order. The queue
//! itself knows nothing about tours.

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::engine::{Engine, EngineEvent};
use crate::publish::ContextSink;

/// Create a connected sender/receiver pair.
pub fn channel() -> (EventSender, EventReceiver) {
    let (sender, receiver) = unbounded();
    (EventSender { sender }, EventReceiver { receiver })
}

/// Cloneable producer handle.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: Sender<EngineEvent>,
}

impl EventSender {
    /// Queue an event. Returns `false` once the receiver is gone.
    pub fn send(&self, event: EngineEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// The engine-side end of the queue.
#[derive(Debug)]
pub struct EventReceiver {
    receiver: Receiver<EngineEvent>,
}

impl EventReceiver {
    /// Apply every event queued so far without blocking. Returns how many were applied.
    pub fn drain<S: ContextSink>(&self, engine: &mut Engine<S>) -> usize {
        let mut applied = 0;
        for event in self.receiver.try_iter() {
            engine.handle(event);
            applied += 1;
        }
        applied
    }

    /// Apply events as they arrive until every sender is dropped.
    pub fn run<S: ContextSink>(self, engine: &mut Engine<S>) {
        for event in self.receiver.iter() {
            engine.handle(event);
        }
        tracing::debug!("event queue closed");
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}
