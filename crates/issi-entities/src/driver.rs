use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::P25DataHandler;
use crate::fne::P25DataEvent;

/// Delivers FNE events to a handler, strictly in arrival order.
/// Events may be submitted from any thread through `sender()`; they are
/// processed on the thread calling `run_pending` or `run`.
pub struct FneDriver {
    handler: Box<dyn P25DataHandler>,
    event_sender: Sender<P25DataEvent>,
    event_receiver: Receiver<P25DataEvent>,
}

impl FneDriver {
    pub fn new(handler: Box<dyn P25DataHandler>) -> Self {
        let (event_sender, event_receiver) = unbounded();
        Self {
            handler,
            event_sender,
            event_receiver,
        }
    }

    pub fn sender(&self) -> Sender<P25DataEvent> {
        self.event_sender.clone()
    }

    pub fn submit(&self, ev: P25DataEvent) {
        tracing::trace!(stream = ev.stream_id, "submit {} from peer {}", ev.duid, ev.peer_id);
        // Receiver is owned by self, so the channel cannot be disconnected here
        let _ = self.event_sender.send(ev);
    }

    pub fn get_queue_len(&self) -> usize {
        self.event_receiver.len()
    }

    /// Deliver one event through validate, preprocess and on_data
    pub fn deliver(&self, ev: &P25DataEvent) {
        if !self.handler.validate(ev) {
            return;
        }
        self.handler.preprocess(ev);
        self.handler.on_data(ev);
    }

    /// Deliver all queued events without blocking. Returns the number of events taken from the queue.
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        while let Ok(ev) = self.event_receiver.try_recv() {
            self.deliver(&ev);
            count += 1;
        }
        count
    }

    /// Block and deliver events until every external sender has been dropped
    pub fn run(self) {
        let FneDriver { handler, event_sender, event_receiver } = self;
        drop(event_sender);
        for ev in event_receiver.iter() {
            if handler.validate(&ev) {
                handler.preprocess(&ev);
                handler.on_data(&ev);
            }
        }
        tracing::info!("FneDriver: all event senders closed, stopping");
    }
}
