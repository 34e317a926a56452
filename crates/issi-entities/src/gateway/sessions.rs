use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use issi_core::StreamId;

use crate::fne::peer::{RtpMediaType, RtpSession};

/// Outbound RTP session of one call. Hangup reaches the session at most once.
pub struct SessionHandle {
    stream_id: StreamId,
    session: Arc<dyn RtpSession>,
    closed: AtomicBool,
}

impl SessionHandle {
    pub fn new(stream_id: StreamId, session: Arc<dyn RtpSession>) -> Self {
        SessionHandle {
            stream_id,
            session,
            closed: AtomicBool::new(false),
        }
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Send one payload. Dropped if the session was already hung up.
    pub fn send(&self, media: RtpMediaType, payload: &[u8], timestamp: u32, marker: u8, duration: u32) {
        if self.is_closed() {
            tracing::debug!(stream = self.stream_id, "send on closed session, dropping");
            return;
        }
        self.session.send_rtp_raw(media, payload, timestamp, marker, duration);
    }

    /// Returns true if this call actually closed the session
    pub fn hangup(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.session.hangup();
        true
    }
}

/// Outbound sessions keyed by the FNE stream id that opened them
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<StreamId, Arc<SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new session. A previous session for the same stream is returned so it can be closed.
    pub fn insert(&mut self, stream_id: StreamId, session: Arc<dyn RtpSession>) -> (Arc<SessionHandle>, Option<Arc<SessionHandle>>) {
        let handle = Arc::new(SessionHandle::new(stream_id, session));
        let previous = self.sessions.insert(stream_id, Arc::clone(&handle));
        (handle, previous)
    }

    pub fn get(&self, stream_id: StreamId) -> Option<Arc<SessionHandle>> {
        self.sessions.get(&stream_id).cloned()
    }

    pub fn remove(&mut self, stream_id: StreamId) -> Option<Arc<SessionHandle>> {
        self.sessions.remove(&stream_id)
    }

    pub fn drain(&mut self) -> Vec<Arc<SessionHandle>> {
        self.sessions.drain().map(|(_, h)| h).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
