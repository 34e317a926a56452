use std::sync::{Arc, Mutex};

use issi_entities::{NetworkPeer, RemoteCallRequest, RtpMediaType, RtpSession};

/// One packet handed to a RecordingSession
#[derive(Debug, Clone)]
pub struct SentPacket {
    pub media: RtpMediaType,
    pub payload: Vec<u8>,
    pub timestamp: u32,
    pub marker: u8,
    pub duration: u32,
}

/// RTP session sink for testing purposes
/// Collects all sent packets and hangups for later inspection
#[derive(Default)]
pub struct RecordingSession {
    packets: Mutex<Vec<SentPacket>>,
    hangups: Mutex<usize>,
}

impl RecordingSession {
    pub fn take_packets(&self) -> Vec<SentPacket> {
        std::mem::take(&mut *self.packets.lock().unwrap())
    }

    pub fn hangups(&self) -> usize {
        *self.hangups.lock().unwrap()
    }
}

impl RtpSession for RecordingSession {
    fn send_rtp_raw(&self, media: RtpMediaType, payload: &[u8], timestamp: u32, marker: u8, duration: u32) {
        tracing::debug!("send_rtp_raw: {} bytes ts {}", payload.len(), timestamp);
        self.packets.lock().unwrap().push(SentPacket {
            media,
            payload: payload.to_vec(),
            timestamp,
            marker,
            duration,
        });
    }

    fn hangup(&self) {
        tracing::debug!("hangup");
        *self.hangups.lock().unwrap() += 1;
    }
}

/// ISSI peer sink. Records every call request and hands out a fresh RecordingSession for each,
/// unless told to refuse.
#[derive(Default)]
pub struct RecordingPeer {
    requests: Mutex<Vec<RemoteCallRequest>>,
    sessions: Mutex<Vec<Arc<RecordingSession>>>,
    refuse: Mutex<bool>,
}

impl RecordingPeer {
    pub fn set_refuse(&self, refuse: bool) {
        *self.refuse.lock().unwrap() = refuse;
    }

    pub fn requests(&self) -> Vec<RemoteCallRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn sessions(&self) -> Vec<Arc<RecordingSession>> {
        self.sessions.lock().unwrap().clone()
    }
}

impl NetworkPeer for RecordingPeer {
    fn call_remote(&self, req: &RemoteCallRequest) -> Option<Arc<dyn RtpSession>> {
        tracing::debug!("call_remote: {:?}", req);
        self.requests.lock().unwrap().push(req.clone());
        if *self.refuse.lock().unwrap() {
            return None;
        }
        let session = Arc::new(RecordingSession::default());
        self.sessions.lock().unwrap().push(session.clone());
        Some(session)
    }
}
