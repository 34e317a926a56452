use std::sync::Arc;

use issi_core::StreamId;

/// RTP media type handed to the transport with every packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtpMediaType {
    Audio,
    Video,
    Application,
}

/// Request to open an outbound ISSI call for a local FNE stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCallRequest {
    pub sys_id: u16,
    pub net_id: u32,
    pub dst_id: u32,
    pub group: bool,
    pub stream_id: StreamId,
}

/// Outbound RTP session towards the ISSI peer
pub trait RtpSession: Send + Sync {
    /// Queue one RTP payload for transmission
    fn send_rtp_raw(&self, media: RtpMediaType, payload: &[u8], timestamp: u32, marker: u8, duration: u32);

    /// Tear down the session
    fn hangup(&self);
}

/// The ISSI side of the gateway, able to open outbound calls
pub trait NetworkPeer: Send + Sync {
    /// Open an outbound call. None if the remote side refused or is unavailable.
    fn call_remote(&self, req: &RemoteCallRequest) -> Option<Arc<dyn RtpSession>>;
}
