use issi_core::bitbuffer::{be_u16, be_u24};
use issi_core::{CallType, FneFrameType, P25Duid, P25_MSG_HDR_SIZE, PeerId, StreamId};

/// Offset of the system id (BE16) in the FNE message header
const SYS_ID_OFFSET: usize = 11;
/// Offset of the network id (BE24) in the FNE message header
const NET_ID_OFFSET: usize = 16;
/// Offset of the total message length byte in the FNE message header
const LENGTH_OFFSET: usize = 23;

/// P25 traffic received from the FNE, already split into its routing fields
#[derive(Debug, Clone)]
pub struct P25DataEvent {
    pub peer_id: PeerId,
    pub src_id: u32,
    pub dst_id: u32,
    pub call_type: CallType,
    pub duid: P25Duid,
    pub frame_type: FneFrameType,
    pub stream_id: StreamId,
    /// Raw FNE message, header included
    pub data: Vec<u8>,
}

/// Fields of the FNE message header needed by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FneMessageHeader {
    /// 12 bits
    pub sys_id: u16,
    /// Network id (WACN), BE24 on the wire
    pub net_id: u32,
    /// Total message length as declared by the header
    pub length: usize,
}

impl P25DataEvent {
    /// Parse the FNE message header. None if the message is shorter than the header.
    pub fn header(&self) -> Option<FneMessageHeader> {
        if self.data.len() < P25_MSG_HDR_SIZE {
            return None;
        }
        Some(FneMessageHeader {
            sys_id: be_u16(&self.data, SYS_ID_OFFSET),
            net_id: be_u24(&self.data, NET_ID_OFFSET),
            length: self.data[LENGTH_OFFSET] as usize,
        })
    }

    /// The DFSI payload following the header, up to the declared length.
    /// A declared length past the end of the message is clamped to it.
    pub fn payload(&self) -> &[u8] {
        let Some(hdr) = self.header() else {
            return &[];
        };
        let end = hdr.length.min(self.data.len());
        if end <= P25_MSG_HDR_SIZE {
            return &[];
        }
        &self.data[P25_MSG_HDR_SIZE..end]
    }
}
