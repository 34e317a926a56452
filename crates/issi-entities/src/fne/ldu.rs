//! Validation and reassembly of the DFSI payload of FNE LDU1/LDU2 messages

use issi_core::IMBE_BUF_LEN;
use issi_pdus::dfsi::frame_table::DFSI_FRAME_LENGTHS;
use issi_pdus::dfsi::{LDU_BUF_LEN, LduKind, ldu_imbe};

/// Payload offsets of the nine sub-frame type markers
pub const LDU_MARKER_OFFSETS: [usize; 9] = [0, 22, 36, 53, 70, 87, 104, 121, 138];

/// Offsets of the nine reassembled sub-frames in the LDU buffer
pub const LDU_CHUNK_OFFSETS: [usize; 9] = [0, 25, 50, 75, 100, 125, 150, 175, 200];

/// Minimum payload length holding all nine sub-frames
pub const LDU_PAYLOAD_LEN: usize = 154;

/// 216-byte scratch buffer holding one reassembled LDU
#[derive(Clone)]
pub struct LduBuffer {
    buf: [u8; LDU_BUF_LEN],
}

impl Default for LduBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LduBuffer {
    pub fn new() -> Self {
        LduBuffer { buf: [0; LDU_BUF_LEN] }
    }

    pub fn as_bytes(&self) -> &[u8; LDU_BUF_LEN] {
        &self.buf
    }

    /// IMBE codeword `n` (0..9)
    pub fn imbe(&self, n: usize) -> [u8; IMBE_BUF_LEN] {
        ldu_imbe(&self.buf, n)
    }

    /// Reassembled sub-frame `n` (0..9), starting with its type marker
    pub fn sub_frame(&self, n: usize) -> &[u8] {
        let off = LDU_CHUNK_OFFSETS[n];
        &self.buf[off..off + DFSI_FRAME_LENGTHS[n]]
    }
}

impl core::fmt::Debug for LduBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "LduBuffer {{ {:02X?} }}", self.buf)
    }
}

/// Check the nine sub-frame markers of an LDU payload
pub fn validate_markers(kind: LduKind, payload: &[u8]) -> bool {
    if payload.len() < LDU_PAYLOAD_LEN {
        return false;
    }
    kind.frame_types()
        .iter()
        .zip(LDU_MARKER_OFFSETS)
        .all(|(marker, off)| payload[off] == *marker)
}

/// Validate `payload` and copy its nine sub-frames into `ldu`.
/// On failure `ldu` is left untouched and false is returned.
pub fn reassemble(kind: LduKind, payload: &[u8], ldu: &mut LduBuffer) -> bool {
    if !validate_markers(kind, payload) {
        tracing::debug!("{} marker mismatch or short payload ({} bytes), dropping", kind, payload.len());
        return false;
    }

    for n in 0..9 {
        let src = LDU_MARKER_OFFSETS[n];
        let dst = LDU_CHUNK_OFFSETS[n];
        let len = DFSI_FRAME_LENGTHS[n];
        ldu.buf[dst..dst + len].copy_from_slice(&payload[src..src + len]);
    }
    true
}
