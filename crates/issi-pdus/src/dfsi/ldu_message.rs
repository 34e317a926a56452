use issi_core::{IMBE_BUF_LEN, P25Duid, P25_MSG_HDR_SIZE};

use super::call_data::RemoteCallData;
use super::codec::{DfsiError, DfsiVoiceFrame, decode_voice_frame, write_voice_frame};
use super::frame_table::{DFSI_FRAME_LENGTHS, LDU1_FRAME_TYPES, LDU2_FRAME_TYPES};

/// Size of the reassembled LDU scratch buffer
pub const LDU_BUF_LEN: usize = 216;

/// Offsets of the nine IMBE codewords inside a reassembled LDU buffer
pub const LDU_IMBE_OFFSETS: [usize; 9] = [10, 26, 55, 80, 105, 130, 155, 180, 204];

/// Byte of the FNE message header holding the total message length
pub const LDU_COUNT_OFFSET: usize = 23;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LduKind {
    Ldu1,
    Ldu2,
}

impl LduKind {
    pub fn from_duid(duid: P25Duid) -> Option<Self> {
        match duid {
            P25Duid::Ldu1 => Some(LduKind::Ldu1),
            P25Duid::Ldu2 => Some(LduKind::Ldu2),
            _ => None,
        }
    }

    /// DFSI sub-frame types of this LDU, in transmission order
    pub fn frame_types(self) -> &'static [u8; 9] {
        match self {
            LduKind::Ldu1 => &LDU1_FRAME_TYPES,
            LduKind::Ldu2 => &LDU2_FRAME_TYPES,
        }
    }
}

impl core::fmt::Display for LduKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LduKind::Ldu1 => write!(f, "LDU1"),
            LduKind::Ldu2 => write!(f, "LDU2"),
        }
    }
}

/// Copy codeword `n` (0..9) out of a reassembled LDU buffer
pub fn ldu_imbe(ldu: &[u8; LDU_BUF_LEN], n: usize) -> [u8; IMBE_BUF_LEN] {
    let mut imbe = [0u8; IMBE_BUF_LEN];
    let off = LDU_IMBE_OFFSETS[n];
    imbe.copy_from_slice(&ldu[off..off + IMBE_BUF_LEN]);
    imbe
}

/// Total message length of an LDU message: header plus all nine sub-frames
pub fn ldu_message_len() -> usize {
    P25_MSG_HDR_SIZE + DFSI_FRAME_LENGTHS.iter().sum::<usize>()
}

/// Compose the nine sub-frames of an LDU into `out`, starting right after the message header.
/// The cumulative byte count is written into the header's length byte and returned.
/// Header bytes other than the length byte are left untouched.
/// Panics if `out` is shorter than the resulting message.
pub fn encode_ldu_message(
    kind: LduKind,
    call_data: &RemoteCallData,
    ldu: &[u8; LDU_BUF_LEN],
    out: &mut [u8],
) -> Result<usize, DfsiError> {
    let count = ldu_message_len();
    if count > u8::MAX as usize {
        return Err(DfsiError::LengthOverflow(count));
    }
    assert!(out.len() >= count, "LDU message target too short: need {} bytes, have {}", count, out.len());

    let mut offset = P25_MSG_HDR_SIZE;
    for (n, frame_type) in kind.frame_types().iter().enumerate() {
        let imbe = ldu_imbe(ldu, n);
        offset += write_voice_frame(out, offset, *frame_type, call_data, &imbe)?;
    }
    debug_assert_eq!(offset, count);

    out[LDU_COUNT_OFFSET] = count as u8;
    Ok(count)
}

/// Walk the sub-frames of a complete FNE LDU message, header included
pub fn decode_ldu_message(data: &[u8]) -> Result<Vec<DfsiVoiceFrame>, DfsiError> {
    if data.len() < P25_MSG_HDR_SIZE {
        return Err(DfsiError::TooShort { frame_type: 0, expected: P25_MSG_HDR_SIZE, found: data.len() });
    }
    let mut frames = Vec::with_capacity(9);
    let mut offset = P25_MSG_HDR_SIZE;
    for len in DFSI_FRAME_LENGTHS {
        let frame = decode_voice_frame(&data[offset.min(data.len())..])?;
        frames.push(frame);
        offset += len;
    }
    Ok(frames)
}
