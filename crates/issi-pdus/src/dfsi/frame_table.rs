//! Layout of the eighteen DFSI voice sub-frames carried in an FNE LDU1/LDU2 message

pub const P25_DFSI_LDU1_VOICE1: u8 = 0x62;
pub const P25_DFSI_LDU1_VOICE2: u8 = 0x63;
pub const P25_DFSI_LDU1_VOICE3: u8 = 0x64;
pub const P25_DFSI_LDU1_VOICE4: u8 = 0x65;
pub const P25_DFSI_LDU1_VOICE5: u8 = 0x66;
pub const P25_DFSI_LDU1_VOICE6: u8 = 0x67;
pub const P25_DFSI_LDU1_VOICE7: u8 = 0x68;
pub const P25_DFSI_LDU1_VOICE8: u8 = 0x69;
pub const P25_DFSI_LDU1_VOICE9: u8 = 0x6A;

pub const P25_DFSI_LDU2_VOICE10: u8 = 0x6B;
pub const P25_DFSI_LDU2_VOICE11: u8 = 0x6C;
pub const P25_DFSI_LDU2_VOICE12: u8 = 0x6D;
pub const P25_DFSI_LDU2_VOICE13: u8 = 0x6E;
pub const P25_DFSI_LDU2_VOICE14: u8 = 0x6F;
pub const P25_DFSI_LDU2_VOICE15: u8 = 0x70;
pub const P25_DFSI_LDU2_VOICE16: u8 = 0x71;
pub const P25_DFSI_LDU2_VOICE17: u8 = 0x72;
pub const P25_DFSI_LDU2_VOICE18: u8 = 0x73;

/// Sub-frame types of an LDU1, in transmission order
pub const LDU1_FRAME_TYPES: [u8; 9] = [
    P25_DFSI_LDU1_VOICE1,
    P25_DFSI_LDU1_VOICE2,
    P25_DFSI_LDU1_VOICE3,
    P25_DFSI_LDU1_VOICE4,
    P25_DFSI_LDU1_VOICE5,
    P25_DFSI_LDU1_VOICE6,
    P25_DFSI_LDU1_VOICE7,
    P25_DFSI_LDU1_VOICE8,
    P25_DFSI_LDU1_VOICE9,
];

/// Sub-frame types of an LDU2, in transmission order
pub const LDU2_FRAME_TYPES: [u8; 9] = [
    P25_DFSI_LDU2_VOICE10,
    P25_DFSI_LDU2_VOICE11,
    P25_DFSI_LDU2_VOICE12,
    P25_DFSI_LDU2_VOICE13,
    P25_DFSI_LDU2_VOICE14,
    P25_DFSI_LDU2_VOICE15,
    P25_DFSI_LDU2_VOICE16,
    P25_DFSI_LDU2_VOICE17,
    P25_DFSI_LDU2_VOICE18,
];

/// Sub-frame lengths, identical for the LDU1 and LDU2 sequences
pub const DFSI_FRAME_LENGTHS: [usize; 9] = [22, 14, 17, 17, 17, 17, 17, 17, 16];

/// Which metadata bytes precede the IMBE codeword in a sub-frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaLayout {
    /// Byte 6: RSSI. Always written as zero.
    Rssi,
    /// IMBE follows the frame type directly
    None,
    /// Bytes 1..3: LCO, MFId, service options
    LinkControl,
    /// Bytes 1..3: talkgroup address, BE24
    DstId,
    /// Bytes 1..3: source address, BE24
    SrcId,
    /// Bytes 1..2: low speed data
    Lsd,
    /// Bytes 1..3: one third of the message indicator, selected by the chunk index 0..2
    MessageIndicator(usize),
    /// Byte 1: algorithm id, bytes 2..3: key id BE16
    Encryption,
    /// Bytes 1..3: Reed-Solomon parity, not modelled, kept zero
    Parity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfsiFrameSpec {
    pub frame_type: u8,
    pub length: usize,
    pub imbe_offset: usize,
    pub meta: MetaLayout,
}

const fn spec(frame_type: u8, length: usize, imbe_offset: usize, meta: MetaLayout) -> DfsiFrameSpec {
    DfsiFrameSpec { frame_type, length, imbe_offset, meta }
}

pub static DFSI_FRAME_TABLE: [DfsiFrameSpec; 18] = [
    spec(P25_DFSI_LDU1_VOICE1, 22, 10, MetaLayout::Rssi),
    spec(P25_DFSI_LDU1_VOICE2, 14, 1, MetaLayout::None),
    spec(P25_DFSI_LDU1_VOICE3, 17, 5, MetaLayout::LinkControl),
    spec(P25_DFSI_LDU1_VOICE4, 17, 5, MetaLayout::DstId),
    spec(P25_DFSI_LDU1_VOICE5, 17, 5, MetaLayout::SrcId),
    spec(P25_DFSI_LDU1_VOICE6, 17, 5, MetaLayout::Parity),
    spec(P25_DFSI_LDU1_VOICE7, 17, 5, MetaLayout::Parity),
    spec(P25_DFSI_LDU1_VOICE8, 17, 5, MetaLayout::Parity),
    spec(P25_DFSI_LDU1_VOICE9, 16, 4, MetaLayout::Lsd),
    spec(P25_DFSI_LDU2_VOICE10, 22, 10, MetaLayout::Rssi),
    spec(P25_DFSI_LDU2_VOICE11, 14, 1, MetaLayout::None),
    spec(P25_DFSI_LDU2_VOICE12, 17, 5, MetaLayout::MessageIndicator(0)),
    spec(P25_DFSI_LDU2_VOICE13, 17, 5, MetaLayout::MessageIndicator(1)),
    spec(P25_DFSI_LDU2_VOICE14, 17, 5, MetaLayout::MessageIndicator(2)),
    spec(P25_DFSI_LDU2_VOICE15, 17, 5, MetaLayout::Encryption),
    spec(P25_DFSI_LDU2_VOICE16, 17, 5, MetaLayout::Parity),
    spec(P25_DFSI_LDU2_VOICE17, 17, 5, MetaLayout::Parity),
    spec(P25_DFSI_LDU2_VOICE18, 16, 4, MetaLayout::Lsd),
];

/// Look up the layout of a sub-frame type. None for anything outside 0x62..=0x73.
pub fn frame_spec(frame_type: u8) -> Option<&'static DfsiFrameSpec> {
    if !(P25_DFSI_LDU1_VOICE1..=P25_DFSI_LDU2_VOICE18).contains(&frame_type) {
        return None;
    }
    let spec = &DFSI_FRAME_TABLE[(frame_type - P25_DFSI_LDU1_VOICE1) as usize];
    debug_assert_eq!(spec.frame_type, frame_type);
    Some(spec)
}
