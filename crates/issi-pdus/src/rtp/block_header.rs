use core::fmt;

use issi_core::{BitBuffer, PduParseErr, let_field};

/// Block type tag of an ISSI block header
/// Bits: 7
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BlockType {
    FullRateVoice = 0,
    IssiPacketType = 1,
    RfPttControlWord = 2,
    IssiHeaderWord = 3,
    StartOfStream = 9,
    EndOfStream = 10,
    ManufacturerSpecific = 63,
}

impl std::convert::TryFrom<u64> for BlockType {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(BlockType::FullRateVoice),
            1 => Ok(BlockType::IssiPacketType),
            2 => Ok(BlockType::RfPttControlWord),
            3 => Ok(BlockType::IssiHeaderWord),
            9 => Ok(BlockType::StartOfStream),
            10 => Ok(BlockType::EndOfStream),
            63 => Ok(BlockType::ManufacturerSpecific),
            _ => Err(()),
        }
    }
}

impl BlockType {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        self as u64
    }
}

impl From<BlockType> for u64 {
    fn from(e: BlockType) -> Self { e.into_raw() }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::FullRateVoice => write!(f, "FullRateVoice"),
            BlockType::IssiPacketType => write!(f, "IssiPacketType"),
            BlockType::RfPttControlWord => write!(f, "RfPttControlWord"),
            BlockType::IssiHeaderWord => write!(f, "IssiHeaderWord"),
            BlockType::StartOfStream => write!(f, "StartOfStream"),
            BlockType::EndOfStream => write!(f, "EndOfStream"),
            BlockType::ManufacturerSpecific => write!(f, "ManufacturerSpecific"),
        }
    }
}

/// Block header, declaring the type of one block of the payload.
/// Full form is 4 octets: E(1) BT(7) TimestampOffset(14) BlockLength(10).
/// Compact form is the first octet only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// 1 bit, payload type indicator
    pub payload_type: bool,
    pub block_type: BlockType,
    /// 14 bits
    pub timestamp_offset: u16,
    /// 10 bits
    pub block_length: u16,
}

impl BlockHeader {
    pub const LENGTH: usize = 4;
    pub const COMPACT_LENGTH: usize = 1;

    pub fn new(block_type: BlockType) -> Self {
        BlockHeader {
            payload_type: false,
            block_type,
            timestamp_offset: 0,
            block_length: 0,
        }
    }

    pub fn size(compact: bool) -> usize {
        if compact { Self::COMPACT_LENGTH } else { Self::LENGTH }
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer, compact: bool) -> Result<Self, PduParseErr> {
        let payload_type = buffer.read_flag("payload_type")?;
        let_field!(buffer, block_type, 7);
        let block_type = BlockType::try_from(block_type)
            .map_err(|_| PduParseErr::InvalidValue { field: "block_type", value: block_type })?;

        if compact {
            return Ok(BlockHeader { payload_type, block_type, timestamp_offset: 0, block_length: 0 });
        }

        let_field!(buffer, timestamp_offset, 14);
        let_field!(buffer, block_length, 10);
        Ok(BlockHeader {
            payload_type,
            block_type,
            timestamp_offset: timestamp_offset as u16,
            block_length: block_length as u16,
        })
    }

    /// Serialize into the given BitBuffer. Field values are masked to their widths.
    pub fn to_bitbuf(&self, buffer: &mut BitBuffer, compact: bool) {
        buffer.write_flag(self.payload_type);
        buffer.write_bits(self.block_type.into_raw(), 7);
        if compact {
            return;
        }
        buffer.write_bits((self.timestamp_offset & 0x3FFF) as u64, 14);
        buffer.write_bits((self.block_length & 0x3FF) as u64, 10);
    }
}

impl fmt::Display for BlockHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BlockHeader {{ e: {} bt: {} tso: {} len: {} }}",
            self.payload_type,
            self.block_type,
            self.timestamp_offset,
            self.block_length,
        )
    }
}
