use core::fmt;

use issi_core::{BitBuffer, PduParseErr, let_field};

/// RF PTT control word, 8 octets: WACN(20) SysId(12) UnitID(24) Priority(8)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PttControl {
    /// 20 bits
    pub wacn: u32,
    /// 12 bits
    pub sys_id: u16,
    /// 24 bits
    pub unit_id: u32,
    pub priority: u8,
}

impl PttControl {
    pub const LENGTH: usize = 8;

    /// Unpack from the big-endian 64-bit word. Total over any input.
    pub fn decode(data: &[u8; Self::LENGTH]) -> Self {
        let value = u64::from_be_bytes(*data);
        PttControl {
            wacn: ((value >> 44) & 0xF_FFFF) as u32,
            sys_id: ((value >> 32) & 0xFFF) as u16,
            unit_id: ((value >> 8) & 0xFF_FFFF) as u32,
            priority: (value & 0xFF) as u8,
        }
    }

    /// Pack into the big-endian 64-bit word. Out-of-range fields are truncated.
    pub fn encode(&self) -> [u8; Self::LENGTH] {
        let mut value = (self.wacn & 0xF_FFFF) as u64;
        value = (value << 12) | (self.sys_id & 0xFFF) as u64;
        value = (value << 24) | (self.unit_id & 0xFF_FFFF) as u64;
        value = (value << 8) | self.priority as u64;
        value.to_be_bytes()
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let_field!(buffer, ptt_control, 64);
        Ok(Self::decode(&ptt_control.to_be_bytes()))
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) {
        buffer.write_bits(u64::from_be_bytes(self.encode()), 64);
    }
}

impl fmt::Display for PttControl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PttControl {{ wacn: 0x{:05X} sysid: 0x{:03X} unit: {} priority: {} }}",
            self.wacn,
            self.sys_id,
            self.unit_id,
            self.priority,
        )
    }
}
