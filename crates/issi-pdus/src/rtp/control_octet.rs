use core::fmt;

use issi_core::{BitBuffer, PduParseErr, let_field};

/// First octet of every ISSI RTP payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlOctet {
    /// 1 bit. Set on packets carrying PTT signalling
    pub signal: bool,
    /// 1 bit. Block headers use the one-byte compact form
    pub compact: bool,
    /// 6 bits, number of block headers following this octet
    pub block_header_count: u8,
}

impl ControlOctet {
    pub const LENGTH: usize = 1;

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let signal = buffer.read_flag("signal")?;
        let compact = buffer.read_flag("compact")?;
        let_field!(buffer, block_header_count, 6);

        Ok(ControlOctet {
            signal,
            compact,
            block_header_count: block_header_count as u8,
        })
    }

    /// Serialize into the given BitBuffer. The header count is masked to 6 bits.
    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) {
        buffer.write_flag(self.signal);
        buffer.write_flag(self.compact);
        buffer.write_bits((self.block_header_count & 0x3F) as u64, 6);
    }
}

impl fmt::Display for ControlOctet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ControlOctet {{ signal: {} compact: {} bhc: {} }}",
            self.signal,
            self.compact,
            self.block_header_count,
        )
    }
}
