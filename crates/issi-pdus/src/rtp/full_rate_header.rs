use core::fmt;

use issi_core::{BitBuffer, PduParseErr, let_field};

/// Full-rate ISSI header word, 1 octet: VBB(2) SuperFrameCnt(2) reserved(4)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullRateIssiHeader {
    /// 2 bits, number of voice blocks bundled in this packet
    pub voice_block_bundling: u8,
    /// 2 bits
    pub super_frame_cnt: u8,
}

impl FullRateIssiHeader {
    pub const LENGTH: usize = 1;

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let_field!(buffer, voice_block_bundling, 2);
        let_field!(buffer, super_frame_cnt, 2);
        let_field!(buffer, _reserved, 4);

        Ok(FullRateIssiHeader {
            voice_block_bundling: voice_block_bundling as u8,
            super_frame_cnt: super_frame_cnt as u8,
        })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) {
        buffer.write_bits((self.voice_block_bundling & 0x3) as u64, 2);
        buffer.write_bits((self.super_frame_cnt & 0x3) as u64, 2);
        buffer.write_zeroes(4);
    }
}

impl fmt::Display for FullRateIssiHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FullRateIssiHeader {{ vbb: {} sf: {} }}", self.voice_block_bundling, self.super_frame_cnt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_rate_header() {
        let hdr = FullRateIssiHeader { voice_block_bundling: 3, super_frame_cnt: 2 };
        let mut buf = BitBuffer::new(8);
        hdr.to_bitbuf(&mut buf);
        assert_eq!(buf.to_bitstr(), "11100000");
        buf.seek(0);
        assert_eq!(FullRateIssiHeader::from_bitbuf(&mut buf).unwrap(), hdr);
    }
}
