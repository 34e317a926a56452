use core::fmt;

use issi_core::{BitBuffer, PduParseErr};

use super::block_header::{BlockHeader, BlockType};
use super::control_octet::ControlOctet;
use super::full_rate_header::FullRateIssiHeader;
use super::full_rate_voice::FullRateVoice;
use super::packet_type::{IssiPacketType, PacketType};
use super::ptt_control::PttControl;

/// One ISSI RTP payload. Blocks are written in fixed order: control octet, block headers,
/// packet type, PTT control word, full-rate header and voice blocks, additional frame data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssiPayload {
    /// The block header count is taken from `block_headers` on encode
    pub control: ControlOctet,
    pub block_headers: Vec<BlockHeader>,
    pub packet_type: IssiPacketType,
    pub ptt: Option<PttControl>,
    pub full_rate_header: Option<FullRateIssiHeader>,
    pub full_rate_voice: Vec<FullRateVoice>,
    pub additional_frame_data: Option<Vec<u8>>,
}

impl IssiPayload {
    /// PTT start packet for a newly keyed call
    pub fn ptt_start(ptt: PttControl) -> Self {
        IssiPayload {
            control: ControlOctet { signal: true, compact: false, block_header_count: 1 },
            block_headers: vec![BlockHeader::new(BlockType::RfPttControlWord)],
            packet_type: IssiPacketType::new(PacketType::PttTransmitStart),
            ptt: Some(ptt),
            full_rate_header: None,
            full_rate_voice: Vec::new(),
            additional_frame_data: None,
        }
    }

    /// Voice progress packet bundling the given voice blocks
    pub fn voice_progress(voices: Vec<FullRateVoice>, super_frame_cnt: u8) -> Self {
        debug_assert!(voices.len() <= 3, "at most 3 voice blocks fit the bundling field");
        IssiPayload {
            control: ControlOctet { signal: true, compact: false, block_header_count: 1 },
            block_headers: vec![BlockHeader::new(BlockType::FullRateVoice)],
            packet_type: IssiPacketType::new(PacketType::PttTransmitProgress),
            ptt: None,
            full_rate_header: Some(FullRateIssiHeader {
                voice_block_bundling: voices.len() as u8 & 0x3,
                super_frame_cnt: super_frame_cnt & 0x3,
            }),
            full_rate_voice: voices,
            additional_frame_data: None,
        }
    }

    /// Exact number of bytes written by `encode`
    pub fn size(&self) -> usize {
        let mut size = ControlOctet::LENGTH;
        size += self.block_headers.len() * BlockHeader::size(self.control.compact);
        size += IssiPacketType::LENGTH;
        if self.ptt.is_some() {
            size += PttControl::LENGTH;
        }
        if self.full_rate_header.is_some() {
            size += FullRateIssiHeader::LENGTH;
        }
        size += self.full_rate_voice.iter().map(FullRateVoice::size).sum::<usize>();
        size += self.additional_frame_data.as_ref().map_or(0, |d| d.len());
        size
    }

    pub fn encode(&self) -> Vec<u8> {
        let size = self.size();
        let mut buffer = BitBuffer::new(size * 8);

        let control = ControlOctet {
            block_header_count: self.block_headers.len() as u8,
            ..self.control
        };
        control.to_bitbuf(&mut buffer);
        for hdr in &self.block_headers {
            hdr.to_bitbuf(&mut buffer, self.control.compact);
        }
        self.packet_type.to_bitbuf(&mut buffer);
        if let Some(ref ptt) = self.ptt {
            ptt.to_bitbuf(&mut buffer);
        }
        if let Some(ref frh) = self.full_rate_header {
            frh.to_bitbuf(&mut buffer);
        }
        for voice in &self.full_rate_voice {
            buffer.write_bytes(&voice.to_bytes());
        }
        if let Some(ref extra) = self.additional_frame_data {
            buffer.write_bytes(extra);
        }

        debug_assert_eq!(buffer.get_pos(), size * 8);
        buffer.into_bytes()
    }

    /// Encode into the start of `out`, returning the number of bytes written.
    /// Panics if `out` is shorter than `size()`.
    pub fn encode_into(&self, out: &mut [u8]) -> usize {
        let size = self.size();
        assert!(out.len() >= size, "IssiPayload target too short: need {} bytes, have {}", size, out.len());
        out[..size].copy_from_slice(&self.encode());
        size
    }

    /// Parse a payload. PTT control is expected when an RF PTT control word header is present,
    /// the full-rate header and its bundled 14-byte voice blocks when a full-rate voice header is.
    /// Anything left over becomes additional frame data.
    pub fn decode(data: &[u8]) -> Result<Self, PduParseErr> {
        let mut buffer = BitBuffer::from_bytes(data);

        let control = ControlOctet::from_bitbuf(&mut buffer)?;
        let mut block_headers = Vec::with_capacity(control.block_header_count as usize);
        for _ in 0..control.block_header_count {
            block_headers.push(BlockHeader::from_bitbuf(&mut buffer, control.compact)?);
        }
        let packet_type = IssiPacketType::from_bitbuf(&mut buffer)?;

        let has_block = |bt: BlockType| block_headers.iter().any(|h| h.block_type == bt);

        let ptt = if has_block(BlockType::RfPttControlWord) {
            Some(PttControl::from_bitbuf(&mut buffer)?)
        } else {
            None
        };

        let mut full_rate_voice = Vec::new();
        let full_rate_header = if has_block(BlockType::FullRateVoice) {
            let frh = FullRateIssiHeader::from_bitbuf(&mut buffer)?;
            for _ in 0..frh.voice_block_bundling {
                let block = buffer.read_bytes(FullRateVoice::LENGTH, "full_rate_voice")?;
                // Cannot fail, length is exact
                let voice = FullRateVoice::decode(&block)
                    .ok_or(PduParseErr::BufferEnded { field: Some("full_rate_voice") })?;
                full_rate_voice.push(voice);
            }
            Some(frh)
        } else {
            None
        };

        let remaining = buffer.read_remaining_bytes();
        let additional_frame_data = if remaining.is_empty() { None } else { Some(remaining) };

        Ok(IssiPayload {
            control,
            block_headers,
            packet_type,
            ptt,
            full_rate_header,
            full_rate_voice,
            additional_frame_data,
        })
    }
}

impl fmt::Display for IssiPayload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "IssiPayload {{ {} headers: [", self.control)?;
        for hdr in &self.block_headers {
            write!(f, " {}", hdr.block_type)?;
        }
        write!(f, " ] {}", self.packet_type)?;
        if let Some(ref ptt) = self.ptt {
            write!(f, " {}", ptt)?;
        }
        if let Some(ref frh) = self.full_rate_header {
            write!(f, " {}", frh)?;
        }
        for voice in &self.full_rate_voice {
            write!(f, " {}", voice)?;
        }
        if let Some(ref extra) = self.additional_frame_data {
            write!(f, " extra: {:02X?}", extra)?;
        }
        write!(f, " }}")
    }
}
