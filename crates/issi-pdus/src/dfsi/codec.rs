use core::fmt;

use issi_core::IMBE_BUF_LEN;
use issi_core::bitbuffer::{be_u16, be_u24, put_be_u16, put_be_u24};

use super::call_data::RemoteCallData;
use super::frame_table::{MetaLayout, frame_spec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DfsiError {
    /// Discriminant outside the VOICE1..VOICE18 range
    InvalidFrameType(u8),
    TooShort { frame_type: u8, expected: usize, found: usize },
    /// LDU message byte count does not fit the one-byte length field
    LengthOverflow(usize),
}

impl fmt::Display for DfsiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DfsiError::InvalidFrameType(ft) => write!(f, "invalid DFSI frame type 0x{:02X}", ft),
            DfsiError::TooShort { frame_type, expected, found } => {
                write!(f, "DFSI frame 0x{:02X} too short: need {} bytes, have {}", frame_type, expected, found)
            }
            DfsiError::LengthOverflow(len) => write!(f, "LDU message length {} exceeds 255", len),
        }
    }
}

impl std::error::Error for DfsiError {}

/// Metadata carried in front of the IMBE codeword of one sub-frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DfsiMetadata {
    Rssi(u8),
    None,
    LinkControl { lco: u8, mf_id: u8, service_options: u8 },
    DstId(u32),
    SrcId(u32),
    Lsd { lsd1: u8, lsd2: u8 },
    /// One third of the 9-byte message indicator
    MessageIndicator { index: usize, bytes: [u8; 3] },
    Encryption { algorithm_id: u8, key_id: u16 },
    Parity([u8; 3]),
}

/// One decoded DFSI voice sub-frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfsiVoiceFrame {
    pub frame_type: u8,
    pub meta: DfsiMetadata,
    pub imbe: [u8; IMBE_BUF_LEN],
}

impl fmt::Display for DfsiVoiceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DfsiVoiceFrame {{ frame_type: 0x{:02X} meta: {:?} imbe: {:02X?} }}",
            self.frame_type,
            self.meta,
            self.imbe,
        )
    }
}

/// Encode one sub-frame into a freshly allocated buffer of the table length
pub fn encode_voice_frame(frame_type: u8, call_data: &RemoteCallData, imbe: &[u8; IMBE_BUF_LEN]) -> Result<Vec<u8>, DfsiError> {
    let spec = frame_spec(frame_type).ok_or(DfsiError::InvalidFrameType(frame_type))?;
    let mut frame = vec![0u8; spec.length];
    write_voice_frame(&mut frame, 0, frame_type, call_data, imbe)?;
    Ok(frame)
}

/// Encode one sub-frame into `out` at `offset`, returning the number of bytes written.
/// Bytes of the sub-frame not covered by metadata or IMBE are zeroed.
/// Panics if `out` cannot hold the sub-frame at `offset`.
pub fn write_voice_frame(
    out: &mut [u8],
    offset: usize,
    frame_type: u8,
    call_data: &RemoteCallData,
    imbe: &[u8; IMBE_BUF_LEN],
) -> Result<usize, DfsiError> {
    let spec = frame_spec(frame_type).ok_or(DfsiError::InvalidFrameType(frame_type))?;
    assert!(
        out.len() >= offset + spec.length,
        "DFSI target too short: need {} bytes at offset {}, have {}",
        spec.length,
        offset,
        out.len()
    );

    let frame = &mut out[offset..offset + spec.length];
    frame.fill(0);
    frame[0] = frame_type;

    match spec.meta {
        MetaLayout::Rssi => frame[6] = 0,
        MetaLayout::None => {}
        MetaLayout::LinkControl => {
            frame[1] = call_data.lco;
            frame[2] = call_data.mf_id;
            frame[3] = call_data.service_options;
        }
        MetaLayout::DstId => put_be_u24(frame, 1, call_data.dst_id),
        MetaLayout::SrcId => put_be_u24(frame, 1, call_data.src_id),
        MetaLayout::Lsd => {
            frame[1] = call_data.lsd1;
            frame[2] = call_data.lsd2;
        }
        MetaLayout::MessageIndicator(index) => {
            frame[1..4].copy_from_slice(&call_data.message_indicator[index * 3..index * 3 + 3]);
        }
        MetaLayout::Encryption => {
            frame[1] = call_data.algorithm_id;
            put_be_u16(frame, 2, call_data.key_id);
        }
        MetaLayout::Parity => {}
    }

    frame[spec.imbe_offset..spec.imbe_offset + IMBE_BUF_LEN].copy_from_slice(imbe);
    Ok(spec.length)
}

/// Decode one sub-frame from the start of `data`. Trailing bytes beyond the table length are ignored.
pub fn decode_voice_frame(data: &[u8]) -> Result<DfsiVoiceFrame, DfsiError> {
    let Some(&frame_type) = data.first() else {
        return Err(DfsiError::TooShort { frame_type: 0, expected: 1, found: 0 });
    };
    let spec = frame_spec(frame_type).ok_or(DfsiError::InvalidFrameType(frame_type))?;
    if data.len() < spec.length {
        return Err(DfsiError::TooShort { frame_type, expected: spec.length, found: data.len() });
    }

    let meta = match spec.meta {
        MetaLayout::Rssi => DfsiMetadata::Rssi(data[6]),
        MetaLayout::None => DfsiMetadata::None,
        MetaLayout::LinkControl => DfsiMetadata::LinkControl {
            lco: data[1],
            mf_id: data[2],
            service_options: data[3],
        },
        MetaLayout::DstId => DfsiMetadata::DstId(be_u24(data, 1)),
        MetaLayout::SrcId => DfsiMetadata::SrcId(be_u24(data, 1)),
        MetaLayout::Lsd => DfsiMetadata::Lsd { lsd1: data[1], lsd2: data[2] },
        MetaLayout::MessageIndicator(index) => DfsiMetadata::MessageIndicator {
            index,
            bytes: [data[1], data[2], data[3]],
        },
        MetaLayout::Encryption => DfsiMetadata::Encryption {
            algorithm_id: data[1],
            key_id: be_u16(data, 2),
        },
        MetaLayout::Parity => DfsiMetadata::Parity([data[1], data[2], data[3]]),
    };

    let mut imbe = [0u8; IMBE_BUF_LEN];
    imbe.copy_from_slice(&data[spec.imbe_offset..spec.imbe_offset + IMBE_BUF_LEN]);

    Ok(DfsiVoiceFrame { frame_type, meta, imbe })
}
