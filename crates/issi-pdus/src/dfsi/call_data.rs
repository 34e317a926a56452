use core::fmt;

use super::codec::{DfsiMetadata, DfsiVoiceFrame};

/// Per-call link control and encryption metadata, written into the DFSI sub-frames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteCallData {
    pub lco: u8,
    pub mf_id: u8,
    pub service_options: u8,
    /// 24 bits
    pub src_id: u32,
    /// 24 bits
    pub dst_id: u32,
    pub message_indicator: [u8; 9],
    pub algorithm_id: u8,
    pub key_id: u16,
    pub lsd1: u8,
    pub lsd2: u8,
}

impl RemoteCallData {
    pub fn new(src_id: u32, dst_id: u32) -> Self {
        RemoteCallData {
            src_id: src_id & 0xFF_FFFF,
            dst_id: dst_id & 0xFF_FFFF,
            ..Default::default()
        }
    }

    /// Fold the metadata carried by a decoded sub-frame into this call's state
    pub fn apply_frame(&mut self, frame: &DfsiVoiceFrame) {
        match frame.meta {
            DfsiMetadata::LinkControl { lco, mf_id, service_options } => {
                self.lco = lco;
                self.mf_id = mf_id;
                self.service_options = service_options;
            }
            DfsiMetadata::DstId(dst_id) => self.dst_id = dst_id,
            DfsiMetadata::SrcId(src_id) => self.src_id = src_id,
            DfsiMetadata::Lsd { lsd1, lsd2 } => {
                self.lsd1 = lsd1;
                self.lsd2 = lsd2;
            }
            DfsiMetadata::MessageIndicator { index, bytes } => {
                self.message_indicator[index * 3..index * 3 + 3].copy_from_slice(&bytes);
            }
            DfsiMetadata::Encryption { algorithm_id, key_id } => {
                self.algorithm_id = algorithm_id;
                self.key_id = key_id;
            }
            DfsiMetadata::Rssi(_) | DfsiMetadata::None | DfsiMetadata::Parity(_) => {}
        }
    }
}

impl fmt::Display for RemoteCallData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RemoteCallData {{ src: {} dst: {} lco: 0x{:02X} mfid: 0x{:02X} svc: 0x{:02X} algid: 0x{:02X} kid: 0x{:04X} }}",
            self.src_id,
            self.dst_id,
            self.lco,
            self.mf_id,
            self.service_options,
            self.algorithm_id,
            self.key_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfsi::codec::{decode_voice_frame, encode_voice_frame};
    use crate::dfsi::frame_table::*;

    #[test]
    fn test_apply_frames_recovers_metadata() {
        let source = RemoteCallData {
            lco: 0x03,
            mf_id: 0x90,
            service_options: 0x44,
            src_id: 1001,
            dst_id: 100,
            message_indicator: [9, 8, 7, 6, 5, 4, 3, 2, 1],
            algorithm_id: 0x84,
            key_id: 0x0102,
            lsd1: 0x11,
            lsd2: 0x22,
        };
        let imbe = [0u8; 11];

        let mut recovered = RemoteCallData::new(0, 0);
        for ft in LDU1_FRAME_TYPES.iter().chain(LDU2_FRAME_TYPES.iter()) {
            let frame = decode_voice_frame(&encode_voice_frame(*ft, &source, &imbe).unwrap()).unwrap();
            recovered.apply_frame(&frame);
        }
        assert_eq!(recovered, source);
    }

    #[test]
    fn test_new_masks_addresses() {
        let cd = RemoteCallData::new(0x0100_0001, 0xFF_FFFF);
        assert_eq!(cd.src_id, 1);
        assert_eq!(cd.dst_id, 0xFF_FFFF);
    }
}
