use core::fmt;

use issi_core::IMBE_BUF_LEN;

/// One full-rate voice block: frame type, IMBE codeword, status and superframe octets,
/// optionally followed by additional frame data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullRateVoice {
    /// DFSI frame type of the codeword (VOICE1..VOICE18)
    pub frame_type: u8,
    pub imbe: [u8; IMBE_BUF_LEN],
    /// 3 bits
    pub total_errors: u8,
    pub mute_frame: bool,
    pub lost_frame: bool,
    /// 2 bits
    pub super_frame_cnt: u8,
    pub additional_frame_data: Option<Vec<u8>>,
}

impl Default for FullRateVoice {
    fn default() -> Self {
        Self {
            frame_type: crate::dfsi::frame_table::P25_DFSI_LDU1_VOICE1,
            imbe: [0; IMBE_BUF_LEN],
            total_errors: 0,
            mute_frame: false,
            lost_frame: false,
            super_frame_cnt: 0,
            additional_frame_data: None,
        }
    }
}

impl FullRateVoice {
    /// Fixed part of the block
    pub const LENGTH: usize = 14;

    pub fn new(frame_type: u8, imbe: [u8; IMBE_BUF_LEN]) -> Self {
        FullRateVoice { frame_type, imbe, ..Default::default() }
    }

    pub fn size(&self) -> usize {
        Self::LENGTH + self.additional_frame_data.as_ref().map_or(0, |d| d.len())
    }

    /// Parse a voice block. Bytes past the fixed region are kept as additional frame data.
    /// Returns None only if the fixed region is incomplete.
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() < Self::LENGTH {
            return None;
        }

        let mut imbe = [0u8; IMBE_BUF_LEN];
        imbe.copy_from_slice(&data[1..1 + IMBE_BUF_LEN]);

        let additional_frame_data = if data.len() > Self::LENGTH {
            Some(data[Self::LENGTH..].to_vec())
        } else {
            None
        };

        Some(FullRateVoice {
            frame_type: data[0],
            imbe,
            total_errors: (data[12] >> 5) & 0x07,
            mute_frame: data[12] & 0x02 == 0x02,
            lost_frame: data[12] & 0x01 == 0x01,
            super_frame_cnt: (data[13] >> 2) & 0x03,
            additional_frame_data,
        })
    }

    /// Write the block into `out`. The fixed region must fit; additional frame data is
    /// skipped silently when `out` is too short for it.
    pub fn encode(&self, out: &mut [u8]) {
        assert!(out.len() >= Self::LENGTH, "FullRateVoice target too short: {}", out.len());

        out[0] = self.frame_type;
        out[1..1 + IMBE_BUF_LEN].copy_from_slice(&self.imbe);
        out[12] = ((self.total_errors & 0x07) << 5)
            | ((self.mute_frame as u8) << 1)
            | self.lost_frame as u8;
        out[13] = (self.super_frame_cnt & 0x03) << 2;

        if let Some(ref extra) = self.additional_frame_data {
            if out.len() >= Self::LENGTH + extra.len() {
                out[Self::LENGTH..Self::LENGTH + extra.len()].copy_from_slice(extra);
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.size()];
        self.encode(&mut out);
        out
    }
}

impl fmt::Display for FullRateVoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FullRateVoice {{ ft: 0x{:02X} imbe: {:02X?} errs: {} mute: {} lost: {} sf: {} extra: {} }}",
            self.frame_type,
            self.imbe,
            self.total_errors,
            self.mute_frame,
            self.lost_frame,
            self.super_frame_cnt,
            self.additional_frame_data.as_ref().map_or(0, |d| d.len()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FullRateVoice {
        FullRateVoice {
            frame_type: 0x66,
            imbe: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            total_errors: 5,
            mute_frame: true,
            lost_frame: false,
            super_frame_cnt: 3,
            additional_frame_data: None,
        }
    }

    #[test]
    fn test_status_octets() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes.len(), 14);
        assert_eq!(bytes[0], 0x66);
        assert_eq!(bytes[12], 0b1010_0010);
        assert_eq!(bytes[13], 0b0000_1100);
        assert_eq!(FullRateVoice::decode(&bytes), Some(sample()));
    }

    #[test]
    fn test_additional_frame_data() {
        let mut v = sample();
        v.lost_frame = true;
        v.additional_frame_data = Some(vec![0xDE, 0xAD, 0xBE]);
        assert_eq!(v.size(), 17);

        let bytes = v.to_bytes();
        assert_eq!(&bytes[14..], &[0xDE, 0xAD, 0xBE]);
        assert_eq!(FullRateVoice::decode(&bytes), Some(v));
    }

    #[test]
    fn test_short_target_skips_additional_data() {
        let mut v = sample();
        v.additional_frame_data = Some(vec![0xAA; 4]);
        let mut out = [0u8; 16];
        v.encode(&mut out);
        assert_eq!(&out[14..], &[0, 0]);
        assert_eq!(out[0], 0x66);
    }

    #[test]
    fn test_decode_masks_reserved_bits() {
        let mut bytes = [0xFFu8; 14];
        bytes[0] = 0x6B;
        let v = FullRateVoice::decode(&bytes).unwrap();
        assert_eq!(v.total_errors, 7);
        assert!(v.mute_frame && v.lost_frame);
        assert_eq!(v.super_frame_cnt, 3);
        assert_eq!(v.additional_frame_data, None);
    }

    #[test]
    fn test_decode_incomplete() {
        assert_eq!(FullRateVoice::decode(&[0u8; 13]), None);
        assert_eq!(FullRateVoice::decode(&[]), None);
    }

    #[test]
    fn test_encode_masks_fields() {
        let mut v = sample();
        v.total_errors = 0xFF;
        v.super_frame_cnt = 0x07;
        let decoded = FullRateVoice::decode(&v.to_bytes()).unwrap();
        assert_eq!(decoded.total_errors, 7);
        assert_eq!(decoded.super_frame_cnt, 3);
    }
}
