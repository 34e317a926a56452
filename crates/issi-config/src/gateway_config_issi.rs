use std::collections::HashMap;

use serde::Deserialize;
use toml::Value;

/// ISSI RTP-side settings
#[derive(Debug, Clone)]
pub struct CfgIssi {
    /// Priority carried in the PTT control word of a PTT start packet, 8 bits
    pub ptt_priority: u8,
    /// RTP timestamp clock rate in Hz
    pub rtp_clock_rate: u32,
    /// Duration argument handed to the RTP session with every packet
    pub packet_duration: u32,
}

impl Default for CfgIssi {
    fn default() -> Self {
        Self {
            ptt_priority: default_ptt_priority(),
            rtp_clock_rate: default_rtp_clock_rate(),
            packet_duration: default_packet_duration(),
        }
    }
}

#[derive(Default, Deserialize)]
pub struct CfgIssiDto {
    #[serde(default = "default_ptt_priority")]
    pub ptt_priority: u8,
    #[serde(default = "default_rtp_clock_rate")]
    pub rtp_clock_rate: u32,
    #[serde(default = "default_packet_duration")]
    pub packet_duration: u32,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

fn default_ptt_priority() -> u8 {
    4
}

fn default_rtp_clock_rate() -> u32 {
    8000
}

fn default_packet_duration() -> u32 {
    100
}

/// Convert a CfgIssiDto (from TOML) into a CfgIssi (used in the gateway config)
pub fn apply_issi_patch(src: CfgIssiDto) -> CfgIssi {
    CfgIssi {
        ptt_priority: src.ptt_priority,
        rtp_clock_rate: src.rtp_clock_rate,
        packet_duration: src.packet_duration,
    }
}
