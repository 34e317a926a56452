//! ISSI RTP payload blocks

pub mod block_header;
pub mod control_octet;
pub mod full_rate_header;
pub mod full_rate_voice;
pub mod packet_type;
pub mod payload;
pub mod ptt_control;

pub use block_header::{BlockHeader, BlockType};
pub use control_octet::ControlOctet;
pub use full_rate_header::FullRateIssiHeader;
pub use full_rate_voice::FullRateVoice;
pub use packet_type::{IssiPacketType, PacketType};
pub use payload::IssiPayload;
pub use ptt_control::PttControl;
