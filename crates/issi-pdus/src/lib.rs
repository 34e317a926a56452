//! Wire codecs of the ISSI gateway
//!
//! - `dfsi`: DFSI voice sub-frames and the FNE LDU1/LDU2 messages built from them
//! - `rtp`: ISSI RTP payloads (control octet, block headers, PTT control, full-rate voice)

pub mod dfsi;
pub mod rtp;
