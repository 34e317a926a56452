//! Core utilities for the P25 ISSI gateway
//!
//! This crate provides fundamental types and utilities used across the gateway:
//! - BitBuffer for bit-level payload manipulation, plus big-endian byte helpers
//! - P25 enumerations (data unit ids, call types, FNE frame types)
//! - Common macros and debug utilities

pub mod bitbuffer;
pub mod debug;
pub mod p25_types;
pub mod pdu_parse_error;

// Re-export commonly used items
pub use bitbuffer::BitBuffer;
pub use p25_types::*;
pub use pdu_parse_error::PduParseErr;

/// Identifier of one FNE voice stream
pub type StreamId = u32;

/// Identifier of a peer connected to the FNE
pub type PeerId = u32;
