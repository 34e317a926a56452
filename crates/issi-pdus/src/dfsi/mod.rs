//! DFSI voice sub-frames as carried inside FNE LDU1/LDU2 messages

pub mod call_data;
pub mod codec;
pub mod frame_table;
pub mod ldu_message;

pub use call_data::RemoteCallData;
pub use codec::{DfsiError, DfsiMetadata, DfsiVoiceFrame, decode_voice_frame, encode_voice_frame, write_voice_frame};
pub use frame_table::{DFSI_FRAME_TABLE, DfsiFrameSpec, MetaLayout, frame_spec};
pub use ldu_message::{LDU_BUF_LEN, LDU_IMBE_OFFSETS, LduKind, decode_ldu_message, encode_ldu_message, ldu_imbe};
