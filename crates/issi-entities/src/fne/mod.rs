//! FNE side of the gateway: inbound P25 traffic and the peer/session collaborators

pub mod event;
pub mod ldu;
pub mod peer;

pub use event::{FneMessageHeader, P25DataEvent};
pub use ldu::{LduBuffer, reassemble, validate_markers};
pub use peer::{NetworkPeer, RemoteCallRequest, RtpMediaType, RtpSession};
