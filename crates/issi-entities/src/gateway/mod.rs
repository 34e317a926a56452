//! ISSI side of the gateway: call state machine, outbound sessions and RTP timing

pub mod clock;
pub mod entity;
pub mod sessions;

pub use clock::RtpClock;
pub use entity::{CallState, IssiGateway};
pub use sessions::{SessionHandle, SessionRegistry};
