pub mod driver;
pub mod entity_trait;
pub mod fne;
pub mod gateway;

pub use driver::FneDriver;
pub use entity_trait::P25DataHandler;
pub use fne::{NetworkPeer, P25DataEvent, RemoteCallRequest, RtpMediaType, RtpSession};
pub use gateway::IssiGateway;
