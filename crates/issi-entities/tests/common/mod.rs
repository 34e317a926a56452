#![allow(dead_code)]

pub mod recorder;

use std::sync::Arc;

use issi_config::{GatewayConfig, SharedConfig};
use issi_core::{CallType, FneFrameType, IMBE_BUF_LEN, P25_MSG_HDR_SIZE, P25Duid, StreamId};
use issi_core::bitbuffer::{put_be_u16, put_be_u24};
use issi_entities::gateway::{IssiGateway, RtpClock};
use issi_entities::{FneDriver, P25DataEvent};
use issi_pdus::dfsi::ldu_message::ldu_message_len;
use issi_pdus::dfsi::{LDU_BUF_LEN, LDU_IMBE_OFFSETS, LduKind, RemoteCallData, encode_ldu_message};

pub use recorder::{RecordingPeer, RecordingSession, SentPacket};

pub const TEST_PEER_ID: u32 = 9000100;
pub const TEST_SYS_ID: u16 = 0x29A;
pub const TEST_NET_ID: u32 = 0xBEE00;
pub const TEST_SRC_ID: u32 = 12345;
pub const TEST_TGID: u32 = 100;

/// Creates a default config for testing. It can still be modified as needed
pub fn default_test_config() -> GatewayConfig {
    GatewayConfig::new("ISSI-TEST", TEST_PEER_ID)
}

/// FNE message header with the test system and network ids
pub fn fne_header() -> Vec<u8> {
    let mut msg = vec![0u8; P25_MSG_HDR_SIZE];
    put_be_u16(&mut msg, 11, TEST_SYS_ID);
    put_be_u24(&mut msg, 16, TEST_NET_ID);
    msg[23] = P25_MSG_HDR_SIZE as u8;
    msg
}

/// Complete FNE LDU message where codeword n is filled with `seed + n`
pub fn ldu_message(kind: LduKind, seed: u8) -> Vec<u8> {
    let mut scratch = [0u8; LDU_BUF_LEN];
    for (n, off) in LDU_IMBE_OFFSETS.iter().enumerate() {
        scratch[*off..*off + IMBE_BUF_LEN].fill(seed.wrapping_add(n as u8));
    }
    let mut msg = vec![0u8; ldu_message_len()];
    msg[..P25_MSG_HDR_SIZE].copy_from_slice(&fne_header());
    encode_ldu_message(kind, &RemoteCallData::new(TEST_SRC_ID, TEST_TGID), &scratch, &mut msg).unwrap();
    msg
}

pub fn group_event(duid: P25Duid, frame_type: FneFrameType, stream_id: StreamId, data: Vec<u8>) -> P25DataEvent {
    P25DataEvent {
        peer_id: TEST_PEER_ID,
        src_id: TEST_SRC_ID,
        dst_id: TEST_TGID,
        call_type: CallType::Group,
        duid,
        frame_type,
        stream_id,
        data,
    }
}

pub fn ldu1_event(stream_id: StreamId, seed: u8) -> P25DataEvent {
    group_event(P25Duid::Ldu1, FneFrameType::DataUnit, stream_id, ldu_message(LduKind::Ldu1, seed))
}

pub fn ldu2_event(stream_id: StreamId, seed: u8) -> P25DataEvent {
    group_event(P25Duid::Ldu2, FneFrameType::DataUnit, stream_id, ldu_message(LduKind::Ldu2, seed))
}

pub fn tdu_event(stream_id: StreamId) -> P25DataEvent {
    group_event(P25Duid::Tdu, FneFrameType::Terminator, stream_id, fne_header())
}

/// Infrastructure for testing the gateway
/// Wires an IssiGateway to a RecordingPeer behind an FneDriver
pub struct GatewayTest {
    pub config: SharedConfig,
    pub peer: Arc<RecordingPeer>,
    pub gateway: Arc<IssiGateway>,
}

impl GatewayTest {
    pub fn new(cfg: GatewayConfig) -> Self {
        let config = SharedConfig::from_config(cfg);
        let peer = Arc::new(RecordingPeer::default());
        let clock = RtpClock::with_seed(config.config().issi.rtp_clock_rate, 1);
        let gateway = Arc::new(IssiGateway::with_clock(config.clone(), peer.clone(), clock));
        Self { config, peer, gateway }
    }

    /// Push the events through a driver, in order
    pub fn run(&self, events: Vec<P25DataEvent>) {
        let driver = FneDriver::new(Box::new(self.gateway.clone()));
        for ev in events {
            driver.submit(ev);
        }
        driver.run_pending();
    }

    /// The only session opened so far
    pub fn session(&self) -> Arc<RecordingSession> {
        let sessions = self.peer.sessions();
        assert_eq!(sessions.len(), 1, "expected exactly one outbound session");
        sessions[0].clone()
    }
}
