//! Call state machine forwarding FNE group voice to outbound ISSI RTP sessions

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use issi_config::SharedConfig;
use issi_core::bitbuffer::hex_string;
use issi_core::{CallType, FneFrameType, IMBE_BUF_LEN, P25_MSG_HDR_SIZE, StreamId};
use issi_pdus::dfsi::frame_table::DFSI_FRAME_LENGTHS;
use issi_pdus::dfsi::ldu_message::ldu_message_len;
use issi_pdus::dfsi::{LduKind, RemoteCallData, decode_voice_frame, encode_ldu_message};
use issi_pdus::rtp::{FullRateVoice, IssiPayload, PttControl};

use crate::P25DataHandler;
use crate::fne::ldu::{LduBuffer, reassemble};
use crate::fne::{FneMessageHeader, NetworkPeer, P25DataEvent, RemoteCallRequest, RtpMediaType};

use super::clock::RtpClock;
use super::sessions::{SessionHandle, SessionRegistry};

/// Voice blocks bundled into one voice progress packet
const VOICE_BLOCKS_PER_PACKET: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Active { start: Instant, stream_id: StreamId },
}

/// Mutable per-instance state, behind one lock
struct GatewayInner {
    call: CallState,
    /// Frame type and stream id of the last processed group event
    rx_type: FneFrameType,
    rx_stream_id: StreamId,

    call_data: RemoteCallData,
    ldu1: LduBuffer,
    ldu2: LduBuffer,
    /// Counts LDU2s of the current call, modulo 4
    super_frame_cnt: u8,
    /// Last DFSI LDU message composed from reassembled traffic
    relay: Vec<u8>,

    sessions: SessionRegistry,
    clock: RtpClock,
}

pub struct IssiGateway {
    config: SharedConfig,
    peer: Arc<dyn NetworkPeer>,
    inner: Mutex<GatewayInner>,
}

impl IssiGateway {
    pub fn new(config: SharedConfig, peer: Arc<dyn NetworkPeer>) -> Self {
        let clock = RtpClock::new(config.config().issi.rtp_clock_rate);
        Self::with_clock(config, peer, clock)
    }

    pub fn with_clock(config: SharedConfig, peer: Arc<dyn NetworkPeer>, clock: RtpClock) -> Self {
        Self {
            config,
            peer,
            inner: Mutex::new(GatewayInner {
                call: CallState::Idle,
                rx_type: FneFrameType::Terminator,
                rx_stream_id: 0,
                call_data: RemoteCallData::default(),
                ldu1: LduBuffer::new(),
                ldu2: LduBuffer::new(),
                super_frame_cnt: 0,
                relay: Vec::new(),
                sessions: SessionRegistry::new(),
                clock,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GatewayInner> {
        // State stays consistent across a panic in a collaborator, keep going
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn call_state(&self) -> CallState {
        self.lock().call
    }

    pub fn is_call_active(&self) -> bool {
        matches!(self.lock().call, CallState::Active { .. })
    }

    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Call metadata recovered from the current call's LDUs
    pub fn call_data(&self) -> RemoteCallData {
        self.lock().call_data.clone()
    }

    /// Last DFSI LDU message composed from reassembled traffic, empty if none yet
    pub fn last_relay_message(&self) -> Vec<u8> {
        self.lock().relay.clone()
    }

    /// Hang up every outbound session, e.g. on shutdown or loss of the ISSI peer
    pub fn hangup_all(&self) {
        let mut inner = self.lock();
        for handle in inner.sessions.drain() {
            if handle.hangup() {
                tracing::info!(stream = handle.stream_id(), "hung up outbound session");
            }
        }
        inner.call = CallState::Idle;
    }

    fn handle_group_data(&self, inner: &mut GatewayInner, ev: &P25DataEvent, hdr: FneMessageHeader) {
        let cfg = self.config.config();

        if ev.src_id == 0 {
            tracing::warn!(stream = ev.stream_id, "({}) P25D: received call from SRC_ID 0, dropping", cfg.system_name);
            return;
        }

        if self.config.remote_call_in_progress() {
            tracing::debug!(stream = ev.stream_id, "remote call in progress, ignoring {}", ev.duid);
            return;
        }

        if ev.stream_id != inner.rx_stream_id && !ev.duid.is_terminator() {
            self.start_call(inner, ev, hdr);
        }

        if ev.duid.is_terminator() {
            if inner.rx_type != FneFrameType::Terminator {
                self.end_call(inner, ev);
            }
            // Each terminator closes its own stream's session
            if let Some(handle) = inner.sessions.remove(ev.stream_id) {
                handle.hangup();
            }
        }

        if let Some(kind) = LduKind::from_duid(ev.duid) {
            self.process_ldu(inner, ev, kind);
        }

        inner.rx_type = ev.frame_type;
        inner.rx_stream_id = ev.stream_id;
    }

    fn start_call(&self, inner: &mut GatewayInner, ev: &P25DataEvent, hdr: FneMessageHeader) {
        let cfg = self.config.config();

        inner.call = CallState::Active { start: Instant::now(), stream_id: ev.stream_id };
        inner.call_data = RemoteCallData::new(ev.src_id, ev.dst_id);
        inner.super_frame_cnt = 0;
        tracing::info!(stream = ev.stream_id, "({}) P25D: Traffic *CALL START     * PEER {} SRC_ID {} TGID {}",
            cfg.system_name, ev.peer_id, ev.src_id, ev.dst_id);

        let req = RemoteCallRequest {
            sys_id: hdr.sys_id,
            net_id: hdr.net_id,
            dst_id: ev.dst_id,
            group: true,
            stream_id: ev.stream_id,
        };
        let Some(session) = self.peer.call_remote(&req) else {
            tracing::warn!(stream = ev.stream_id, "ISSI peer did not open a session for TGID {}", ev.dst_id);
            return;
        };

        let (handle, previous) = inner.sessions.insert(ev.stream_id, session);
        if let Some(previous) = previous {
            previous.hangup();
        }

        let ptt = PttControl {
            wacn: hdr.net_id,
            sys_id: hdr.sys_id,
            unit_id: ev.src_id,
            priority: cfg.issi.ptt_priority,
        };
        let payload = IssiPayload::ptt_start(ptt);
        tracing::debug!(stream = ev.stream_id, "-> {}", payload);
        self.send_payload(inner, &handle, &payload);
    }

    fn end_call(&self, inner: &mut GatewayInner, ev: &P25DataEvent) {
        let cfg = self.config.config();

        let duration = match inner.call {
            CallState::Active { start, stream_id } if stream_id == ev.stream_id => start.elapsed(),
            _ => Duration::ZERO,
        };
        inner.call = CallState::Idle;
        tracing::info!(stream = ev.stream_id, "({}) P25D: Traffic *CALL END       * PEER {} SRC_ID {} TGID {} DUR {:.2}s",
            cfg.system_name, ev.peer_id, ev.src_id, ev.dst_id, duration.as_secs_f32());
    }

    fn process_ldu(&self, inner: &mut GatewayInner, ev: &P25DataEvent, kind: LduKind) {
        let payload = ev.payload();
        let GatewayInner { ldu1, ldu2, call_data, relay, .. } = &mut *inner;
        let ldu = match kind {
            LduKind::Ldu1 => ldu1,
            LduKind::Ldu2 => ldu2,
        };
        if !reassemble(kind, payload, ldu) {
            return;
        }

        // Each reassembled chunk is a complete DFSI sub-frame
        for n in 0..DFSI_FRAME_LENGTHS.len() {
            match decode_voice_frame(ldu.sub_frame(n)) {
                Ok(frame) => call_data.apply_frame(&frame),
                Err(e) => tracing::debug!(stream = ev.stream_id, "{} sub-frame {}: {}", kind, n, e),
            }
        }

        let mut msg = vec![0u8; ldu_message_len()];
        msg[..P25_MSG_HDR_SIZE].copy_from_slice(&ev.data[..P25_MSG_HDR_SIZE]);
        match encode_ldu_message(kind, call_data, ldu.as_bytes(), &mut msg) {
            Ok(count) => {
                msg.truncate(count);
                tracing::trace!(stream = ev.stream_id, "{} relay {}", kind, hex_string(&msg));
                *relay = msg;
            }
            Err(e) => tracing::warn!(stream = ev.stream_id, "could not compose {} message: {}", kind, e),
        }

        let codewords: [[u8; IMBE_BUF_LEN]; 9] = core::array::from_fn(|n| ldu.imbe(n));
        self.send_voice(inner, ev, kind, &codewords);

        if kind == LduKind::Ldu2 {
            inner.super_frame_cnt = (inner.super_frame_cnt + 1) % 4;
        }
    }

    /// Send the nine codewords of one LDU as three voice progress packets
    fn send_voice(&self, inner: &mut GatewayInner, ev: &P25DataEvent, kind: LduKind, codewords: &[[u8; IMBE_BUF_LEN]; 9]) {
        let Some(handle) = inner.sessions.get(ev.stream_id) else {
            tracing::debug!(stream = ev.stream_id, "no outbound session, not forwarding {}", kind);
            return;
        };

        let frame_types = kind.frame_types();
        let sf = inner.super_frame_cnt;
        for group in 0..frame_types.len() / VOICE_BLOCKS_PER_PACKET {
            let voices = (0..VOICE_BLOCKS_PER_PACKET)
                .map(|i| {
                    let n = group * VOICE_BLOCKS_PER_PACKET + i;
                    let mut voice = FullRateVoice::new(frame_types[n], codewords[n]);
                    voice.super_frame_cnt = sf;
                    voice
                })
                .collect();
            let payload = IssiPayload::voice_progress(voices, sf);
            tracing::trace!(stream = ev.stream_id, "-> {}", payload);
            self.send_payload(inner, &handle, &payload);
        }
    }

    fn send_payload(&self, inner: &mut GatewayInner, handle: &SessionHandle, payload: &IssiPayload) {
        let duration = self.config.config().issi.packet_duration;
        let bytes = payload.encode();
        let ts = inner.clock.timestamp();
        handle.send(RtpMediaType::Application, &bytes, ts, 0, duration);
    }
}

impl P25DataHandler for IssiGateway {
    fn validate(&self, ev: &P25DataEvent) -> bool {
        if ev.data.len() < P25_MSG_HDR_SIZE {
            tracing::debug!(stream = ev.stream_id, "message too short ({} bytes), rejecting", ev.data.len());
            return false;
        }
        true
    }

    fn on_data(&self, ev: &P25DataEvent) {
        // HDU, TSDU and PDU are not forwarded
        if !ev.duid.is_voice() && !ev.duid.is_terminator() {
            return;
        }

        let Some(hdr) = ev.header() else {
            tracing::debug!(stream = ev.stream_id, "no FNE header, dropping {}", ev.duid);
            return;
        };

        match ev.call_type {
            CallType::Group => {
                let mut inner = self.lock();
                self.handle_group_data(&mut inner, ev, hdr);
            }
            CallType::Private => {
                tracing::warn!(stream = ev.stream_id, "({}) P25D: ISSI does not support private calls", self.config.config().system_name);
            }
        }
    }
}
