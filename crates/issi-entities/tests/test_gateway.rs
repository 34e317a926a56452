mod common;

use issi_core::bitbuffer::bytes_from_hex;
use issi_core::{CallType, FneFrameType, IMBE_BUF_LEN, P25Duid, debug};
use issi_entities::gateway::CallState;
use issi_entities::{P25DataHandler, RemoteCallRequest, RtpMediaType};
use issi_pdus::dfsi::LduKind;
use issi_pdus::rtp::{IssiPayload, PacketType};
use common::*;

fn assert_voice_packets(packets: &[SentPacket], kind: LduKind, seed: u8, super_frame_cnt: u8) {
    assert_eq!(packets.len(), 3);
    let frame_types = kind.frame_types();
    for (group, pkt) in packets.iter().enumerate() {
        assert_eq!(pkt.media, RtpMediaType::Application);
        assert_eq!(pkt.marker, 0);
        assert_eq!(pkt.duration, 100);

        let payload = IssiPayload::decode(&pkt.payload).unwrap();
        assert_eq!(payload.packet_type.packet_type, PacketType::PttTransmitProgress);
        assert!(payload.ptt.is_none());
        let frh = payload.full_rate_header.unwrap();
        assert_eq!(frh.voice_block_bundling, 3);
        assert_eq!(frh.super_frame_cnt, super_frame_cnt);
        for (i, voice) in payload.full_rate_voice.iter().enumerate() {
            let n = group * 3 + i;
            assert_eq!(voice.frame_type, frame_types[n]);
            assert_eq!(voice.imbe, [seed + n as u8; IMBE_BUF_LEN]);
        }
    }
}

#[test]
fn test_call_start_sends_ptt() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    test.run(vec![ldu1_event(0x1000, 1)]);

    assert_eq!(test.peer.requests(), vec![RemoteCallRequest {
        sys_id: TEST_SYS_ID,
        net_id: TEST_NET_ID,
        dst_id: TEST_TGID,
        group: true,
        stream_id: 0x1000,
    }]);
    assert!(test.gateway.is_call_active());

    let packets = test.session().take_packets();
    assert_eq!(packets.len(), 4);
    let expected = bytes_from_hex("81 02000000 04000000 BEE0029A 00303904").unwrap();
    assert_eq!(packets[0].payload, expected);
    assert_eq!(packets[0].media, RtpMediaType::Application);

    let ptt = IssiPayload::decode(&packets[0].payload).unwrap().ptt.unwrap();
    assert_eq!(ptt.unit_id, 12345);
    assert_eq!(ptt.priority, 4);

    assert_voice_packets(&packets[1..], LduKind::Ldu1, 1, 0);
}

#[test]
fn test_voice_superframe() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    test.run(vec![ldu1_event(7, 10), ldu2_event(7, 40), ldu1_event(7, 70)]);

    assert_eq!(test.peer.requests().len(), 1);
    let packets = test.session().take_packets();
    assert_eq!(packets.len(), 1 + 9);
    assert_voice_packets(&packets[1..4], LduKind::Ldu1, 10, 0);
    assert_voice_packets(&packets[4..7], LduKind::Ldu2, 40, 0);
    assert_voice_packets(&packets[7..10], LduKind::Ldu1, 70, 1);
}

#[test]
fn test_src_zero_dropped() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    let mut ev = ldu1_event(1, 1);
    ev.src_id = 0;
    test.run(vec![ev]);

    assert!(test.peer.requests().is_empty());
    assert!(!test.gateway.is_call_active());
}

#[test]
fn test_private_call_rejected() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    let mut ev = ldu1_event(1, 1);
    ev.call_type = CallType::Private;
    test.run(vec![ev]);
    assert!(test.peer.requests().is_empty());

    // Nothing was recorded, so the same stream still starts a group call
    test.run(vec![ldu1_event(1, 1)]);
    assert_eq!(test.peer.requests().len(), 1);
}

#[test]
fn test_remote_call_latch() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    test.config.set_remote_call_in_progress(true);
    test.run(vec![ldu1_event(3, 1), ldu2_event(3, 1), tdu_event(3)]);
    assert!(test.peer.requests().is_empty());

    test.config.set_remote_call_in_progress(false);
    test.run(vec![ldu1_event(3, 1)]);
    assert_eq!(test.peer.requests().len(), 1);
}

#[test]
fn test_terminator_hangs_up_once() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    test.run(vec![ldu1_event(5, 1), tdu_event(5), tdu_event(5)]);

    let session = test.session();
    assert_eq!(session.hangups(), 1);
    assert!(!test.gateway.is_call_active());
    assert_eq!(test.gateway.session_count(), 0);

    // A terminator alone never starts a call
    test.run(vec![tdu_event(6)]);
    assert_eq!(test.peer.requests().len(), 1);
}

#[test]
fn test_tdulc_ends_call() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    let tdulc = group_event(P25Duid::Tdulc, FneFrameType::Terminator, 5, fne_header());
    test.run(vec![ldu1_event(5, 1), tdulc]);

    assert_eq!(test.session().hangups(), 1);
    assert!(!test.gateway.is_call_active());
}

#[test]
fn test_bad_markers_dropped() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    let mut ev = ldu1_event(9, 1);
    // Third sub-frame marker
    ev.data[24 + 36] = 0x00;
    test.run(vec![ev, ldu2_event(9, 20)]);

    // Call starts on the first event, its voice is dropped
    assert_eq!(test.peer.requests().len(), 1);
    let packets = test.session().take_packets();
    assert_eq!(packets.len(), 1 + 3);
    assert_voice_packets(&packets[1..], LduKind::Ldu2, 20, 0);
}

#[test]
fn test_short_and_signalling_ignored() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    let short = group_event(P25Duid::Ldu1, FneFrameType::DataUnit, 1, vec![0u8; 10]);
    assert!(!test.gateway.validate(&short));

    let hdu = group_event(P25Duid::Hdu, FneFrameType::HduValid, 1, fne_header());
    let tsdu = group_event(P25Duid::Tsdu, FneFrameType::DataUnit, 1, fne_header());
    test.run(vec![short, hdu, tsdu]);
    assert!(test.peer.requests().is_empty());
    assert!(!test.gateway.is_call_active());
}

#[test]
fn test_peer_refuses_call() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());
    test.peer.set_refuse(true);

    test.run(vec![ldu1_event(11, 1), ldu2_event(11, 1)]);

    assert_eq!(test.peer.requests().len(), 1);
    assert!(test.peer.sessions().is_empty());
    assert!(test.gateway.is_call_active());
    assert_eq!(test.gateway.session_count(), 0);
}

#[test]
fn test_new_stream_opens_new_session() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    test.run(vec![ldu1_event(1, 1), ldu1_event(2, 1)]);
    let sessions = test.peer.sessions();
    assert_eq!(sessions.len(), 2);
    assert_eq!(test.gateway.session_count(), 2);

    test.run(vec![tdu_event(2)]);
    assert_eq!(sessions[1].hangups(), 1);
    assert_eq!(sessions[0].hangups(), 0);

    test.gateway.hangup_all();
    test.gateway.hangup_all();
    assert_eq!(sessions[0].hangups(), 1);
    assert_eq!(sessions[1].hangups(), 1);
    assert_eq!(test.gateway.session_count(), 0);
}

#[test]
fn test_call_data_and_relay() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    let ev = ldu1_event(4, 1);
    let msg = ev.data.clone();
    test.run(vec![ev]);

    let cd = test.gateway.call_data();
    assert_eq!(cd.src_id, TEST_SRC_ID);
    assert_eq!(cd.dst_id, TEST_TGID);
    assert_eq!(test.gateway.last_relay_message(), msg);
}

#[test]
fn test_ptt_priority_from_config() {
    debug::setup_logging_verbose();
    let mut cfg = default_test_config();
    cfg.issi.ptt_priority = 7;
    cfg.issi.packet_duration = 20;
    let test = GatewayTest::new(cfg);

    test.run(vec![ldu1_event(1, 1)]);
    let packets = test.session().take_packets();
    let ptt = IssiPayload::decode(&packets[0].payload).unwrap().ptt.unwrap();
    assert_eq!(ptt.priority, 7);
    assert!(packets.iter().all(|p| p.duration == 20));
}

#[test]
fn test_back_to_back_terminators_close_both_streams() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    test.run(vec![ldu1_event(1, 1), ldu1_event(2, 1)]);
    assert!(matches!(test.gateway.call_state(), CallState::Active { stream_id: 2, .. }));

    test.run(vec![tdu_event(1), tdu_event(2)]);

    let sessions = test.peer.sessions();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].hangups(), 1);
    assert_eq!(sessions[1].hangups(), 1);
    assert_eq!(test.gateway.session_count(), 0);
    assert_eq!(test.gateway.call_state(), CallState::Idle);

    // Closing again on shutdown does not reach the sessions a second time
    test.gateway.hangup_all();
    assert_eq!(sessions[0].hangups(), 1);
    assert_eq!(sessions[1].hangups(), 1);
}

#[test]
fn test_voice_after_terminator_not_forwarded() {
    debug::setup_logging_verbose();
    let test = GatewayTest::new(default_test_config());

    test.run(vec![ldu1_event(3, 1), tdu_event(3), ldu2_event(3, 1)]);

    // Same stream id after the terminator does not reopen the call
    assert_eq!(test.peer.requests().len(), 1);
    let packets = test.session().take_packets();
    assert_eq!(packets.len(), 1 + 3);
}
