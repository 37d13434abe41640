mod common;

use std::time::Duration;

use common::{ConvEvent, GatewayTest, TICK, default_test_config, usrp_eot, usrp_text, usrp_voice};
use usrp2ysf_core::debug::setup_logging_verbose;
use usrp2ysf_entities::gateway::CallState;
use usrp2ysf_pdus::ysf::consts::{DataType, FrameIndicator, YSF_DEST_ALL};
use usrp2ysf_pdus::ysf::payload::{HeaderCallsigns, read_vd2_dch};
use usrp2ysf_pdus::ysf::{YsfDataFrame, YsfPdu};

/// Decode everything the gateway sent to YSF, skipping polls
fn sent_data_frames(test: &GatewayTest) -> Vec<YsfPdu> {
    test.ysf
        .take_sent()
        .iter()
        .map(|d| YsfPdu::from_bytes(d).unwrap())
        .filter(|pdu| !matches!(pdu, YsfPdu::Poll { .. }))
        .collect()
}

fn inner(pdu: &YsfPdu) -> &YsfDataFrame {
    match pdu {
        YsfPdu::Header(f) | YsfPdu::Communications(f) | YsfPdu::Terminator(f) => f,
        YsfPdu::Poll { .. } => panic!("unexpected poll"),
    }
}

#[test]
fn test_usrp_call_to_ysf() {
    setup_logging_verbose();
    let mut test = GatewayTest::new(default_test_config());

    test.from_usrp(usrp_text(0, "G4KLX"));
    for seq in 1..=10 {
        test.from_usrp(usrp_voice(seq, 1000));
    }
    test.from_usrp(usrp_eot(11));
    test.run_for(Duration::from_secs(1));

    assert!(matches!(test.gateway.usrp_to_ysf().state(), CallState::Idle));

    let frames = sent_data_frames(&test);
    assert_eq!(frames.len(), 4);
    assert!(matches!(frames[0], YsfPdu::Header(_)));
    assert!(matches!(frames[1], YsfPdu::Communications(_)));
    assert!(matches!(frames[2], YsfPdu::Communications(_)));
    assert!(matches!(frames[3], YsfPdu::Terminator(_)));

    for pdu in &frames {
        let f = inner(pdu);
        assert_eq!(&f.gateway, b"N0CALL    ");
        assert_eq!(&f.source, b"G4KLX     ");
        assert_eq!(&f.dest, YSF_DEST_ALL);
        assert_eq!(f.fich.data_type, DataType::VdMode2);
        assert_eq!(f.fich.callsign_type, 2);
        assert_eq!(f.fich.frame_total, 7);
        assert_eq!(f.fich.block_number, 0);
        assert_eq!(f.fich.block_total, 0);
        assert!(!f.fich.dev);
    }

    let header = inner(&frames[0]);
    assert_eq!(header.counter, 0);
    assert_eq!(header.fich.frame_indicator, FrameIndicator::Header);
    let csd = HeaderCallsigns::from_payload(&header.payload).unwrap();
    assert_eq!(&csd.dest, b"*****ABCDE");
    assert_eq!(&csd.source, b"G4KLX     ");

    let first = inner(&frames[1]);
    assert_eq!(first.counter, 2);
    assert_eq!(first.fich.frame_number, 0);
    assert_eq!(&read_vd2_dch(&first.payload).unwrap(), b"*****ABCDE");

    let second = inner(&frames[2]);
    assert_eq!(second.counter, 4);
    assert_eq!(second.fich.frame_number, 1);
    assert_eq!(&read_vd2_dch(&second.payload).unwrap(), b"G4KLX     ");

    let term = inner(&frames[3]);
    assert_eq!(term.counter, (3 << 1) | 1);
    assert_eq!(term.fich.frame_indicator, FrameIndicator::Terminator);
}

#[test]
fn test_voice_without_text_uses_gateway_callsign() {
    let mut test = GatewayTest::new(default_test_config());

    for seq in 0..5 {
        test.from_usrp(usrp_voice(seq, 0));
    }
    test.from_usrp(usrp_eot(5));
    test.run_for(Duration::from_millis(500));

    let frames = sent_data_frames(&test);
    assert_eq!(frames.len(), 3);
    for pdu in &frames {
        assert_eq!(&inner(pdu).source, b"N0CALL    ");
    }
}

#[test]
fn test_pacing_one_frame_per_period() {
    let mut test = GatewayTest::new(default_test_config());
    test.from_usrp(usrp_text(0, "G4KLX"));
    for seq in 1..=50 {
        test.from_usrp(usrp_voice(seq, 0));
    }
    test.ysf.take_sent();

    // Header plus 10 voice frames queued; one leaves every 100 ms
    test.run_for(Duration::from_millis(95));
    assert_eq!(test.ysf.sent_count(), 0);
    test.run_for(Duration::from_millis(5));
    assert_eq!(test.ysf.sent_count(), 1);
    test.run_for(Duration::from_millis(100 * 3));
    assert_eq!(test.ysf.sent_count(), 4);
}

#[test]
fn test_ysf_cadence_matches_frame_duration() {
    let mut test = GatewayTest::new(default_test_config());
    test.from_usrp(usrp_text(0, "G4KLX"));
    for seq in 1..=200 {
        test.from_usrp(usrp_voice(seq, 0));
    }
    test.step();
    test.ysf.take_sent();

    // 1 s of backlog: each YSF frame carries 100 ms of voice
    test.run_for(Duration::from_secs(1) - TICK);
    assert_eq!(test.ysf.sent_count(), 10);
}

#[test]
fn test_usrp_call_events_in_order() {
    let mut test = GatewayTest::new(default_test_config());
    test.from_usrp(usrp_text(0, "W1AW"));
    for seq in 1..=5 {
        test.from_usrp(usrp_voice(seq, 0));
    }
    test.from_usrp(usrp_eot(6));
    test.step();

    assert_eq!(
        test.gateway.converter().events,
        vec![
            ConvEvent::UsrpHeader,
            ConvEvent::Usrp,
            ConvEvent::Usrp,
            ConvEvent::Usrp,
            ConvEvent::Usrp,
            ConvEvent::Usrp,
            ConvEvent::UsrpEot,
        ]
    );

    test.run_for(Duration::from_millis(500));
    let frames = sent_data_frames(&test);
    assert_eq!(frames.len(), 3);
    for pdu in &frames {
        assert_eq!(&inner(pdu).source, b"W1AW      ");
    }
    let csd = HeaderCallsigns::from_payload(&inner(&frames[0]).payload).unwrap();
    assert_eq!(&csd.source, b"W1AW      ");
}

#[test]
fn test_foreign_usrp_source_dropped() {
    let mut test = GatewayTest::new(default_test_config());
    let foreign = "127.0.0.1:9999".parse().unwrap();
    test.usrp.inject(foreign, usrp_text(0, "EVIL"));
    test.usrp.inject(foreign, usrp_voice(1, 0));
    test.run_for(Duration::from_millis(500));

    assert!(matches!(test.gateway.usrp_to_ysf().state(), CallState::Idle));
    assert!(test.gateway.converter().events.is_empty());
    assert!(sent_data_frames(&test).is_empty());
}

#[test]
fn test_malformed_usrp_dropped() {
    let mut test = GatewayTest::new(default_test_config());
    test.from_usrp(b"USRP short".to_vec());
    test.from_usrp(vec![0u8; 352]);
    test.step();
    assert!(test.gateway.converter().events.is_empty());
}
