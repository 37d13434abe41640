#![allow(dead_code)]

pub mod mock_transport;
pub mod recording_converter;

pub use mock_transport::{MockHandle, MockTransport};
pub use recording_converter::{ConvEvent, RecordingConverter};

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use usrp2ysf_config::{GatewayConfig, SharedConfig};
use usrp2ysf_core::PCM_SAMPLES_PER_FRAME;
use usrp2ysf_entities::{Gateway, UsrpNetwork, YsfNetwork};
use usrp2ysf_pdus::usrp::UsrpFrame;
use usrp2ysf_pdus::ysf::consts::{DataType, FrameIndicator, YSF_DEST_ALL, YSF_PAYLOAD_LENGTH_BYTES};
use usrp2ysf_pdus::ysf::frame::net_counter;
use usrp2ysf_pdus::ysf::payload::{CSD2_BLANK, HeaderCallsigns, write_header, write_vd2_dch, write_vd2_vch};
use usrp2ysf_pdus::ysf::{Fich, VchBlocks, YsfDataFrame};

pub type TestGateway = Gateway<MockTransport, MockTransport, RecordingConverter>;

/// Step size used when advancing simulated time
pub const TICK: Duration = Duration::from_millis(5);

/// Creates a default config for testing. It can still be modified as needed
/// before passing it to the GatewayTest constructor
pub fn default_test_config() -> GatewayConfig {
    let mut cfg = GatewayConfig::new("N0CALL");
    cfg.ysf.radio_id = "ABCDE".to_string();
    cfg.ysf.dt1 = b"TAG1".to_vec();
    cfg
}

pub fn usrp_remote(cfg: &GatewayConfig) -> SocketAddr {
    cfg.usrp.remote
}

pub fn ysf_remote(cfg: &GatewayConfig) -> SocketAddr {
    cfg.ysf.remote
}

/// Gateway wired to mock transports, not yet opened or started
pub fn build_gateway(cfg: GatewayConfig) -> (TestGateway, MockHandle, MockHandle) {
    let usrp_remote = cfg.usrp.remote;
    let ysf_remote = cfg.ysf.remote;
    let callsign = cfg.callsign.clone();
    let shared = SharedConfig::from_config(cfg);

    let (usrp_transport, usrp_handle) = MockTransport::new();
    let (ysf_transport, ysf_handle) = MockTransport::new();
    let usrp = UsrpNetwork::new(usrp_transport, usrp_remote, false);
    let ysf = YsfNetwork::new(ysf_transport, ysf_remote, &callsign, false);

    let gateway = Gateway::new(shared, usrp, ysf, RecordingConverter::new());
    (gateway, usrp_handle, ysf_handle)
}

/// Gateway driven by simulated time
pub struct GatewayTest {
    pub config: GatewayConfig,
    pub gateway: TestGateway,
    pub usrp: MockHandle,
    pub ysf: MockHandle,
    pub now: Instant,
}

impl GatewayTest {
    /// Opens both legs and starts the gateway, which sends the initial poll
    pub fn new(config: GatewayConfig) -> Self {
        let (mut gateway, usrp, ysf) = build_gateway(config.clone());
        gateway.open().unwrap();
        let now = Instant::now();
        gateway.start(now);
        Self { config, gateway, usrp, ysf, now }
    }

    pub fn from_usrp(&self, payload: Vec<u8>) {
        self.usrp.inject(usrp_remote(&self.config), payload);
    }

    pub fn from_ysf(&self, payload: Vec<u8>) {
        self.ysf.inject(ysf_remote(&self.config), payload);
    }

    pub fn step(&mut self) {
        self.now += TICK;
        self.gateway.poll(self.now);
    }

    pub fn run_for(&mut self, duration: Duration) {
        let end = self.now + duration;
        while self.now < end {
            self.step();
        }
    }
}

// ─── Datagram builders ────────────────────────────────────────────

pub fn usrp_voice(seq: u32, sample: i16) -> Vec<u8> {
    UsrpFrame::Voice(Box::new([sample; PCM_SAMPLES_PER_FRAME])).to_bytes(seq)
}

pub fn usrp_text(seq: u32, callsign: &str) -> Vec<u8> {
    UsrpFrame::TextInfo { callsign: callsign.to_string() }.to_bytes(seq)
}

pub fn usrp_eot(seq: u32) -> Vec<u8> {
    UsrpFrame::EndOfTransmission.to_bytes(seq)
}

/// A VD mode 2 frame as a reflector would relay it
pub fn ysf_frame(fi: FrameIndicator, counter: u8, frame_number: u8, source: &[u8; 10]) -> Vec<u8> {
    let mut payload = [0u8; YSF_PAYLOAD_LENGTH_BYTES];
    match fi {
        FrameIndicator::Communications => {
            write_vd2_dch(&mut payload, b"          ");
            let vch: VchBlocks = [[0x5A; 13]; 5];
            write_vd2_vch(&mut payload, &vch);
        }
        _ => {
            let csd1 = HeaderCallsigns::build_csd1(b"*****", source);
            write_header(&mut payload, &csd1, &CSD2_BLANK);
        }
    }

    YsfDataFrame {
        gateway: *b"YSF00001  ",
        source: *source,
        dest: *YSF_DEST_ALL,
        counter: net_counter(fi, counter),
        fich: Fich {
            frame_indicator: fi,
            callsign_type: 2,
            call_mode: 0,
            block_number: 0,
            block_total: 0,
            frame_number,
            frame_total: 7,
            dev: false,
            message_route: 0,
            voip: false,
            data_type: DataType::VdMode2,
            sql_type: false,
            sql_code: 0,
        },
        payload,
    }
    .to_bytes()
}
