//! USRP to YSF direction: inbound USRP call tracking and outbound YSF frame building

use std::time::Instant;

use usrp2ysf_config::{CfgFich, GatewayConfig};
use usrp2ysf_core::callsign;
use usrp2ysf_pdus::usrp::UsrpFrame;
use usrp2ysf_pdus::ysf::consts::{DataType, FrameIndicator, YSF_CALLSIGN_LENGTH, YSF_DEST_ALL, YSF_PAYLOAD_LENGTH_BYTES};
use usrp2ysf_pdus::ysf::frame::net_counter;
use usrp2ysf_pdus::ysf::payload::{CSD2_BLANK, HeaderCallsigns, write_header, write_vd2_dch, write_vd2_vch};
use usrp2ysf_pdus::ysf::{DchMultiplexer, Fich, YsfDataFrame};

use super::CallState;
use crate::converter::{Converter, YsfTagged, TaggedFrame};

/// USRP voice frames per second
const USRP_FRAMES_PER_SEC: f32 = 50.0;

pub struct UsrpToYsf {
    state: CallState,

    /// Talker of the current or most recent USRP transmission, padded to 10.
    /// Kept after the end of a transmission so the queued terminator still carries it.
    talker: Option<[u8; YSF_CALLSIGN_LENGTH]>,

    // Outbound YSF
    gateway: [u8; YSF_CALLSIGN_LENGTH],
    radio_id: [u8; 5],
    fich: CfgFich,
    dch_mux: DchMultiplexer,
    /// Frames sent since the last header
    tx_counter: u8,
}

impl UsrpToYsf {
    pub fn new(config: &GatewayConfig) -> Self {
        let radio_id = config.radio_id_field();
        Self {
            state: CallState::Idle,
            talker: None,
            gateway: callsign::to_ysf_field(&config.callsign),
            radio_id,
            fich: config.ysf.fich.clone(),
            dch_mux: DchMultiplexer::new(radio_id, &config.ysf.dt1, &config.ysf.dt2),
            tx_counter: 0,
        }
    }

    pub fn state(&self) -> &CallState {
        &self.state
    }

    fn begin(&mut self, now: Instant, conv: &mut impl Converter) {
        self.state = CallState::InCall { frames: 0, started: now };
        conv.put_usrp_header();
    }

    pub fn handle_frame(&mut self, frame: UsrpFrame, now: Instant, conv: &mut impl Converter) {
        let idle = matches!(self.state, CallState::Idle);
        match frame {
            UsrpFrame::TextInfo { callsign: cs } => {
                let padded = callsign::pad(&cs, YSF_CALLSIGN_LENGTH);
                self.talker = Some(callsign::to_ysf_field(&padded));
                if idle {
                    tracing::info!("USRP text info received as first frame callsign=\"{}\" ({} bytes)", padded, padded.len());
                    self.begin(now, conv);
                } else {
                    tracing::debug!("USRP talker updated to \"{}\"", padded);
                }
            }
            UsrpFrame::Voice(pcm) => {
                if idle {
                    tracing::info!("USRP voice received as first frame");
                    self.talker = None;
                    self.begin(now, conv);
                }
                conv.put_usrp(&pcm);
                if let CallState::InCall { frames, .. } = &mut self.state {
                    *frames += 1;
                }
            }
            UsrpFrame::EndOfTransmission => match self.state {
                CallState::Idle => {
                    tracing::trace!("USRP end of transmission while idle, ignored");
                }
                CallState::InCall { frames, .. } => {
                    tracing::info!("USRP received end of voice transmission, {:.1} seconds", frames as f32 / USRP_FRAMES_PER_SEC);
                    conv.put_usrp_eot();
                    self.state = CallState::Idle;
                }
            },
        }
    }

    /// Source callsign for outbound YSF frames
    fn source(&self) -> [u8; YSF_CALLSIGN_LENGTH] {
        self.talker.unwrap_or(self.gateway)
    }

    fn build_fich(&self, frame_indicator: FrameIndicator, frame_number: u8) -> Fich {
        Fich {
            frame_indicator,
            callsign_type: self.fich.callsign,
            call_mode: self.fich.call_mode,
            block_number: 0,
            block_total: 0,
            frame_number,
            frame_total: self.fich.frame_total,
            dev: false,
            message_route: self.fich.message_route,
            voip: self.fich.voip,
            data_type: DataType::from_raw(self.fich.data_type as u64).unwrap_or(DataType::VdMode2),
            sql_type: self.fich.sql_type,
            sql_code: self.fich.sql_code,
        }
    }

    fn header_payload(&self, source: &[u8; YSF_CALLSIGN_LENGTH]) -> [u8; YSF_PAYLOAD_LENGTH_BYTES] {
        let mut payload = [0u8; YSF_PAYLOAD_LENGTH_BYTES];
        let csd1 = HeaderCallsigns::build_csd1(&self.radio_id, source);
        write_header(&mut payload, &csd1, &CSD2_BLANK);
        payload
    }

    /// Turn one dequeued converter frame into a YSF data frame, advancing the frame counter
    pub fn build_frame(&mut self, tagged: YsfTagged) -> YsfDataFrame {
        let source = self.source();
        let (fich, counter, payload) = match tagged {
            TaggedFrame::Header => {
                self.tx_counter = 0;
                let fich = self.build_fich(FrameIndicator::Header, 0);
                let counter = net_counter(FrameIndicator::Header, self.tx_counter);
                self.tx_counter = 1;
                (fich, counter, self.header_payload(&source))
            }
            TaggedFrame::Data(vch) => {
                let fnum = DchMultiplexer::frame_number(self.tx_counter, self.fich.frame_total);
                let mut payload = [0u8; YSF_PAYLOAD_LENGTH_BYTES];
                write_vd2_dch(&mut payload, &self.dch_mux.dch_for(fnum, &source));
                write_vd2_vch(&mut payload, &vch);
                let fich = self.build_fich(FrameIndicator::Communications, fnum);
                let counter = net_counter(FrameIndicator::Communications, self.tx_counter);
                self.tx_counter = self.tx_counter.wrapping_add(1);
                (fich, counter, payload)
            }
            TaggedFrame::End => {
                let fich = self.build_fich(FrameIndicator::Terminator, 0);
                let counter = net_counter(FrameIndicator::Terminator, self.tx_counter);
                (fich, counter, self.header_payload(&source))
            }
        };

        YsfDataFrame {
            gateway: self.gateway,
            source,
            dest: *YSF_DEST_ALL,
            counter,
            fich,
            payload,
        }
    }
}
