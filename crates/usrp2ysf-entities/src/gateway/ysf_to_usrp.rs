//! YSF to USRP direction: inbound YSF call tracking and outbound USRP frame building

use std::time::Instant;

use usrp2ysf_core::callsign;
use usrp2ysf_pdus::usrp::UsrpFrame;
use usrp2ysf_pdus::ysf::consts::DataType;
use usrp2ysf_pdus::ysf::payload::{HeaderCallsigns, read_vd2_vch};
use usrp2ysf_pdus::ysf::{YsfDataFrame, YsfPdu};

use super::CallState;
use crate::converter::{Converter, TaggedFrame, UsrpTagged};

pub struct YsfToUsrp {
    state: CallState,
    /// Trimmed source callsign of the current or most recent YSF transmission
    talker: String,
    /// Sequence number of the next USRP datagram
    tx_seq: u32,
}

impl Default for YsfToUsrp {
    fn default() -> Self {
        Self::new()
    }
}

impl YsfToUsrp {
    pub fn new() -> Self {
        Self {
            state: CallState::Idle,
            talker: String::new(),
            tx_seq: 0,
        }
    }

    pub fn state(&self) -> &CallState {
        &self.state
    }

    pub fn talker(&self) -> &str {
        &self.talker
    }

    pub fn handle_pdu(&mut self, pdu: YsfPdu, now: Instant, conv: &mut impl Converter) {
        match pdu {
            YsfPdu::Poll { callsign: cs } => {
                tracing::debug!("YSF poll reply from \"{}\"", callsign::from_field(&cs));
            }
            YsfPdu::Header(frame) => self.rx_header(frame, now, conv),
            YsfPdu::Communications(frame) => self.rx_communications(frame, conv),
            YsfPdu::Terminator(frame) => self.rx_terminator(frame, now, conv),
        }
    }

    fn is_translated(frame: &YsfDataFrame) -> bool {
        if frame.fich.data_type != DataType::VdMode2 {
            tracing::trace!("YSF frame with data type {:?} not translated", frame.fich.data_type);
            return false;
        }
        true
    }

    fn rx_header(&mut self, frame: YsfDataFrame, now: Instant, conv: &mut impl Converter) {
        if !Self::is_translated(&frame) {
            return;
        }
        let csd = match HeaderCallsigns::from_payload(&frame.payload) {
            Ok(csd) => csd,
            Err(e) => {
                tracing::debug!("YSF header with unreadable CSD1 ignored: {}", e);
                return;
            }
        };

        self.talker = callsign::trim(&callsign::from_field(&csd.source));
        tracing::info!("YSF received header from \"{}\"", self.talker);

        // A repeated header restarts the call timing but is still forwarded
        conv.put_ysf_header();
        self.state = CallState::InCall { frames: 0, started: now };
    }

    fn rx_communications(&mut self, frame: YsfDataFrame, conv: &mut impl Converter) {
        let CallState::InCall { frames, .. } = &mut self.state else {
            return;
        };
        if !Self::is_translated(&frame) {
            return;
        }
        match read_vd2_vch(&frame.payload) {
            Ok(vch) => {
                conv.put_ysf(&vch);
                *frames += 1;
            }
            Err(e) => tracing::debug!("YSF voice frame dropped: {}", e),
        }
    }

    fn rx_terminator(&mut self, frame: YsfDataFrame, now: Instant, conv: &mut impl Converter) {
        let CallState::InCall { frames, started } = self.state else {
            return;
        };
        if !Self::is_translated(&frame) {
            return;
        }
        tracing::info!(
            "YSF received end of voice transmission from \"{}\", {:.1} seconds, {} frames",
            self.talker,
            now.duration_since(started).as_secs_f32(),
            frames
        );
        conv.put_ysf_eot();
        self.state = CallState::Idle;
    }

    /// Turn one dequeued converter frame into a USRP datagram
    pub fn build_frame(&mut self, tagged: UsrpTagged) -> Vec<u8> {
        let frame = match tagged {
            TaggedFrame::Header => UsrpFrame::TextInfo { callsign: self.talker.clone() },
            TaggedFrame::Data(pcm) => UsrpFrame::Voice(pcm),
            TaggedFrame::End => UsrpFrame::EndOfTransmission,
        };
        let bytes = frame.to_bytes(self.tx_seq);
        self.tx_seq = self.tx_seq.wrapping_add(1);
        bytes
    }
}
