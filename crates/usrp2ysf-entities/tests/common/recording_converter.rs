use usrp2ysf_core::PcmFrame;
use usrp2ysf_entities::converter::{Converter, ModeConverter, NullVocoder, UsrpTagged, YsfTagged};
use usrp2ysf_pdus::ysf::VchBlocks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvEvent {
    UsrpHeader,
    Usrp,
    UsrpEot,
    YsfHeader,
    Ysf,
    YsfEot,
}

/// Mode converter that also records every event it is given
pub struct RecordingConverter {
    inner: ModeConverter<NullVocoder>,
    pub events: Vec<ConvEvent>,
}

impl RecordingConverter {
    pub fn new() -> Self {
        Self {
            inner: ModeConverter::new(NullVocoder, 0.0, 0.0),
            events: Vec::new(),
        }
    }
}

impl Converter for RecordingConverter {
    fn put_usrp_header(&mut self) {
        self.events.push(ConvEvent::UsrpHeader);
        self.inner.put_usrp_header();
    }

    fn put_usrp_eot(&mut self) {
        self.events.push(ConvEvent::UsrpEot);
        self.inner.put_usrp_eot();
    }

    fn put_usrp(&mut self, pcm: &PcmFrame) {
        self.events.push(ConvEvent::Usrp);
        self.inner.put_usrp(pcm);
    }

    fn get_ysf(&mut self) -> Option<YsfTagged> {
        self.inner.get_ysf()
    }

    fn put_ysf_header(&mut self) {
        self.events.push(ConvEvent::YsfHeader);
        self.inner.put_ysf_header();
    }

    fn put_ysf_eot(&mut self) {
        self.events.push(ConvEvent::YsfEot);
        self.inner.put_ysf_eot();
    }

    fn put_ysf(&mut self, vch: &VchBlocks) {
        self.events.push(ConvEvent::Ysf);
        self.inner.put_ysf(vch);
    }

    fn get_usrp(&mut self) -> Option<UsrpTagged> {
        self.inner.get_usrp()
    }
}
