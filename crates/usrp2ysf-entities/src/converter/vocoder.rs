use usrp2ysf_core::{PcmFrame, SILENCE};
use usrp2ysf_pdus::ysf::consts::YSF_VCH_LENGTH_BYTES;

/// Single-frame vocoder: 20 ms of PCM to one VCH block and back
pub trait Vocoder {
    fn encode(&mut self, pcm: &PcmFrame) -> [u8; YSF_VCH_LENGTH_BYTES];
    fn decode(&mut self, vch: &[u8; YSF_VCH_LENGTH_BYTES]) -> PcmFrame;
}

/// Passes timing and signalling through, but no audio: every frame becomes silence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVocoder;

impl Vocoder for NullVocoder {
    fn encode(&mut self, _pcm: &PcmFrame) -> [u8; YSF_VCH_LENGTH_BYTES] {
        [0; YSF_VCH_LENGTH_BYTES]
    }

    fn decode(&mut self, _vch: &[u8; YSF_VCH_LENGTH_BYTES]) -> PcmFrame {
        SILENCE
    }
}
