use std::collections::VecDeque;

use usrp2ysf_core::{PcmFrame, SILENCE};
use usrp2ysf_pdus::ysf::VchBlocks;
use usrp2ysf_pdus::ysf::consts::{YSF_BLOCKS_PER_FRAME, YSF_VCH_LENGTH_BYTES};

use super::vocoder::Vocoder;
use super::{Converter, TaggedFrame, UsrpTagged, YsfTagged};

/// About 18 seconds of YSF voice frames
pub const YSF_QUEUE_CAPACITY: usize = 200;
/// About 20 seconds of USRP voice frames
pub const USRP_QUEUE_CAPACITY: usize = 1000;

/// Converts between 20 ms PCM frames and YSF VD mode 2 voice frames
/// (five VCH blocks per frame) using a pluggable vocoder.
pub struct ModeConverter<V: Vocoder> {
    vocoder: V,

    /// Linear gain for audio sent to USRP
    usrp_gain: f32,
    /// Linear gain for audio before YSF encoding
    ysf_gain: f32,

    /// VCH blocks of the YSF frame being assembled
    ysf_pending: Vec<[u8; YSF_VCH_LENGTH_BYTES]>,

    ysf_queue: VecDeque<YsfTagged>,
    usrp_queue: VecDeque<UsrpTagged>,
    ysf_capacity: usize,
    usrp_capacity: usize,
}

/// dB to linear amplitude factor
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Scale all samples, saturating at the i16 range
pub fn apply_gain(pcm: &mut PcmFrame, gain: f32) {
    if gain == 1.0 {
        return;
    }
    for s in pcm.iter_mut() {
        *s = (*s as f32 * gain).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16;
    }
}

impl<V: Vocoder> ModeConverter<V> {
    pub fn new(vocoder: V, usrp_gain_adj_db: f32, ysf_gain_adj_db: f32) -> Self {
        Self::with_capacity(vocoder, usrp_gain_adj_db, ysf_gain_adj_db, YSF_QUEUE_CAPACITY, USRP_QUEUE_CAPACITY)
    }

    pub fn with_capacity(vocoder: V, usrp_gain_adj_db: f32, ysf_gain_adj_db: f32, ysf_capacity: usize, usrp_capacity: usize) -> Self {
        Self {
            vocoder,
            usrp_gain: db_to_gain(usrp_gain_adj_db),
            ysf_gain: db_to_gain(ysf_gain_adj_db),
            ysf_pending: Vec::with_capacity(YSF_BLOCKS_PER_FRAME),
            ysf_queue: VecDeque::new(),
            usrp_queue: VecDeque::new(),
            ysf_capacity,
            usrp_capacity,
        }
    }

    pub fn ysf_queue_len(&self) -> usize {
        self.ysf_queue.len()
    }

    pub fn usrp_queue_len(&self) -> usize {
        self.usrp_queue.len()
    }

    /// Queue the assembled YSF frame, padding it with encoded silence if partial
    fn flush_ysf_pending(&mut self) {
        if self.ysf_pending.is_empty() {
            return;
        }
        while self.ysf_pending.len() < YSF_BLOCKS_PER_FRAME {
            let silence = self.vocoder.encode(&SILENCE);
            self.ysf_pending.push(silence);
        }

        let mut vch: VchBlocks = [[0; YSF_VCH_LENGTH_BYTES]; YSF_BLOCKS_PER_FRAME];
        for (dst, src) in vch.iter_mut().zip(self.ysf_pending.drain(..)) {
            *dst = src;
        }

        if self.ysf_queue.len() >= self.ysf_capacity {
            tracing::warn!("YSF queue full, dropping voice frame");
            return;
        }
        self.ysf_queue.push_back(TaggedFrame::Data(vch));
    }
}

impl<V: Vocoder> Converter for ModeConverter<V> {
    fn put_usrp_header(&mut self) {
        self.ysf_pending.clear();
        self.ysf_queue.push_back(TaggedFrame::Header);
    }

    fn put_usrp_eot(&mut self) {
        self.flush_ysf_pending();
        self.ysf_queue.push_back(TaggedFrame::End);
    }

    fn put_usrp(&mut self, pcm: &PcmFrame) {
        let mut pcm = *pcm;
        apply_gain(&mut pcm, self.ysf_gain);
        let block = self.vocoder.encode(&pcm);
        self.ysf_pending.push(block);
        if self.ysf_pending.len() == YSF_BLOCKS_PER_FRAME {
            self.flush_ysf_pending();
        }
    }

    fn get_ysf(&mut self) -> Option<YsfTagged> {
        self.ysf_queue.pop_front()
    }

    fn put_ysf_header(&mut self) {
        self.usrp_queue.push_back(TaggedFrame::Header);
    }

    fn put_ysf_eot(&mut self) {
        self.usrp_queue.push_back(TaggedFrame::End);
    }

    fn put_ysf(&mut self, vch: &VchBlocks) {
        if self.usrp_queue.len() + YSF_BLOCKS_PER_FRAME > self.usrp_capacity {
            tracing::warn!("USRP queue full, dropping voice frame");
            return;
        }
        for block in vch {
            let mut pcm = Box::new(self.vocoder.decode(block));
            apply_gain(&mut pcm, self.usrp_gain);
            self.usrp_queue.push_back(TaggedFrame::Data(pcm));
        }
    }

    fn get_usrp(&mut self) -> Option<UsrpTagged> {
        self.usrp_queue.pop_front()
    }
}
