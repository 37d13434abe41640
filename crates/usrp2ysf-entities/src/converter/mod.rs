//! Queue contract between the gateway engine and the audio transcoder.
//!
//! Each direction is a FIFO of tagged frames. Header and end markers travel
//! through the same queue as audio so they are emitted in order.

pub mod mode_conv;
pub mod vocoder;

pub use mode_conv::ModeConverter;
pub use vocoder::{NullVocoder, Vocoder};

use usrp2ysf_core::PcmFrame;
use usrp2ysf_pdus::ysf::VchBlocks;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedFrame<T> {
    Header,
    Data(T),
    End,
}

/// Output towards YSF: one frame carries five VCH blocks
pub type YsfTagged = TaggedFrame<VchBlocks>;
/// Output towards USRP: one frame carries 160 PCM samples
pub type UsrpTagged = TaggedFrame<Box<PcmFrame>>;

pub trait Converter {
    /// Start of a USRP transmission
    fn put_usrp_header(&mut self);
    fn put_usrp_eot(&mut self);
    /// Non-blocking. Dropped with a warning when the queue is full.
    fn put_usrp(&mut self, pcm: &PcmFrame);
    fn get_ysf(&mut self) -> Option<YsfTagged>;

    /// Start of a YSF transmission
    fn put_ysf_header(&mut self);
    fn put_ysf_eot(&mut self);
    /// Non-blocking. Dropped with a warning when the queue is full.
    fn put_ysf(&mut self, vch: &VchBlocks);
    fn get_usrp(&mut self) -> Option<UsrpTagged>;
}
