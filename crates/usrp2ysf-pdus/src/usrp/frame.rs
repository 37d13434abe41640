//! USRP datagram parsing and serialization (32-byte header, big-endian sequence, little-endian PCM)

use usrp2ysf_core::{PcmFrame, PduParseErr, PCM_SAMPLES_PER_FRAME};

// ─── Layout ───────────────────────────────────────────────────────

pub const USRP_MAGIC: &[u8; 4] = b"USRP";
pub const USRP_HEADER_LEN: usize = 32;
pub const USRP_FRAME_LEN: usize = USRP_HEADER_LEN + PCM_SAMPLES_PER_FRAME * 2;

const OFFSET_SEQUENCE: usize = 4;
const OFFSET_KEYUP: usize = 15;
const OFFSET_TYPE: usize = 20;
const OFFSET_PAYLOAD: usize = 32;
const OFFSET_TLV_LENGTH: usize = 33;
const OFFSET_CALLSIGN: usize = 46;

/// Fixed part of the set-info TLV that precedes the callsign
const TLV_SET_INFO_FIXED_LEN: usize = 13;

// ─── Frame types (byte 20) ────────────────────────────────────────

pub const USRP_TYPE_VOICE: u8 = 0;
pub const USRP_TYPE_DTMF: u8 = 1;
pub const USRP_TYPE_TEXT: u8 = 2;

pub const USRP_KEYUP_FALSE: u8 = 0;
pub const USRP_KEYUP_TRUE: u8 = 1;

pub const TLV_TAG_SET_INFO: u8 = 0x08;

/// Decoded USRP datagram
#[derive(Debug, Clone, PartialEq)]
pub enum UsrpFrame {
    /// 160 samples of 8 kHz PCM, sent while keyed up
    Voice(Box<PcmFrame>),
    /// Metadata announcing the talker. The callsign is raw, as received.
    TextInfo { callsign: String },
    EndOfTransmission,
}

impl UsrpFrame {
    /// Parse a datagram. Anything that is not one of the three recognized
    /// shapes is returned as an error and should be dropped by the caller.
    pub fn from_bytes(data: &[u8]) -> Result<UsrpFrame, PduParseErr> {
        if data.len() < USRP_MAGIC.len() || &data[..4] != USRP_MAGIC {
            return Err(PduParseErr::InvalidMagic { expected: "USRP" });
        }

        match data.len() {
            USRP_HEADER_LEN => Ok(UsrpFrame::EndOfTransmission),
            USRP_FRAME_LEN => Self::parse_full(data),
            len => Err(PduParseErr::InconsistentLength {
                expected: USRP_FRAME_LEN,
                found: len,
            }),
        }
    }

    fn parse_full(data: &[u8]) -> Result<UsrpFrame, PduParseErr> {
        let frame_type = data[OFFSET_TYPE];
        match frame_type {
            USRP_TYPE_TEXT => {
                let tag = data[OFFSET_PAYLOAD];
                if tag != TLV_TAG_SET_INFO {
                    return Err(PduParseErr::InvalidValue {
                        field: "tlv_tag",
                        value: tag as u64,
                    });
                }
                let raw = &data[OFFSET_CALLSIGN..];
                let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                let callsign = String::from_utf8_lossy(&raw[..end]).into_owned();
                Ok(UsrpFrame::TextInfo { callsign })
            }
            USRP_TYPE_VOICE => {
                let keyup = data[OFFSET_KEYUP];
                if keyup != USRP_KEYUP_TRUE {
                    return Err(PduParseErr::InvalidValue {
                        field: "keyup",
                        value: keyup as u64,
                    });
                }
                let mut pcm = Box::new([0i16; PCM_SAMPLES_PER_FRAME]);
                for (i, sample) in pcm.iter_mut().enumerate() {
                    let o = OFFSET_PAYLOAD + i * 2;
                    *sample = i16::from_le_bytes([data[o], data[o + 1]]);
                }
                Ok(UsrpFrame::Voice(pcm))
            }
            other => Err(PduParseErr::InvalidValue {
                field: "frame_type",
                value: other as u64,
            }),
        }
    }

    /// Serialize with the given sequence number. Reserved regions are zeroed.
    pub fn to_bytes(&self, sequence: u32) -> Vec<u8> {
        let len = match self {
            UsrpFrame::EndOfTransmission => USRP_HEADER_LEN,
            _ => USRP_FRAME_LEN,
        };
        let mut buf = vec![0u8; len];
        buf[..4].copy_from_slice(USRP_MAGIC);
        buf[OFFSET_SEQUENCE..OFFSET_SEQUENCE + 4].copy_from_slice(&sequence.to_be_bytes());

        match self {
            UsrpFrame::Voice(pcm) => {
                buf[OFFSET_KEYUP] = USRP_KEYUP_TRUE;
                buf[OFFSET_TYPE] = USRP_TYPE_VOICE;
                for (i, sample) in pcm.iter().enumerate() {
                    let o = OFFSET_PAYLOAD + i * 2;
                    buf[o..o + 2].copy_from_slice(&sample.to_le_bytes());
                }
            }
            UsrpFrame::TextInfo { callsign } => {
                // Room for the callsign plus its NUL terminator
                let max_cs = USRP_FRAME_LEN - OFFSET_CALLSIGN - 1;
                let cs = &callsign.as_bytes()[..callsign.len().min(max_cs)];
                buf[OFFSET_KEYUP] = USRP_KEYUP_FALSE;
                buf[OFFSET_TYPE] = USRP_TYPE_TEXT;
                buf[OFFSET_PAYLOAD] = TLV_TAG_SET_INFO;
                buf[OFFSET_TLV_LENGTH] = (TLV_SET_INFO_FIXED_LEN + cs.len()) as u8;
                buf[OFFSET_CALLSIGN..OFFSET_CALLSIGN + cs.len()].copy_from_slice(cs);
            }
            UsrpFrame::EndOfTransmission => {
                buf[OFFSET_KEYUP] = USRP_KEYUP_FALSE;
            }
        }
        buf
    }
}

/// Read the big-endian sequence number of any datagram long enough to carry one
pub fn sequence_of(data: &[u8]) -> Option<u32> {
    let bytes = data.get(OFFSET_SEQUENCE..OFFSET_SEQUENCE + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
