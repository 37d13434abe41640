//! YSF network datagrams: `YSFD` data frames, `YSFP` polls and `YSFU` unlinks.

use core::fmt;

use usrp2ysf_core::{PduParseErr, callsign};

use crate::ysf::consts::*;
use crate::ysf::fich::Fich;

const OFFSET_GATEWAY: usize = 4;
const OFFSET_SOURCE: usize = 14;
const OFFSET_DEST: usize = 24;
const OFFSET_COUNTER: usize = 34;
const OFFSET_SYNC: usize = YSF_NET_HEADER_LENGTH;
const OFFSET_FICH: usize = OFFSET_SYNC + YSF_SYNC_LENGTH_BYTES;
const OFFSET_PAYLOAD: usize = OFFSET_FICH + YSF_FICH_LENGTH_BYTES;

/// Network counter byte for a frame. Bit 0 marks the last frame of a transmission.
pub fn net_counter(frame_indicator: FrameIndicator, counter: u8) -> u8 {
    match frame_indicator {
        FrameIndicator::Header => 0,
        FrameIndicator::Terminator => ((counter & 0x7F) << 1) | 0x01,
        FrameIndicator::Communications | FrameIndicator::Test => (counter & 0x7F) << 1,
    }
}

/// A 155-byte `YSFD` datagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YsfDataFrame {
    pub gateway: [u8; YSF_CALLSIGN_LENGTH],
    pub source: [u8; YSF_CALLSIGN_LENGTH],
    pub dest: [u8; YSF_CALLSIGN_LENGTH],
    pub counter: u8,
    pub fich: Fich,
    pub payload: [u8; YSF_PAYLOAD_LENGTH_BYTES],
}

impl YsfDataFrame {
    pub fn from_bytes(data: &[u8]) -> Result<Self, PduParseErr> {
        if data.len() < 4 || &data[..4] != YSF_DATA_MAGIC {
            return Err(PduParseErr::InvalidMagic { expected: "YSFD" });
        }
        if data.len() != YSF_NET_FRAME_LENGTH {
            return Err(PduParseErr::InconsistentLength {
                expected: YSF_NET_FRAME_LENGTH,
                found: data.len(),
            });
        }

        let fich = Fich::from_bytes(&data[OFFSET_FICH..OFFSET_PAYLOAD])?;

        let mut frame = YsfDataFrame {
            gateway: [0; YSF_CALLSIGN_LENGTH],
            source: [0; YSF_CALLSIGN_LENGTH],
            dest: [0; YSF_CALLSIGN_LENGTH],
            counter: data[OFFSET_COUNTER],
            fich,
            payload: [0; YSF_PAYLOAD_LENGTH_BYTES],
        };
        frame.gateway.copy_from_slice(&data[OFFSET_GATEWAY..OFFSET_SOURCE]);
        frame.source.copy_from_slice(&data[OFFSET_SOURCE..OFFSET_DEST]);
        frame.dest.copy_from_slice(&data[OFFSET_DEST..OFFSET_COUNTER]);
        frame.payload.copy_from_slice(&data[OFFSET_PAYLOAD..YSF_NET_FRAME_LENGTH]);
        Ok(frame)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(YSF_NET_FRAME_LENGTH);
        buf.extend_from_slice(YSF_DATA_MAGIC);
        buf.extend_from_slice(&self.gateway);
        buf.extend_from_slice(&self.source);
        buf.extend_from_slice(&self.dest);
        buf.push(self.counter);
        buf.extend_from_slice(&YSF_SYNC_BYTES);
        buf.extend_from_slice(&self.fich.to_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }
}

impl fmt::Display for YsfDataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "YSFD gw: \"{}\" src: \"{}\" dst: \"{}\" cnt: {:02X} {}",
            callsign::from_field(&self.gateway),
            callsign::from_field(&self.source),
            callsign::from_field(&self.dest),
            self.counter,
            self.fich
        )
    }
}

/// Decoded YSF datagram, dispatched on magic and frame indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YsfPdu {
    /// Poll reply from the reflector
    Poll { callsign: [u8; YSF_CALLSIGN_LENGTH] },
    Header(YsfDataFrame),
    Communications(YsfDataFrame),
    Terminator(YsfDataFrame),
}

impl YsfPdu {
    pub fn from_bytes(data: &[u8]) -> Result<Self, PduParseErr> {
        if data.len() >= 4 && &data[..4] == YSF_POLL_MAGIC {
            if data.len() < YSF_POLL_LENGTH {
                return Err(PduParseErr::InconsistentLength {
                    expected: YSF_POLL_LENGTH,
                    found: data.len(),
                });
            }
            let mut callsign = [0u8; YSF_CALLSIGN_LENGTH];
            callsign.copy_from_slice(&data[4..YSF_POLL_LENGTH]);
            return Ok(YsfPdu::Poll { callsign });
        }

        let frame = YsfDataFrame::from_bytes(data)?;
        tracing::trace!("<- {}", frame);
        match frame.fich.frame_indicator {
            FrameIndicator::Header => Ok(YsfPdu::Header(frame)),
            FrameIndicator::Communications => Ok(YsfPdu::Communications(frame)),
            FrameIndicator::Terminator => Ok(YsfPdu::Terminator(frame)),
            // Fich::from_bytes already rejects these
            FrameIndicator::Test => Err(PduParseErr::InvalidValue {
                field: "frame_indicator",
                value: FrameIndicator::Test.into_raw(),
            }),
        }
    }
}

/// `YSFP` + callsign, sent periodically to keep the link registered
pub fn poll_bytes(gateway: &[u8; YSF_CALLSIGN_LENGTH]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(YSF_POLL_LENGTH);
    buf.extend_from_slice(YSF_POLL_MAGIC);
    buf.extend_from_slice(gateway);
    buf
}

/// `YSFU` + callsign, sent once on shutdown
pub fn unlink_bytes(gateway: &[u8; YSF_CALLSIGN_LENGTH]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(YSF_POLL_LENGTH);
    buf.extend_from_slice(YSF_UNLINK_MAGIC);
    buf.extend_from_slice(gateway);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ysf::payload::{CSD2_BLANK, HeaderCallsigns, write_header};

    fn sample_fich(fi: FrameIndicator) -> Fich {
        Fich {
            frame_indicator: fi,
            callsign_type: 2,
            call_mode: 0,
            block_number: 0,
            block_total: 0,
            frame_number: 0,
            frame_total: 7,
            dev: false,
            message_route: 0,
            voip: false,
            data_type: DataType::VdMode2,
            sql_type: false,
            sql_code: 0,
        }
    }

    fn sample_frame(fi: FrameIndicator, counter: u8) -> YsfDataFrame {
        let mut payload = [0u8; YSF_PAYLOAD_LENGTH_BYTES];
        write_header(&mut payload, &HeaderCallsigns::build_csd1(b"*****", b"G4KLX     "), &CSD2_BLANK);
        YsfDataFrame {
            gateway: *b"N0CALL    ",
            source: *b"G4KLX     ",
            dest: *YSF_DEST_ALL,
            counter: net_counter(fi, counter),
            fich: sample_fich(fi),
            payload,
        }
    }

    #[test]
    fn test_layout() {
        let bytes = sample_frame(FrameIndicator::Header, 0).to_bytes();
        assert_eq!(bytes.len(), 155);
        assert_eq!(&bytes[0..4], b"YSFD");
        assert_eq!(&bytes[4..14], b"N0CALL    ");
        assert_eq!(&bytes[14..24], b"G4KLX     ");
        assert_eq!(&bytes[24..34], b"ALL       ");
        assert_eq!(bytes[34], 0);
        assert_eq!(&bytes[35..40], &YSF_SYNC_BYTES);
    }

    #[test]
    fn test_dispatch() {
        let header = sample_frame(FrameIndicator::Header, 0);
        assert_eq!(YsfPdu::from_bytes(&header.to_bytes()).unwrap(), YsfPdu::Header(header));

        let comms = sample_frame(FrameIndicator::Communications, 3);
        assert_eq!(comms.counter, 6);
        assert_eq!(YsfPdu::from_bytes(&comms.to_bytes()).unwrap(), YsfPdu::Communications(comms));

        let term = sample_frame(FrameIndicator::Terminator, 3);
        assert_eq!(term.counter, 7);
        assert_eq!(YsfPdu::from_bytes(&term.to_bytes()).unwrap(), YsfPdu::Terminator(term));
    }

    #[test]
    fn test_counter_masks() {
        assert_eq!(net_counter(FrameIndicator::Communications, 0xFF), 0xFE);
        assert_eq!(net_counter(FrameIndicator::Terminator, 0x80), 0x01);
        assert_eq!(net_counter(FrameIndicator::Header, 42), 0);
    }

    #[test]
    fn test_poll() {
        let poll = poll_bytes(b"N0CALL    ");
        assert_eq!(&poll[..], b"YSFPN0CALL    ");
        assert_eq!(YsfPdu::from_bytes(&poll).unwrap(), YsfPdu::Poll { callsign: *b"N0CALL    " });
        assert!(YsfPdu::from_bytes(b"YSFPN0").is_err());
        assert_eq!(&unlink_bytes(b"N0CALL    ")[..], b"YSFUN0CALL    ");
    }

    #[test]
    fn test_rejects() {
        let bytes = sample_frame(FrameIndicator::Header, 0).to_bytes();
        assert!(matches!(
            YsfPdu::from_bytes(&bytes[..154]),
            Err(PduParseErr::InconsistentLength { expected: 155, found: 154 })
        ));

        let mut wrong_magic = bytes.clone();
        wrong_magic[3] = b'X';
        assert_eq!(YsfPdu::from_bytes(&wrong_magic), Err(PduParseErr::InvalidMagic { expected: "YSFD" }));

        let test_frame = sample_frame(FrameIndicator::Test, 0);
        assert!(YsfPdu::from_bytes(&test_frame.to_bytes()).is_err());

        let mut zero_fich = bytes;
        for b in &mut zero_fich[40..65] {
            *b = 0;
        }
        assert_eq!(YsfPdu::from_bytes(&zero_fich), Err(PduParseErr::ChecksumFailure { field: "fich" }));
    }
}
