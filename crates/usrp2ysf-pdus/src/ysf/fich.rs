use core::fmt;

use usrp2ysf_core::crc::{add_ccitt162, check_ccitt162};
use usrp2ysf_core::{BitBuffer, PduParseErr, let_field};

use crate::ysf::consts::{DataType, FrameIndicator, YSF_FICH_LENGTH_BYTES};
use crate::ysf::convolution::{ConvEncState, decode_hard};
use crate::ysf::golay::{decode24128, encode24128};
use crate::ysf::interleave::{dibit_deinterleave, dibit_interleave};

/// Field bits plus CRC
const FICH_RAW_BYTES: usize = 6;
/// Four Golay codewords, 96 bits, plus 4 tail bits
const FICH_CODED_BITS: usize = 100;
const FICH_INTERLEAVE_COLUMNS: usize = 5;

/// Frame Information CHannel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fich {
    pub frame_indicator: FrameIndicator,
    /// 2 bits, CS
    pub callsign_type: u8,
    /// 2 bits, CM
    pub call_mode: u8,
    /// 2 bits, BN
    pub block_number: u8,
    /// 2 bits, BT
    pub block_total: u8,
    /// 3 bits, FN
    pub frame_number: u8,
    /// 3 bits, FT
    pub frame_total: u8,
    pub dev: bool,
    /// 3 bits, MR
    pub message_route: u8,
    pub voip: bool,
    pub data_type: DataType,
    pub sql_type: bool,
    /// 7 bits, SQ
    pub sql_code: u8,
}

impl Fich {
    /// Decode the 25-byte coded FICH (sync excluded).
    /// A frame indicator of Test is rejected as an invalid value.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PduParseErr> {
        if data.len() < YSF_FICH_LENGTH_BYTES {
            return Err(PduParseErr::InconsistentLength {
                expected: YSF_FICH_LENGTH_BYTES,
                found: data.len(),
            });
        }

        let interleaved = BitBuffer::from_bytes(&data[..YSF_FICH_LENGTH_BYTES]).to_bitvec();
        let mut coded = vec![0u8; interleaved.len()];
        dibit_deinterleave(FICH_INTERLEAVE_COLUMNS, &interleaved, &mut coded);

        let mut golay = decode_hard(&coded);
        let mut raw = BitBuffer::new(FICH_RAW_BYTES * 8);
        for _ in 0..4 {
            let_field!(golay, codeword, 24);
            raw.write_bits(decode24128(codeword as u32) as u64, 12);
        }

        let raw = raw.into_bytes();
        if !check_ccitt162(&raw) {
            return Err(PduParseErr::ChecksumFailure { field: "fich" });
        }

        Self::parse_fields(&raw)
    }

    fn parse_fields(raw: &[u8]) -> Result<Self, PduParseErr> {
        let mut buf = BitBuffer::from_bytes(&raw[..4]);
        let_field!(buf, fi, 2);
        let_field!(buf, cs, 2);
        let_field!(buf, cm, 2);
        let_field!(buf, bn, 2);
        let_field!(buf, bt, 2);
        let_field!(buf, fnum, 3);
        let_field!(buf, ft, 3);
        let_field!(buf, _reserved, 1);
        let_field!(buf, dev, 1);
        let_field!(buf, mr, 3);
        let_field!(buf, voip, 1);
        let_field!(buf, dt, 2);
        let_field!(buf, sql, 1);
        let_field!(buf, sq, 7);

        let frame_indicator = match FrameIndicator::from_raw(fi) {
            Some(FrameIndicator::Test) | None => {
                return Err(PduParseErr::InvalidValue {
                    field: "frame_indicator",
                    value: fi,
                });
            }
            Some(fi) => fi,
        };
        // 2-bit field, always maps
        let data_type = DataType::from_raw(dt).ok_or(PduParseErr::InvalidValue { field: "data_type", value: dt })?;

        Ok(Fich {
            frame_indicator,
            callsign_type: cs as u8,
            call_mode: cm as u8,
            block_number: bn as u8,
            block_total: bt as u8,
            frame_number: fnum as u8,
            frame_total: ft as u8,
            dev: dev == 1,
            message_route: mr as u8,
            voip: voip == 1,
            data_type,
            sql_type: sql == 1,
            sql_code: sq as u8,
        })
    }

    /// Encode into the 25-byte coded form. Panics if a field exceeds its bit width.
    pub fn to_bytes(&self) -> [u8; YSF_FICH_LENGTH_BYTES] {
        let mut raw = BitBuffer::new(FICH_RAW_BYTES * 8);
        raw.write_bits(self.frame_indicator.into_raw(), 2);
        raw.write_bits(self.callsign_type as u64, 2);
        raw.write_bits(self.call_mode as u64, 2);
        raw.write_bits(self.block_number as u64, 2);
        raw.write_bits(self.block_total as u64, 2);
        raw.write_bits(self.frame_number as u64, 3);
        raw.write_bits(self.frame_total as u64, 3);
        raw.write_bits(0, 1);
        raw.write_bits(self.dev as u64, 1);
        raw.write_bits(self.message_route as u64, 3);
        raw.write_bits(self.voip as u64, 1);
        raw.write_bits(self.data_type.into_raw(), 2);
        raw.write_bits(self.sql_type as u64, 1);
        raw.write_bits(self.sql_code as u64, 7);

        let mut raw = raw.into_bytes();
        add_ccitt162(&mut raw);
        Self::encode_raw(&raw)
    }

    /// Golay, convolutional coding and interleaving of the 6 raw bytes
    fn encode_raw(raw: &[u8]) -> [u8; YSF_FICH_LENGTH_BYTES] {
        // 4 x 12 bits -> 4 Golay codewords, followed by a zero byte for the tail
        let mut split = BitBuffer::from_bytes(raw);
        let mut golay = BitBuffer::new(13 * 8);
        for _ in 0..4 {
            let data = split.read_bits(12).unwrap_or(0) as u32;
            golay.write_bits(encode24128(data) as u64, 24);
        }

        let coded = ConvEncState::new().encode(golay.as_bytes(), FICH_CODED_BITS).to_bitvec();
        let mut interleaved = vec![0u8; coded.len()];
        dibit_interleave(FICH_INTERLEAVE_COLUMNS, &coded, &mut interleaved);

        let mut out = [0u8; YSF_FICH_LENGTH_BYTES];
        out.copy_from_slice(BitBuffer::from_bitarr(&interleaved).as_bytes());
        out
    }
}

impl fmt::Display for Fich {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FICH {{ fi: {:?} cs: {} cm: {} bn/bt: {}/{} fn/ft: {}/{} dev: {} mr: {} voip: {} dt: {:?} sql: {} sq: {} }}",
            self.frame_indicator,
            self.callsign_type,
            self.call_mode,
            self.block_number,
            self.block_total,
            self.frame_number,
            self.frame_total,
            self.dev,
            self.message_route,
            self.voip,
            self.data_type,
            self.sql_type,
            self.sql_code
        )
    }
}
