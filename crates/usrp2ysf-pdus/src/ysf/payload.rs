//! Payload section of a YSF frame: header-mode CSD blocks and VD mode 2 DCH/VCH blocks.
//!
//! Every data block goes through the same chain: whitening, CRC-16, rate 1/2
//! convolutional code with 4 tail bits, dibit interleaving. The interleaved
//! bytes are then spread over the five 18-byte blocks of the payload.

use usrp2ysf_core::crc::{add_ccitt162, check_ccitt162};
use usrp2ysf_core::{BitBuffer, PduParseErr};

use crate::ysf::consts::*;
use crate::ysf::convolution::{ConvEncState, decode_hard};
use crate::ysf::interleave::{dibit_deinterleave, dibit_interleave};

pub const CSD_LENGTH_BYTES: usize = 20;
pub const DCH_LENGTH_BYTES: usize = 10;

/// Interleaver geometry per block type
const CSD_COLUMNS: usize = 9;
const DCH_COLUMNS: usize = 5;

/// Bytes of each 18-byte block taken by one CSD
const CSD_BYTES_PER_BLOCK: usize = 9;

/// Whiten, seal with CRC, code and interleave `data`. Returns `columns * 5` bytes.
fn encode_block(data: &[u8], columns: usize) -> Vec<u8> {
    let mut sealed = vec![0u8; data.len() + 3];
    for (i, (dst, src)) in sealed.iter_mut().zip(data).enumerate() {
        *dst = src ^ WHITENING_DATA[i];
    }
    add_ccitt162(&mut sealed[..data.len() + 2]);

    // Data and CRC, plus 4 zero tail bits from the trailing byte
    let num_bits = (data.len() + 2) * 8 + 4;
    let coded = ConvEncState::new().encode(&sealed, num_bits).to_bitvec();
    let mut interleaved = vec![0u8; coded.len()];
    dibit_interleave(columns, &coded, &mut interleaved);
    BitBuffer::from_bitarr(&interleaved).into_bytes()
}

/// Inverse of [`encode_block`]. `len` is the length of the unwhitened data.
fn decode_block(bytes: &[u8], len: usize, columns: usize, field: &'static str) -> Result<Vec<u8>, PduParseErr> {
    let interleaved = BitBuffer::from_bytes(bytes).to_bitvec();
    let mut coded = vec![0u8; interleaved.len()];
    dibit_deinterleave(columns, &interleaved, &mut coded);

    let mut decoded = decode_hard(&coded);
    let mut sealed = Vec::with_capacity(len + 2);
    for _ in 0..len + 2 {
        sealed.push(decoded.read_field(8, field)? as u8);
    }
    if !check_ccitt162(&sealed) {
        return Err(PduParseErr::ChecksumFailure { field });
    }

    sealed.truncate(len);
    for (i, b) in sealed.iter_mut().enumerate() {
        *b ^= WHITENING_DATA[i];
    }
    Ok(sealed)
}

fn check_payload_len(payload: &[u8]) -> Result<(), PduParseErr> {
    if payload.len() < YSF_PAYLOAD_LENGTH_BYTES {
        return Err(PduParseErr::InconsistentLength {
            expected: YSF_PAYLOAD_LENGTH_BYTES,
            found: payload.len(),
        });
    }
    Ok(())
}

/// Copy `chunk`-byte pieces of `src` to offset `offset` of each payload block
fn spread(payload: &mut [u8], src: &[u8], chunk: usize, offset: usize) {
    for (i, piece) in src.chunks(chunk).take(YSF_BLOCKS_PER_FRAME).enumerate() {
        let start = i * YSF_BLOCK_LENGTH_BYTES + offset;
        payload[start..start + piece.len()].copy_from_slice(piece);
    }
}

fn gather(payload: &[u8], chunk: usize, offset: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(chunk * YSF_BLOCKS_PER_FRAME);
    for i in 0..YSF_BLOCKS_PER_FRAME {
        let start = i * YSF_BLOCK_LENGTH_BYTES + offset;
        out.extend_from_slice(&payload[start..start + chunk]);
    }
    out
}

// ─── Header mode ──────────────────────────────────────────────────

/// Write CSD1 and CSD2 into a 90-byte payload (header and terminator frames)
pub fn write_header(payload: &mut [u8], csd1: &[u8; CSD_LENGTH_BYTES], csd2: &[u8; CSD_LENGTH_BYTES]) {
    assert!(payload.len() >= YSF_PAYLOAD_LENGTH_BYTES, "payload too short");
    spread(payload, &encode_block(csd1, CSD_COLUMNS), CSD_BYTES_PER_BLOCK, 0);
    spread(payload, &encode_block(csd2, CSD_COLUMNS), CSD_BYTES_PER_BLOCK, CSD_BYTES_PER_BLOCK);
}

pub fn read_csd1(payload: &[u8]) -> Result<[u8; CSD_LENGTH_BYTES], PduParseErr> {
    check_payload_len(payload)?;
    let bytes = gather(payload, CSD_BYTES_PER_BLOCK, 0);
    let csd = decode_block(&bytes, CSD_LENGTH_BYTES, CSD_COLUMNS, "csd1")?;
    let mut out = [0u8; CSD_LENGTH_BYTES];
    out.copy_from_slice(&csd);
    Ok(out)
}

pub fn read_csd2(payload: &[u8]) -> Result<[u8; CSD_LENGTH_BYTES], PduParseErr> {
    check_payload_len(payload)?;
    let bytes = gather(payload, CSD_BYTES_PER_BLOCK, CSD_BYTES_PER_BLOCK);
    let csd = decode_block(&bytes, CSD_LENGTH_BYTES, CSD_COLUMNS, "csd2")?;
    let mut out = [0u8; CSD_LENGTH_BYTES];
    out.copy_from_slice(&csd);
    Ok(out)
}

/// Destination and source carried in CSD1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCallsigns {
    pub dest: [u8; YSF_CALLSIGN_LENGTH],
    pub source: [u8; YSF_CALLSIGN_LENGTH],
}

impl HeaderCallsigns {
    /// CSD1 as transmitted by this gateway: `*****` + radio id, then the source
    pub fn build_csd1(radio_id: &[u8; 5], source: &[u8; YSF_CALLSIGN_LENGTH]) -> [u8; CSD_LENGTH_BYTES] {
        let mut csd1 = [0u8; CSD_LENGTH_BYTES];
        csd1[..5].copy_from_slice(b"*****");
        csd1[5..10].copy_from_slice(radio_id);
        csd1[10..].copy_from_slice(source);
        csd1
    }

    pub fn from_payload(payload: &[u8]) -> Result<Self, PduParseErr> {
        let csd1 = read_csd1(payload)?;
        let mut dest = [0u8; YSF_CALLSIGN_LENGTH];
        let mut source = [0u8; YSF_CALLSIGN_LENGTH];
        dest.copy_from_slice(&csd1[..YSF_CALLSIGN_LENGTH]);
        source.copy_from_slice(&csd1[YSF_CALLSIGN_LENGTH..]);
        Ok(Self { dest, source })
    }
}

/// CSD2 is not used by this gateway and is sent as spaces
pub const CSD2_BLANK: [u8; CSD_LENGTH_BYTES] = [b' '; CSD_LENGTH_BYTES];

// ─── VD mode 2 ────────────────────────────────────────────────────

/// Write the 10-byte DCH spread over the first 5 bytes of each block
pub fn write_vd2_dch(payload: &mut [u8], dch: &[u8; DCH_LENGTH_BYTES]) {
    assert!(payload.len() >= YSF_PAYLOAD_LENGTH_BYTES, "payload too short");
    spread(payload, &encode_block(dch, DCH_COLUMNS), YSF_VD2_DCH_BYTES_PER_BLOCK, 0);
}

pub fn read_vd2_dch(payload: &[u8]) -> Result<[u8; DCH_LENGTH_BYTES], PduParseErr> {
    check_payload_len(payload)?;
    let bytes = gather(payload, YSF_VD2_DCH_BYTES_PER_BLOCK, 0);
    let dch = decode_block(&bytes, DCH_LENGTH_BYTES, DCH_COLUMNS, "dch")?;
    let mut out = [0u8; DCH_LENGTH_BYTES];
    out.copy_from_slice(&dch);
    Ok(out)
}

/// Place one VCH after the DCH bytes of each block
pub fn write_vd2_vch(payload: &mut [u8], vch: &VchBlocks) {
    assert!(payload.len() >= YSF_PAYLOAD_LENGTH_BYTES, "payload too short");
    for (i, block) in vch.iter().enumerate() {
        let start = i * YSF_BLOCK_LENGTH_BYTES + YSF_VD2_DCH_BYTES_PER_BLOCK;
        payload[start..start + YSF_VCH_LENGTH_BYTES].copy_from_slice(block);
    }
}

pub fn read_vd2_vch(payload: &[u8]) -> Result<VchBlocks, PduParseErr> {
    check_payload_len(payload)?;
    let mut vch = [[0u8; YSF_VCH_LENGTH_BYTES]; YSF_BLOCKS_PER_FRAME];
    for (i, block) in vch.iter_mut().enumerate() {
        let start = i * YSF_BLOCK_LENGTH_BYTES + YSF_VD2_DCH_BYTES_PER_BLOCK;
        block.copy_from_slice(&payload[start..start + YSF_VCH_LENGTH_BYTES]);
    }
    Ok(vch)
}
