use std::fmt;

use crate::pdu_parse_error::PduParseErr;

/// MSB-first bit cursor over a byte vector.
/// All YSF coding stages (FICH fields, convolutional code, interleaver) address
/// bits in this order, bit 0 being the MSB of byte 0.
pub struct BitBuffer {
    buffer: Vec<u8>,
    pos: usize, // next bit offset for read/write
    end: usize, // bits at or after this are out of window
}

impl BitBuffer {
    /// Create a zeroed buffer capable of holding exactly `len_bits` bits.
    pub fn new(len_bits: usize) -> Self {
        BitBuffer {
            buffer: vec![0; len_bits.div_ceil(8)],
            pos: 0,
            end: len_bits,
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        BitBuffer {
            buffer: data.to_vec(),
            pos: 0,
            end: data.len() * 8,
        }
    }

    /// Construct a BitBuffer from a slice holding one bit per byte.
    pub fn from_bitarr(data: &[u8]) -> Self {
        let mut buf = BitBuffer::new(data.len());
        for (i, &bit) in data.iter().enumerate() {
            buf.set_bit_at(i, bit);
        }
        buf
    }

    /// Convert the entire window into a vector with one bit per byte.
    pub fn to_bitvec(&self) -> Vec<u8> {
        (0..self.end).map(|i| self.bit_at(i)).collect()
    }

    /// Peek `num_bits` at the current pos, without advancing.
    /// Returns None on overflow or if `num_bits>64`.
    pub fn peek_bits(&self, num_bits: usize) -> Option<u64> {
        if num_bits > 64 || self.pos + num_bits > self.end {
            return None;
        }
        let mut v = 0u64;
        for i in 0..num_bits {
            v = (v << 1) | self.bit_at(self.pos + i) as u64;
        }
        Some(v)
    }

    /// Read `num_bits` at the current pos, advancing on success.
    pub fn read_bits(&mut self, num_bits: usize) -> Option<u64> {
        let v = self.peek_bits(num_bits)?;
        self.pos += num_bits;
        Some(v)
    }

    /// Similar to read_bits, but returns a PduParseErr::BufferEnded with the given field name if not enough bits are available.
    pub fn read_field(&mut self, num_bits: usize, field: &'static str) -> Result<u64, PduParseErr> {
        self.read_bits(num_bits).ok_or(PduParseErr::BufferEnded { field: Some(field) })
    }

    /// Write up to 64 bits, advancing pos. Panics if the write exceeds end.
    pub fn write_bits(&mut self, value: u64, num_bits: usize) {
        assert!(num_bits <= 64, "can only write up to 64 bits");
        assert!(num_bits == 64 || value >> num_bits == 0, "value exceeds num_bits {} {}", value, num_bits);
        assert!(self.pos + num_bits <= self.end, "write would exceed buffer end");

        for i in 0..num_bits {
            let bit = ((value >> (num_bits - 1 - i)) & 1) as u8;
            self.set_bit_at(self.pos + i, bit);
        }
        self.pos += num_bits;
    }

    /// Read a bit at an absolute offset, irrespective of pos. Panics outside the window.
    #[inline]
    pub fn bit_at(&self, index: usize) -> u8 {
        assert!(index < self.end, "bit_at out of window: {} >= {}", index, self.end);
        (self.buffer[index / 8] >> (7 - (index % 8))) & 1
    }

    /// Set a bit at an absolute offset, irrespective of pos. Panics outside the window.
    #[inline]
    pub fn set_bit_at(&mut self, index: usize, value: u8) {
        assert!(index < self.end, "set_bit_at out of window: {} >= {}", index, self.end);
        let mask = 1u8 << (7 - (index % 8));
        if value & 1 == 1 {
            self.buffer[index / 8] |= mask;
        } else {
            self.buffer[index / 8] &= !mask;
        }
    }

    /// Extract the internal byte-vector (all bytes, including any unused bits).
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuffer {{ ^{} >{} {:02X?} }}", self.pos, self.end, self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_byte_read_write() {
        let mut bb = BitBuffer::new(16);
        bb.write_bits(0xAB, 8);
        bb.write_bits(0xCD, 8);
        let mut bb = BitBuffer::from_bytes(bb.as_bytes());
        assert_eq!(bb.read_bits(8).unwrap(), 0xAB);
        assert_eq!(bb.read_bits(8).unwrap(), 0xCD);
    }

    #[test]
    fn test_partial_boundary_read_write() {
        let mut bb = BitBuffer::new(16);
        bb.write_bits(0x2, 2);
        bb.write_bits(0x5, 3);
        bb.write_bits(0x7, 3);
        bb.write_bits(0xFF, 8);
        assert_eq!(bb.as_bytes(), &[0b1010_1111, 0xFF]);
        let mut bb = BitBuffer::from_bytes(bb.as_bytes());
        assert_eq!(bb.read_bits(2).unwrap(), 0x2);
        assert_eq!(bb.read_bits(3).unwrap(), 0x5);
        assert_eq!(bb.read_bits(3).unwrap(), 0x7);
    }

    #[test]
    fn test_read_overflow() {
        let mut bb = BitBuffer::new(10);
        assert!(bb.read_bits(11).is_none());
        assert_eq!(bb.read_bits(0).unwrap(), 0);
        assert_eq!(bb.read_field(11, "too_long"), Err(PduParseErr::BufferEnded { field: Some("too_long") }));
    }

    #[test]
    #[should_panic(expected = "write would exceed buffer end")]
    fn test_write_overflow() {
        let mut bb = BitBuffer::new(10);
        bb.write_bits(1, 11);
    }

    #[test]
    #[should_panic(expected = "value exceeds num_bits")]
    fn test_value_above_num_bits() {
        let mut bb = BitBuffer::new(4);
        bb.write_bits(0b11111, 4);
    }

    #[test]
    fn test_random_access() {
        let mut bb = BitBuffer::new(16);
        bb.set_bit_at(0, 1);
        bb.set_bit_at(9, 1);
        assert_eq!(bb.as_bytes(), &[0x80, 0x40]);
        assert_eq!(bb.bit_at(9), 1);
        bb.set_bit_at(0, 0);
        assert_eq!(bb.as_bytes(), &[0x00, 0x40]);
    }

    #[test]
    fn test_bitarr() {
        let bits = vec![1, 0, 1, 1, 0, 0, 1, 1, 1, 0];
        let bb = BitBuffer::from_bitarr(&bits);
        assert_eq!(bb.as_bytes(), &[0b1011_0011, 0b1000_0000]);
        assert_eq!(bb.to_bitvec(), bits);
    }
}
