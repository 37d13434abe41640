/// CRC-16 (ITU-T / CCITT) as used by the YSF FICH and payload blocks.
pub const GEN_POLY: u16 = 0x1021;

#[inline]
pub fn get_nth_bit(input: &[u8], bit: usize) -> u16 {
    let byte = bit / 8;
    let bit_in_byte = 7 - (bit % 8);
    ((input[byte] >> bit_in_byte) & 1) as u16
}

/// CRC-16 ITU-T over a byte stream, processing `number_bits` bits (MSB first).
/// `crc` is the initial CRC value.
/// Returns the updated CRC.
pub fn crc16_itut_bytes(mut crc: u16, input: &[u8], number_bits: usize) -> u16 {
    for i in 0..number_bits {
        let bit = get_nth_bit(input, i);
        crc ^= bit << 15;
        if (crc & 0x8000) != 0 {
            crc = (crc << 1) ^ GEN_POLY;
        } else {
            crc <<= 1;
        }
    }
    crc
}

/// Inverted CRC-16 with zero init over all bytes of `data`.
pub fn crc16_ccitt_inv(data: &[u8]) -> u16 {
    !crc16_itut_bytes(0, data, data.len() * 8)
}

/// Computes the CRC over all but the last two bytes of `block` and stores it
/// big-endian in those two bytes. Panics if `block` is shorter than 2 bytes.
pub fn add_ccitt162(block: &mut [u8]) {
    assert!(block.len() >= 2, "add_ccitt162: block too short");
    let n = block.len() - 2;
    let crc = crc16_ccitt_inv(&block[..n]);
    block[n] = (crc >> 8) as u8;
    block[n + 1] = crc as u8;
}

/// Verifies a block previously sealed with [`add_ccitt162`].
pub fn check_ccitt162(block: &[u8]) -> bool {
    if block.len() < 2 {
        return false;
    }
    let n = block.len() - 2;
    let crc = crc16_ccitt_inv(&block[..n]);
    block[n] == (crc >> 8) as u8 && block[n + 1] == crc as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_value() {
        // CRC-16/XMODEM("123456789") = 0x31C3
        assert_eq!(crc16_itut_bytes(0, b"123456789", 72), 0x31C3);
        assert_eq!(crc16_ccitt_inv(b"123456789"), !0x31C3);
    }

    #[test]
    fn test_add_and_check() {
        let mut block = [0x12, 0x34, 0x56, 0x78, 0, 0];
        add_ccitt162(&mut block);
        assert!(check_ccitt162(&block));

        block[1] ^= 0x04;
        assert!(!check_ccitt162(&block));
        assert!(!check_ccitt162(&[0x00]));
    }

    #[test]
    fn test_partial_bits() {
        // Processing whole bytes bit by bit equals processing them in one go
        let data = [0xDE, 0xAD, 0xBE, 0xEF];
        let first = crc16_itut_bytes(0, &data[..2], 16);
        let full = crc16_itut_bytes(0, &data, 32);
        assert_eq!(crc16_itut_bytes(first, &data[2..], 16), full);
    }
}
