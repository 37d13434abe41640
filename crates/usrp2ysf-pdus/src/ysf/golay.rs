//! Extended Golay(24,12) code protecting the FICH.

use std::sync::OnceLock;

/// Generator polynomial of the Golay(23,12) code
const GOLAY_GEN_POLY: u32 = 0xC75;

/// Encode 12 data bits into a 24-bit codeword: data in the top 12 bits,
/// 11 parity bits and a final overall even-parity bit.
pub fn encode24128(data: u32) -> u32 {
    assert!(data < 0x1000, "golay: data exceeds 12 bits");
    let mut rem = data << 11;
    for bit in (11..23).rev() {
        if rem & (1 << bit) != 0 {
            rem ^= GOLAY_GEN_POLY << (bit - 11);
        }
    }
    let cw23 = (data << 11) | rem;
    let parity = cw23.count_ones() & 1;
    (cw23 << 1) | parity
}

fn encoding_table() -> &'static [u32; 4096] {
    static TABLE: OnceLock<[u32; 4096]> = OnceLock::new();
    TABLE.get_or_init(|| std::array::from_fn(|data| encode24128(data as u32)))
}

/// Nearest-codeword decode of a 24-bit word. Returns the 12 data bits.
/// Corrects up to three bit errors; beyond that the closest codeword wins.
pub fn decode24128(code: u32) -> u32 {
    let code = code & 0xFF_FFFF;
    let table = encoding_table();

    // Fast path for an error-free word
    let data = code >> 12;
    if table[data as usize] == code {
        return data;
    }

    let mut best = data;
    let mut best_dist = u32::MAX;
    for (candidate, &cw) in table.iter().enumerate() {
        let dist = (cw ^ code).count_ones();
        if dist < best_dist {
            best_dist = dist;
            best = candidate as u32;
            if dist <= 1 {
                break;
            }
        }
    }
    best
}
