//! Dibit matrix interleaver. Coded bits are taken in pairs; pair `i` of a
//! `columns` x 20 matrix lands at bit offset `2 * (i / columns) + 40 * (i % columns)`.

/// Rows of the interleaving matrix, fixed for all YSF blocks
pub const ROWS: usize = 20;

#[inline]
pub const fn dibit_position(columns: usize, i: usize) -> usize {
    2 * (i / columns) + 2 * ROWS * (i % columns)
}

/// `input` and `output` hold one bit per byte, `2 * ROWS * columns` entries each.
pub fn dibit_interleave(columns: usize, input: &[u8], output: &mut [u8]) {
    let total = 2 * ROWS * columns;
    assert!(input.len() >= total && output.len() >= total);
    for i in 0..ROWS * columns {
        let n = dibit_position(columns, i);
        output[n] = input[2 * i];
        output[n + 1] = input[2 * i + 1];
    }
}

pub fn dibit_deinterleave(columns: usize, input: &[u8], output: &mut [u8]) {
    let total = 2 * ROWS * columns;
    assert!(input.len() >= total && output.len() >= total);
    for i in 0..ROWS * columns {
        let n = dibit_position(columns, i);
        output[2 * i] = input[n];
        output[2 * i + 1] = input[n + 1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        // First row of the 5 x 20 table
        let row: Vec<usize> = (0..5).map(|i| dibit_position(5, i)).collect();
        assert_eq!(row, vec![0, 40, 80, 120, 160]);
        assert_eq!(dibit_position(5, 5), 2);
        assert_eq!(dibit_position(9, 9), 2);
        assert_eq!(dibit_position(9, 179), 38 + 320);
    }

    #[test]
    fn test_is_permutation() {
        for columns in [5, 9] {
            let total = 2 * ROWS * columns;
            let data: Vec<u8> = (0..total).map(|i| (i % 2) as u8).collect();
            let mut tmp = vec![0u8; total];
            let mut out = vec![0u8; total];

            dibit_interleave(columns, &data, &mut tmp);
            dibit_deinterleave(columns, &tmp, &mut out);
            assert_eq!(data, out);

            let mut seen = vec![false; total];
            for i in 0..ROWS * columns {
                let n = dibit_position(columns, i);
                assert!(!seen[n] && !seen[n + 1]);
                seen[n] = true;
                seen[n + 1] = true;
            }
            assert!(seen.iter().all(|&s| s));
        }
    }
}
