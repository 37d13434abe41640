use crate::ysf::consts::YSF_CALLSIGN_LENGTH;
use crate::ysf::payload::DCH_LENGTH_BYTES;

/// Chooses the DCH content of each communications frame.
///
/// A transmission cycles through `frame_total + 1` frame numbers; each frame
/// number carries a fixed piece of identification or auxiliary data.
#[derive(Debug, Clone)]
pub struct DchMultiplexer {
    radio_id: [u8; 5],
    dt1: [u8; DCH_LENGTH_BYTES],
    dt2: [u8; DCH_LENGTH_BYTES],
}

impl DchMultiplexer {
    /// Data tags longer than 10 bytes are truncated, shorter ones zero-filled.
    pub fn new(radio_id: [u8; 5], dt1: &[u8], dt2: &[u8]) -> Self {
        Self {
            radio_id,
            dt1: zero_filled(dt1),
            dt2: zero_filled(dt2),
        }
    }

    /// Frame number for the `counter`-th frame after the header (counter starts at 1)
    pub fn frame_number(counter: u8, frame_total: u8) -> u8 {
        (counter.wrapping_sub(1) as u32 % (frame_total as u32 + 1)) as u8
    }

    pub fn dch_for(&self, frame_number: u8, source: &[u8; YSF_CALLSIGN_LENGTH]) -> [u8; DCH_LENGTH_BYTES] {
        let mut dch = [b' '; DCH_LENGTH_BYTES];
        match frame_number {
            0 => {
                dch[..5].copy_from_slice(b"*****");
                dch[5..].copy_from_slice(&self.radio_id);
            }
            1 | 2 => dch.copy_from_slice(source),
            5 => dch[5..].copy_from_slice(&self.radio_id),
            6 => dch = self.dt1,
            7 => dch = self.dt2,
            _ => {}
        }
        dch
    }
}

fn zero_filled(data: &[u8]) -> [u8; DCH_LENGTH_BYTES] {
    let mut out = [0u8; DCH_LENGTH_BYTES];
    for (dst, src) in out.iter_mut().zip(data) {
        *dst = *src;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_assignment() {
        let mux = DchMultiplexer::new(*b"G4KLX", &[49, 34, 98, 95, 41], &[]);
        let src = b"M0ABC     ";

        assert_eq!(&mux.dch_for(0, src), b"*****G4KLX");
        assert_eq!(&mux.dch_for(1, src), src);
        assert_eq!(&mux.dch_for(2, src), src);
        assert_eq!(&mux.dch_for(3, src), b"          ");
        assert_eq!(&mux.dch_for(4, src), b"          ");
        assert_eq!(&mux.dch_for(5, src), b"     G4KLX");
        assert_eq!(mux.dch_for(6, src), [49, 34, 98, 95, 41, 0, 0, 0, 0, 0]);
        assert_eq!(mux.dch_for(7, src), [0u8; 10]);
    }

    #[test]
    fn test_frame_number_cycle() {
        let fns: Vec<u8> = (1..=10).map(|cnt| DchMultiplexer::frame_number(cnt, 7)).collect();
        assert_eq!(fns, vec![0, 1, 2, 3, 4, 5, 6, 7, 0, 1]);
        assert_eq!(DchMultiplexer::frame_number(1, 0), 0);
        assert_eq!(DchMultiplexer::frame_number(4, 1), 1);
        // Counter wraps at 256
        assert_eq!(DchMultiplexer::frame_number(0, 7), 255 % 8);
    }

    #[test]
    fn test_long_data_tag_truncated() {
        let mux = DchMultiplexer::new(*b"*****", &[1; 12], &[2; 3]);
        assert_eq!(mux.dch_for(6, b"          "), [1u8; 10]);
        assert_eq!(mux.dch_for(7, b"          "), [2, 2, 2, 0, 0, 0, 0, 0, 0, 0]);
    }
}
