//! Rate 1/2, K=5 convolutional code used for the FICH and payload data blocks.
//! g1 = 1 + D^3 + D^4, g2 = 1 + D + D^2 + D^4.

use usrp2ysf_core::BitBuffer;

/// Type used to represent input bits.
/// "0" is represented as -1, "1" as +1, and an erased bit as 0.
pub type SoftBit = i8;

/// Type used to accumulate path metrics.
/// 16 bits are enough for the at most 180-bit messages decoded here.
type Metric = i16;

/// Constraint length of the code.
const K: usize = 5;

const NUM_STATES: usize = num_states(K);

/// One decision bit per trellis state
type DecisionBitmap = u16;

pub const fn num_states(k: usize) -> usize {
    1 << (k - 1)
}

/// Tap positions: index 0 is the current input, index i the input i steps back
const YSF_POLYNOMIALS: [[bool; K]; 2] = [[true, false, false, true, true], [true, true, true, false, true]];

/// Shift register state of the encoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvEncState {
    delayed: [u8; 4],
}

impl ConvEncState {
    pub fn new() -> Self {
        Self { delayed: [0; 4] }
    }

    #[inline(always)]
    fn encode_bit(&mut self, bit: u8) -> (u8, u8) {
        let [d1, d2, d3, d4] = self.delayed;

        let g1 = bit ^ d3 ^ d4;
        let g2 = bit ^ d1 ^ d2 ^ d4;

        self.delayed = [bit, d1, d2, d3];
        (g1, g2)
    }

    /// Encode the first `num_bits` bits of `input` (MSB first) into `2 * num_bits` output bits.
    pub fn encode(&mut self, input: &[u8], num_bits: usize) -> BitBuffer {
        assert!(input.len() * 8 >= num_bits, "convolution: input shorter than num_bits");
        let src = BitBuffer::from_bytes(input);
        let mut out = BitBuffer::new(num_bits * 2);
        for i in 0..num_bits {
            let (g1, g2) = self.encode_bit(src.bit_at(i));
            out.write_bits(g1 as u64, 1);
            out.write_bits(g2 as u64, 1);
        }
        out
    }
}

/// Viterbi decoder for a binary convolutional code of rate 1/N.
pub struct ViterbiDecoder<const N: usize> {
    /// Expected encoder outputs for each state for encoder input "0".
    expected_0: [[SoftBit; NUM_STATES]; N],
}

impl<const N: usize> ViterbiDecoder<N> {
    /// All polynomials must tap the oldest register stage, so the expected
    /// outputs for a "1" leaving the register are the inverse of those for "0".
    pub fn new_with_polynomials(generator_polynomials: &[[bool; K]; N]) -> Self {
        assert!(generator_polynomials.iter().all(|p| p[K - 1]), "viterbi: every polynomial must use the last tap");
        let expected_0 = std::array::from_fn(|poly_n| {
            let poly = generator_polynomials[poly_n];
            std::array::from_fn(|state| {
                let mut encoder_output: bool = false;
                // Each bit of the state number corresponds to a past input of the encoder.
                for bit_i in 0..K - 1 {
                    let past_input_bit = (state & (1 << (K - 2 - bit_i))) != 0;
                    if past_input_bit && poly[bit_i] {
                        encoder_output = !encoder_output;
                    }
                }
                if encoder_output { 1 as SoftBit } else { -1 as SoftBit }
            })
        });
        Self { expected_0 }
    }

    pub fn decode(&self, received_bits: &[SoftBit]) -> Vec<u8> {
        let num_output_bits = received_bits.len() / N;
        let mut trellis_decisions: Vec<DecisionBitmap> = Vec::with_capacity(num_output_bits);

        // Encoder starts from state 0. Other states get half the maximum metric,
        // leaving room to accumulate without overflow.
        let mut metrics: [Metric; NUM_STATES] = [Metric::MAX / 2; NUM_STATES];
        metrics[0] = 0;

        for received_bits_for_one_output_bit in received_bits.chunks_exact(N) {
            let mut branch_metrics_0: [Metric; NUM_STATES] = [0; NUM_STATES];

            for (received_bit, expected_0) in received_bits_for_one_output_bit.iter().zip(self.expected_0.iter()) {
                for (branch_metric_0, expected_bit_0) in branch_metrics_0.iter_mut().zip(expected_0.iter()) {
                    *branch_metric_0 -= (received_bit * expected_bit_0) as Metric;
                }
            }

            let mut decisions: DecisionBitmap = 0;

            metrics = std::array::from_fn(|state| {
                let predecessor_0 = (state * 2) % NUM_STATES;
                let predecessor_1 = predecessor_0 + 1;
                let metric_0 = metrics[predecessor_0] + branch_metrics_0[state];
                let metric_1 = metrics[predecessor_1] - branch_metrics_0[state];

                if metric_1 < metric_0 {
                    decisions |= 1 << state;
                    metric_1
                } else {
                    metric_0
                }
            });
            trellis_decisions.push(decisions);
        }

        // Tail bits leave the encoder in state 0.
        let mut best_state = 0;

        let mut decoded_bits: Vec<u8> = Vec::with_capacity(num_output_bits);
        for decisions in trellis_decisions.iter().rev() {
            decoded_bits.push(((best_state >> (K - 2)) & 1) as u8);
            best_state = best_state * 2 % NUM_STATES + ((*decisions >> best_state) & 1) as usize;
        }
        decoded_bits.reverse();
        decoded_bits
    }
}

pub type YsfViterbiDecoder = ViterbiDecoder<2>;

impl YsfViterbiDecoder {
    pub fn new() -> Self {
        Self::new_with_polynomials(&YSF_POLYNOMIALS)
    }
}

impl Default for YsfViterbiDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Hard-decision decode of `coded` (one bit per byte) back into packed bytes.
/// The output holds `coded.len() / 2` bits, tail included.
pub fn decode_hard(coded: &[u8]) -> BitBuffer {
    let soft: Vec<SoftBit> = coded.iter().map(|&b| if b & 1 == 1 { 1 } else { -1 }).collect();
    let decoded = YsfViterbiDecoder::new().decode(&soft);
    BitBuffer::from_bitarr(&decoded)
}
