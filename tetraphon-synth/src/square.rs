use fixed::types::U0F32;

/// Phase at which the square wave flips from its low to its high half.
pub const HALF_CYCLE: U0F32 = U0F32::from_bits(0x8000_0000);

/// Per-sample phase step for a square wave at `freq_hz * multiplier`, with the
/// phase counting fractions of one cycle: round(freq * mult * 2^32 / rate).
///
/// The u64 intermediates keep the scaled numerator exact; callers keep the
/// multiplier within [1, 16].
pub fn phase_increment(freq_hz: u16, multiplier: u16, sample_rate: u32) -> U0F32 {
    let scaled = (freq_hz as u64 * multiplier as u64) << 32;
    let rate = sample_rate as u64;
    U0F32::from_bits(((scaled + rate / 2) / rate) as u32)
}

/// True in the upper half of the cycle. Testing the phase against [`HALF_CYCLE`]
/// is the top bit of the accumulator, so the wave is high for exactly half of
/// each cycle no matter the increment.
pub fn is_high(phase: U0F32) -> bool {
    phase >= HALF_CYCLE
}
