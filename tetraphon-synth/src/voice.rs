use fixed::types::U0F32;

use crate::square;

/// One square wave slot: the DDS state plus the bookkeeping the pool needs to
/// pick steal victims and match keys to sounding voices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Voice {
    pub active: bool,
    pub phase: U0F32,
    pub phase_inc: U0F32,
    pub key: char,
    pub base_freq: u16,
    pub age: u32,
}

impl Voice {
    pub const IDLE: Voice = Voice {
        active: false,
        phase: U0F32::ZERO,
        phase_inc: U0F32::ZERO,
        key: '\0',
        base_freq: 0,
        age: 0,
    };

    /// Steps the phase by one sample. Wrapping is the cycle boundary.
    pub fn advance(&mut self) {
        self.phase = self.phase.wrapping_add(self.phase_inc);
    }

    pub fn is_high(&self) -> bool {
        square::is_high(self.phase)
    }
}
