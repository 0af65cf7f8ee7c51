use fixed::types::U0F32;

use crate::voice::Voice;

/// Where a key lands when a slot is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// An active voice already sounds this key; retrigger it in place.
    Reused(usize),
    /// The lowest-indexed inactive slot.
    Free(usize),
    /// Every slot is busy; this one holds the oldest allocation.
    Stolen(usize),
}

/// Fixed set of voice slots plus the allocation age counter.
pub struct VoicePool<const V: usize> {
    voices: [Voice; V],
    age_counter: u32,
}

impl<const V: usize> VoicePool<V> {
    pub const fn new() -> Self {
        Self {
            voices: [Voice::IDLE; V],
            age_counter: 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.voices.iter_mut()
    }

    pub fn voice(&self, index: usize) -> &Voice {
        &self.voices[index]
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.active).count()
    }

    pub fn find(&self, key: char) -> Option<usize> {
        self.voices.iter().position(|v| v.active && v.key == key)
    }

    /// Picks the slot a new note for `key` should use: the voice already
    /// sounding `key` if there is one, else the lowest-indexed free slot, else
    /// the voice with the smallest age. `min_by_key` keeps the first of equal
    /// ages, so steal ties go to the lowest index. Only `None` for V = 0.
    pub fn claim(&self, key: char) -> Option<Claim> {
        if let Some(index) = self.find(key) {
            return Some(Claim::Reused(index));
        }

        if let Some(index) = self.voices.iter().position(|v| !v.active) {
            return Some(Claim::Free(index));
        }

        self.voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.age)
            .map(|(index, _)| Claim::Stolen(index))
    }

    /// Restarts `index` with a fresh phase and age. The slot is marked
    /// inactive before any field is touched and active again only after all
    /// of them are written, so a tick preempting this call either mixes the
    /// old voice or skips the slot, never a half-written one.
    pub fn activate(&mut self, index: usize, key: char, base_freq: u16, phase_inc: U0F32) {
        let age = self.next_age();
        let voice = &mut self.voices[index];

        voice.active = false;
        voice.key = key;
        voice.base_freq = base_freq;
        voice.phase = U0F32::ZERO;
        voice.phase_inc = phase_inc;
        voice.age = age;
        voice.active = true;
    }

    /// Silences the voice sounding `key`. Returns false if no voice held it.
    pub fn release(&mut self, key: char) -> bool {
        match self.find(key) {
            Some(index) => {
                self.voices[index].active = false;
                true
            }
            None => false,
        }
    }

    /// Deactivates every slot. Phases and ages stay put; the next allocation
    /// overwrites them anyway.
    pub fn clear(&mut self) {
        for voice in self.voices.iter_mut() {
            voice.active = false;
        }
    }

    fn next_age(&mut self) -> u32 {
        self.age_counter = self.age_counter.wrapping_add(1);
        self.age_counter
    }
}

impl<const V: usize> Default for VoicePool<V> {
    fn default() -> Self {
        Self::new()
    }
}
