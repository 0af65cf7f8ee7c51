use crate::pool::{Claim, VoicePool};
use crate::square;
use crate::voice::Voice;

pub const DEFAULT_SAMPLE_RATE: u32 = 31_250;
pub const DEFAULT_PWM_TOP: u16 = 511;

pub const MIN_MULTIPLIER: u16 = 1;
pub const MAX_MULTIPLIER: u16 = 16;

/// Mix timing and output range. `sample_rate` must be nonzero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToneEngineSettings {
    /// Ticks per second of the sample interrupt.
    pub sample_rate: u32,
    /// Highest duty value the PWM peripheral accepts; output is 0..=pwm_top.
    pub pwm_top: u16,
}

impl ToneEngineSettings {
    pub const DEFAULT: ToneEngineSettings = ToneEngineSettings {
        sample_rate: DEFAULT_SAMPLE_RATE,
        pwm_top: DEFAULT_PWM_TOP,
    };
}

impl Default for ToneEngineSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What `note_on` did with a key, for the caller to log or ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NoteOutcome {
    /// Zero frequency, or a pool with no slots.
    Ignored,
    /// The key was already sounding and restarted in place.
    Retriggered { slot: usize },
    Allocated { slot: usize },
    /// Every slot was busy; the oldest voice was cut off.
    Stolen { slot: usize, victim: char },
}

/// Polyphonic square wave mixer. Control calls (`note_on`, `note_off`,
/// `all_off`, `set_frequency_multiplier`) run in the key scan loop; `tick`
/// runs once per sample in the PWM interrupt and returns the next duty value.
/// For use from both contexts at once, wrap it in
/// [`SharedToneEngine`](crate::shared::SharedToneEngine).
pub struct ToneEngine<const V: usize> {
    settings: ToneEngineSettings,
    pool: VoicePool<V>,
    multiplier: u16,
    center: u16,
    amp_per_voice: u16,
}

impl<const V: usize> ToneEngine<V> {
    /// Const so a wrapped engine can live in a `static`.
    pub const fn new(settings: ToneEngineSettings) -> Self {
        debug_assert!(settings.sample_rate > 0);

        // V voices of +-amp_per_voice summed onto the center stay inside
        // 0..=pwm_top; the clamp in tick only covers the rounding loss of
        // the two divisions.
        let center = settings.pwm_top / 2;
        let amp_per_voice = if V == 0 { 0 } else { center / V as u16 };

        Self {
            settings,
            pool: VoicePool::new(),
            multiplier: MIN_MULTIPLIER,
            center,
            amp_per_voice,
        }
    }

    /// Starts `key` at `freq_hz`, reusing its voice if it already sounds,
    /// else taking a free slot, else stealing the oldest voice. A zero
    /// frequency is ignored rather than allocating a silent voice.
    pub fn note_on(&mut self, key: char, freq_hz: u16) -> NoteOutcome {
        if freq_hz == 0 {
            return NoteOutcome::Ignored;
        }

        let Some(claim) = self.pool.claim(key) else {
            return NoteOutcome::Ignored;
        };

        let phase_inc = square::phase_increment(freq_hz, self.multiplier, self.settings.sample_rate);

        match claim {
            Claim::Reused(slot) => {
                self.pool.activate(slot, key, freq_hz, phase_inc);
                NoteOutcome::Retriggered { slot }
            }
            Claim::Free(slot) => {
                self.pool.activate(slot, key, freq_hz, phase_inc);
                NoteOutcome::Allocated { slot }
            }
            Claim::Stolen(slot) => {
                let victim = self.pool.voice(slot).key;
                self.pool.activate(slot, key, freq_hz, phase_inc);
                NoteOutcome::Stolen { slot, victim }
            }
        }
    }

    /// Silences `key`. Returns false if nothing was sounding it, which is
    /// normal after its voice got stolen.
    pub fn note_off(&mut self, key: char) -> bool {
        self.pool.release(key)
    }

    /// Silences everything; the next tick returns the bare center level.
    pub fn all_off(&mut self) {
        self.pool.clear();
    }

    /// Sets the octave/detune multiplier applied on top of every base
    /// frequency, clamped to [`MIN_MULTIPLIER`]..=[`MAX_MULTIPLIER`]. Sounding
    /// voices are retuned in place without a phase reset, so the waveform has
    /// no step at the change. Returns the clamped value.
    pub fn set_frequency_multiplier(&mut self, multiplier: u16) -> u16 {
        let clamped = multiplier.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER);
        self.multiplier = clamped;

        let sample_rate = self.settings.sample_rate;
        for voice in self.pool.iter_mut() {
            if voice.active {
                voice.phase_inc = square::phase_increment(voice.base_freq, clamped, sample_rate);
            }
        }

        clamped
    }

    pub fn frequency_multiplier(&self) -> u16 {
        self.multiplier
    }

    /// Advances every active voice by one sample and mixes them into a duty
    /// value. This is the whole per-sample workload, additions and one clamp,
    /// so it is safe to call from the PWM interrupt.
    pub fn tick(&mut self) -> u16 {
        let mut level = self.center as i32;
        let amp = self.amp_per_voice as i32;

        for voice in self.pool.iter_mut() {
            if !voice.active {
                continue;
            }

            voice.advance();

            if voice.is_high() {
                level += amp;
            } else {
                level -= amp;
            }
        }

        level.clamp(0, self.settings.pwm_top as i32) as u16
    }

    pub fn settings(&self) -> ToneEngineSettings {
        self.settings
    }

    /// Duty level of silence, `pwm_top / 2`.
    pub fn center(&self) -> u16 {
        self.center
    }

    pub fn amp_per_voice(&self) -> u16 {
        self.amp_per_voice
    }

    pub fn active_voices(&self) -> usize {
        self.pool.active_count()
    }

    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.pool.iter()
    }
}
