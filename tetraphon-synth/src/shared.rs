use core::cell::RefCell;

use critical_section::Mutex;
#[cfg(feature = "defmt")]
use defmt::{debug, info, trace};
#[cfg(not(feature = "defmt"))]
use log::{debug, info, trace};

use crate::engine::{NoteOutcome, ToneEngine};

/// A [`ToneEngine`] both contexts can reach: the key scan loop through the
/// control methods, the sample interrupt through [`tick`](Self::tick). Every
/// method holds a critical section only for the engine call itself; logging
/// happens after the section is released.
///
/// `new` is const, so the usual home for this is a `static` next to the
/// interrupt handler.
pub struct SharedToneEngine<const V: usize> {
    engine: Mutex<RefCell<ToneEngine<V>>>,
}

impl<const V: usize> SharedToneEngine<V> {
    pub const fn new(engine: ToneEngine<V>) -> Self {
        Self {
            engine: Mutex::new(RefCell::new(engine)),
        }
    }

    pub fn note_on(&self, key: char, freq_hz: u16) -> NoteOutcome {
        let outcome =
            critical_section::with(|cs| self.engine.borrow_ref_mut(cs).note_on(key, freq_hz));

        match outcome {
            NoteOutcome::Ignored => debug!("note on {} at {} Hz ignored", key, freq_hz),
            NoteOutcome::Retriggered { slot } => trace!("retriggered {} on voice {}", key, slot),
            NoteOutcome::Allocated { slot } => trace!("voice {} plays {}", slot, key),
            NoteOutcome::Stolen { slot, victim } => {
                info!("stole voice {} from {} for {}", slot, victim, key)
            }
        }

        outcome
    }

    pub fn note_off(&self, key: char) {
        let released = critical_section::with(|cs| self.engine.borrow_ref_mut(cs).note_off(key));

        if !released {
            // Normal when the voice got stolen while the key was held.
            trace!("note off {} released nothing", key);
        }
    }

    pub fn all_off(&self) {
        critical_section::with(|cs| self.engine.borrow_ref_mut(cs).all_off());
        debug!("all voices off");
    }

    pub fn set_frequency_multiplier(&self, multiplier: u16) -> u16 {
        let clamped = critical_section::with(|cs| {
            self.engine
                .borrow_ref_mut(cs)
                .set_frequency_multiplier(multiplier)
        });

        if clamped != multiplier {
            info!("frequency multiplier {} clamped to {}", multiplier, clamped);
        } else {
            debug!("frequency multiplier set to {}", clamped);
        }

        clamped
    }

    /// One sample of output. Call from the PWM interrupt and write the result
    /// to the compare register.
    pub fn tick(&self) -> u16 {
        critical_section::with(|cs| self.engine.borrow_ref_mut(cs).tick())
    }

    /// Runs `f` with the engine locked, for reads the fixed methods do not
    /// cover. Keep `f` short; it runs with the sample interrupt masked.
    pub fn with<R>(&self, f: impl FnOnce(&mut ToneEngine<V>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.engine.borrow_ref_mut(cs)))
    }
}
