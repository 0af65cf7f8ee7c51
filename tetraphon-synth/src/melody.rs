use heapless::Vec;

/// One melody step: a pitch and how long it lasts. Zero frequency is a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MelodyNote {
    pub freq_hz: u16,
    pub duration_ms: u16,
}

/// A named sequence of steps, meant to live in a `static`.
#[derive(Debug)]
pub struct Melody {
    pub name: &'static str,
    pub notes: &'static [MelodyNote],
}

/// What the player wants done to the engine after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MelodyEvent {
    NoteOn { key: char, freq_hz: u16 },
    NoteOff { key: char },
    /// Emitted once, when the last step has run out.
    Finished,
}

/// Steps through a [`Melody`] against a millisecond clock without blocking,
/// playing everything on the single key it was built with. Poll
/// [`update`](Self::update) at the key scan cadence; each call emits at most
/// one gate change and one step change, so a `Vec` of two always fits.
///
/// The gate closes an eighth of a step early. Without that gap, back to back
/// repeats of the same pitch fuse into one long note.
#[derive(Debug)]
pub struct MelodyPlayer {
    key: char,
    melody: Option<&'static Melody>,
    index: usize,
    step_start_ms: u32,
    gate_open: bool,
}

impl MelodyPlayer {
    /// `key` should be one the instrument's matrix cannot produce, so manual
    /// playing and playback never fight over a voice's ownership.
    pub const fn new(key: char) -> Self {
        Self {
            key,
            melody: None,
            index: 0,
            step_start_ms: 0,
            gate_open: false,
        }
    }

    pub fn key(&self) -> char {
        self.key
    }

    pub fn is_playing(&self) -> bool {
        self.melody.is_some()
    }

    /// Starts `melody` at `now_ms`, returning the first note on if the melody
    /// opens with a sounding step.
    pub fn play(&mut self, melody: &'static Melody, now_ms: u32) -> Option<MelodyEvent> {
        let Some(first) = melody.notes.first() else {
            self.melody = None;
            return None;
        };

        self.melody = Some(melody);
        self.index = 0;
        self.step_start_ms = now_ms;
        self.gate_open = first.freq_hz > 0;

        self.gate_open.then_some(MelodyEvent::NoteOn {
            key: self.key,
            freq_hz: first.freq_hz,
        })
    }

    /// Abandons playback. Returns the note off to forward if a note was
    /// sounding.
    pub fn stop(&mut self) -> Option<MelodyEvent> {
        let was_open = self.gate_open;
        self.melody = None;
        self.gate_open = false;

        was_open.then_some(MelodyEvent::NoteOff { key: self.key })
    }

    pub fn update(&mut self, now_ms: u32) -> Vec<MelodyEvent, 2> {
        let mut events = Vec::new();

        let Some(melody) = self.melody else {
            return events;
        };

        let note = melody.notes[self.index];
        let elapsed = now_ms.wrapping_sub(self.step_start_ms);

        if self.gate_open && elapsed >= gate_ms(note.duration_ms) as u32 {
            let _ = events.push(MelodyEvent::NoteOff { key: self.key });
            self.gate_open = false;
        }

        if elapsed >= note.duration_ms as u32 {
            // Accumulate instead of taking now_ms so a late poll does not
            // stretch the whole tune; the next calls catch up step by step.
            self.step_start_ms = self.step_start_ms.wrapping_add(note.duration_ms as u32);
            self.index += 1;

            match melody.notes.get(self.index) {
                Some(next) if next.freq_hz > 0 => {
                    let _ = events.push(MelodyEvent::NoteOn {
                        key: self.key,
                        freq_hz: next.freq_hz,
                    });
                    self.gate_open = true;
                }
                Some(_) => {}
                None => {
                    self.melody = None;
                    let _ = events.push(MelodyEvent::Finished);
                }
            }
        }

        events
    }
}

fn gate_ms(duration_ms: u16) -> u16 {
    duration_ms - duration_ms / 8
}
