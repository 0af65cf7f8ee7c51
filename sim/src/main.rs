use std::env;

use env_logger::{Builder, Env};
use log::{info, LevelFilter};
use tetraphon_synth::{
    engine::{ToneEngine, ToneEngineSettings},
    keymap,
    melody::{Melody, MelodyEvent, MelodyPlayer},
    shared::SharedToneEngine,
    tunes,
};

/// Key the melody player owns; not producible by the 'A'..'Y' matrix.
const MELODY_KEY: char = '@';

static ENGINE: SharedToneEngine<4> =
    SharedToneEngine::new(ToneEngine::new(ToneEngineSettings::DEFAULT));

/// Counts out ticks so that the long run average hits the sample rate exactly
/// even though 31250 is not a multiple of 1000.
struct Clock {
    sample_rate: u32,
    ticked: u64,
}

impl Clock {
    fn new() -> Self {
        Self {
            sample_rate: ENGINE.with(|engine| engine.settings().sample_rate),
            ticked: 0,
        }
    }

    fn advance_to(&mut self, ms: u32, duties: &mut Vec<u16>) {
        let due = ms as u64 * self.sample_rate as u64 / 1000;
        while self.ticked < due {
            duties.push(ENGINE.tick());
            self.ticked += 1;
        }
    }
}

fn main() {
    Builder::from_env(Env::default().default_filter_or(LevelFilter::Debug.to_string())).init();

    let scene = env::args().nth(1).unwrap_or_else(|| "jingle".to_string());

    let duties = match scene.as_str() {
        "jingle" => render_melody(&tunes::JINGLE_BELLS),
        "elise" => render_melody(&tunes::FUR_ELISE),
        "scale" => render_scale(),
        other => {
            eprintln!("unknown scene {other}, pick one of: jingle, elise, scale");
            std::process::exit(1);
        }
    };

    let path = format!("{scene}.wav");
    export(&duties, &path);
    info!("wrote {} samples to {}", duties.len(), path);
}

/// Plays a melody the way firmware would: the player is polled from the
/// millisecond control loop while the tick side drains samples in between.
fn render_melody(melody: &'static Melody) -> Vec<u16> {
    info!("rendering {}", melody.name);

    let mut player = MelodyPlayer::new(MELODY_KEY);
    if let Some(event) = player.play(melody, 0) {
        apply(event);
    }

    let mut duties = Vec::new();
    let mut clock = Clock::new();
    let mut ms = 0u32;

    while player.is_playing() {
        ms += 1;
        for event in player.update(ms) {
            apply(event);
        }
        clock.advance_to(ms, &mut duties);
    }

    // A short tail so the last release is audible as silence.
    clock.advance_to(ms + 200, &mut duties);

    duties
}

/// Walks every key of the matrix bottom to top, then holds a chord and
/// retunes it an octave up mid sound.
fn render_scale() -> Vec<u16> {
    info!("rendering the keyboard walk");

    let mut duties = Vec::new();
    let mut clock = Clock::new();
    let mut ms = 0u32;

    for index in 0..keymap::ROWS * keymap::COLS {
        let key = keymap::key_from_index(index).unwrap();
        let freq = keymap::frequency_for_key(key).unwrap();

        ENGINE.note_on(key, freq);
        ms += 120;
        clock.advance_to(ms, &mut duties);

        ENGINE.note_off(key);
        ms += 30;
        clock.advance_to(ms, &mut duties);
    }

    for key in ['A', 'E', 'H'] {
        ENGINE.note_on(key, keymap::frequency_for_key(key).unwrap());
    }
    ms += 400;
    clock.advance_to(ms, &mut duties);

    ENGINE.set_frequency_multiplier(2);
    ms += 400;
    clock.advance_to(ms, &mut duties);

    ENGINE.all_off();
    clock.advance_to(ms + 100, &mut duties);

    duties
}

fn apply(event: MelodyEvent) {
    match event {
        MelodyEvent::NoteOn { key, freq_hz } => {
            ENGINE.note_on(key, freq_hz);
        }
        MelodyEvent::NoteOff { key } => ENGINE.note_off(key),
        MelodyEvent::Finished => info!("melody finished"),
    }
}

fn export(duties: &[u16], path: &str) {
    let (center, sample_rate) =
        ENGINE.with(|engine| (engine.center(), engine.settings().sample_rate));

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &duty in duties {
        writer
            .write_sample(((duty as i32 - center as i32) * 64) as i16)
            .unwrap();
    }
    writer.finalize().unwrap();
}
