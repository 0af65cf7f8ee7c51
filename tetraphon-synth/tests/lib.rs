use std::sync::Once;

use plotters::prelude::*;
use rand::Rng;
use tetraphon_synth::{
    engine::{ToneEngine, ToneEngineSettings, DEFAULT_PWM_TOP, DEFAULT_SAMPLE_RATE},
    keymap,
    melody::{MelodyEvent, MelodyPlayer},
    tunes,
};

static INIT: Once = Once::new();

fn init_logger() {
    INIT.call_once(|| {
        env_logger::init();
    });
}

#[test]
fn silent_engine_holds_center() {
    init_logger();

    let mut engine: ToneEngine<4> = ToneEngine::new(ToneEngineSettings::default());

    assert_eq!(engine.center(), DEFAULT_PWM_TOP / 2);
    for _ in 0..1000 {
        assert_eq!(engine.tick(), engine.center());
    }
}

#[test]
fn one_voice_toggles_between_two_levels() {
    init_logger();

    let mut engine: ToneEngine<4> = ToneEngine::new(ToneEngineSettings::default());
    engine.note_on('A', 262);

    let center = engine.center() as i32;
    let amp = engine.amp_per_voice() as i32;

    let duties: Vec<u16> = (0..10_000).map(|_| engine.tick()).collect();

    for &duty in &duties {
        let duty = duty as i32;
        assert!(
            duty == center - amp || duty == center + amp,
            "duty {duty} is not one of the two square levels"
        );
    }

    // 262 Hz at 31250 Hz makes 167.7 half periods in 10000 samples.
    let toggles = duties.windows(2).filter(|w| w[0] != w[1]).count();
    assert!((166..=169).contains(&toggles), "toggle count {toggles}");
}

#[test]
fn full_chord_spends_the_whole_amplitude_budget() {
    init_logger();

    let mut engine: ToneEngine<4> = ToneEngine::new(ToneEngineSettings::default());
    for key in ['A', 'B', 'C', 'D'] {
        engine.note_on(key, 440);
    }

    // Equal frequencies and zeroed phases keep the voices aligned, so the mix
    // swings the full four voice amplitude around the center and still has to
    // stay inside the pwm range.
    let center = engine.center() as i32;
    let amp = engine.amp_per_voice() as i32;

    for _ in 0..10_000 {
        let duty = engine.tick() as i32;
        assert!(duty == center - 4 * amp || duty == center + 4 * amp);
        assert!((0..=DEFAULT_PWM_TOP as i32).contains(&duty));
    }
}

#[test]
fn random_input_storm_stays_inside_the_pwm_range() {
    init_logger();

    let mut rng = rand::thread_rng();
    let mut engine: ToneEngine<4> = ToneEngine::new(ToneEngineSettings::default());

    let random_key = |rng: &mut rand::rngs::ThreadRng| {
        keymap::key_from_index(rng.gen_range(0..keymap::ROWS * keymap::COLS)).unwrap()
    };

    for _ in 0..10_000 {
        match rng.gen_range(0..100) {
            0..=54 => {
                let key = random_key(&mut rng);
                let freq: u16 = rng.gen_range(100..=2000);
                engine.note_on(key, freq);
            }
            55..=84 => {
                let key = random_key(&mut rng);
                engine.note_off(key);
            }
            85..=94 => {}
            95..=97 => {
                engine.set_frequency_multiplier(rng.gen_range(0..=20));
            }
            _ => engine.all_off(),
        }

        let duty = engine.tick();
        assert!(duty <= DEFAULT_PWM_TOP, "duty {duty} above the pwm top");
        assert!(engine.active_voices() <= 4);
    }

    // No two active voices may answer to the same key.
    let keys: Vec<char> = engine
        .voices()
        .filter(|v| v.active)
        .map(|v| v.key)
        .collect();
    let mut deduped = keys.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(keys.len(), deduped.len(), "duplicate active keys: {keys:?}");
}

#[test]
fn jingle_bells_renders_to_wav() {
    init_logger();

    let mut engine: ToneEngine<4> = ToneEngine::new(ToneEngineSettings::default());
    let mut player = MelodyPlayer::new('@');

    if let Some(MelodyEvent::NoteOn { key, freq_hz }) = player.play(&tunes::JINGLE_BELLS, 0) {
        engine.note_on(key, freq_hz);
    }

    let mut duties: Vec<u16> = Vec::new();

    'control: for ms in 1..20_000u32 {
        for event in player.update(ms) {
            match event {
                MelodyEvent::NoteOn { key, freq_hz } => {
                    engine.note_on(key, freq_hz);
                }
                MelodyEvent::NoteOff { key } => {
                    engine.note_off(key);
                }
                MelodyEvent::Finished => break 'control,
            }
        }

        for _ in 0..DEFAULT_SAMPLE_RATE / 1000 {
            duties.push(engine.tick());
        }
    }

    assert!(!player.is_playing());
    assert!(duties.len() > 250_000, "tune ended after {} ticks", duties.len());
    assert!(duties.iter().any(|&duty| duty != engine.center()));
    assert!(duties.iter().all(|&duty| duty <= DEFAULT_PWM_TOP));

    plot_samples(&duties[..8000], "jingle.png").unwrap();
    export_to_wav(&duties, engine.center(), "jingle.wav");
}

fn plot_samples(samples: &[u16], path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1600, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0..(samples.len() as i32), 0..(DEFAULT_PWM_TOP as i32))?;

    chart.configure_mesh().draw()?;

    chart
        .draw_series(LineSeries::new(
            samples
                .iter()
                .enumerate()
                .map(|(x, y)| (x as i32, *y as i32)),
            &BLUE,
        ))?
        .label("Duty")
        .legend(|(x, y)| PathElement::new([(x, y), (x + 20, y)], BLUE));

    chart.configure_series_labels().border_style(BLACK).draw()?;

    Ok(())
}

fn export_to_wav(duties: &[u16], center: u16, file_path: &str) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: DEFAULT_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(file_path, spec).unwrap();

    for &duty in duties {
        writer
            .write_sample(((duty as i32 - center as i32) * 64) as i16)
            .unwrap();
    }

    writer.finalize().unwrap();
}
