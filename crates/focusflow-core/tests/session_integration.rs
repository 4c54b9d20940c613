//! Integration tests for the host workflow: engine + session hooks + storage.
//!
//! Mirrors what a one-shot host does on every invocation: restore the engine
//! from the record store, tick once, apply a command, persist everything.

use chrono::NaiveDate;
use focusflow_core::storage::keys;
use focusflow_core::{
    AudioCapability, Config, Database, ManualClock, Mood, Phase, SessionHooks, SoundSettings,
    TimerEngine, TimerState, TomatoTally,
};

const T0: u64 = 1_700_000_000_000;

fn fixed_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

type Hooks = SessionHooks<Vec<u8>>;

fn restore(db: &Database, config: &Config, clock: &ManualClock) -> TimerEngine<Hooks, ManualClock> {
    let tally: TomatoTally = db.load_or_default(keys::TALLY).unwrap();
    let audio: AudioCapability = db.load_or_default(keys::AUDIO).unwrap();
    let hooks = SessionHooks::new(config.sound_settings(), audio, tally, Vec::new())
        .with_date_source(fixed_day);
    match db.load_record::<TimerState>(keys::TIMER_STATE).unwrap() {
        Some(state) => TimerEngine::restore(config.timer_config(), state, hooks, clock.clone()),
        None => TimerEngine::with_clock(config.timer_config(), hooks, clock.clone()),
    }
}

fn persist(db: &Database, engine: TimerEngine<Hooks, ManualClock>) {
    let (_, state, hooks) = engine.into_parts();
    db.save_record(keys::TIMER_STATE, &state).unwrap();
    db.save_record(keys::TALLY, hooks.tally()).unwrap();
}

#[test]
fn test_running_timer_survives_process_restarts() {
    let db = Database::open_memory().unwrap();
    let config = Config::default();
    let clock = ManualClock::new(T0);

    let mut engine = restore(&db, &config, &clock);
    engine.toggle_running();
    persist(&db, engine);

    clock.advance_secs(600);
    let mut engine = restore(&db, &config, &clock);
    engine.recompute();
    assert!(engine.is_running());
    assert_eq!(engine.remaining_secs(), 900);
    persist(&db, engine);

    clock.advance_secs(900);
    let mut engine = restore(&db, &config, &clock);
    assert!(engine.recompute().is_some());
    assert_eq!(engine.phase(), Phase::Break);
    assert_eq!(engine.remaining_secs(), 300);
    assert_eq!(engine.listener().last_cue().unwrap().mood, Mood::Awake);
    persist(&db, engine);

    let tally: TomatoTally = db.load_or_default(keys::TALLY).unwrap();
    assert_eq!(tally.on(fixed_day()), 1);
    assert_eq!(tally.total, 1);
}

#[test]
fn test_config_shrink_applies_to_paused_timer_on_restore() {
    let db = Database::open_memory().unwrap();
    let mut config = Config::default();
    let clock = ManualClock::new(T0);

    persist(&db, restore(&db, &config, &clock));

    config.apply("timer.work_minutes", "10").unwrap();
    let engine = restore(&db, &config, &clock);
    assert_eq!(engine.remaining_secs(), 600);
}

#[test]
fn test_config_change_while_running_is_deferred() {
    let db = Database::open_memory().unwrap();
    let mut config = Config::default();
    let clock = ManualClock::new(T0);

    let mut engine = restore(&db, &config, &clock);
    engine.toggle_running();
    persist(&db, engine);

    config.apply("timer.work_minutes", "10").unwrap();
    clock.advance_secs(60);
    let mut engine = restore(&db, &config, &clock);
    engine.recompute();
    assert_eq!(engine.remaining_secs(), 1440);

    engine.reset();
    assert_eq!(engine.remaining_secs(), 600);
}

#[test]
fn test_primed_audio_rings_on_switch() {
    let db = Database::open_memory().unwrap();
    let mut audio = AudioCapability::locked();
    audio.prime();
    db.save_record(keys::AUDIO, &audio).unwrap();

    let clock = ManualClock::new(T0);
    let mut engine = restore(&db, &Config::default(), &clock);
    engine.skip();
    let cue = engine.listener().last_cue().unwrap();
    assert_eq!(cue.bells, SoundSettings::default().bells());
    assert!(cue.bells > 0);
}
