//! Glue between one CLI invocation and the persisted engine.
//!
//! Every invocation rebuilds the engine from the record store and saves it
//! back afterwards, so a running timer keeps running between commands.

use std::io::Stderr;

use focusflow_core::storage::keys;
use focusflow_core::{
    AudioCapability, Config, Database, SessionHooks, TimerEngine, TimerState, TomatoTally,
};
use serde::Serialize;

pub type CliEngine = TimerEngine<SessionHooks<Stderr>>;

pub fn open_engine(db: &Database, config: &Config) -> Result<CliEngine, Box<dyn std::error::Error>> {
    let tally: TomatoTally = db.load_or_default(keys::TALLY)?;
    let audio: AudioCapability = db.load_or_default(keys::AUDIO)?;
    let hooks = SessionHooks::new(config.sound_settings(), audio, tally, std::io::stderr())
        .with_notifications(config.notifications.enabled);

    let engine = match db.load_record::<TimerState>(keys::TIMER_STATE)? {
        Some(state) => CliEngine::restore(config.timer_config(), state, hooks, Default::default()),
        None => CliEngine::new(config.timer_config(), hooks),
    };
    Ok(engine)
}

pub fn save_engine(db: &Database, engine: CliEngine) -> Result<(), Box<dyn std::error::Error>> {
    let (_, state, hooks) = engine.into_parts();
    db.save_record(keys::TIMER_STATE, &state)?;
    db.save_record(keys::TALLY, &hooks.into_tally())?;
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `mm:ss`, with minutes allowed past 59.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
