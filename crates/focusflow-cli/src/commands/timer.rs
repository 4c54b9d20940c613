use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use focusflow_core::{Config, Database, Phase};
use tokio::time::MissedTickBehavior;

use super::host::{self, format_clock, print_json, CliEngine};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start when paused, pause when running
    Toggle,
    /// Stop and refill the current phase
    Reset,
    /// Jump to the other phase
    Skip,
    /// Change a phase duration (minutes)
    Set {
        /// work or break
        phase: Phase,
        /// New duration in minutes
        minutes: u32,
    },
    /// Run the timer in the foreground, ticking once a second
    Run {
        /// Start the next phase automatically instead of exiting at the switch
        #[arg(long = "continue")]
        keep_going: bool,
    },
}

const NO_TIME_LEFT: &str = "no time left in this phase; use `timer skip` or `timer reset`";

type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn run(action: TimerAction) -> CmdResult {
    let db = Database::open()?;
    let foreground = match &action {
        TimerAction::Run { keep_going } => Some(*keep_going),
        _ => None,
    };

    let result = db.exclusive(|db| apply(db, action))?;
    match foreground {
        Some(keep_going) if result.is_ok() => run_foreground(&db, keep_going),
        _ => result,
    }
}

/// Restore, act, save. The outer error is a storage failure; the inner one
/// is a refused command, whose catch-up tick is persisted all the same.
fn apply(db: &Database, action: TimerAction) -> Result<CmdResult, Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    let mut engine = host::open_engine(db, &config)?;

    // Every invocation is a tick: catch up with whatever happened while no
    // process was watching.
    if let Some(event) = engine.recompute() {
        print_json(&event)?;
    }

    let result = match action {
        TimerAction::Status => print_json(&engine.snapshot()).map_err(Into::into),
        TimerAction::Toggle => match engine.toggle_running() {
            Some(event) => print_json(&event).map_err(Into::into),
            None => Err(NO_TIME_LEFT.into()),
        },
        TimerAction::Reset => print_opt(engine.reset()),
        TimerAction::Skip => print_opt(engine.skip()),
        TimerAction::Set { phase, minutes } => {
            let key = match phase {
                Phase::Work => "timer.work_minutes",
                Phase::Break => "timer.break_minutes",
            };
            match config.set(key, &minutes.to_string()) {
                Ok(()) => {
                    let secs = config.timer_config().duration_for(phase);
                    print_opt(engine.set_duration(phase, secs))
                }
                Err(e) => Err(e.into()),
            }
        }
        TimerAction::Run { .. } => start_if_paused(&mut engine),
    };

    host::save_engine(db, engine)?;
    Ok(result)
}

fn print_opt(event: Option<focusflow_core::Event>) -> CmdResult {
    if let Some(event) = event {
        print_json(&event)?;
    }
    Ok(())
}

fn start_if_paused(engine: &mut CliEngine) -> CmdResult {
    if engine.is_running() {
        return Ok(());
    }
    match engine.toggle_running() {
        Some(event) => Ok(print_json(&event)?),
        None => Err(NO_TIME_LEFT.into()),
    }
}

/// Foreground tick source.
///
/// The persisted record stays authoritative: every tick restores the engine,
/// recomputes and saves it again, so commands run from other shells are seen
/// on the next tick and nothing is lost if this process dies. Ctrl-C detaches
/// and leaves the timer running. A pause from elsewhere ends the loop.
fn run_foreground(db: &Database, keep_going: bool) -> CmdResult {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if !db.exclusive(|db| tick(db, keep_going))? {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    eprintln!();
                    tracing::info!("detached from running timer");
                    break;
                }
            }
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

/// One restore/recompute/save round. Returns whether the loop should go on.
fn tick(db: &Database, keep_going: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut engine = host::open_engine(db, &config)?;

    let go_on = match engine.recompute() {
        Some(event) => {
            eprintln!();
            print_json(&event)?;
            if keep_going {
                if let Some(event) = engine.toggle_running() {
                    print_json(&event)?;
                }
            }
            keep_going
        }
        None if !engine.is_running() => {
            eprintln!();
            tracing::info!(phase = %engine.phase(), "timer stopped by another command");
            false
        }
        None => {
            let mut err = std::io::stderr();
            let _ = write!(
                err,
                "\r{:>5} {}  ",
                engine.phase(),
                format_clock(engine.remaining_secs())
            );
            let _ = err.flush();
            true
        }
    };

    host::save_engine(db, engine)?;
    Ok(go_on)
}
