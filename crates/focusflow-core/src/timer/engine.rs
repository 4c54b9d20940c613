//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `recompute()`
//! periodically while the engine is running.
//!
//! Remaining time is never decremented per tick. Each running interval
//! records a baseline (wall-clock instant + remaining seconds at that
//! instant) and every recompute re-derives remaining time from it, so late,
//! coalesced or missed ticks cannot accumulate drift.
//!
//! ## State Transitions
//!
//! ```text
//! Work(paused) <-> Work(running) --zero/skip--> Break(paused) <-> Break(running)
//!      ^                                                               |
//!      +------------------------------zero/skip------------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerConfig::default(), |phase| println!("{phase}"));
//! engine.toggle_running();
//! // In a loop, about once a second:
//! engine.recompute(); // Returns Some(Event::PhaseSwitched) at zero
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::listener::PhaseListener;
use super::phase::{Phase, TimerConfig};
use crate::events::{Event, SwitchTrigger};

/// Serializable engine state.
///
/// `baseline_epoch_ms` is set exactly while the engine is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    phase: Phase,
    running: bool,
    remaining_secs: u32,
    #[serde(default)]
    baseline_epoch_ms: Option<u64>,
    #[serde(default)]
    baseline_remaining: u32,
}

impl TimerState {
    fn idle(phase: Phase, remaining_secs: u32) -> Self {
        Self {
            phase,
            running: false,
            remaining_secs,
            baseline_epoch_ms: None,
            baseline_remaining: remaining_secs,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Wall-clock instant (ms since epoch) the current running interval began.
    pub fn baseline_epoch_ms(&self) -> Option<u64> {
        self.baseline_epoch_ms
    }
}

/// Core timer engine.
///
/// Operates on wall-clock deltas -- no internal thread.
/// `L` is notified on every phase switch; `C` supplies the wall clock.
#[derive(Debug)]
pub struct TimerEngine<L, C = SystemClock> {
    config: TimerConfig,
    state: TimerState,
    listener: L,
    clock: C,
}

impl<L: PhaseListener> TimerEngine<L, SystemClock> {
    /// Create a new engine on the system clock.
    ///
    /// Starts paused in `Work` with the full work duration remaining.
    pub fn new(config: TimerConfig, listener: L) -> Self {
        Self::with_clock(config, listener, SystemClock)
    }
}

impl<L: PhaseListener, C: Clock> TimerEngine<L, C> {
    pub fn with_clock(config: TimerConfig, listener: L, clock: C) -> Self {
        Self {
            state: TimerState::idle(Phase::Work, config.work_secs),
            config,
            listener,
            clock,
        }
    }

    /// Rebuild an engine from a persisted state.
    ///
    /// An inconsistent running flag/baseline pair is treated as paused. A
    /// paused phase is clamped to the configured duration the same way
    /// `set_duration` would clamp it.
    pub fn restore(config: TimerConfig, mut state: TimerState, listener: L, clock: C) -> Self {
        if state.running != state.baseline_epoch_ms.is_some() {
            tracing::warn!(
                running = state.running,
                "inconsistent persisted timer state, restoring as paused"
            );
            state.running = false;
            state.baseline_epoch_ms = None;
            state.baseline_remaining = state.remaining_secs;
        }
        if !state.running {
            let duration = config.duration_for(state.phase);
            state.remaining_secs = state.remaining_secs.min(duration);
            state.baseline_remaining = state.remaining_secs;
        }
        Self {
            config,
            state,
            listener,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Remaining seconds as of the last operation or recompute.
    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Configured duration of the current phase.
    pub fn duration_secs(&self) -> u32 {
        self.config.duration_for(self.state.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.duration_secs().max(1);
        (1.0 - f64::from(self.state.remaining_secs) / f64::from(total)).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.state.phase,
            running: self.state.running,
            remaining_secs: self.state.remaining_secs,
            duration_secs: self.duration_secs(),
            progress: self.progress(),
            at: self.now_utc(),
        }
    }

    /// Tear the engine apart, e.g. to persist state and hand the listener
    /// back to its owner.
    pub fn into_parts(self) -> (TimerConfig, TimerState, L) {
        (self.config, self.state, self.listener)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start when paused, pause when running.
    ///
    /// Returns `None` when asked to start a phase with nothing remaining.
    pub fn toggle_running(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        if self.state.running {
            let remaining = self.remaining_at(now);
            self.state.remaining_secs = remaining;
            self.state.baseline_remaining = remaining;
            self.state.baseline_epoch_ms = None;
            self.state.running = false;
            tracing::debug!(phase = %self.state.phase, remaining, "timer paused");
            Some(Event::TimerPaused {
                phase: self.state.phase,
                remaining_secs: remaining,
                at: to_utc(now),
            })
        } else {
            if self.state.remaining_secs == 0 {
                return None;
            }
            self.state.baseline_epoch_ms = Some(now);
            self.state.baseline_remaining = self.state.remaining_secs;
            self.state.running = true;
            tracing::debug!(
                phase = %self.state.phase,
                remaining = self.state.remaining_secs,
                "timer started"
            );
            Some(Event::TimerStarted {
                phase: self.state.phase,
                remaining_secs: self.state.remaining_secs,
                at: to_utc(now),
            })
        }
    }

    /// Re-derive remaining time from the baseline. Call on every tick.
    ///
    /// Returns `Some(Event::PhaseSwitched)` when the phase ran out; the
    /// listener has already been notified by then.
    pub fn recompute(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        let now = self.clock.now_ms();
        let next = self.remaining_at(now);
        self.state.remaining_secs = next;
        if next > 0 {
            return None;
        }
        Some(self.switch_phase(SwitchTrigger::Completed, now))
    }

    /// Stop and refill the current phase. Never notifies the listener.
    pub fn reset(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        self.state = TimerState::idle(self.state.phase, self.duration_secs());
        tracing::debug!(phase = %self.state.phase, "timer reset");
        Some(Event::TimerReset {
            phase: self.state.phase,
            remaining_secs: self.state.remaining_secs,
            at: to_utc(now),
        })
    }

    /// Jump to the other phase regardless of remaining time or running state.
    pub fn skip(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        Some(self.switch_phase(SwitchTrigger::Skipped, now))
    }

    /// Change the configured duration of `phase`.
    ///
    /// While paused on that phase, remaining time shrinks to fit but never
    /// grows. While running, the change takes effect the next time the phase
    /// is entered. Zero is raised to one second.
    pub fn set_duration(&mut self, phase: Phase, secs: u32) -> Option<Event> {
        let secs = secs.max(1);
        self.config.set(phase, secs);
        let deferred = self.state.running;
        if !deferred && phase == self.state.phase {
            self.state.remaining_secs = self.state.remaining_secs.min(secs);
            self.state.baseline_remaining = self.state.remaining_secs;
        }
        tracing::debug!(%phase, secs, deferred, "duration changed");
        Some(Event::DurationChanged {
            phase,
            duration_secs: secs,
            deferred,
            at: self.now_utc(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn remaining_at(&self, now_ms: u64) -> u32 {
        match self.state.baseline_epoch_ms {
            Some(baseline) => {
                // A clock that moved backwards counts as no time elapsed.
                let elapsed_secs = now_ms.saturating_sub(baseline) / 1000;
                let elapsed = u32::try_from(elapsed_secs).unwrap_or(u32::MAX);
                self.state.baseline_remaining.saturating_sub(elapsed)
            }
            None => self.state.remaining_secs,
        }
    }

    fn switch_phase(&mut self, trigger: SwitchTrigger, now_ms: u64) -> Event {
        let from = self.state.phase;
        let to = from.opposite();
        let duration = self.config.duration_for(to);
        self.state = TimerState::idle(to, duration);
        tracing::info!(%from, %to, ?trigger, "phase switched");
        self.listener.on_phase_switch(to);
        Event::PhaseSwitched {
            from,
            to,
            trigger,
            duration_secs: duration,
            at: to_utc(now_ms),
        }
    }

    fn now_utc(&self) -> DateTime<Utc> {
        to_utc(self.clock.now_ms())
    }
}

fn to_utc(epoch_ms: u64) -> DateTime<Utc> {
    i64::try_from(epoch_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}
