use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// What caused a phase boundary to be crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchTrigger {
    /// Remaining time reached zero during a recompute.
    Completed,
    /// The user skipped the rest of the phase.
    Skipped,
}

/// Every engine operation that changes state reports an Event.
/// Hosts print or log them; the phase-switch listener is the only
/// collaborator that must react.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    PhaseSwitched {
        from: Phase,
        to: Phase,
        trigger: SwitchTrigger,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    DurationChanged {
        phase: Phase,
        duration_secs: u32,
        /// True when the engine was running and the change waits for the
        /// phase to be re-entered.
        deferred: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        running: bool,
        remaining_secs: u32,
        duration_secs: u32,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The new phase, if this event is a phase switch.
    pub fn switched_to(&self) -> Option<Phase> {
        match self {
            Event::PhaseSwitched { to, .. } => Some(*to),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_tag() {
        let event = Event::PhaseSwitched {
            from: Phase::Work,
            to: Phase::Break,
            trigger: SwitchTrigger::Completed,
            duration_secs: 300,
            at: DateTime::from_timestamp(0, 0).unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_switched");
        assert_eq!(json["to"], "break");
        assert_eq!(json["trigger"], "completed");
        assert_eq!(event.switched_to(), Some(Phase::Break));
    }
}
