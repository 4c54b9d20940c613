use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One of the two session kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one.
    pub fn opposite(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "focus" => Ok(Phase::Work),
            "break" => Ok(Phase::Break),
            other => Err(ValidationError::InvalidValue {
                field: "phase".into(),
                message: format!("expected 'work' or 'break', got '{other}'"),
            }),
        }
    }
}

/// Configured duration of each phase, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub work_secs: u32,
    pub break_secs: u32,
}

impl TimerConfig {
    /// Build a config, rejecting zero-length phases.
    pub fn new(work_secs: u32, break_secs: u32) -> Result<Self, ValidationError> {
        for (field, value) in [("work_secs", work_secs), ("break_secs", break_secs)] {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    message: "duration must be greater than zero".into(),
                });
            }
        }
        Ok(Self {
            work_secs,
            break_secs,
        })
    }

    /// Build a config from whole minutes.
    ///
    /// Uses saturating arithmetic so absurd inputs cannot overflow.
    pub fn from_minutes(work_min: u32, break_min: u32) -> Result<Self, ValidationError> {
        Self::new(work_min.saturating_mul(60), break_min.saturating_mul(60))
    }

    pub fn duration_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::Break => self.break_secs,
        }
    }

    pub(crate) fn set(&mut self, phase: Phase, secs: u32) {
        match phase {
            Phase::Work => self.work_secs = secs,
            Phase::Break => self.break_secs = secs,
        }
    }
}

impl Default for TimerConfig {
    /// 25 minutes of work, 5 minutes of break.
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            break_secs: 5 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_flips() {
        assert_eq!(Phase::Work.opposite(), Phase::Break);
        assert_eq!(Phase::Break.opposite(), Phase::Work);
    }

    #[test]
    fn parse_accepts_focus_alias() {
        assert_eq!("Focus".parse::<Phase>().unwrap(), Phase::Work);
        assert_eq!("break".parse::<Phase>().unwrap(), Phase::Break);
        assert!("nap".parse::<Phase>().is_err());
    }

    #[test]
    fn zero_duration_rejected() {
        assert!(TimerConfig::new(0, 300).is_err());
        assert!(TimerConfig::new(1500, 0).is_err());
    }

    #[test]
    fn from_minutes_scales() {
        let cfg = TimerConfig::from_minutes(25, 5).unwrap();
        assert_eq!(cfg, TimerConfig::default());
        assert_eq!(cfg.duration_for(Phase::Break), 300);
    }
}
