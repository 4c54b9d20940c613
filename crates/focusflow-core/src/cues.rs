//! Phase-switch side effects: mascot mood, sound cue, notification line and
//! the completed-session tally.
//!
//! Audio is an explicit capability. It starts locked and is primed by the
//! first user gesture; once primed it stays primed. Nothing here can fail
//! the timer: write errors are logged and dropped.

use std::io::Write;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::tally::TomatoTally;
use crate::timer::{Phase, PhaseListener};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    Ding,
    #[default]
    Chime,
    Wood,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundSource {
    #[default]
    Synth,
    File,
}

fn default_volume() -> f32 {
    0.9
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundSettings {
    #[serde(default = "default_volume")]
    volume: f32,
    #[serde(default)]
    pub sound: SoundKind,
    #[serde(default)]
    pub source: SoundSource,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            sound: SoundKind::default(),
            source: SoundSource::default(),
        }
    }
}

impl SoundSettings {
    pub fn new(volume: f32, sound: SoundKind, source: SoundSource) -> Self {
        let mut settings = Self {
            volume: 0.0,
            sound,
            source,
        };
        settings.set_volume(volume);
        settings
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Clamped to `[0, 1]`; NaN mutes.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Terminal bells rung for one cue.
    pub fn bells(&self) -> usize {
        if self.volume <= 0.0 {
            return 0;
        }
        match (self.source, self.sound) {
            (SoundSource::File, _) => 1,
            (SoundSource::Synth, SoundKind::Ding) => 1,
            (SoundSource::Synth, SoundKind::Wood) => 2,
            (SoundSource::Synth, SoundKind::Chime) => 3,
        }
    }
}

/// Permission to make noise, granted by the first user gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioCapability {
    #[serde(default)]
    primed_at: Option<DateTime<Utc>>,
}

impl AudioCapability {
    pub fn locked() -> Self {
        Self::default()
    }

    /// Record a user gesture. Only the first call has an effect.
    pub fn prime(&mut self) -> bool {
        if self.primed_at.is_some() {
            return false;
        }
        self.primed_at = Some(Utc::now());
        tracing::debug!("audio primed");
        true
    }

    pub fn is_primed(&self) -> bool {
        self.primed_at.is_some()
    }

    pub fn primed_at(&self) -> Option<DateTime<Utc>> {
        self.primed_at
    }
}

/// Mascot mood. The sloth naps through work and wakes up for breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Sleep,
    Awake,
}

impl From<Phase> for Mood {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Work => Mood::Sleep,
            Phase::Break => Mood::Awake,
        }
    }
}

/// Everything a display needs to react to one phase switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cue {
    pub phase: Phase,
    pub mood: Mood,
    pub message: &'static str,
    pub bells: usize,
}

impl Cue {
    pub fn for_phase(phase: Phase, settings: &SoundSettings, audio: &AudioCapability) -> Self {
        let message = match phase {
            Phase::Work => "Back to focus!",
            Phase::Break => "Time for a break!",
        };
        Self {
            phase,
            mood: phase.into(),
            message,
            bells: if audio.is_primed() { settings.bells() } else { 0 },
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The phase-switch listener used by hosts.
pub struct SessionHooks<W> {
    sound: SoundSettings,
    audio: AudioCapability,
    notifications: bool,
    tally: TomatoTally,
    today: fn() -> NaiveDate,
    last_cue: Option<Cue>,
    out: W,
}

impl<W: Write> SessionHooks<W> {
    pub fn new(sound: SoundSettings, audio: AudioCapability, tally: TomatoTally, out: W) -> Self {
        Self {
            sound,
            audio,
            notifications: true,
            tally,
            today: local_today,
            last_cue: None,
            out,
        }
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications = enabled;
        self
    }

    /// Override the calendar date used to key the tally.
    pub fn with_date_source(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn tally(&self) -> &TomatoTally {
        &self.tally
    }

    pub fn last_cue(&self) -> Option<&Cue> {
        self.last_cue.as_ref()
    }

    pub fn into_tally(self) -> TomatoTally {
        self.tally
    }

    fn emit(&mut self, cue: &Cue) -> std::io::Result<()> {
        if cue.bells > 0 {
            self.out.write_all("\x07".repeat(cue.bells).as_bytes())?;
        }
        if self.notifications {
            writeln!(self.out, "🍅 {}", cue.message)?;
        }
        self.out.flush()
    }
}

impl<W: Write> PhaseListener for SessionHooks<W> {
    fn on_phase_switch(&mut self, phase: Phase) {
        if phase == Phase::Break {
            let today = (self.today)();
            let count = self.tally.bump(today);
            tracing::info!(%today, count, "work session completed");
        }
        let cue = Cue::for_phase(phase, &self.sound, &self.audio);
        if let Err(e) = self.emit(&cue) {
            tracing::warn!("failed to emit phase cue: {e}");
        }
        self.last_cue = Some(cue);
    }
}

impl<W> std::fmt::Debug for SessionHooks<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHooks")
            .field("sound", &self.sound)
            .field("audio", &self.audio)
            .field("notifications", &self.notifications)
            .field("tally", &self.tally)
            .field("last_cue", &self.last_cue)
            .finish_non_exhaustive()
    }
}
