//! # FocusFlow Core Library
//!
//! Core logic for the FocusFlow work/break timer. The CLI binary is a thin
//! host over this crate: it owns the tick source and persistence, the
//! library owns every rule.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `recompute()`; immune to late or skipped ticks
//! - **Session Hooks**: The phase-switch listener driving sound cues, mascot
//!   mood and the daily tally
//! - **Collaborators**: To-do list and video playlist
//! - **Storage**: SQLite record store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SessionHooks`]: Default [`PhaseListener`]
//! - [`Database`]: Record persistence
//! - [`Config`]: Application configuration management

pub mod cues;
pub mod error;
pub mod events;
pub mod playlist;
pub mod storage;
pub mod tally;
pub mod timer;
pub mod todo;

pub use cues::{AudioCapability, Cue, Mood, SessionHooks, SoundKind, SoundSettings, SoundSource};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, SwitchTrigger};
pub use playlist::{extract_video_id, Playlist};
pub use storage::{Config, Database};
pub use tally::TomatoTally;
pub use timer::{
    Clock, ManualClock, NoopListener, Phase, PhaseListener, SystemClock, TimerConfig, TimerEngine,
    TimerState,
};
pub use todo::{Filter, Todo, TodoList};
