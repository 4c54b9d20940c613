mod clock;
mod engine;
mod listener;
mod phase;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{TimerEngine, TimerState};
pub use listener::{NoopListener, PhaseListener};
pub use phase::{Phase, TimerConfig};
