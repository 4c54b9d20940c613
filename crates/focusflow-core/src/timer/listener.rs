use super::Phase;

/// Receives every phase transition, automatic or skipped.
///
/// Called synchronously from inside the engine operation that crossed the
/// boundary. The listener gets no handle to the engine, so it cannot
/// re-enter it.
pub trait PhaseListener {
    fn on_phase_switch(&mut self, phase: Phase);
}

/// Listener that ignores every switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl PhaseListener for NoopListener {
    fn on_phase_switch(&mut self, _phase: Phase) {}
}

impl<F> PhaseListener for F
where
    F: FnMut(Phase),
{
    fn on_phase_switch(&mut self, phase: Phase) {
        self(phase)
    }
}
