//! Run timing for Waypoint.
//!
//! A run is the stretch between the start gate and the end gate of a level.
//! [`RunTimer`] accumulates elapsed time while running; [`RunGate`] makes
//! sure each gate fires at most once per run; [`format_elapsed`] renders
//! the HUD text.
//!
//! # Driving the timer
//!
//! The timer never reads a clock on its own. The game loop either feeds it
//! the frame delta:
//!
//! ```
//! use std::time::Duration;
//! use waypoint_timer::RunTimer;
//!
//! let mut timer = RunTimer::new();
//! timer.start();
//! timer.advance(Duration::from_millis(16));
//! timer.stop();
//! assert_eq!(timer.elapsed(), Duration::from_millis(16));
//! ```
//!
//! or calls [`RunTimer::tick`] once per frame to add the wall-clock time
//! since the previous tick.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// RunTimer
// ---------------------------------------------------------------------------

/// Start/stop elapsed-time accumulator.
///
/// There is no pause: `start` always resets to zero, `stop` freezes the
/// value until the next `start`.
#[derive(Debug, Clone, Default)]
pub struct RunTimer {
    elapsed: Duration,
    running: bool,
    /// When `tick` last sampled the clock. `None` while stopped.
    last_tick: Option<Instant>,
}

impl RunTimer {
    /// A stopped timer at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets elapsed time to zero and starts running.
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = true;
        self.last_tick = Some(Instant::now());
        info!("run timer started");
    }

    /// Stops running and freezes the elapsed time.
    ///
    /// Time since the last `advance`/`tick` is not added. Stopping a
    /// stopped timer does nothing.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.last_tick = None;
        info!(
            elapsed_secs = self.elapsed.as_secs_f32(),
            "run timer stopped"
        );
    }

    /// Adds `dt` if running.
    pub fn advance(&mut self, dt: Duration) {
        if self.running {
            self.elapsed += dt;
        }
    }

    /// Adds the wall-clock time since the previous tick (or since
    /// `start`) if running.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        let now = Instant::now();
        if let Some(last) = self.last_tick.replace(now) {
            self.elapsed += now.saturating_duration_since(last);
        }
    }

    /// Accumulated time, whether running or stopped.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in seconds, the unit the leaderboard uses.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Whether the timer is accumulating.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

// ---------------------------------------------------------------------------
// RunGate
// ---------------------------------------------------------------------------

/// Where a run currently is, from the gates' point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePhase {
    /// Neither gate has fired.
    #[default]
    Ready,
    /// The start gate fired.
    Running,
    /// The end gate fired. Only [`RunGate::reset`] leaves this phase.
    Finished,
}

/// Fires the timer's `start` and `stop` at most once each per run.
///
/// The player can cross a gate trigger many times; only the first
/// crossing counts.
#[derive(Debug, Clone, Default)]
pub struct RunGate {
    phase: GatePhase,
}

impl RunGate {
    /// A gate waiting for the start trigger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start gate crossed. Starts `timer` and returns `true` the first
    /// time in a run; later crossings are ignored.
    pub fn enter_start(&mut self, timer: &mut RunTimer) -> bool {
        if self.phase != GatePhase::Ready {
            debug!(phase = ?self.phase, "start gate already fired");
            return false;
        }
        self.phase = GatePhase::Running;
        timer.start();
        true
    }

    /// End gate crossed. Stops `timer` and returns `true` the first time
    /// after the start gate; any other crossing is ignored.
    pub fn enter_end(&mut self, timer: &mut RunTimer) -> bool {
        match self.phase {
            GatePhase::Running => {
                self.phase = GatePhase::Finished;
                timer.stop();
                true
            }
            GatePhase::Ready => {
                warn!("end gate reached before start gate, ignoring");
                false
            }
            GatePhase::Finished => {
                debug!("end gate already fired");
                false
            }
        }
    }

    /// Re-arms both gates for the next run.
    pub fn reset(&mut self) {
        self.phase = GatePhase::Ready;
    }

    /// Which trigger the gate is waiting for.
    pub fn phase(&self) -> GatePhase {
        self.phase
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Formats elapsed time as `MM:SS.mmm` (e.g. `01:05.250`).
///
/// Minutes are not wrapped into hours; a 100-minute run shows `100:00.000`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}:{:02}.{:03}",
        total / 60,
        total % 60,
        elapsed.subsec_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_stopped_at_zero() {
        let timer = RunTimer::new();
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_advance_while_stopped_is_ignored() {
        let mut timer = RunTimer::new();
        timer.advance(Duration::from_secs(1));
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_start_resets_previous_run() {
        let mut timer = RunTimer::new();
        timer.start();
        timer.advance(Duration::from_secs(5));
        timer.stop();

        timer.start();
        assert_eq!(timer.elapsed(), Duration::ZERO);
        assert!(timer.is_running());
    }

    #[test]
    fn test_gate_end_before_start_is_ignored() {
        let mut timer = RunTimer::new();
        let mut gate = RunGate::new();

        assert!(!gate.enter_end(&mut timer));
        assert_eq!(gate.phase(), GatePhase::Ready);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_format_elapsed_pads_fields() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00.000");
        assert_eq!(format_elapsed(Duration::from_millis(65_250)), "01:05.250");
        assert_eq!(format_elapsed(Duration::from_millis(9_007)), "00:09.007");
    }

    #[test]
    fn test_format_elapsed_does_not_wrap_hours() {
        assert_eq!(format_elapsed(Duration::from_secs(6_000)), "100:00.000");
    }
}
