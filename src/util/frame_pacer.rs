//! Step cadence gating and smoothed FPS measurement.

use std::time::{Duration, Instant};

/// Gates driver steps to a fixed interval and tracks a smoothed FPS.
///
/// Two scheduling policies share this type: an interval of zero steps on
/// every display refresh (cube demo), a non-zero interval steps on a fixed
/// wall-clock cadence (automaton demo).
pub struct FramePacer {
    /// Minimum duration between steps (zero = every refresh).
    interval: Duration,
    /// Timestamp of the last accepted step.
    last_step: Instant,
    /// Smoothed FPS using an exponential moving average.
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother).
    smoothing: f32,
}

impl FramePacer {
    /// Create a pacer with the given step interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_step: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Whether enough time has passed since the last accepted step.
    #[must_use]
    pub fn should_step(&self) -> bool {
        if self.interval.is_zero() {
            return true;
        }
        self.last_step.elapsed() >= self.interval
    }

    /// Record that a step was taken and update the FPS average.
    pub fn end_step(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_step);
        self.last_step = now;

        let step_time = elapsed.as_secs_f32();
        if step_time > 0.0 {
            let instant_fps = 1.0 / step_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// The current smoothed steps-per-second rate.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_always_steps() {
        let pacer = FramePacer::new(Duration::ZERO);
        assert!(pacer.should_step());
    }

    #[test]
    fn long_interval_blocks_immediate_restep() {
        let mut pacer = FramePacer::new(Duration::from_secs(60));
        pacer.end_step();
        assert!(!pacer.should_step());
    }

    #[test]
    fn fps_average_moves_toward_observed_rate() {
        let mut pacer = FramePacer::new(Duration::ZERO);
        // Backdate the last step so the observed rate is at most 10 FPS,
        // which must pull the 60 FPS prior downward.
        pacer.last_step = Instant::now() - Duration::from_millis(100);
        pacer.end_step();
        assert!(pacer.fps() < 60.0);
    }
}
