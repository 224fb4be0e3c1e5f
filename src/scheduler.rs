use std::time::Duration;

use crate::config::MAX_FRAME_DELTA;

/// Fixed-timestep accumulator between the frame clock and the tick rate.
///
/// Frame deltas are added with [`Scheduler::accumulate`]; each successful
/// [`Scheduler::consume_step`] pays for one tick. The step is passed in on
/// every call, so a speed change applies to the very next check.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Scheduler {
    accumulator: Duration,
    max_frame_delta: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA)
    }
}

impl Scheduler {
    #[must_use]
    pub fn new(max_frame_delta: Duration) -> Self {
        Self {
            accumulator: Duration::ZERO,
            max_frame_delta,
        }
    }

    /// Adds one frame's elapsed time, clamped to the frame delta cap.
    pub fn accumulate(&mut self, frame_delta: Duration) {
        self.accumulator += frame_delta.min(self.max_frame_delta);
    }

    /// Spends `step` from the accumulator if enough time has built up.
    ///
    /// `step` must be non-zero; validated configs never produce a zero step.
    pub fn consume_step(&mut self, step: Duration) -> bool {
        debug_assert!(!step.is_zero(), "zero step would tick forever");
        if self.accumulator < step {
            return false;
        }
        self.accumulator -= step;
        true
    }

    /// Drops any pending time so a resumed game does not burst forward.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    #[must_use]
    pub fn pending(&self) -> Duration {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Scheduler;

    const STEP: Duration = Duration::from_millis(125);

    fn drain(scheduler: &mut Scheduler, step: Duration) -> usize {
        let mut ticks = 0;
        while scheduler.consume_step(step) {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn short_frames_accumulate_until_a_step_is_due() {
        let mut scheduler = Scheduler::default();

        scheduler.accumulate(Duration::from_millis(60));
        assert_eq!(drain(&mut scheduler, STEP), 0);

        scheduler.accumulate(Duration::from_millis(70));
        assert_eq!(drain(&mut scheduler, STEP), 1);
        assert_eq!(scheduler.pending(), Duration::from_millis(5));
    }

    #[test]
    fn long_frame_runs_several_ticks() {
        let mut scheduler = Scheduler::default();

        scheduler.accumulate(Duration::from_millis(250));

        assert_eq!(drain(&mut scheduler, STEP), 2);
        assert_eq!(scheduler.pending(), Duration::ZERO);
    }

    #[test]
    fn oversized_frame_is_clamped() {
        let mut scheduler = Scheduler::new(Duration::from_millis(250));

        scheduler.accumulate(Duration::from_secs(30));

        assert_eq!(drain(&mut scheduler, STEP), 2);
    }

    #[test]
    fn faster_step_applies_on_next_check() {
        let mut scheduler = Scheduler::default();
        scheduler.accumulate(Duration::from_millis(200));

        assert!(scheduler.consume_step(STEP));
        // 75ms left: too little for the old step, enough for a faster one.
        assert!(!scheduler.consume_step(STEP));
        assert!(scheduler.consume_step(Duration::from_millis(50)));
    }

    #[test]
    fn reset_discards_pending_time() {
        let mut scheduler = Scheduler::default();
        scheduler.accumulate(Duration::from_millis(100));

        scheduler.reset();

        assert_eq!(scheduler.pending(), Duration::ZERO);
        assert!(!scheduler.consume_step(Duration::from_millis(1)));
    }
}
