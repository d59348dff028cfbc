use std::thread;
use std::time::{Duration, Instant};

/// What happens between cycles. Never affects computed values.
pub trait Pacer {
    fn pause(&mut self, dt_s: f64);
}

/// Runs the loop at full speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&mut self, _dt_s: f64) {}
}

/// Sleeps for `dt` scaled by `speedup` after every cycle, truncated to whole
/// milliseconds like a classic `sleep_ms`.
#[derive(Debug, Clone, Copy)]
pub struct WallClockPacer {
    speedup: f64,
}

impl WallClockPacer {
    pub fn new() -> Self {
        Self { speedup: 1.0 }
    }

    /// `speedup > 1` runs faster than real time. Non-positive values are ignored.
    pub fn with_speedup(mut self, speedup: f64) -> Self {
        if speedup.is_finite() && speedup > 0.0 {
            self.speedup = speedup;
        }
        self
    }

    pub fn delay_for(&self, dt_s: f64) -> Duration {
        let millis = (dt_s / self.speedup * 1000.0) as u64;
        Duration::from_millis(millis)
    }
}

impl Default for WallClockPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for WallClockPacer {
    fn pause(&mut self, dt_s: f64) {
        let delay = self.delay_for(dt_s);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn pause(&mut self, dt_s: f64) {
        (**self).pause(dt_s)
    }
}

impl<P: Pacer + ?Sized> Pacer for Box<P> {
    fn pause(&mut self, dt_s: f64) {
        (**self).pause(dt_s)
    }
}

/// Wall-clock span of a run, started when the first cycle executes.
#[derive(Debug, Clone, Copy)]
pub struct TimeBase {
    start: Instant,
}

impl TimeBase {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_step_sleeps_fifty_ms() {
        assert_eq!(WallClockPacer::new().delay_for(0.05), Duration::from_millis(50));
    }

    #[test]
    fn speedup_shortens_delay() {
        let pacer = WallClockPacer::new().with_speedup(2.0);
        assert_eq!(pacer.delay_for(0.1), Duration::from_millis(50));
        let ignored = WallClockPacer::new().with_speedup(-2.0);
        assert_eq!(ignored.delay_for(0.05), Duration::from_millis(50));
    }

    #[test]
    fn wall_clock_pause_is_measured_by_timebase() {
        let timebase = TimeBase::new();
        WallClockPacer::new().pause(0.02);
        assert!(timebase.elapsed() >= Duration::from_millis(20));
    }
}
