//! Frame delta and FPS bookkeeping.

use web_time::{Duration, Instant};

/// Longest step handed to demos, so a stall (window drag, breakpoint)
/// does not teleport animated objects.
pub const MAX_DELTA: f32 = 0.1;

/// Per-frame delta time, smoothed FPS and periodic FPS reporting.
pub struct FrameTiming {
    /// Start of the gallery, for elapsed time
    started: Instant,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Time between FPS reports (zero = never)
    report_interval: Duration,
    last_report: Instant,
    frames_since_report: u32,
}

impl FrameTiming {
    /// Timer reporting FPS every `report_interval_secs` seconds (0 = never).
    #[must_use]
    pub fn new(report_interval_secs: f32) -> Self {
        Self::starting_at(Instant::now(), report_interval_secs)
    }

    fn starting_at(now: Instant, report_interval_secs: f32) -> Self {
        Self {
            started: now,
            last_frame: now,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,
            report_interval: Duration::try_from_secs_f32(report_interval_secs.max(0.0))
                .unwrap_or(Duration::MAX),
            last_report: now,
            frames_since_report: 0,
        }
    }

    /// Advance to the next frame and return its delta time in seconds,
    /// clamped to [`MAX_DELTA`].
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frames_since_report += 1;

        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            // Exponential moving average for smooth display
            self.smoothed_fps =
                self.smoothed_fps * (1.0 - self.smoothing) + instant_fps * self.smoothing;
        }
        frame_time.min(MAX_DELTA)
    }

    /// Restart the elapsed clock, e.g. when a new demo starts.
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    /// Seconds since construction or the last [`restart`](Self::restart).
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.last_frame.duration_since(self.started).as_secs_f32()
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Average FPS since the last report, once per report interval.
    pub fn take_report(&mut self) -> Option<f32> {
        self.take_report_at(Instant::now())
    }

    fn take_report_at(&mut self, now: Instant) -> Option<f32> {
        if self.report_interval.is_zero() {
            return None;
        }
        let since = now.duration_since(self.last_report);
        if since < self.report_interval {
            return None;
        }
        let fps = self.frames_since_report as f32 / since.as_secs_f32();
        self.last_report = now;
        self.frames_since_report = 0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_clamped() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start, 0.0);
        let dt = timing.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-4);
        assert_eq!(timing.tick_at(start + Duration::from_secs(3)), MAX_DELTA);
    }

    #[test]
    fn reports_average_fps_once_per_interval() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start, 1.0);
        for i in 1..=50 {
            let _ = timing.tick_at(start + Duration::from_millis(i * 20));
        }
        assert_eq!(timing.take_report_at(start + Duration::from_millis(500)), None);
        let Some(fps) = timing.take_report_at(start + Duration::from_secs(1)) else {
            panic!("report due after one second");
        };
        assert!((fps - 50.0).abs() < 1e-3);
        assert_eq!(timing.take_report_at(start + Duration::from_millis(1100)), None);
    }

    #[test]
    fn zero_interval_never_reports() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start, 0.0);
        assert_eq!(timing.take_report_at(start + Duration::from_secs(60)), None);
    }

    #[test]
    fn infinite_interval_never_reports() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start, f32::INFINITY);
        let _ = timing.tick_at(start + Duration::from_millis(16));
        assert_eq!(timing.take_report_at(start + Duration::from_secs(3600)), None);
    }
}
