use std::time::{Duration, Instant};

pub struct FrameRate {
    window: Duration,
    window_start: Instant,
    frames: u32,
}

impl FrameRate {
    pub fn new(window: Duration) -> Self {
        Self::starting_at(window, Instant::now())
    }

    fn starting_at(window: Duration, start: Instant) -> Self {
        FrameRate {
            window,
            window_start: start,
            frames: 0,
        }
    }

    pub fn frame(&mut self) -> Option<f64> {
        self.frame_at(Instant::now())
    }

    fn frame_at(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }
        let rate = f64::from(self.frames) / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames = 0;
        Some(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_reports_once_per_window() {
        let start = Instant::now();
        let mut rate = FrameRate::starting_at(Duration::from_secs(1), start);

        // 60 frames, 1/60 s apart; only the last one closes the window
        let frame_time = Duration::from_secs(1) / 60;
        for i in 1..60 {
            assert_eq!(rate.frame_at(start + frame_time * i), None);
        }
        let fps = rate.frame_at(start + Duration::from_secs(1)).unwrap();
        assert_relative_eq!(fps, 60.0);

        // The next window starts from scratch
        assert_eq!(rate.frame_at(start + Duration::from_millis(1500)), None);
        let fps = rate.frame_at(start + Duration::from_secs(3)).unwrap();
        assert_relative_eq!(fps, 1.0);
    }
}
