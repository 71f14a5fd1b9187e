// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

/// Fixed-interval frame scheduler standing in for the display refresh.
///
/// A stopped ticker is never due, so stopping it is how a loop is
/// cancelled. A loop that falls behind resumes from `now` instead of
/// replaying the missed frames.
#[derive(Clone, Debug)]
pub struct Ticker {
    period: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(fps: f64) -> Self {
        Self {
            period: period_for(fps),
            next: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.period = period_for(fps);
    }

    pub fn start(&mut self, now: Instant) {
        self.next = Some(now);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        self.next.is_some_and(|next| now >= next)
    }

    #[cfg(test)]
    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Time left until the next frame, `None` when stopped.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.next.map(|next| next.saturating_duration_since(now))
    }

    pub fn advance(&mut self, now: Instant) {
        let Some(next) = self.next else {
            return;
        };
        let mut next = next + self.period;
        if now > next {
            next = now;
        }
        self.next = Some(next);
    }
}

fn period_for(fps: f64) -> Duration {
    let fps = if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        60.0
    };
    Duration::from_secs_f64(1.0 / fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_ticker_is_never_due() {
        let t = Ticker::new(60.0);
        let now = Instant::now();
        assert!(!t.is_running());
        assert!(!t.due(now + Duration::from_secs(10)));
        assert_eq!(t.timeout(now), None);
    }

    #[test]
    fn start_is_due_immediately_then_waits_one_period() {
        let mut t = Ticker::new(50.0);
        let now = Instant::now();
        t.start(now);
        assert!(t.due(now));
        t.advance(now);
        assert!(!t.due(now));
        assert_eq!(t.timeout(now), Some(Duration::from_millis(20)));
        assert!(t.due(now + Duration::from_millis(20)));
    }

    #[test]
    fn falling_behind_snaps_to_now() {
        let mut t = Ticker::new(100.0);
        let start = Instant::now();
        t.start(start);
        let late = start + Duration::from_secs(1);
        t.advance(late);
        assert_eq!(t.deadline(), Some(late));
    }

    #[test]
    fn stop_cancels_pending_frame() {
        let mut t = Ticker::new(60.0);
        let now = Instant::now();
        t.start(now);
        t.stop();
        assert!(!t.due(now));
        t.advance(now);
        assert!(!t.is_running());
    }

    #[test]
    fn invalid_fps_falls_back() {
        let t = Ticker::new(0.0);
        assert_eq!(t.period(), Duration::from_secs_f64(1.0 / 60.0));
    }
}
