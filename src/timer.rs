use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct IntervalTimer {
    active: Option<Schedule>,
}

#[derive(Debug, Copy, Clone)]
struct Schedule {
    interval: Duration,
    next_due: Instant,
}

impl IntervalTimer {
    pub fn new() -> Self {
        IntervalTimer { active: None }
    }

    pub fn start(&mut self, interval: Duration) {
        self.start_at(interval, Instant::now());
    }

    /// First firing is one full `interval` after `now`.
    pub fn start_at(&mut self, interval: Duration, now: Instant) {
        self.active = Some(Schedule { interval, next_due: now + interval });
    }

    pub fn stop(&mut self) {
        self.active = None;
    }

    pub fn replace(&mut self, interval: Duration) {
        if self.is_active() {
            self.start(interval);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.active.map(|s| s.interval)
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.active.map(|s| s.next_due.saturating_duration_since(now))
    }

    /// Consumes one firing if it is due. Late firings are not replayed in a
    /// burst: the next deadline is measured from `now`.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        match self.active.as_mut() {
            Some(schedule) if now >= schedule.next_due => {
                let missed = now.duration_since(schedule.next_due);
                schedule.next_due = if missed >= schedule.interval {
                    now + schedule.interval
                } else {
                    schedule.next_due + schedule.interval
                };
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn stopped_timer_never_fires() {
        let mut timer = IntervalTimer::new();
        assert!(!timer.poll_due(Instant::now()));
        assert_eq!(timer.time_until_due(Instant::now()), None);
    }

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new();
        timer.start_at(MS_100, t0);

        assert!(!timer.poll_due(t0 + Duration::from_millis(99)));
        assert!(timer.poll_due(t0 + MS_100));
        assert!(!timer.poll_due(t0 + MS_100));
        assert!(timer.poll_due(t0 + Duration::from_millis(205)));
        assert_eq!(
            timer.time_until_due(t0 + Duration::from_millis(250)),
            Some(Duration::from_millis(50))
        );
    }

    #[test]
    fn long_stall_does_not_burst() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new();
        timer.start_at(MS_100, t0);

        let late = t0 + Duration::from_millis(1_000);
        assert!(timer.poll_due(late));
        assert!(!timer.poll_due(late));
        assert_eq!(timer.time_until_due(late), Some(MS_100));
    }

    #[test]
    fn replace_only_affects_running_timer() {
        let mut timer = IntervalTimer::new();
        timer.replace(MS_100);
        assert!(!timer.is_active());

        timer.start(MS_100);
        timer.replace(Duration::from_millis(80));
        assert_eq!(timer.interval(), Some(Duration::from_millis(80)));

        timer.stop();
        assert_eq!(timer.interval(), None);
    }
}
