use std::time::{Duration, Instant};

/// A single deferred action polled from the UI loop.
///
/// Scheduling again replaces the previous deadline and [`Self::cancel`] drops
/// it, so at most one firing is ever outstanding.
#[derive(Debug, Clone)]
pub struct DeferredTask {
    delay: Duration,
    due: Option<Instant>,
}

impl DeferredTask {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Returns true exactly once when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_delay() {
        let start = Instant::now();
        let mut task = DeferredTask::new(Duration::from_millis(100));
        task.schedule(start);

        assert!(!task.poll(start + Duration::from_millis(99)));
        assert!(task.poll(start + Duration::from_millis(100)));
        assert!(!task.poll(start + Duration::from_millis(200)));
        assert!(!task.is_pending());
    }

    #[test]
    fn cancelled_task_never_fires() {
        let start = Instant::now();
        let mut task = DeferredTask::new(Duration::from_millis(100));
        task.schedule(start);
        task.cancel();

        assert!(!task.poll(start + Duration::from_secs(1)));
    }

    #[test]
    fn rescheduling_moves_the_deadline() {
        let start = Instant::now();
        let mut task = DeferredTask::new(Duration::from_millis(100));
        task.schedule(start);
        task.schedule(start + Duration::from_millis(80));

        assert!(!task.poll(start + Duration::from_millis(150)));
        assert!(task.poll(start + Duration::from_millis(180)));
    }
}
