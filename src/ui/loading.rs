use std::time::{Duration, Instant};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Loading indicator shown while a video loads or a seek is in flight.
#[derive(Debug, Clone)]
pub struct Spinner {
    current_frame: usize,
    last_update: Instant,
    frame_duration: Duration,
    spinning: bool,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            current_frame: 0,
            last_update: Instant::now(),
            frame_duration: Duration::from_millis(80),
            spinning: false,
        }
    }

    pub fn start(&mut self) {
        if !self.spinning {
            self.spinning = true;
            self.current_frame = 0;
            self.last_update = Instant::now();
        }
    }

    pub fn stop(&mut self) {
        self.spinning = false;
    }

    pub fn tick(&mut self, now: Instant) {
        if self.spinning && now.saturating_duration_since(self.last_update) >= self.frame_duration {
            self.current_frame = (self.current_frame + 1) % FRAMES.len();
            self.last_update = now;
        }
    }

    pub fn current_frame(&self) -> Option<&'static str> {
        self.spinning.then(|| FRAMES[self.current_frame])
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_until_started() {
        let mut spinner = Spinner::new();
        assert_eq!(spinner.current_frame(), None);

        spinner.start();
        assert_eq!(spinner.current_frame(), Some(FRAMES[0]));

        spinner.stop();
        assert_eq!(spinner.current_frame(), None);
    }

    #[test]
    fn advances_one_frame_per_interval() {
        let mut spinner = Spinner::new();
        spinner.start();
        let start = spinner.last_update;

        spinner.tick(start + Duration::from_millis(40));
        assert_eq!(spinner.current_frame(), Some(FRAMES[0]));
        spinner.tick(start + Duration::from_millis(80));
        assert_eq!(spinner.current_frame(), Some(FRAMES[1]));
    }
}
