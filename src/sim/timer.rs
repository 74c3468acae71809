//! Countdown timers for animations and cooldowns

use serde::{Deserialize, Serialize};

/// A restartable countdown measured in milliseconds.
///
/// The timer only runs while active. When it runs out it deactivates and
/// rewinds to its full duration; starting it again while it is already active
/// does not rewind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
    active: bool,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: duration,
            active: false,
        }
    }

    /// Mark the timer as running
    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Advance by `dt` ms. Returns true on the tick the timer expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.active = false;
            self.remaining = self.duration;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_timer_does_not_run() {
        let mut timer = Countdown::new(500.0);
        assert!(!timer.tick(1000.0));
        assert_eq!(timer.remaining(), 500.0);
    }

    #[test]
    fn test_expires_and_rewinds() {
        let mut timer = Countdown::new(500.0);
        timer.start();
        assert!(!timer.tick(300.0));
        assert!(timer.is_active());
        assert_eq!(timer.remaining(), 200.0);

        assert!(timer.tick(200.0));
        assert!(!timer.is_active());
        assert_eq!(timer.remaining(), 500.0);
    }

    #[test]
    fn test_restart_does_not_rewind() {
        let mut timer = Countdown::new(500.0);
        timer.start();
        timer.tick(400.0);
        timer.start();
        assert!(timer.tick(100.0));
    }
}
