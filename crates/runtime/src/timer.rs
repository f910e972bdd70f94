use std::time::Duration;

use foundation::time::Millis;

/// Single-shot timer polled by the host event loop.
///
/// A timer fires at most once per `arm`; re-arming replaces the deadline.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct OneShotTimer {
    deadline: Option<Millis>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    pub fn arm(&mut self, now: Millis, delay: Duration) {
        self.deadline = Some(now.after(delay));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.deadline
    }

    /// Returns `true` exactly once, on the first poll at or past the deadline.
    pub fn poll(&mut self, now: Millis) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OneShotTimer;
    use foundation::time::Millis;
    use std::time::Duration;

    #[test]
    fn fires_once_at_deadline() {
        let mut t = OneShotTimer::new();
        t.arm(Millis(1_000), Duration::from_millis(3_000));
        assert_eq!(t.deadline(), Some(Millis(4_000)));
        assert!(!t.poll(Millis(3_999)));
        assert!(t.poll(Millis(4_000)));
        assert!(!t.poll(Millis(5_000)));
        assert!(!t.is_armed());
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut t = OneShotTimer::new();
        t.arm(Millis(0), Duration::from_millis(200));
        t.cancel();
        assert!(!t.poll(Millis(10_000)));
    }

    #[test]
    fn rearm_replaces_deadline() {
        let mut t = OneShotTimer::new();
        t.arm(Millis(0), Duration::from_millis(200));
        t.arm(Millis(100), Duration::from_millis(200));
        assert!(!t.poll(Millis(250)));
        assert!(t.poll(Millis(300)));
    }
}
