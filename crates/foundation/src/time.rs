use std::time::Duration;

/// Host-supplied timestamp in milliseconds.
///
/// The subsystem never reads a wall clock itself; the event loop passes the
/// current time in, which keeps every timer deterministic under test.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    pub fn after(self, delay: Duration) -> Self {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Millis(self.0.saturating_add(ms))
    }
}

#[cfg(test)]
mod tests {
    use super::Millis;
    use std::time::Duration;

    #[test]
    fn after_adds_and_saturates() {
        assert_eq!(Millis(100).after(Duration::from_millis(200)), Millis(300));
        assert_eq!(
            Millis(u64::MAX - 1).after(Duration::from_secs(1)),
            Millis(u64::MAX)
        );
    }
}
