use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Flags {
    has_failed_before: AtomicBool,
    has_initialized_before: AtomicBool,
}

/// Failure memory shared by every map instance that holds a clone.
///
/// Once any instance fails to initialize, later instances skip straight to
/// the simplified list. Only an explicit user retry clears the memory, and it
/// clears it for all holders.
///
/// [`DegradationState::process`] returns the process-wide instance; tests and
/// embedders that need isolation create their own with `new`.
#[derive(Debug, Clone, Default)]
pub struct DegradationState {
    flags: Arc<Flags>,
}

static PROCESS: Lazy<DegradationState> = Lazy::new(DegradationState::new);

impl DegradationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process() -> Self {
        PROCESS.clone()
    }

    pub fn has_failed_before(&self) -> bool {
        self.flags.has_failed_before.load(Ordering::SeqCst)
    }

    pub fn has_initialized_before(&self) -> bool {
        self.flags.has_initialized_before.load(Ordering::SeqCst)
    }

    /// Trips the flag. Returns `true` if this call tripped it.
    pub fn record_failure(&self) -> bool {
        let first = !self.flags.has_failed_before.swap(true, Ordering::SeqCst);
        if first {
            info!("map initialization failed; later maps start in list fallback");
        }
        first
    }

    pub fn record_initialized(&self) {
        self.flags
            .has_initialized_before
            .store(true, Ordering::SeqCst);
    }

    /// Clears both flags. Called only from an explicit user retry.
    pub fn reset(&self) {
        self.flags.has_failed_before.store(false, Ordering::SeqCst);
        self.flags
            .has_initialized_before
            .store(false, Ordering::SeqCst);
        debug!("map degradation state reset");
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.flags, &other.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::DegradationState;

    #[test]
    fn starts_clean() {
        let d = DegradationState::new();
        assert!(!d.has_failed_before());
        assert!(!d.has_initialized_before());
    }

    #[test]
    fn failure_is_visible_to_every_clone() {
        let a = DegradationState::new();
        let b = a.clone();
        assert!(a.record_failure());
        assert!(!a.record_failure());
        assert!(b.has_failed_before());
    }

    #[test]
    fn reset_clears_both_flags() {
        let d = DegradationState::new();
        d.record_initialized();
        d.record_failure();
        d.clone().reset();
        assert!(!d.has_failed_before());
        assert!(!d.has_initialized_before());
    }

    #[test]
    fn fresh_instances_are_isolated_from_process_instance() {
        let local = DegradationState::new();
        assert!(!local.ptr_eq(&DegradationState::process()));
        assert!(DegradationState::process().ptr_eq(&DegradationState::process()));
    }
}
