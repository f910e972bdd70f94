use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Process-unique id for a mounted map instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Allocates the next id. Ids are never reused within a process.
    pub fn next() -> Self {
        InstanceId(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "map#{}", self.0)
    }
}
