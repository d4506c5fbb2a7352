//! Single dispatch point for chat state changes.

use tokio::sync::{Mutex, MutexGuard};

/// Serializes join, accept and leave.
///
/// While held, no other connection can register, unregister, append to the
/// history or broadcast. A joiner's history replay therefore never misses or
/// duplicates a concurrently accepted message, and every recipient sees
/// frames in the same order as the history and the message log.
#[derive(Debug, Default)]
pub struct DispatchLock {
    gate: Mutex<()>,
}

impl DispatchLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}
