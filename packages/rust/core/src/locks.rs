//! Per-title mutual exclusion for enrichment writes.
//!
//! Each title maps to an async mutex while anyone holds or waits on it.
//! Entries are pruned on release once no other task references them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-title async locks.
#[derive(Default)]
pub struct TitleLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Held while a title is being enriched; releases and prunes on drop.
pub struct TitleGuard<'a> {
    locks: &'a TitleLocks,
    title: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl TitleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other task holds `title`, then hold it.
    pub async fn acquire(&self, title: &str) -> TitleGuard<'_> {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(title.to_string()).or_default().clone()
        };
        let guard = mutex.lock_owned().await;
        TitleGuard {
            locks: self,
            title: title.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of titles currently held or awaited.
    pub fn active(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for TitleGuard<'_> {
    fn drop(&mut self) {
        // Release first so our own reference no longer counts.
        self.guard.take();

        let mut map = self
            .locks
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if map
            .get(&self.title)
            .is_some_and(|m| Arc::strong_count(m) == 1)
        {
            map.remove(&self.title);
        }
    }
}
