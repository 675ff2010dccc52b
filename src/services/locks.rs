use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per calendar date. Everything that reads a date's
/// occupancy and then writes a booking for it runs under that date's guard.
#[derive(Default)]
pub struct DateLocks {
    locks: Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>,
}

impl DateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `date`. Idle locks for days before
    /// `today` are dropped on the way.
    pub async fn acquire(&self, date: NaiveDate, today: NaiveDate) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|day, lock| *day >= today || Arc::strong_count(lock) > 1);
            locks
                .entry(date)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    pub async fn tracked_dates(&self) -> usize {
        self.locks.lock().await.len()
    }
}
