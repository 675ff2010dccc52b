use std::sync::Arc;

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::config::SeatPolicy;
use crate::db::SqliteBookingStore;
use crate::services::{AdmissionEngine, SeatMapProjector};

/// Source of the local wall-clock time every eligibility rule is evaluated at.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub fn local_clock() -> Clock {
    Arc::new(|| chrono::Local::now().naive_local())
}

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub engine: Arc<AdmissionEngine>,
    pub seat_maps: Arc<SeatMapProjector>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(db: SqlitePool, policy: SeatPolicy) -> Self {
        let store = Arc::new(SqliteBookingStore::new(db.clone()));
        let engine = Arc::new(AdmissionEngine::new(store, policy));
        let seat_maps = Arc::new(SeatMapProjector::new(engine.clone()));
        Self {
            db,
            engine,
            seat_maps,
            clock: local_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}
