#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use seat_booking::config::SeatPolicy;
use seat_booking::db::{MIGRATOR, SqliteBookingStore};
use seat_booking::services::AdmissionEngine;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// A fresh in-memory database. One connection only, since every SQLite
/// memory connection is its own database.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    pool
}

pub async fn setup_engine(policy: SeatPolicy) -> Arc<AdmissionEngine> {
    let pool = setup_pool().await;
    Arc::new(AdmissionEngine::new(Arc::new(SqliteBookingStore::new(pool)), policy))
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("bad test date")
}

pub fn at(s: &str, hour: u32, minute: u32) -> NaiveDateTime {
    day(s).and_hms_opt(hour, minute, 0).expect("bad test time")
}
