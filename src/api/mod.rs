pub mod current_user;

use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::models::*;
use crate::services::{parse_booking_date, rotation};
use crate::state::AppState;

pub use current_user::CurrentUser;

const MAX_SCHEDULE_WEEKS: u32 = 12;

#[derive(Deserialize)]
struct WeeklyQueryParams {
    date: Option<String>,
}

#[derive(Deserialize)]
struct MultiWeekQueryParams {
    weeks: Option<u32>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/bookings", post(submit_booking))
        .route("/bookings/release-by-date", put(release_by_date))
        .route("/bookings/{id}/release", put(release_booking))
        .route("/bookings/seat-map/{date}", get(seat_map))
        .route("/schedule/weekly", get(weekly_schedule))
        .route("/schedule/multi-week", get(multi_week_schedule))
        .route("/schedule/check/{date}", get(check_schedule))
        .route("/schedule/rotation-info", get(rotation_info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn submit_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SubmitBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state
        .engine
        .submit(&user.id, user.batch, &req.date, req.seat_number, state.now())
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn release_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.engine.release(&id, &user.id, state.now()).await?;
    Ok(Json(booking))
}

async fn release_by_date(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ReleaseByDateRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .engine
        .release_by_date(&user.id, user.batch, &req.date, state.now())
        .await?;
    Ok(Json(booking))
}

async fn seat_map(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(date): Path<String>,
) -> Result<Json<SeatMapView>, AppError> {
    let view = state
        .seat_maps
        .render(&date, &user.id, user.batch, state.now())
        .await?;
    Ok(Json(view))
}

async fn weekly_schedule(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<WeeklyQueryParams>,
) -> Result<Json<Vec<DaySchedule>>, AppError> {
    let anchor = match params.date {
        Some(raw) => parse_booking_date(&raw)?,
        None => state.now().date(),
    };
    Ok(Json(rotation::weekly_schedule(user.batch, anchor)))
}

async fn multi_week_schedule(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<MultiWeekQueryParams>,
) -> Json<Vec<WeekSchedule>> {
    let weeks = params.weeks.unwrap_or(2).clamp(1, MAX_SCHEDULE_WEEKS);
    Json(rotation::multi_week_schedule(user.batch, weeks, state.now().date()))
}

async fn check_schedule(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(date): Path<String>,
) -> Result<Json<ScheduleCheck>, AppError> {
    let now = state.now();
    let date = parse_booking_date(&date)?;
    let scheduled_batch = rotation::scheduled_batch(date);
    let is_scheduled = scheduled_batch == Some(user.batch);
    let bookable_day = state.engine.check_bookable_day(date, now.date()).is_ok();

    Ok(Json(ScheduleCheck {
        date,
        day_name: rotation::day_name(date),
        user_batch: user.batch,
        scheduled_batch,
        is_scheduled,
        can_book_normally: is_scheduled
            && bookable_day
            && state.engine.check_scheduled_window(date, now.date()).is_ok(),
        can_book_buffer: !is_scheduled && bookable_day && state.engine.check_buffer_window(date, now).is_ok(),
    }))
}

async fn rotation_info(State(state): State<AppState>) -> Json<RotationInfo> {
    Json(rotation::rotation_info(state.now(), state.engine.policy()))
}
