pub mod habits;
pub mod health;
pub mod progress;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use habitrack_core::{Clock, FixedClock, parse_iso_date};
use habitrack_habit::HabitStore;
use serde::Deserialize;

use crate::error::AppError;

pub use habits::*;
pub use health::*;
pub use progress::*;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HabitStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn HabitStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current instant, moved to `today` when the request pins a date.
    ///
    /// The time of day and offset of the real clock are kept.
    pub fn now(&self, today: Option<&str>) -> Result<DateTime<FixedOffset>, AppError> {
        let now = self.clock.now();

        let Some(today) = today else {
            return Ok(now);
        };

        let date = parse_iso_date(today)
            .ok_or_else(|| AppError::bad_request(format!("Invalid date: {today}")))?;
        let pinned = date
            .and_time(now.time())
            .and_local_timezone(*now.offset())
            .single()
            .unwrap_or(now);

        Ok(FixedClock::new(pinned).now())
    }
}

/// `?today=YYYY-MM-DD`, accepted by every date-sensitive endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct TodayQuery {
    pub today: Option<String>,
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/habits", get(list_habits).post(create_habit))
        .route(
            "/api/habits/{id}",
            get(get_habit).patch(update_habit).delete(delete_habit),
        )
        .route("/api/habits/{id}/toggle/{date}", post(toggle_completion))
        .route("/api/habits/{id}/completions", get(get_completions))
        .route("/api/habits/{id}/stats", get(get_stats))
        .route("/api/habits/{id}/calendar", get(get_calendar))
        .route("/api/progress/daily", get(get_daily_progress))
        .route("/api/progress/weekly", get(get_weekly_progress))
        .route("/api/progress/contribution", get(get_contribution))
        .route("/api/dashboard", get(get_dashboard))
}
