//! Router fixtures shared by the API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use habitrack::{AppState, create_app};
use habitrack_core::{FixedClock, Frequency, Habit, parse_iso_date};
use habitrack_habit::{HabitStore, MemoryStore};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Every API test runs on Thursday 2024-01-04 at noon UTC.
pub const TODAY: &str = "2024-01-04";

pub fn created_at() -> DateTime<Utc> {
    "2024-01-01T00:00:00Z".parse().unwrap()
}

pub fn habit(id: &str, title: &str, completed: &[&str]) -> Habit {
    let mut habit = Habit::new(id, title, Frequency::Daily, created_at());
    habit.history = completed
        .iter()
        .map(|date| (parse_iso_date(date).unwrap(), true))
        .collect();
    habit
}

/// "Read" done on Jan 1, 2 and 4; "Walk" done on Jan 4 only.
pub fn seeded_store() -> Arc<dyn HabitStore> {
    Arc::new(MemoryStore::with_habits(vec![
        habit("habit-read", "Read", &["2024-01-01", "2024-01-02", "2024-01-04"]),
        habit("habit-walk", "Walk", &["2024-01-04"]),
    ]))
}

pub fn create_test_app(store: Arc<dyn HabitStore>) -> Router {
    let clock = FixedClock::on(parse_iso_date(TODAY).unwrap());

    create_app(AppState::new(store, Arc::new(clock)))
}

/// Sends one request and decodes the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut request = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json)?)
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body)?).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, json))
}

pub async fn get(app: &Router, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    send(app, Method::GET, uri, None).await
}
