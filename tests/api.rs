use axum::http::{Method, StatusCode};
use habitrack_habit::MemoryStore;
use serde_json::json;
use std::sync::Arc;

mod helpers;

use helpers::{create_test_app, get, seeded_store, send};

#[tokio::test]
async fn health_and_ready() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());

    let (status, body) = get(&app, "/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get(&app, "/ready").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    Ok(())
}

#[tokio::test]
async fn create_fills_defaults_and_fetches() -> anyhow::Result<()> {
    let app = create_test_app(Arc::new(MemoryStore::new()));

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/habits",
        Some(json!({
            "title": "Stretch",
            "frequency": "custom",
            "reminderEnabled": true,
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Stretch");
    assert_eq!(created["frequencyCount"], 1);
    assert_eq!(created["frequencyPeriod"], "weekly");
    assert_eq!(created["selectedDays"], json!(["mon", "tue", "wed", "thu", "fri"]));
    assert_eq!(created["reminderTime"], "08:00");
    assert_eq!(created["createdAt"], "2024-01-04T12:00:00Z");
    assert_eq!(created["history"], json!({}));

    let id = created["id"].as_str().unwrap_or_default().to_owned();
    assert_eq!(id.len(), 26);

    let (status, detail) = get(&app, &format!("/api/habits/{id}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["id"], id.as_str());
    assert_eq!(detail["completions"], json!([]));

    let (status, list) = get(&app, "/api/habits").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn invalid_input_is_a_validation_error() -> anyhow::Result<()> {
    let app = create_test_app(Arc::new(MemoryStore::new()));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/habits",
        Some(json!({ "title": "" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error");
    assert!(body["details"]["title"].is_array());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/habits",
        Some(json!({ "title": "   " })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["title"][0]["code"], "title_blank");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/habits",
        Some(json!({ "title": "Run", "reminderTime": "7pm" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["reminder_time"].is_array());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/habits",
        Some(json!({ "title": "Run", "frequency": "hourly" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error");

    let (_, list) = get(&app, "/api/habits").await?;
    assert_eq!(list, json!([]));

    Ok(())
}

#[tokio::test]
async fn unknown_habit_is_not_found() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());
    let not_found = json!({ "error": "Habit not found" });

    for (method, uri, body) in [
        (Method::GET, "/api/habits/nope", None),
        (Method::PATCH, "/api/habits/nope", Some(json!({ "title": "x" }))),
        (Method::DELETE, "/api/habits/nope", None),
        (Method::POST, "/api/habits/nope/toggle/2024-01-04", None),
        (Method::GET, "/api/habits/nope/completions", None),
        (Method::GET, "/api/habits/nope/stats", None),
        (Method::GET, "/api/habits/nope/calendar", None),
    ] {
        let (status, response) = send(&app, method.clone(), uri, body).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(response, not_found);
    }

    Ok(())
}

#[tokio::test]
async fn list_is_newest_first() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());

    send(
        &app,
        Method::POST,
        "/api/habits",
        Some(json!({ "title": "Meditate" })),
    )
    .await?;

    let (_, list) = get(&app, "/api/habits").await?;
    let titles: Vec<&str> = list
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|habit| habit["title"].as_str())
        .collect();

    assert_eq!(titles, vec!["Meditate", "Walk", "Read"]);

    Ok(())
}

#[tokio::test]
async fn toggle_flips_and_rejects_bad_dates() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/habits/habit-read/toggle/2024-01-03",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "date": "2024-01-03", "completed": true }));

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/habits/habit-read/toggle/2024-01-03",
        None,
    )
    .await?;
    assert_eq!(body, json!({ "date": "2024-01-03", "completed": false }));

    for bad in ["2024-1-3", "yesterday", "2024-02-30"] {
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/habits/habit-read/toggle/{bad}"),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
        assert_eq!(body["error"], "Validation error");
    }

    Ok(())
}

#[tokio::test]
async fn stats_for_the_concrete_scenario() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());

    let (status, body) = get(&app, "/api/habits/habit-read/stats").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentStreak"], 1);
    assert_eq!(body["bestStreak"], 2);
    assert_eq!(body["completionRate"], 75);
    assert_eq!(body["streakText"], "1 day streak");
    assert_eq!(body["frequencyText"], "Daily");
    assert_eq!(
        body["recentCompletions"],
        json!(["2024-01-04", "2024-01-02", "2024-01-01"])
    );

    let (_, body) = get(&app, "/api/habits/habit-read/stats?today=2024-01-03").await?;
    assert_eq!(body["currentStreak"], 2);
    assert_eq!(body["streakText"], "2 day streak");

    let (status, _) = get(&app, "/api/habits/habit-read/stats?today=03-01-2024").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn completions_and_detail_window() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());

    let (status, body) = get(
        &app,
        "/api/habits/habit-read/completions?startDate=2024-01-02&endDate=2024-01-03",
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "date": "2024-01-02", "completed": true }]));

    let (status, _) = get(&app, "/api/habits/habit-read/completions?startDate=Jan").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 30 days back from 2024-02-01 starts at 2024-01-03
    let (_, detail) = get(&app, "/api/habits/habit-read?today=2024-02-01").await?;
    assert_eq!(detail["title"], "Read");
    assert_eq!(
        detail["completions"],
        json!([{ "date": "2024-01-04", "completed": true }])
    );

    Ok(())
}

#[tokio::test]
async fn patch_keeps_history_and_delete_removes() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/habits/habit-read",
        Some(json!({ "title": "Read 20 pages", "description": "Fiction" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Read 20 pages");
    assert_eq!(body["description"], "Fiction");
    assert_eq!(body["history"]["2024-01-02"], true);
    assert_eq!(body["createdAt"], "2024-01-01T00:00:00Z");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/habits/habit-read",
        Some(json!({ "frequencyCount": 0 })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::DELETE, "/api/habits/habit-read", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = get(&app, "/api/habits/habit-read").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn month_calendar() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());

    let (status, days) = get(&app, "/api/habits/habit-read/calendar?month=2024-01").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(days.as_array().map(Vec::len), Some(31));
    assert_eq!(
        days[0],
        json!({ "date": "2024-01-01", "day": 1, "isCompleted": true, "isToday": false })
    );
    assert!(days[2]["isCompleted"].is_null());
    assert_eq!(days[3]["isToday"], true);

    let (_, days) = get(&app, "/api/habits/habit-read/calendar").await?;
    assert_eq!(days.as_array().map(Vec::len), Some(31));

    let (_, days) = get(&app, "/api/habits/habit-read/calendar?month=2024-02").await?;
    assert_eq!(days.as_array().map(Vec::len), Some(29));

    let (status, _) = get(&app, "/api/habits/habit-read/calendar?month=2024-13").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn daily_and_weekly_progress() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());

    let (status, body) = get(&app, "/api/progress/daily").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total": 2, "completed": 2, "percentage": 100 }));

    let (_, body) = get(&app, "/api/progress/daily?date=2024-01-02").await?;
    assert_eq!(body, json!({ "total": 2, "completed": 1, "percentage": 50 }));

    // before either habit existed
    let (_, body) = get(&app, "/api/progress/daily?date=2023-12-31").await?;
    assert_eq!(body, json!({ "total": 0, "completed": 0, "percentage": 0 }));

    let (status, _) = get(&app, "/api/progress/daily?date=tomorrow").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Mon 50, Tue 50, Wed 0, Thu 100
    let (_, week) = get(&app, "/api/progress/weekly").await?;
    assert_eq!(week["percentage"], 50);
    assert_eq!(week["days"].as_array().map(Vec::len), Some(7));
    assert_eq!(
        week["days"][0],
        json!({ "date": "2024-01-01", "shortName": "Mon", "completion": 50, "isFuture": false })
    );
    assert_eq!(week["days"][3]["completion"], 100);
    assert!(week["days"][4]["completion"].is_null());
    assert_eq!(week["days"][4]["isFuture"], true);

    Ok(())
}

#[tokio::test]
async fn contribution_buckets() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());

    let (status, buckets) = get(
        &app,
        "/api/progress/contribution?granularity=week&length=2",
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(buckets.as_array().map(Vec::len), Some(2));

    assert_eq!(buckets[0]["start"], "2023-12-25");
    assert_eq!(buckets[0]["due"], 0);
    assert_eq!(buckets[0]["level"], 0);
    assert_eq!(buckets[0]["containsToday"], false);

    assert_eq!(buckets[1]["start"], "2024-01-01");
    assert_eq!(buckets[1]["end"], "2024-01-07");
    assert_eq!(buckets[1]["due"], 8);
    assert_eq!(buckets[1]["completed"], 4);
    assert_eq!(buckets[1]["percentage"], 50);
    assert_eq!(buckets[1]["level"], 3);
    assert_eq!(buckets[1]["tooltip"], "Week of Jan 1, 2024: 50% completed");
    assert_eq!(buckets[1]["containsToday"], true);

    let (_, buckets) = get(&app, "/api/progress/contribution").await?;
    assert_eq!(buckets.as_array().map(Vec::len), Some(30));

    let (_, buckets) = get(&app, "/api/progress/contribution?granularity=week").await?;
    assert_eq!(buckets.as_array().map(Vec::len), Some(12));
    assert_eq!(buckets[11]["start"], "2024-01-01");

    let (_, buckets) = get(&app, "/api/progress/contribution?granularity=month").await?;
    assert_eq!(buckets.as_array().map(Vec::len), Some(12));
    assert_eq!(buckets[0]["start"], "2023-02-01");

    let (_, buckets) = get(&app, "/api/progress/contribution?frequency=weekly&length=1").await?;
    assert_eq!(buckets[0]["due"], 0);

    let (status, _) = get(&app, "/api/progress/contribution?length=5000").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/progress/contribution?granularity=year").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn dashboard_summary() -> anyhow::Result<()> {
    let app = create_test_app(seeded_store());

    let (status, body) = get(&app, "/api/dashboard").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "totalHabits": 2,
            "today": { "total": 2, "completed": 2, "percentage": 100 },
            "bestStreak": 2,
            "weeklyPercentage": 50,
        })
    );

    let (_, body) = get(&app, "/api/dashboard?today=2024-01-03").await?;
    assert_eq!(body["today"]["completed"], 0);
    assert_eq!(body["weeklyPercentage"], 33);

    Ok(())
}
