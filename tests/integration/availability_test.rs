//! Integration tests for trainer availability endpoints.

mod helpers;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Value, json};

use gymhub_core::types::id::CenterId;
use gymhub_entity::user::UserRole;

use helpers::{TestApp, TestUser, fixed_now};

fn weekly_body(trainer: &TestUser, center: CenterId, start: DateTime<Utc>) -> Value {
    json!({
        "trainer_id": trainer.id,
        "center_id": center,
        "recurrence_type": "weekly",
        "schedule": [
            {
                "day_of_week": 0,
                "time_slots": [
                    { "start_time": "09:00:00", "end_time": "10:00:00" },
                    { "start_time": "10:00:00", "end_time": "11:00:00" }
                ]
            },
            {
                "day_of_week": 3,
                "time_slots": [{ "start_time": "17:30:00", "end_time": "19:00:00" }]
            }
        ],
        "start_date": start,
    })
}

fn ts(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[tokio::test]
async fn test_create_and_fetch_round_trip() {
    let app = TestApp::new();
    let trainer = app.user(UserRole::Trainer);
    let center = CenterId::new();
    let start = fixed_now() + Duration::days(1) + Duration::seconds(15);

    let created = app
        .request(
            "POST",
            "/api/availabilities",
            Some(weekly_body(&trainer, center, start)),
            Some(&trainer.token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let id = created.data()["id"].as_str().unwrap().to_string();

    let fetched = app
        .request("GET", &format!("/api/availabilities/{id}"), None, Some(&trainer.token))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    let data = fetched.data();
    let stored_start: DateTime<Utc> = serde_json::from_value(data["start_date"].clone()).unwrap();
    assert_eq!(stored_start, start);
    assert_eq!(data["schedule"][0]["time_slots"][1]["start_time"], "10:00:00");
    assert_eq!(data["schedule"][1]["day_of_week"], 3);

    let by_trainer = app
        .request(
            "GET",
            &format!("/api/availabilities/trainer/{}", trainer.id),
            None,
            Some(&trainer.token),
        )
        .await;
    assert_eq!(by_trainer.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_overlapping_slots_rejected() {
    let app = TestApp::new();
    let trainer = app.user(UserRole::Trainer);
    let mut body = weekly_body(&trainer, CenterId::new(), fixed_now() + Duration::days(1));
    body["schedule"][0]["time_slots"][1]["start_time"] = json!("09:30:00");

    let response = app
        .request("POST", "/api/availabilities", Some(body), Some(&trainer.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), "TIME_SLOT_OVERLAP");
}

#[tokio::test]
async fn test_one_time_schedule_with_weekday_rejected() {
    let app = TestApp::new();
    let trainer = app.user(UserRole::Trainer);
    let mut body = weekly_body(&trainer, CenterId::new(), fixed_now() + Duration::days(1));
    body["recurrence_type"] = json!("one_time");

    let response = app
        .request("POST", "/api/availabilities", Some(body), Some(&trainer.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), "SCHEDULE_MISMATCH");
}

#[tokio::test]
async fn test_creation_permissions() {
    let app = TestApp::new();
    let trainer = app.user(UserRole::Trainer);
    let other_trainer = app.user(UserRole::Trainer);
    let member = app.user(UserRole::User);
    let admin = app.user(UserRole::Admin);
    let body = weekly_body(&trainer, CenterId::new(), fixed_now() + Duration::days(1));

    for caller in [&other_trainer, &member] {
        let response = app
            .request("POST", "/api/availabilities", Some(body.clone()), Some(&caller.token))
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
    }

    let response = app
        .request("POST", "/api/availabilities", Some(body), Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_and_delete_by_owner_only() {
    let app = TestApp::new();
    let trainer = app.user(UserRole::Trainer);
    let other_trainer = app.user(UserRole::Trainer);
    let created = app
        .request(
            "POST",
            "/api/availabilities",
            Some(weekly_body(&trainer, CenterId::new(), fixed_now() + Duration::days(7))),
            Some(&trainer.token),
        )
        .await;
    let path = format!("/api/availabilities/{}", created.data()["id"].as_str().unwrap());
    let update = json!({
        "schedule": [{ "day_of_week": 4, "time_slots": [{ "start_time": "06:00:00", "end_time": "07:00:00" }] }]
    });

    let forbidden = app
        .request("PUT", &path, Some(update.clone()), Some(&other_trainer.token))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let updated = app.request("PUT", &path, Some(update), Some(&trainer.token)).await;
    assert_eq!(updated.status, StatusCode::OK, "{:?}", updated.body);
    assert_eq!(updated.data()["schedule"].as_array().unwrap().len(), 1);

    assert_eq!(
        app.request("DELETE", &path, None, Some(&other_trainer.token)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.request("DELETE", &path, None, Some(&trainer.token)).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.request("DELETE", &path, None, Some(&trainer.token)).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_center_listing_includes_open_ended() {
    let app = TestApp::new();
    let trainer = app.user(UserRole::Trainer);
    let center = CenterId::new();

    let open_ended = app
        .request(
            "POST",
            "/api/availabilities",
            Some(weekly_body(&trainer, center, fixed_now() + Duration::days(1))),
            Some(&trainer.token),
        )
        .await;
    let mut bounded = weekly_body(&trainer, center, fixed_now() + Duration::days(1));
    bounded["end_date"] = json!(fixed_now() + Duration::days(5));
    app.request("POST", "/api/availabilities", Some(bounded), Some(&trainer.token))
        .await;

    // No bearer token needed.
    let response = app
        .request(
            "GET",
            &format!(
                "/api/availabilities/center/{center}?start_date={}&end_date={}",
                ts(fixed_now() + Duration::days(10)),
                ts(fixed_now() + Duration::days(20)),
            ),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let found = response.data().as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], open_ended.data()["id"]);
}
