//! Integration tests for the booking lifecycle over HTTP.

mod helpers;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

use gymhub_core::types::id::CenterId;
use gymhub_entity::user::UserRole;

use helpers::{TestApp, TestUser, fixed_now};

fn booking_body(member: &TestUser, trainer: &TestUser, start: DateTime<Utc>) -> Value {
    json!({
        "user_id": member.id,
        "trainer_id": trainer.id,
        "center_id": CenterId::new(),
        "start_time": start,
        "end_time": start + Duration::hours(1),
        "message": "Leg day",
    })
}

async fn create(app: &TestApp, member: &TestUser, trainer: &TestUser, start: DateTime<Utc>) -> Value {
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(member, trainer, start)),
            Some(&member.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data().clone()
}

#[tokio::test]
async fn test_create_update_then_cancel_too_late() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);
    let trainer = app.user(UserRole::Trainer);
    let start = fixed_now() + Duration::days(3);

    let booking = create(&app, &member, &trainer, start).await;
    assert_eq!(booking["status"], "booked");
    let id = booking["id"].as_str().unwrap().to_string();

    let new_start = start + Duration::hours(2);
    let response = app
        .request(
            "PUT",
            &format!("/api/bookings/{id}"),
            Some(json!({ "start_time": new_start, "end_time": new_start + Duration::hours(1) })),
            Some(&member.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let changes = response.data()["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0]["change_type"], "modification");

    app.clock.set(new_start - Duration::hours(1));
    let response = app
        .request("POST", &format!("/api/bookings/{id}/cancel"), None, Some(&member.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(response.code(), "MODIFICATION_WINDOW_VIOLATION");
}

#[tokio::test]
async fn test_message_only_update_records_stored_times() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);
    let trainer = app.user(UserRole::Trainer);

    let booking = create(&app, &member, &trainer, fixed_now() + Duration::days(3)).await;
    let id = booking["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/bookings/{id}"),
            Some(json!({ "message": "new msg" })),
            Some(&member.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let updated = response.data();
    assert_eq!(updated["message"], "new msg");
    assert_eq!(updated["start_time"], booking["start_time"]);
    let changes = updated["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0]["change_type"], "modification");
    assert_eq!(changes[0]["previous_start_time"], booking["start_time"]);
    assert_eq!(changes[0]["previous_end_time"], booking["end_time"]);
}

#[tokio::test]
async fn test_lead_time_boundary() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);
    let trainer = app.user(UserRole::Trainer);

    let too_soon = fixed_now() + Duration::hours(2) - Duration::seconds(1);
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&member, &trainer, too_soon)),
            Some(&member.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), "LEAD_TIME_VIOLATION");

    let just_enough = fixed_now() + Duration::hours(2) + Duration::seconds(1);
    create(&app, &member, &trainer, just_enough).await;
}

#[tokio::test]
async fn test_cancel_twice_is_rejected() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);
    let trainer = app.user(UserRole::Trainer);
    let booking = create(&app, &member, &trainer, fixed_now() + Duration::days(5)).await;
    let path = format!("/api/bookings/{}/cancel", booking["id"].as_str().unwrap());

    let first = app.request("POST", &path, None, Some(&member.token)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.data()["status"], "cancelled");

    let second = app.request("POST", &path, None, Some(&member.token)).await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.code(), "ALREADY_CANCELLED");
}

#[tokio::test]
async fn test_access_rules() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);
    let trainer = app.user(UserRole::Trainer);
    let stranger = app.user(UserRole::User);
    let admin = app.user(UserRole::Admin);
    let booking = create(&app, &member, &trainer, fixed_now() + Duration::days(2)).await;
    let path = format!("/api/bookings/{}", booking["id"].as_str().unwrap());

    // Booking on someone else's behalf.
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&member, &trainer, fixed_now() + Duration::days(2))),
            Some(&stranger.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    assert_eq!(app.request("GET", &path, None, Some(&member.token)).await.status, StatusCode::OK);
    assert_eq!(app.request("GET", &path, None, Some(&trainer.token)).await.status, StatusCode::OK);
    assert_eq!(app.request("GET", &path, None, Some(&admin.token)).await.status, StatusCode::OK);
    assert_eq!(
        app.request("GET", &path, None, Some(&stranger.token)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(app.request("GET", &path, None, None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.request("GET", &path, None, Some("not-a-jwt")).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_missing_and_malformed_ids() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);

    let missing = app
        .request(
            "GET",
            &format!("/api/bookings/{}", uuid::Uuid::now_v7()),
            None,
            Some(&member.token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["error"], "NOT_FOUND");

    let malformed = app
        .request("GET", "/api/bookings/not-an-id", None, Some(&member.token))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_future_and_past_lists() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);
    let trainer = app.user(UserRole::Trainer);
    let early = create(&app, &member, &trainer, fixed_now() + Duration::days(1)).await;
    let late = create(&app, &member, &trainer, fixed_now() + Duration::days(4)).await;

    app.clock.set(fixed_now() + Duration::days(2));

    let future = app
        .request(
            "GET",
            &format!("/api/bookings/users/{}/future", member.id),
            None,
            Some(&member.token),
        )
        .await;
    assert_eq!(future.status, StatusCode::OK);
    let ids: Vec<&Value> = future.data().as_array().unwrap().iter().map(|b| &b["id"]).collect();
    assert_eq!(ids, vec![&late["id"]]);

    let past = app
        .request(
            "GET",
            &format!("/api/bookings/users/{}/past", member.id),
            None,
            Some(&member.token),
        )
        .await;
    let ids: Vec<&Value> = past.data().as_array().unwrap().iter().map(|b| &b["id"]).collect();
    assert_eq!(ids, vec![&early["id"]]);

    let other = app.user(UserRole::Trainer);
    let forbidden = app
        .request(
            "GET",
            &format!("/api/bookings/users/{}/future", member.id),
            None,
            Some(&other.token),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
}
