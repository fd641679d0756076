//! Integration tests for inbox messaging.

mod helpers;

use std::collections::HashSet;

use axum::http::StatusCode;
use serde_json::{Value, json};

use gymhub_entity::user::UserRole;

use helpers::{TestApp, TestUser};

async fn send(app: &TestApp, from: &TestUser, to: &TestUser, content: &str) -> Value {
    let response = app
        .request(
            "POST",
            "/api/messages/individual",
            Some(json!({
                "recipient_id": to.id,
                "recipient_type": to.role,
                "content": content,
            })),
            Some(&from.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data().clone()
}

#[tokio::test]
async fn test_individual_send_uses_caller_role() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);
    let trainer = app.user(UserRole::Trainer);

    let message = send(&app, &member, &trainer, "Can we move Friday's session?").await;
    assert_eq!(message["sender_type"], "user");
    assert_eq!(message["recipient_type"], "trainer");
    assert_eq!(message["status"], "sent");
    assert_eq!(message["message_type"], "individual");
}

#[tokio::test]
async fn test_member_to_member_rejected() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);
    let other = app.user(UserRole::User);

    let response = app
        .request(
            "POST",
            "/api/messages/individual",
            Some(json!({ "recipient_id": other.id, "recipient_type": "user", "content": "hi" })),
            Some(&member.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), "RECIPIENT_NOT_ALLOWED");
}

#[tokio::test]
async fn test_mass_send_fans_out() {
    let app = TestApp::new();
    let admin = app.user(UserRole::Admin);
    let members: Vec<TestUser> = (0..3).map(|_| app.user(UserRole::User)).collect();

    let response = app
        .request(
            "POST",
            "/api/messages/mass",
            Some(json!({
                "recipient_type": "user",
                "content": "The pool is closed on Sunday",
                "recipient_ids": members.iter().map(|m| m.id).collect::<Vec<_>>(),
            })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["message_type"], "mass");
    assert_eq!(response.data()["recipient_id"], json!(members[0].id));

    let mut ids = HashSet::new();
    for member in &members {
        let read = app
            .request(
                "POST",
                &format!("/api/messages/conversation/{}/mark-read", admin.id),
                None,
                Some(&member.token),
            )
            .await;
        let messages = read.data().as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["recipient_id"], json!(member.id));
        assert_eq!(messages[0]["mass_recipient_ids"].as_array().unwrap().len(), 3);
        ids.insert(messages[0]["id"].as_str().unwrap().to_string());
    }
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_mass_send_requires_admin() {
    let app = TestApp::new();
    let trainer = app.user(UserRole::Trainer);
    let member = app.user(UserRole::User);

    let response = app
        .request(
            "POST",
            "/api/messages/mass",
            Some(json!({ "recipient_type": "user", "content": "hi", "recipient_ids": [member.id] })),
            Some(&trainer.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_conversation_paging_and_unread() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);
    let trainer = app.user(UserRole::Trainer);

    for i in 0..3 {
        send(&app, &trainer, &member, &format!("Reminder {i}")).await;
        app.clock.advance(chrono::Duration::minutes(1));
    }
    send(&app, &member, &trainer, "Thanks").await;

    let page = app
        .request(
            "GET",
            &format!("/api/messages/conversation/{}?limit=2&offset=0", trainer.id),
            None,
            Some(&member.token),
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    let data = page.data();
    assert_eq!(data["total_messages"], 4);
    assert_eq!(data["unread_count"], 3);
    let messages = data["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "Thanks");

    let bad_limit = app
        .request(
            "GET",
            &format!("/api/messages/conversation/{}?limit=101", trainer.id),
            None,
            Some(&member.token),
        )
        .await;
    assert_eq!(bad_limit.status, StatusCode::BAD_REQUEST);

    let conversations = app
        .request("GET", "/api/messages/conversations", None, Some(&member.token))
        .await;
    let latest = conversations.data().as_array().unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0]["content"], "Thanks");
}

#[tokio::test]
async fn test_update_and_delete_permissions() {
    let app = TestApp::new();
    let member = app.user(UserRole::User);
    let trainer = app.user(UserRole::Trainer);
    let outsider = app.user(UserRole::Trainer);
    let message = send(&app, &member, &trainer, "See you at 9").await;
    let path = format!("/api/messages/{}", message["id"].as_str().unwrap());

    assert_eq!(
        app.request("GET", &path, None, Some(&outsider.token)).await.status,
        StatusCode::FORBIDDEN
    );

    let by_sender = app
        .request("PUT", &path, Some(json!({ "status": "read" })), Some(&member.token))
        .await;
    assert_eq!(by_sender.status, StatusCode::FORBIDDEN);

    let empty = app.request("PUT", &path, Some(json!({})), Some(&trainer.token)).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.code(), "EMPTY_UPDATE");

    let read = app
        .request("PUT", &path, Some(json!({ "status": "read" })), Some(&trainer.token))
        .await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.data()["status"], "read");

    assert_eq!(
        app.request("DELETE", &path, None, Some(&outsider.token)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.request("DELETE", &path, None, Some(&member.token)).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.request("GET", &path, None, Some(&member.token)).await.status,
        StatusCode::NOT_FOUND
    );
}
