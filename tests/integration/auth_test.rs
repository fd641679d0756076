//! Integration tests for account flows and bearer authentication.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use gymhub_entity::user::UserRole;

use helpers::TestApp;

fn registration() -> serde_json::Value {
    json!({
        "email": "lena@example.com",
        "password": "S3cret-pass",
        "name": "Lena Ortiz",
        "givenName": "Lena",
        "surname": "Ortiz",
        "city": "Valencia",
        "cusBirthday": "1994-05-02",
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"], "memory");
}

#[tokio::test]
async fn test_register_then_verify_otp() {
    let app = TestApp::new();

    let started = app
        .request("POST", "/api/auth/register", Some(registration()), None)
        .await;
    assert_eq!(started.status, StatusCode::OK, "{:?}", started.body);
    assert_eq!(started.data()["continuation_token"], "ct-signup");
    {
        let sign_ups = app.identity.sign_ups.lock().unwrap();
        assert_eq!(sign_ups.len(), 1);
        assert_eq!(sign_ups[0].role, UserRole::User);
        assert_eq!(sign_ups[0].birthday.as_deref(), Some("1994-05-02"));
    }

    let verified = app
        .request(
            "POST",
            "/api/auth/verify-otp",
            Some(json!({
                "email": "lena@example.com",
                "password": "S3cret-pass",
                "otp": "123456",
                "continuation_token": "ct-signup",
            })),
            None,
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK);
    assert_eq!(verified.data()["access_token"], "signed-up");

    let wrong_code = app
        .request(
            "POST",
            "/api/auth/verify-otp",
            Some(json!({
                "email": "lena@example.com",
                "password": "S3cret-pass",
                "otp": "000000",
                "continuation_token": "ct-signup",
            })),
            None,
        )
        .await;
    assert_eq!(wrong_code.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let app = TestApp::new();
    let mut body = registration();
    body["email"] = json!("lena-at-example");

    let response = app.request("POST", "/api/auth/register", Some(body), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_admin_create_user_requires_admin() {
    let app = TestApp::new();
    let trainer = app.user(UserRole::Trainer);
    let admin = app.user(UserRole::Admin);
    let mut body = registration();
    body["role"] = json!("trainer");

    let forbidden = app
        .request("POST", "/api/auth/admin/create-user", Some(body.clone()), Some(&trainer.token))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let created = app
        .request("POST", "/api/auth/admin/create-user", Some(body), Some(&admin.token))
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    assert_eq!(app.identity.sign_ups.lock().unwrap()[0].role, UserRole::Trainer);
}

#[tokio::test]
async fn test_login_json_and_form() {
    let app = TestApp::new();

    let ok = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "lena@example.com", "password": "S3cret-pass" })),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.data()["refresh_token"], "refresh-token");

    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "lena@example.com", "password": "nope" })),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let form = app
        .form("/api/auth/token", "username=lena%40example.com&password=S3cret-pass")
        .await;
    assert_eq!(form.status, StatusCode::OK);
    assert_eq!(form.data()["access_token"], "signed-in");
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = TestApp::new();

    let started = app
        .request(
            "POST",
            "/api/auth/password-reset",
            Some(json!({ "email": "lena@example.com" })),
            None,
        )
        .await;
    assert_eq!(started.status, StatusCode::OK);
    assert_eq!(started.data()["challenge_type"], "oob");
    assert_eq!(started.data()["code_length"], 8);

    let done = app
        .request(
            "POST",
            "/api/auth/password-reset/verify",
            Some(json!({
                "email": "lena@example.com",
                "otp": "12345678",
                "new_password": "N3w-passw0rd",
                "continuation_token": "ct-reset",
            })),
            None,
        )
        .await;
    assert_eq!(done.status, StatusCode::OK);
    assert_eq!(done.data()["status"], "success");

    let unknown = app
        .request(
            "POST",
            "/api/auth/password-reset",
            Some(json!({ "email": "ghost@example.com" })),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_refresh_submit_otp_and_logout() {
    let app = TestApp::new();

    let refreshed = app
        .request(
            "POST",
            "/api/auth/refreshtoken",
            Some(json!({ "refresh_token": "refresh-token" })),
            None,
        )
        .await;
    assert_eq!(refreshed.data()["access_token"], "refreshed");

    let expired = app
        .request(
            "POST",
            "/api/auth/refreshtoken",
            Some(json!({ "refresh_token": "stale" })),
            None,
        )
        .await;
    assert_eq!(expired.status, StatusCode::UNAUTHORIZED);

    let otp = app
        .request(
            "POST",
            "/api/auth/submit-otp",
            Some(json!({ "otp_code": "123456", "continuation_token": "ct" })),
            None,
        )
        .await;
    assert_eq!(otp.data()["message"], "OTP verified successfully");

    let logout = app.request("POST", "/api/auth/logout", None, None).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.data()["message"], "Successfully logged out");
}

#[tokio::test]
async fn test_me_reflects_token() {
    let app = TestApp::new();
    let trainer = app.user(UserRole::Trainer);

    let me = app.request("GET", "/api/auth/me", None, Some(&trainer.token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["id"], json!(trainer.id));
    assert_eq!(me.data()["role"], "trainer");
    assert_eq!(me.data()["name"], "Test Person");

    let anonymous = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["error"], "UNAUTHORIZED");
}
