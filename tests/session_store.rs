#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::{json, Value};
use sesame::{
    features::{
        auth::{
            LoginPayload, RegisterPayload, RequestVerifyTokenPayload, ResetPasswordPayload,
            SessionState, SessionStore,
        },
        users::UserUpdatePayload,
    },
    http::{ApiError, AppConfig, HttpClient},
};
use std::{net::TcpListener, time::Duration};
use tokio::sync::watch;
use wiremock::{
    matchers::{body_json, body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn store_for(server: &MockServer) -> SessionStore {
    let http = HttpClient::new(&AppConfig::with_base_url(&server.uri())).unwrap();
    SessionStore::new(http)
}

fn user_json(id: i64, email: &str, is_verified: bool) -> Value {
    json!({
        "id": id,
        "email": email,
        "is_active": true,
        "is_superuser": false,
        "is_verified": is_verified,
        "tg_id": null,
        "created_at": "2024-05-01T10:00:00Z"
    })
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

/// Distinct `is_loading` values seen after subscribing, stopping once the flag drops.
async fn loading_transitions(mut receiver: watch::Receiver<SessionState>) -> Vec<bool> {
    let mut seen = Vec::new();
    while receiver.changed().await.is_ok() {
        let loading = receiver.borrow_and_update().is_loading;
        if seen.last() != Some(&loading) {
            seen.push(loading);
        }
        if !loading {
            break;
        }
    }
    seen
}

#[tokio::test]
async fn invalid_payloads_never_reach_the_network() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let store = store_for(&server);

    let err = store
        .login(&LoginPayload::new("a@b.com", ""))
        .await
        .unwrap_err();
    assert_eq!(
        err.validation().unwrap().field("password"),
        Some("Password is required")
    );

    let err = store
        .register(&RegisterPayload::new("not-an-email", "longenough1"))
        .await
        .unwrap_err();
    assert!(err.validation().unwrap().field("email").is_some());

    let err = store
        .request_verify_token(&RequestVerifyTokenPayload {
            email: String::new(),
        })
        .await
        .unwrap_err();
    assert!(err.validation().is_some());

    let err = store
        .update_current_user(&UserUpdatePayload {
            password: Some("short".to_string()),
            ..UserUpdatePayload::default()
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.validation().unwrap().field("password"),
        Some("Password must be at least 8 characters")
    );

    assert_eq!(request_count(&server).await, 0);
    Ok(())
}

#[tokio::test]
async fn reset_password_rejects_short_password_locally() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store
        .reset_password(&ResetPasswordPayload {
            token: "abc".to_string(),
            password: "ab".to_string(),
        })
        .await
        .unwrap_err();

    assert!(err.validation().unwrap().field("password").is_some());
    assert!(store.error().is_some());
    assert_eq!(request_count(&server).await, 0);
    Ok(())
}

#[tokio::test]
async fn login_with_body_returns_that_user() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/cookie/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=a%40b.com"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "a@b.com", true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "a@b.com", true)))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let user = store.login(&LoginPayload::new("a@b.com", "secret")).await?;

    assert_eq!(user.id, 1);
    assert_eq!(store.user(), Some(user));
    assert!(store.snapshot().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn login_without_body_fetches_current_user_once() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/cookie/login"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("set-cookie", "session=abc123; Path=/; HttpOnly"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(5, "a@b.com", true)))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let user = store.login(&LoginPayload::new("a@b.com", "secret")).await?;

    assert_eq!(user.id, 5);
    assert_eq!(store.user().map(|user| user.id), Some(5));
    Ok(())
}

#[tokio::test]
async fn login_with_empty_or_null_body_fetches_current_user_once() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }

    let replies = [
        ResponseTemplate::new(200),
        ResponseTemplate::new(200).set_body_json(Value::Null),
    ];
    for reply in replies {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/cookie/login"))
            .respond_with(reply)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(3, "a@b.com", true)))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server);
        let user = store.login(&LoginPayload::new("a@b.com", "secret")).await?;

        assert_eq!(user.id, 3);
        assert_eq!(store.user().map(|user| user.id), Some(3));
        server.verify().await;
    }
    Ok(())
}

#[tokio::test]
async fn loading_rises_and_falls_once_per_action() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json(1, "a@b.com", true))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/forgot-password"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "detail": "boom" }))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert!(!store.is_loading());

    let (result, seen) = tokio::join!(
        store.fetch_current_user(),
        loading_transitions(store.subscribe())
    );
    assert!(result.is_ok());
    assert_eq!(seen, vec![true, false]);

    let forgot_payload = sesame::features::auth::ForgotPasswordPayload {
        email: "a@b.com".to_string(),
    };
    let (result, seen) = tokio::join!(
        store.forgot_password(&forgot_payload),
        loading_transitions(store.subscribe())
    );
    assert!(result.is_err());
    assert_eq!(seen, vec![true, false]);
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn abandoned_fetch_lowers_loading() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json(1, "a@b.com", true))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), store.fetch_current_user()).await;

    assert!(timed_out.is_err());
    assert!(!store.is_loading());
    assert!(store.error().is_none());
    assert!(store.user().is_none());
    Ok(())
}

#[tokio::test]
async fn failure_records_error_and_keeps_user() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "detail": "UPDATE_USER_EMAIL_ALREADY_EXISTS" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/cookie/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "LOGIN_BAD_CREDENTIALS" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let before: sesame::features::users::UserRead =
        serde_json::from_value(user_json(1, "old@b.com", true))?;
    store.set_user(Some(before.clone()));

    let err = store
        .update_current_user(&UserUpdatePayload {
            email: Some("taken@b.com".to_string()),
            ..UserUpdatePayload::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "UPDATE_USER_EMAIL_ALREADY_EXISTS");
    assert_eq!(store.error(), Some(err));
    assert_eq!(store.user(), Some(before.clone()));

    let err = store
        .login(&LoginPayload::new("old@b.com", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "LOGIN_BAD_CREDENTIALS");
    assert_eq!(store.user(), Some(before));

    store.reset_error();
    assert!(store.error().is_none());
    Ok(())
}

#[tokio::test]
async fn logout_clears_user() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/cookie/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.set_user(Some(serde_json::from_value(user_json(1, "a@b.com", true))?));

    store.logout().await?;
    assert!(store.user().is_none());

    store.logout().await?;
    assert!(store.user().is_none());
    assert!(store.error().is_none());
    Ok(())
}

#[tokio::test]
async fn update_then_fetch_round_trip() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/users/me"))
        .and(body_json(json!({ "email": "a@b.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "a@b.com", true)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "a@b.com", true)))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let update = UserUpdatePayload {
        email: Some("a@b.com".to_string()),
        ..UserUpdatePayload::default()
    };

    let first = store.update_current_user(&update).await?;
    let second = store.update_current_user(&update).await?;
    assert_eq!(first, second);

    let fetched = store.fetch_current_user().await?;
    assert_eq!(fetched.email, "a@b.com");
    assert_eq!(store.user(), Some(fetched));
    Ok(())
}

#[tokio::test]
async fn register_then_request_verification() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "email": "new@x.com",
            "password": "longenough1",
            "is_active": false,
            "is_superuser": false,
            "is_verified": false,
            "tg_id": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_json(9, "new@x.com", false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/request-verify-token"))
        .and(body_json(json!({ "email": "new@x.com" })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let user = store
        .register(&RegisterPayload::new("new@x.com", "longenough1"))
        .await?;
    assert_eq!(user.email, "new@x.com");
    assert!(!user.is_verified);

    store
        .request_verify_token(&RequestVerifyTokenPayload {
            email: "new@x.com".to_string(),
        })
        .await?;
    assert!(store.error().is_none());
    Ok(())
}

#[tokio::test]
async fn malformed_user_is_a_contract_error() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "x" })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store.fetch_current_user().await.unwrap_err();
    assert!(matches!(err, ApiError::Contract(_)));
    assert!(store.user().is_none());
    Ok(())
}
