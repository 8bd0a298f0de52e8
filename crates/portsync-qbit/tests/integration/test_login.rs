//! Integration tests for the qBittorrent login handshake
//!
//! Verifies the `Ok.` sentinel check, the error classification of failed
//! logins, and that captured cookies authenticate later requests.

use std::time::Duration;

use portsync_core::domain::{ClientError, FetchError};
use portsync_qbit::QbitSession;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common;

#[tokio::test]
async fn test_login_success_captures_cookie() {
    let server = MockServer::start().await;
    common::mount_login(&server).await;

    let mut session = QbitSession::new(&server.uri()).unwrap();
    session.login("admin", "adminadmin").await.expect("login failed");

    assert_eq!(session.cookie_header().as_deref(), Some(common::SID_COOKIE));
}

#[tokio::test]
async fn test_login_with_trailing_slash_base_url() {
    let server = MockServer::start().await;
    common::mount_login(&server).await;

    let mut session = QbitSession::new(&format!("{}/", server.uri())).unwrap();
    session.login("admin", "adminadmin").await.expect("login failed");
}

#[tokio::test]
async fn test_login_wrong_body_is_login_failed() {
    let server = MockServer::start().await;
    common::mount_login(&server).await;

    let mut session = QbitSession::new(&server.uri()).unwrap();
    let err = session.login("admin", "wrong").await.unwrap_err();

    assert_eq!(err, ClientError::LoginFailed);
    assert!(err.is_login_failed());
    assert!(session.cookie_header().is_none());
}

#[tokio::test]
async fn test_login_sentinel_must_match_exactly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "SID=ignored; path=/")
                .set_body_string("Ok.\n"),
        )
        .mount(&server)
        .await;

    let mut session = QbitSession::new(&server.uri()).unwrap();
    let err = session.login("admin", "adminadmin").await.unwrap_err();

    assert_eq!(err, ClientError::LoginFailed);
}

#[tokio::test]
async fn test_login_non_200_is_bad_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Ok."))
        .mount(&server)
        .await;

    let mut session = QbitSession::new(&server.uri()).unwrap();
    let err = session.login("admin", "adminadmin").await.unwrap_err();

    match err {
        ClientError::Fetch(FetchError::BadResponse { code, status }) => {
            assert_eq!(code, 403);
            assert_eq!(status, "403 Forbidden");
        }
        other => panic!("expected bad response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_unreachable_is_transport_error() {
    let mut session = QbitSession::new("http://127.0.0.1:1").unwrap();
    let err = session.login("admin", "adminadmin").await.unwrap_err();

    assert!(matches!(err, ClientError::Fetch(FetchError::Transport(_))));
    assert!(!err.is_login_failed());
}

#[tokio::test]
async fn test_login_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Ok.")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut session = QbitSession::new(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(50));
    let err = session.login("admin", "adminadmin").await.unwrap_err();

    assert!(matches!(err, ClientError::Fetch(FetchError::Transport(_))));
}

#[tokio::test]
async fn test_relogin_replaces_cookies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "SID=first; path=/")
                .set_body_string("Ok."),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "SID=second; path=/")
                .set_body_string("Ok."),
        )
        .with_priority(2)
        .mount(&server)
        .await;

    let mut session = QbitSession::new(&server.uri()).unwrap();
    session.login("admin", "adminadmin").await.unwrap();
    assert_eq!(session.cookie_header().as_deref(), Some("SID=first"));

    session.login("admin", "adminadmin").await.unwrap();
    assert_eq!(session.cookie_header().as_deref(), Some("SID=second"));
}

#[tokio::test]
async fn test_login_drops_cookie_cleared_by_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "SID=abc; path=/")
                .append_header("Set-Cookie", "stale=old; Max-Age=0; path=/")
                .set_body_string("Ok."),
        )
        .mount(&server)
        .await;

    let mut session = QbitSession::new(&server.uri()).unwrap();
    session.login("admin", "adminadmin").await.unwrap();

    assert_eq!(session.cookie_header().as_deref(), Some("SID=abc"));
}

#[tokio::test]
async fn test_relogin_clears_previously_stored_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "stale=old; path=/")
                .set_body_string("Ok."),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "SID=abc; path=/")
                .append_header("Set-Cookie", "stale=old; Max-Age=0; path=/")
                .set_body_string("Ok."),
        )
        .with_priority(2)
        .mount(&server)
        .await;

    let mut session = QbitSession::new(&server.uri()).unwrap();
    session.login("admin", "adminadmin").await.unwrap();
    assert_eq!(session.cookie_header().as_deref(), Some("stale=old"));

    session.login("admin", "adminadmin").await.unwrap();
    assert_eq!(session.cookie_header().as_deref(), Some("SID=abc"));
}

#[tokio::test]
async fn test_cookie_scoped_to_login_path_reaches_other_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header(
                    "Set-Cookie",
                    format!("{}; path=/api/v2/auth", common::SID_COOKIE),
                )
                .set_body_string("Ok."),
        )
        .mount(&server)
        .await;
    common::mount_preferences(&server, serde_json::json!({ "listen_port": 6881 })).await;

    let mut session = QbitSession::new(&server.uri()).unwrap();
    session.login("admin", "adminadmin").await.unwrap();

    let prefs = session.get_preferences().await.expect("cookie must be sent");
    assert_eq!(prefs.listen_port, 6881);
}
