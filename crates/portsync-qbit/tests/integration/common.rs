//! Shared test helpers for qBittorrent integration tests
//!
//! Provides wiremock-based mock server setup for WebUI API endpoints.

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portsync_qbit::QbitSession;

pub const SID_COOKIE: &str = "SID=test-session-id";

/// Mounts `POST /api/v2/auth/login` accepting `admin` / `adminadmin`.
///
/// Any other credentials get the `Fails.` body qBittorrent sends on a
/// rejected login.
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("password=adminadmin"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", format!("{SID_COOKIE}; HttpOnly; path=/"))
                .set_body_string("Ok."),
        )
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Fails."))
        .with_priority(2)
        .mount(server)
        .await;
}

/// Mounts `POST /api/v2/app/preferences` returning `preferences` to
/// requests carrying the session cookie, and `403 Forbidden` otherwise.
pub async fn mount_preferences(server: &MockServer, preferences: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/v2/app/preferences"))
        .and(header("cookie", SID_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(preferences))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v2/app/preferences"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .with_priority(2)
        .mount(server)
        .await;
}

/// Mounts `POST /api/v2/app/setPreferences` answering 200 with an empty body.
pub async fn mount_set_preferences(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v2/app/setPreferences"))
        .and(header("cookie", SID_COOKIE))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Starts a mock WebUI and returns a session already logged in to it.
pub async fn logged_in_session(preferences: serde_json::Value) -> (MockServer, QbitSession) {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_preferences(&server, preferences).await;
    mount_set_preferences(&server).await;

    let mut session = QbitSession::new(&server.uri()).expect("valid mock server url");
    session
        .login("admin", "adminadmin")
        .await
        .expect("login against mock server");

    (server, session)
}
