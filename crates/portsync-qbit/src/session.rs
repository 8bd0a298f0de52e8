//! qBittorrent WebUI session
//!
//! Provides a typed HTTP client for the qBittorrent WebUI API. Handles the
//! login handshake and keeps the session cookies in a jar owned by the
//! session value, which the HTTP client consults on every request.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use portsync_core::ports::IControlSession;
//! use portsync_qbit::QbitSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = QbitSession::new("http://localhost:8080")?;
//! session.login("admin", "adminadmin").await?;
//! let prefs = session.get_preferences().await?;
//! println!("listening on {}", prefs.listen_port);
//! # Ok(())
//! # }
//! ```

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use portsync_core::{
    config::QbitConfig,
    domain::{ClientError, FetchError, Preferences},
    ports::IControlSession,
};
use reqwest::{
    cookie::{CookieStore, Jar},
    Client, RequestBuilder, Response, StatusCode,
};
use tracing::{debug, info};
use url::Url;

use crate::{API_PREFIX, DEFAULT_TIMEOUT, LOGIN_OK_BODY};

// ============================================================================
// QbitSession
// ============================================================================

/// Authenticated session with a qBittorrent WebUI
///
/// The cookie jar is owned by this value; nothing is shared between
/// sessions.
pub struct QbitSession {
    /// The underlying HTTP client, reading and filling `jar`
    client: Client,
    /// API base URL, always ending in `api/v2/`
    api_url: Url,
    /// Per-request timeout
    timeout: Duration,
    /// Cookies set by the WebUI
    jar: Arc<Jar>,
}

impl QbitSession {
    /// Creates an unauthenticated session for the WebUI at `base_url`
    ///
    /// # Arguments
    /// * `base_url` - WebUI address, e.g. `http://localhost:8080`, with or
    ///   without a trailing slash
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let api_url = api_url(base_url)?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| FetchError::transport(&e))?;

        Ok(Self {
            client,
            api_url,
            timeout: DEFAULT_TIMEOUT,
            jar,
        })
    }

    /// Creates an unauthenticated session from the qBittorrent configuration
    pub fn from_config(config: &QbitConfig) -> Result<Self, ClientError> {
        let base_url = format!("http://{}:{}", config.host, config.port);
        Ok(Self::new(&base_url)?.with_timeout(config.request_timeout()))
    }

    /// Overrides the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API base URL (ending in `api/v2/`)
    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the `Cookie` header value sent with API requests, if any
    pub fn cookie_header(&self) -> Option<String> {
        let url = self.api_url.join("app/preferences").ok()?;
        self.jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(str::to_owned))
    }

    /// Builds a POST request for `endpoint` with the session timeout
    ///
    /// The client attaches the session cookies when the request is sent.
    ///
    /// # Arguments
    /// * `endpoint` - API path relative to `api/v2/`, e.g. `app/preferences`
    pub fn request(&self, endpoint: &str) -> Result<RequestBuilder, ClientError> {
        let url = self
            .api_url
            .join(endpoint)
            .map_err(|e| ClientError::InvalidUrl(format!("{endpoint}: {e}")))?;

        Ok(self.client.post(url).timeout(self.timeout))
    }

    /// Sends a form-encoded POST and requires `200 OK`
    async fn post_form(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
    ) -> Result<Response, ClientError> {
        let mut builder = self.request(endpoint)?;
        if !form.is_empty() {
            builder = builder.form(form);
        }

        let response = builder.send().await.map_err(|e| FetchError::transport(&e))?;
        Ok(ensure_ok(response)?)
    }

    /// Logs in and stores the session cookies
    ///
    /// Cookies from a successful login are stored again with `Path=/` on the
    /// WebUI host, so they reach every endpoint whatever path the server
    /// scoped them to.
    ///
    /// # Errors
    /// - [`ClientError::LoginFailed`] when the server answers 200 with any
    ///   body other than `Ok.`
    /// - [`FetchError::BadResponse`] for any other status
    /// - [`FetchError::Transport`] when the request fails or times out
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        debug!(url = %self.api_url, username, "Logging in to qBittorrent");

        let response = self
            .post_form(
                "auth/login",
                &[("username", username), ("password", password)],
            )
            .await?;

        let now = SystemTime::now();
        let live: Vec<String> = response
            .cookies()
            .filter(|cookie| {
                cookie.max_age() != Some(Duration::ZERO)
                    && cookie.expires().map_or(true, |expires| expires > now)
            })
            .map(|cookie| format!("{}={}; Path=/", cookie.name(), cookie.value()))
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(&e))?;
        if body != LOGIN_OK_BODY {
            return Err(ClientError::LoginFailed);
        }

        let mut host_url = self.api_url.clone();
        host_url.set_path("/");
        for cookie in &live {
            self.jar.add_cookie_str(cookie, &host_url);
        }
        debug!(count = live.len(), "Stored session cookies");

        info!("Logged in to qBittorrent");
        Ok(())
    }

    /// Retrieves the application preferences
    pub async fn get_preferences(&self) -> Result<Preferences, ClientError> {
        let response = self.post_form("app/preferences", &[]).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(&e))?;
        let preferences: Preferences = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Decode(format!("preferences: {e}")))?;

        debug!(
            listen_port = preferences.listen_port,
            random_port = preferences.random_port,
            "Fetched qBittorrent preferences"
        );
        Ok(preferences)
    }

    /// Writes the application preferences
    ///
    /// The response body is not inspected.
    pub async fn set_preferences(&self, preferences: &Preferences) -> Result<(), ClientError> {
        let json = serde_json::to_string(preferences)
            .map_err(|e| ClientError::Encode(format!("preferences: {e}")))?;

        let response = self
            .post_form("app/setPreferences", &[("json", json.as_str())])
            .await?;
        if let Err(e) = response.bytes().await {
            debug!(error = %e, "Ignoring unreadable setPreferences response body");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IControlSession for QbitSession {
    async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        QbitSession::login(self, username, password).await
    }

    async fn get_preferences(&self) -> Result<Preferences, ClientError> {
        QbitSession::get_preferences(self).await
    }

    async fn set_preferences(&self, preferences: &Preferences) -> Result<(), ClientError> {
        QbitSession::set_preferences(self, preferences).await
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Appends `api/v2/` to `base_url` exactly once
fn api_url(base_url: &str) -> Result<Url, ClientError> {
    let mut url =
        Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(format!(
            "{base_url}: scheme must be http or https"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.join(API_PREFIX)
        .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))
}

/// Maps any status other than `200 OK` to [`FetchError::BadResponse`]
fn ensure_ok(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::BadResponse {
            code: status.as_u16(),
            status: status.to_string(),
        });
    }
    Ok(response)
}
