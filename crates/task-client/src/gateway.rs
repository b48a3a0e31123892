//! Session-aware API gateway
//!
//! Every outbound call goes through [`ApiGateway::execute`], which
//!
//! 1. attaches `Authorization: Bearer <access_token>` when a token is stored
//!    (falling back to the default authorization set by the last refresh),
//! 2. on a `401 Unauthorized` exchanges the refresh token for a new access
//!    token and re-issues the request once,
//! 3. tears the session down when the refresh is impossible, while still
//!    returning the original failure to the caller.
//!
//! ```text
//!  execute(request) ──► send ──► 2xx ─────────────────────────► Ok(response)
//!                        │
//!                        ├─► 401, first attempt ─► refresh ─ ok ─► send again
//!                        │                           │
//!                        │                           └─ err ─► end_session, Err(401)
//!                        └─► other status / second 401 ─────────► Err(status)
//! ```
//!
//! Session changes are published on a `tokio::sync::watch` channel so the
//! front end can send the user back to the login screen.

use crate::error::ApiError;
use crate::types::{RefreshRequest, RefreshedAccess, TokenPair};
use anyhow::Context;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use task_config::CredentialStore;
use tokio::sync::watch;

/// Token refresh endpoint, relative to the base URL
pub const REFRESH_PATH: &str = "/auth/token/refresh/";

/// Latest authentication state as seen by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// No credentials stored
    Anonymous,
    /// Credentials stored by a login (or found at startup)
    Authenticated,
    /// The access token was silently renewed
    Refreshed,
    /// Credentials were cleared; the user has to log in again
    LoginRequired,
}

/// A replayable description of one API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn post<T: Serialize + ?Sized>(path: impl Into<String>, body: &T) -> Result<Self, ApiError> {
        Self::new(Method::POST, path).with_json(body)
    }

    pub fn patch<T: Serialize + ?Sized>(
        path: impl Into<String>,
        body: &T,
    ) -> Result<Self, ApiError> {
        Self::new(Method::PATCH, path).with_json(body)
    }

    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

struct GatewayInner {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
    /// Authorization used when no access token is stored
    default_authorization: RwLock<Option<String>>,
    session: watch::Sender<SessionEvent>,
}

/// Shared entry point for all API calls
///
/// Cloning is cheap; all clones share credentials, the default authorization
/// and the session channel.
#[derive(Clone)]
pub struct ApiGateway {
    inner: Arc<GatewayInner>,
}

impl fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.session_state())
            .finish_non_exhaustive()
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

impl ApiGateway {
    pub fn new(base_url: impl Into<String>, credentials: CredentialStore) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, credentials)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        credentials: CredentialStore,
    ) -> Self {
        let initial = if credentials.has_session() {
            SessionEvent::Authenticated
        } else {
            SessionEvent::Anonymous
        };
        let (session, _) = watch::channel(initial);
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            inner: Arc::new(GatewayInner {
                http,
                base_url,
                credentials,
                default_authorization: RwLock::new(None),
                session,
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Observe session changes (refresh, forced logout)
    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.inner.session.subscribe()
    }

    pub fn session_state(&self) -> SessionEvent {
        *self.inner.session.borrow()
    }

    /// Authorization header applied when no access token is stored
    pub fn default_authorization(&self) -> Option<String> {
        self.inner
            .default_authorization
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_default_authorization(&self, value: Option<String>) {
        *self
            .inner
            .default_authorization
            .write()
            .unwrap_or_else(PoisonError::into_inner) = value;
    }

    fn publish(&self, event: SessionEvent) {
        self.inner.session.send_replace(event);
    }

    /// Persist a freshly issued credential pair
    pub fn start_session(&self, tokens: &TokenPair) {
        self.inner
            .credentials
            .store_tokens(&tokens.access, &tokens.refresh);
        self.set_default_authorization(None);
        self.publish(SessionEvent::Authenticated);
        log::info!("Session started");
    }

    /// Drop all credentials and ask the user to log in again
    pub fn end_session(&self) {
        self.inner.credentials.clear();
        self.set_default_authorization(None);
        self.publish(SessionEvent::LoginRequired);
        log::info!("Session ended, login required");
    }

    /// Execute a request, refreshing the access token at most once
    pub async fn execute(&self, request: &ApiRequest) -> Result<reqwest::Response, ApiError> {
        let mut retried = false;

        loop {
            let response = self.send_once(request).await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let error = ApiError::from_response(request.method.clone(), response).await;
            if status != StatusCode::UNAUTHORIZED || retried {
                log::debug!("{} {} failed: {}", request.method, request.path, status);
                return Err(error);
            }

            retried = true;
            if let Err(e) = self.refresh_access_token().await {
                log::warn!("Token refresh failed: {:#}", e);
                self.end_session();
                return Err(error);
            }
            log::debug!(
                "Retrying {} {} with refreshed credentials",
                request.method,
                request.path
            );
        }
    }

    /// Execute a request and decode its JSON body
    pub async fn json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute a request whose body is of no interest
    pub async fn send(&self, request: &ApiRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<reqwest::Response, ApiError> {
        let url = self.url(&request.path);
        let mut builder = self.inner.http.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(authorization) = self.authorization() {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        log::debug!("{} {}", request.method, url);
        Ok(builder.send().await?)
    }

    fn authorization(&self) -> Option<String> {
        self.inner
            .credentials
            .access_token()
            .map(|token| bearer(&token))
            .or_else(|| self.default_authorization())
    }

    /// Exchange the stored refresh token for a new access token
    ///
    /// The refresh call itself is sent without credentials. On success the
    /// new token is stored and becomes the default authorization.
    pub async fn refresh_access_token(&self) -> anyhow::Result<()> {
        let refresh = self
            .inner
            .credentials
            .refresh_token()
            .context("no refresh token stored")?;

        let response = self
            .inner
            .http
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await
            .context("token refresh request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("token refresh rejected with status {}", status);
        }

        let RefreshedAccess { access } = response
            .json::<RefreshedAccess>()
            .await
            .context("token refresh returned an invalid body")?;

        self.inner.credentials.set_access_token(&access);
        self.set_default_authorization(Some(bearer(&access)));
        self.publish(SessionEvent::Refreshed);
        log::info!("Access token refreshed");
        Ok(())
    }
}
