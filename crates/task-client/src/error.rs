//! Errors surfaced by the gateway and the task client

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("{method} {url} failed with status {status}")]
    Status {
        method: reqwest::Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A payload could not be encoded, or a response body did not have the expected shape
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Rejected locally before anything was sent
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// HTTP status of a server-side failure
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Human-readable message from the server body, if it carries one
    ///
    /// Understands `{"detail": "..."}` and field error maps such as
    /// `{"email": ["already taken"]}` (first message wins).
    pub fn detail(&self) -> Option<String> {
        let ApiError::Status { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return Some(detail.to_string());
        }
        value.as_object()?.values().find_map(|field| match field {
            serde_json::Value::String(message) => Some(message.clone()),
            serde_json::Value::Array(messages) => {
                messages.first().and_then(|m| m.as_str()).map(str::to_string)
            }
            _ => None,
        })
    }

    pub(crate) async fn from_response(method: reqwest::Method, response: reqwest::Response) -> Self {
        let status = response.status();
        let url = response.url().to_string();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::debug!("Failed to read error body from {}: {}", url, e);
                String::new()
            }
        };
        ApiError::Status {
            method,
            url,
            status,
            body,
        }
    }
}
