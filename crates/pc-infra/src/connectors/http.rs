use std::time::Duration;

use anyhow::Context;
use pc_core::ports::ConnectorError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const FUNCTIONS_PATH: &str = "functions/v1";
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct EdgeFunctionConfig {
    pub base_url: String,
    /// Sent as a bearer token when non-empty.
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EdgeCallError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        field: Option<String>,
        message: String,
    },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for EdgeCallError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            EdgeCallError::Timeout
        } else if error.is_decode() {
            EdgeCallError::Decode(error.to_string())
        } else {
            EdgeCallError::Transport(error.to_string())
        }
    }
}

impl From<EdgeCallError> for ConnectorError {
    fn from(error: EdgeCallError) -> Self {
        match error {
            EdgeCallError::Status { status, message, .. }
                if (400..500).contains(&status) && status != 408 && status != 429 =>
            {
                ConnectorError::Rejected(message)
            }
            EdgeCallError::Decode(message) => ConnectorError::Rejected(message),
            other => ConnectorError::Unavailable(other.to_string()),
        }
    }
}

/// Error body shape used by the edge functions.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    field: Option<String>,
}

/// Response of the functions that hand out a redirect.
#[derive(Debug, Deserialize)]
pub(crate) struct RedirectResponse {
    pub url: Option<String>,
}

impl RedirectResponse {
    /// The redirect URL, if it is an absolute http(s) URL.
    pub(crate) fn into_redirect_url(self) -> Result<String, ConnectorError> {
        let raw = self
            .url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConnectorError::Rejected("response did not contain a url".into()))?;
        match url::Url::parse(&raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(raw),
            Ok(parsed) => Err(ConnectorError::Rejected(format!(
                "redirect url has unsupported scheme `{}`",
                parsed.scheme()
            ))),
            Err(err) => Err(ConnectorError::Rejected(format!(
                "redirect url is not valid: {err}"
            ))),
        }
    }
}

/// JSON client for `{base_url}/functions/v1/<name>`.
pub struct EdgeFunctionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl EdgeFunctionClient {
    pub fn new(config: EdgeFunctionConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("build HTTP client failed")?;
        let api_key = Some(config.api_key.trim().to_string()).filter(|key| !key.is_empty());

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn function_url(&self, function: &str) -> String {
        format!("{}/{}/{}", self.base_url, FUNCTIONS_PATH, function)
    }

    pub async fn post_json<B, R>(&self, function: &str, body: &B) -> Result<R, EdgeCallError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.function_url(function);
        let mut request = self.http.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|err| {
            warn!(function, error = %err, "edge function request failed");
            EdgeCallError::from(err)
        })?;
        let status = response.status();
        debug!(function, status = status.as_u16(), "edge function responded");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        response.json::<R>().await.map_err(EdgeCallError::from)
    }
}

fn status_error(status: StatusCode, text: &str) -> EdgeCallError {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
    let message = body
        .error
        .or(body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
            }
        });
    EdgeCallError::Status {
        status: status.as_u16(),
        field: body.field,
        message,
    }
}
