//! Chat-completions transport
//!
//! One shared `reqwest` client per capability. Calls are bounded by a
//! semaphore and spaced by a minimum interval so a brainstorm batch cannot
//! burst past the account's requests-per-minute budget.

use super::types::ApiError;
use crate::providers::{invalid_response, rate_limited, request_failed};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use roast_core::{RoastError, RoastResult};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const PROVIDER: &str = "openai";
const MIN_SPACING_MS: u64 = 10;

/// Enforces a gap between consecutive request starts.
#[derive(Debug)]
struct Pacer {
    spacing: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl Pacer {
    fn per_minute(rpm: u32) -> Self {
        let spacing_ms = (60_000 / u64::from(rpm)).max(MIN_SPACING_MS);
        Self {
            spacing: Duration::from_millis(spacing_ms),
            last_start: Mutex::new(None),
        }
    }

    /// Wait until the next request may start. The first request never waits.
    async fn wait_turn(&self) {
        let mut last_start = self.last_start.lock().await;
        if let Some(previous) = *last_start {
            let ready_at = previous + self.spacing;
            let now = Instant::now();
            if ready_at > now {
                tokio::time::sleep(ready_at - now).await;
            }
        }
        *last_start = Some(Instant::now());
    }
}

pub struct OpenAIClient {
    http: Client,
    api_key: String,
    base_url: String,
    in_flight: Semaphore,
    pacer: Pacer,
}

impl OpenAIClient {
    /// `requests_per_minute` caps concurrent calls and sets the spacing.
    pub fn new(api_key: impl Into<String>, requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1);
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            in_flight: Semaphore::new(rpm as usize),
            pacer: Pacer::per_minute(rpm),
        }
    }

    /// Target an OpenAI-compatible endpoint instead of the hosted API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` as JSON to `endpoint` and decode the reply.
    pub async fn request<Req: Serialize, Res: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Req,
    ) -> RoastResult<Res> {
        let _slot = self
            .in_flight
            .acquire()
            .await
            .map_err(|e| request_failed(PROVIDER, 0, format!("client closed: {}", e)))?;
        self.pacer.wait_turn().await;

        let response = self
            .http
            .post(format!("{}/{}", self.base_url, endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_failed(PROVIDER, 0, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| invalid_response(PROVIDER, e.to_string()));
        }

        let retry_after_ms = retry_after_ms(response.headers()).unwrap_or(0);
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, retry_after_ms, &body))
    }
}

/// Map a non-success reply to a capability error, preferring the API's own
/// message over the raw body.
fn status_error(status: StatusCode, retry_after_ms: i64, body: &str) -> RoastError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return rate_limited(PROVIDER, retry_after_ms);
    }
    let message = serde_json::from_str::<ApiError>(body)
        .map(|api| api.error.message)
        .unwrap_or_else(|_| body.to_string());
    request_failed(PROVIDER, i32::from(status.as_u16()), message)
}

/// `Retry-After` in milliseconds, when given as (fractional) seconds.
fn retry_after_ms(headers: &HeaderMap) -> Option<i64> {
    let seconds: f64 = headers.get("retry-after")?.to_str().ok()?.parse().ok()?;
    Some((seconds * 1000.0) as i64)
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use roast_core::CapabilityError;

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_ms(&headers), None);
        headers.insert("retry-after", HeaderValue::from_static("1.5"));
        assert_eq!(retry_after_ms(&headers), Some(1500));
        headers.insert("retry-after", HeaderValue::from_static("soon"));
        assert_eq!(retry_after_ms(&headers), None);
    }

    #[test]
    fn test_status_error_mapping() {
        let err = status_error(StatusCode::TOO_MANY_REQUESTS, 2000, "");
        assert_eq!(
            err,
            RoastError::from(CapabilityError::RateLimited {
                provider: PROVIDER.to_string(),
                retry_after_ms: 2000,
            })
        );

        let api_body = r#"{"error":{"message":"model not found","type":"invalid_request_error"}}"#;
        let err = status_error(StatusCode::NOT_FOUND, 0, api_body);
        assert!(err.to_string().contains("model not found"));
        assert!(err.to_string().contains("404"));

        let err = status_error(StatusCode::BAD_GATEWAY, 0, "upstream down");
        assert!(err.to_string().contains("upstream down"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacer_spaces_requests() {
        let pacer = Pacer::per_minute(60);
        let started = Instant::now();
        pacer.wait_turn().await;
        assert!(started.elapsed() < Duration::from_millis(5));
        pacer.wait_turn().await;
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = OpenAIClient::new("sk-very-secret", 60).with_base_url("http://localhost:9/v1/");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("REDACTED"));
        assert_eq!(client.base_url(), "http://localhost:9/v1");
    }
}
