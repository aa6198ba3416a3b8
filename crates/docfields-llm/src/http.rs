//! Shared HTTP plumbing for the remote providers

use crate::LlmError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Request settings common to every HTTP provider
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestPolicy {
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Extra attempts after the first one fails with a transient error
    pub max_retries: u32,
}

/// POST `body` as JSON to `url` and decode the JSON reply
///
/// Transient failures (connection errors, 5xx, 429) are retried up to
/// `policy.max_retries` times with exponential backoff: 1s, 2s, 4s, ...
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, &str)],
    body: &B,
    policy: &RequestPolicy,
    model: &str,
) -> Result<R, LlmError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut attempt = 0;
    loop {
        match post_once(client, url, headers, body, policy, model).await {
            Ok(reply) => return Ok(reply),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = Duration::from_secs(2u64.pow(attempt));
                warn!(
                    "Request to {} failed ({}), retrying in {}s",
                    url,
                    e,
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn post_once<B, R>(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, &str)],
    body: &B,
    policy: &RequestPolicy,
    model: &str,
) -> Result<R, LlmError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client.post(url).json(body);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    if let Some(timeout) = policy.timeout {
        request = request.timeout(timeout);
    }

    let response = request
        .send()
        .await
        .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

    let status = response.status();
    debug!("POST {} -> {}", url, status);

    if status.is_success() {
        return response
            .json::<R>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)));
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(status_error(status, &error_text, model))
}

/// Map a non-success HTTP status to an `LlmError`
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str, model: &str) -> LlmError {
    match status {
        reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        s if s.is_server_error() => LlmError::Communication(format!("HTTP {}: {}", s, body)),
        s => LlmError::Other(format!("HTTP {}: {}", s, body)),
    }
}

/// Run a provider future to completion on a throwaway current-thread runtime
pub(crate) fn block_on<F, T>(future: F) -> Result<T, LlmError>
where
    F: std::future::Future<Output = Result<T, LlmError>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
        .block_on(future)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{Reply, StubServer};
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    async fn post(server: &StubServer, policy: &RequestPolicy) -> Result<Value, LlmError> {
        let client = reqwest::Client::new();
        let url = format!("{}/api/generate", server.url);
        post_json(&client, &url, &[], &json!({"prompt": "hi"}), policy, "llama3").await
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "", "gemini-1.5-flash"),
            LlmError::ModelNotAvailable(m) if m == "gemini-1.5-flash"
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "", "m"),
            LlmError::RateLimitExceeded
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "upstream", "m"),
            LlmError::Communication(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "bad key", "m"),
            LlmError::Other(msg) if msg.contains("bad key")
        ));
    }

    #[test]
    fn test_server_errors_are_transient() {
        assert!(status_error(StatusCode::SERVICE_UNAVAILABLE, "", "m").is_transient());
        assert!(!status_error(StatusCode::UNAUTHORIZED, "", "m").is_transient());
    }

    #[tokio::test]
    async fn test_server_error_retried_until_success() {
        let server = StubServer::start(vec![
            Reply::Status(503, r#"{"error": "busy"}"#),
            Reply::Status(200, r#"{"ok": true}"#),
        ])
        .await;
        let policy = RequestPolicy {
            timeout: None,
            max_retries: 1,
        };

        let reply = post(&server, &policy).await.unwrap();
        assert_eq!(reply, json!({"ok": true}));
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let server = StubServer::start(vec![
            Reply::Status(503, r#"{"error": "busy"}"#),
            Reply::Status(200, r#"{"ok": true}"#),
        ])
        .await;

        let result = post(&server, &RequestPolicy::default()).await;
        assert!(matches!(result, Err(LlmError::Communication(msg)) if msg.contains("503")));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = StubServer::start(vec![Reply::Status(400, r#"{"error": "bad"}"#)]).await;
        let policy = RequestPolicy {
            timeout: None,
            max_retries: 3,
        };

        let result = post(&server, &policy).await;
        assert!(matches!(result, Err(LlmError::Other(_))));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let server = StubServer::start(vec![Reply::Status(429, "{}")]).await;
        let policy = RequestPolicy {
            timeout: None,
            max_retries: 1,
        };

        let result = post(&server, &policy).await;
        assert!(matches!(result, Err(LlmError::RateLimitExceeded)));
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn test_timeout_gives_up() {
        let server = StubServer::start(vec![Reply::Stall]).await;
        let policy = RequestPolicy {
            timeout: Some(Duration::from_millis(100)),
            max_retries: 0,
        };

        let started = std::time::Instant::now();
        let result = post(&server, &policy).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
