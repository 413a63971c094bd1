//! Raw HTTP primitive and the retrying policy layer wrapped around it.
//!
//! The primitive is "send request, get status+body or network failure";
//! everything above it (retry, backoff, JSON decoding) is policy.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Status and body of a completed exchange, successful or not
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The raw transport primitive. Implementations fail only with
/// `CoreError::TransientNetwork`; status handling is the retry layer's job.
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, CoreError>;
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    http: reqwest::Client,
    user_agent: String,
}

impl ReqwestTransport {
    pub fn new(timeout_ms: u64, user_agent: &str) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| CoreError::TransientNetwork(e.to_string()))?;

        Ok(Self {
            http,
            user_agent: user_agent.to_string(),
        })
    }
}

#[async_trait]
impl HttpGet for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, CoreError> {
        let response = self
            .http
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| CoreError::TransientNetwork(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::TransientNetwork(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// Retrying request layer: up to `max_attempts` tries, linear backoff
/// (`base_delay × (n−1)` before attempt n). A transport fault or a non-2xx
/// status is retryable on every attempt but the last; on the last attempt a
/// fault propagates and a non-2xx becomes `FatalResponse` carrying the final
/// payload. There is no wall-clock deadline beyond attempts × backoff plus
/// the primitive's own timeout, and no cancellation: a started sequence runs
/// to completion or failure.
pub struct RetryingTransport<T: HttpGet> {
    inner: T,
    max_attempts: u32,
    base_delay: Duration,
}

impl<T: HttpGet> RetryingTransport<T> {
    pub fn new(inner: T, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &T {
        &self.inner
    }

    /// Fetch a URL and decode the body as JSON.
    pub async fn request_json(&self, url: &str) -> Result<Value, CoreError> {
        let mut last_error: Option<CoreError> = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let delay = self.base_delay * (attempt - 1);
                warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying request");
                tokio::time::sleep(delay).await;
            }

            debug!(attempt, url, "transport request");

            match self.inner.get(url).await {
                Ok(resp) if resp.is_success() => return decode_body(&resp),
                Ok(resp) => {
                    // non-2xx mid-retry is treated as transient
                    if attempt == self.max_attempts {
                        return Err(CoreError::FatalResponse {
                            status: resp.status,
                            body: resp.body,
                        });
                    }
                    debug!(status = resp.status, attempt, "non-2xx response, will retry");
                    last_error = Some(CoreError::TransientNetwork(format!(
                        "status {} on attempt {}",
                        resp.status, attempt
                    )));
                }
                Err(e) => {
                    if attempt == self.max_attempts {
                        return Err(e);
                    }
                    debug!(error = %e, attempt, "transport fault, will retry");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| CoreError::TransientNetwork("retry budget exhausted".into())))
    }
}

fn decode_body(resp: &RawResponse) -> Result<Value, CoreError> {
    // Some provider endpoints answer 200 with an empty body for "no results"
    if resp.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&resp.body).map_err(|e| CoreError::FatalResponse {
        status: resp.status,
        body: format!("malformed JSON body: {e}"),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Instant;

    /// Scripted transport: pops one canned outcome per call and records
    /// call instants so tests can check backoff spacing.
    pub(crate) struct ScriptedTransport {
        script: Mutex<VecDeque<Result<RawResponse, CoreError>>>,
        pub calls: Mutex<Vec<Instant>>,
        pub urls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(script: Vec<Result<RawResponse, CoreError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
                urls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpGet for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<RawResponse, CoreError> {
            self.calls.lock().unwrap().push(Instant::now());
            self.urls.lock().unwrap().push(url.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CoreError::TransientNetwork("script exhausted".into())))
        }
    }

    fn ok(body: &str) -> Result<RawResponse, CoreError> {
        Ok(RawResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn fault() -> Result<RawResponse, CoreError> {
        Err(CoreError::TransientNetwork("connection reset".into()))
    }

    #[tokio::test]
    async fn two_failures_then_success_returns_third_payload_with_linear_backoff() {
        let base = Duration::from_millis(40);
        let transport = RetryingTransport::new(
            ScriptedTransport::new(vec![fault(), fault(), ok(r#"{"n":3}"#)]),
            3,
            base,
        );

        let value = transport.request_json("http://x/api").await.unwrap();
        assert_eq!(value["n"], 3);

        let calls = transport.inner.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 3);
        // delay before attempt 2 is base, before attempt 3 is 2×base
        assert!(calls[1] - calls[0] >= base);
        assert!(calls[2] - calls[1] >= base * 2);
    }

    #[tokio::test]
    async fn non_2xx_mid_chain_is_retried() {
        let transport = RetryingTransport::new(
            ScriptedTransport::new(vec![
                Ok(RawResponse {
                    status: 503,
                    body: "busy".into(),
                }),
                ok("[]"),
            ]),
            3,
            Duration::from_millis(1),
        );

        let value = transport.request_json("http://x/api").await.unwrap();
        assert!(value.as_array().unwrap().is_empty());
        assert_eq!(transport.inner.call_count(), 2);
    }

    #[tokio::test]
    async fn non_2xx_on_final_attempt_is_fatal_and_keeps_body() {
        let transport = RetryingTransport::new(
            ScriptedTransport::new(vec![
                Ok(RawResponse {
                    status: 500,
                    body: "a".into(),
                }),
                Ok(RawResponse {
                    status: 502,
                    body: "b".into(),
                }),
                Ok(RawResponse {
                    status: 403,
                    body: "forbidden".into(),
                }),
            ]),
            3,
            Duration::from_millis(1),
        );

        match transport.request_json("http://x/api").await {
            Err(CoreError::FatalResponse { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("expected FatalResponse, got {other:?}"),
        }
        assert_eq!(transport.inner.call_count(), 3);
    }

    #[tokio::test]
    async fn transport_fault_on_final_attempt_propagates() {
        let transport = RetryingTransport::new(
            ScriptedTransport::new(vec![fault(), fault(), fault()]),
            3,
            Duration::from_millis(1),
        );

        let err = transport.request_json("http://x/api").await.unwrap_err();
        assert!(matches!(err, CoreError::TransientNetwork(_)));
        assert_eq!(transport.inner.call_count(), 3);
    }

    #[tokio::test]
    async fn malformed_body_is_fatal_without_retry() {
        let transport = RetryingTransport::new(
            ScriptedTransport::new(vec![ok("{not json")]),
            3,
            Duration::from_millis(1),
        );

        let err = transport.request_json("http://x/api").await.unwrap_err();
        assert!(matches!(err, CoreError::FatalResponse { .. }));
        assert_eq!(transport.inner.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_body_decodes_to_null() {
        let transport = RetryingTransport::new(
            ScriptedTransport::new(vec![ok("")]),
            3,
            Duration::from_millis(1),
        );
        let value = transport.request_json("http://x/api").await.unwrap();
        assert!(value.is_null());
    }
}
