use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::logger::MessageLogger;
use crate::Result;

/// Serializes calls to one bridge and keeps them `spacing` apart, measured
/// from the end of one call to the start of the next.
pub(crate) struct RateLimiter {
    spacing: Duration,
    next_call_not_before: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            next_call_not_before: Mutex::new(None),
        }
    }

    /// Runs `call` once it is this caller's turn. The clock advances whether
    /// the call succeeded, failed or was cancelled.
    pub async fn run<F, Fut, T>(&self, call: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        trace!("waiting for bridge turn");
        let next = self.next_call_not_before.lock().await;
        if let Some(not_before) = *next {
            let now = Instant::now();
            if not_before > now {
                trace!(wait_ms = (not_before - now).as_millis() as u64, "spacing bridge calls");
                tokio::time::sleep_until(not_before).await;
            }
        }
        let _turn = Turn {
            next_call_not_before: next,
            spacing: self.spacing,
        };
        call().await
    }
}

/// Holds the bridge lock while a call runs. Dropping it restarts the spacing
/// clock, so a call whose future is cancelled midway still uses its turn.
struct Turn<'a> {
    next_call_not_before: MutexGuard<'a, Option<Instant>>,
    spacing: Duration,
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        *self.next_call_not_before = Some(Instant::now() + self.spacing);
        trace!("bridge turn released");
    }
}

/// HTTP access to `http://<ip>:<port>/api/v1/<resource>`, one request at a time.
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
    logger: std::sync::Mutex<Option<MessageLogger>>,
}

impl Transport {
    pub fn new(
        base_url: String,
        timeout: Duration,
        spacing: Duration,
        logger: Option<MessageLogger>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            limiter: RateLimiter::new(spacing),
            logger: std::sync::Mutex::new(logger),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn post(&self, resource: &str, body: &str) -> Result<String> {
        self.execute(Method::POST, resource, body).await
    }

    pub async fn put(&self, resource: &str, body: &str) -> Result<String> {
        self.execute(Method::PUT, resource, body).await
    }

    pub async fn execute(&self, method: Method, resource: &str, body: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, resource);
        self.with_logger(|l| l.log_request(method.as_str(), resource, body));

        let result = self
            .limiter
            .run(|| async {
                debug!(method = %method, url = %url, "sending bridge request");
                let resp = self
                    .http
                    .request(method.clone(), &url)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.to_string())
                    .send()
                    .await?
                    .error_for_status()?;
                let status = resp.status().as_u16();
                let text = resp.text().await?;
                Ok::<_, reqwest::Error>((status, text))
            })
            .await;

        match result {
            Ok((status, text)) => {
                self.with_logger(|l| l.log_response(method.as_str(), resource, body, status, &text));
                Ok(text)
            }
            Err(e) => {
                debug!(method = %method, url = %url, error = %e, "bridge request failed");
                Err(e.into())
            }
        }
    }

    fn with_logger(&self, f: impl FnOnce(&mut MessageLogger)) {
        if let Ok(mut guard) = self.logger.lock()
            && let Some(logger) = guard.as_mut()
        {
            f(logger);
        }
    }
}
