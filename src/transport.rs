//! HTTP transport core.
//!
//! Every API call in the SDK funnels through one place that attaches
//! authentication, classifies status codes into typed errors, and retries
//! transient failures with exponential backoff.

use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::{Error, ErrorDetail, Result};

/// One named file in a multipart upload. Field names follow the server's
/// positional convention (`file_0`, `file_1`, ..., `audio_0`, ...).
#[derive(Debug, Clone)]
pub struct Attachment {
    pub field: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            data,
        }
    }
}

/// Request body variants. Multipart payloads keep their attachments as owned
/// bytes so the request can be rebuilt on every retry attempt.
#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(Value),
    Multipart {
        fields: Vec<(String, String)>,
        attachments: Vec<Attachment>,
    },
}

/// A classified, fully-read API response (2xx only; everything else becomes
/// a typed [`Error`] inside the transport).
#[derive(Debug)]
pub struct ApiResponse {
    status: u16,
    body: Bytes,
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Decode the body as JSON. A 204 (or otherwise empty) body decodes to
    /// `Value::Null`.
    pub fn json(&self) -> Result<Value> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The raw body, for binary downloads and text exports.
    pub fn into_bytes(self) -> Bytes {
        self.body
    }
}

/// The one network resource a client owns: a pooled `reqwest::Client` plus
/// the resolved configuration. Safe for concurrent use from multiple tasks;
/// connections are released when the last clone is dropped.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::Configuration("API key contains invalid header characters".into()))?;
        api_key.set_sensitive(true);
        headers.insert("x-api-key", api_key);

        let client = reqwest::Client::builder()
            .user_agent(format!("zetsubou-sdk-rust/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| Error::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a request: retry loop plus status classification, returning
    /// the live response so callers choose between buffering and streaming.
    ///
    /// 5xx responses and network-level failures (timeout, connect) share one
    /// retry budget of `retry_attempts`, with delay `retry_backoff * 2^n`
    /// before retry `n`. 4xx responses are surfaced immediately, untouched.
    async fn execute(
        &self,
        method: &Method,
        path: &str,
        query: &[(String, String)],
        payload: &Payload,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.config.base_url, path);

        let mut attempt: u32 = 0;
        loop {
            debug!(%method, %path, attempt, "sending request");
            let outcome = self.build(method, &url, query, payload).send().await;

            match outcome {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    match status {
                        200 | 201 | 204 => return Ok(resp),
                        400 => return Err(Error::Validation(Self::error_detail(resp).await)),
                        401 => return Err(Error::Authentication(Self::error_detail(resp).await)),
                        404 => return Err(Error::NotFound(Self::error_detail(resp).await)),
                        429 => {
                            // Surfaced to the caller with the server's advice;
                            // the transport never waits out a rate limit itself.
                            let retry_after = Self::retry_after(resp.headers());
                            return Err(Error::RateLimited {
                                detail: Self::error_detail(resp).await,
                                retry_after,
                            });
                        }
                        500..=599 => {
                            let detail = Self::error_detail(resp).await;
                            if attempt < self.config.retry_attempts {
                                let delay = self.backoff(attempt);
                                warn!(status, attempt, delay_ms = delay.as_millis() as u64, "server error, retrying");
                                tokio::time::sleep(delay).await;
                                attempt += 1;
                                continue;
                            }
                            return Err(Error::Server(detail));
                        }
                        _ => return Err(Error::Api(Self::error_detail(resp).await)),
                    }
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    if attempt < self.config.retry_attempts {
                        let delay = self.backoff(attempt);
                        warn!(error = %e, attempt, delay_ms = delay.as_millis() as u64, "network error, retrying");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(Error::Network(format!(
                        "request failed after {} retries: {e}",
                        self.config.retry_attempts
                    )));
                }
                Err(e) => return Err(Error::Network(e.to_string())),
            }
        }
    }

    /// Execute and buffer the whole response.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        payload: &Payload,
    ) -> Result<ApiResponse> {
        let resp = self.execute(&method, path, query, payload).await?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("failed to read response body: {e}")))?;
        Ok(ApiResponse { status, body })
    }

    /// GET returning decoded JSON.
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, &[], &Payload::Empty)
            .await?
            .json()
    }

    /// GET with query parameters, returning decoded JSON.
    pub async fn get_with(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.request(Method::GET, path, query, &Payload::Empty)
            .await?
            .json()
    }

    /// GET returning the raw response (binary downloads, text exports).
    pub async fn get_raw(&self, path: &str, query: &[(String, String)]) -> Result<ApiResponse> {
        self.request(Method::GET, path, query, &Payload::Empty).await
    }

    /// GET collecting the body as bytes.
    pub async fn download(&self, path: &str, query: &[(String, String)]) -> Result<Bytes> {
        Ok(self.get_raw(path, query).await?.into_bytes())
    }

    /// GET streaming the body straight to a local file, chunk by chunk.
    ///
    /// Classification and retry happen before the first byte is written, so
    /// a typed failure never leaves a partial file behind.
    pub async fn download_to(
        &self,
        path: &str,
        query: &[(String, String)],
        dest: &std::path::Path,
    ) -> Result<()> {
        use tokio::io::AsyncWriteExt;

        let resp = self.execute(&Method::GET, path, query, &Payload::Empty).await?;
        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Network(format!("download interrupted: {e}")))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::POST, path, &[], &Payload::Json(body))
            .await?
            .json()
    }

    /// POST without a body (e.g. `/cancel`, `/retry`, `/test` actions).
    pub async fn post_empty(&self, path: &str) -> Result<Value> {
        self.request(Method::POST, path, &[], &Payload::Empty)
            .await?
            .json()
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        fields: Vec<(String, String)>,
        attachments: Vec<Attachment>,
    ) -> Result<Value> {
        self.request(Method::POST, path, &[], &Payload::Multipart { fields, attachments })
            .await?
            .json()
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::PUT, path, &[], &Payload::Json(body))
            .await?
            .json()
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::PATCH, path, &[], &Payload::Json(body))
            .await?
            .json()
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, &[], &Payload::Empty)
            .await?
            .json()
    }

    pub async fn delete_with(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.request(Method::DELETE, path, query, &Payload::Empty)
            .await?
            .json()
    }

    fn build(
        &self,
        method: &Method,
        url: &str,
        query: &[(String, String)],
        payload: &Payload,
    ) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method.clone(), url)
            .header("x-request-id", Uuid::new_v4().to_string());
        if !query.is_empty() {
            req = req.query(query);
        }
        match payload {
            Payload::Empty => req,
            Payload::Json(body) => req.json(body),
            Payload::Multipart { fields, attachments } => {
                // No forced content-type here: reqwest picks the boundary.
                let mut form = Form::new();
                for (name, value) in fields {
                    form = form.text(name.clone(), value.clone());
                }
                for a in attachments {
                    form = form.part(
                        a.field.clone(),
                        Part::bytes(a.data.clone()).file_name(a.file_name.clone()),
                    );
                }
                req.multipart(form)
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.config.retry_backoff * 2u32.saturating_pow(attempt)
    }

    /// `Retry-After: <seconds>` only; the HTTP-date form is not used by the
    /// server. Absent or unparseable header defaults to 60 seconds.
    fn retry_after(headers: &HeaderMap) -> Duration {
        headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60))
    }

    /// Best-effort error body parsing: JSON object if possible, otherwise a
    /// detail synthesized from the raw text. Never fails.
    async fn error_detail(resp: reqwest::Response) -> ErrorDetail {
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.unwrap_or_default();
        let body = serde_json::from_slice::<Value>(&bytes)
            .ok()
            .filter(Value::is_object)
            .unwrap_or_else(|| {
                let text = String::from_utf8_lossy(&bytes);
                let message = if text.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    text.into_owned()
                };
                serde_json::json!({
                    "message": message,
                    "code": format!("HTTP_{status}"),
                    "status_code": status,
                })
            });
        ErrorDetail::from_response(status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn transport() -> HttpTransport {
        HttpTransport::new(ClientConfig::new("ztb_live_test").validate().unwrap()).unwrap()
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let t = transport();
        assert_eq!(t.backoff(0), Duration::from_secs(1));
        assert_eq!(t.backoff(1), Duration::from_secs(2));
        assert_eq!(t.backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn retry_after_header_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("17"));
        assert_eq!(HttpTransport::retry_after(&headers), Duration::from_secs(17));

        let empty = HeaderMap::new();
        assert_eq!(HttpTransport::retry_after(&empty), Duration::from_secs(60));

        let mut junk = HeaderMap::new();
        junk.insert("retry-after", HeaderValue::from_static("soon"));
        assert_eq!(HttpTransport::retry_after(&junk), Duration::from_secs(60));
    }

    #[test]
    fn empty_body_decodes_to_null() {
        let resp = ApiResponse {
            status: 204,
            body: Bytes::new(),
        };
        assert_eq!(resp.json().unwrap(), Value::Null);
    }
}
