use std::time::Duration;
use thiserror::Error;

/// Structured detail attached to every API-originated failure.
///
/// The server usually answers errors with a JSON body shaped like
/// `{"message": ..., "code": ...}`; when it does not, the transport
/// synthesizes a detail from the raw response text so callers always get
/// something to branch on.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    /// Human-readable message, server-provided where possible.
    pub message: String,
    /// Machine-readable error code (e.g. "QUOTA_EXCEEDED", "HTTP_502").
    pub code: String,
    /// HTTP status the failure was classified from, if any.
    pub status: Option<u16>,
    /// The decoded response body, verbatim. Null when the failure never
    /// reached the server.
    pub payload: serde_json::Value,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: "UNKNOWN_ERROR".to_string(),
            status: None,
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Build a detail from a decoded error body, falling back to a synthetic
    /// `HTTP {status}` message when the body carries nothing usable.
    pub fn from_response(status: u16, body: serde_json::Value) -> Self {
        let message = body
            .get("message")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}"));
        let code = body
            .get("code")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP_{status}"));
        Self {
            message,
            code,
            status: Some(status),
            payload: body,
        }
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)
    }
}

/// Unified error type for the SDK.
///
/// The HTTP-mapped variants mirror the server's status contract exactly:
/// one variant per documented status class, each carrying the parsed
/// [`ErrorDetail`]. Local failures (config, I/O, JSON) convert in via
/// `#[from]`.
#[derive(Debug, Error)]
pub enum Error {
    /// 401 Unauthorized.
    #[error("authentication failed: {0}")]
    Authentication(ErrorDetail),

    /// 400 Bad Request.
    #[error("validation failed: {0}")]
    Validation(ErrorDetail),

    /// 404 Not Found.
    #[error("not found: {0}")]
    NotFound(ErrorDetail),

    /// 429 Too Many Requests. Never retried internally; `retry_after` is the
    /// server's `Retry-After` header (default 60s when absent).
    #[error("rate limited: {detail} (retry after {}s)", .retry_after.as_secs())]
    RateLimited {
        detail: ErrorDetail,
        retry_after: Duration,
    },

    /// Persistent 5xx after the retry budget is exhausted.
    #[error("server error: {0}")]
    Server(ErrorDetail),

    /// Everything else the remote reports: unknown status codes, GraphQL
    /// `errors` arrays, `success:false` envelopes, job failures and poll
    /// timeouts.
    #[error("API error: {0}")]
    Api(ErrorDetail),

    /// Connection/timeout failures after the retry budget is exhausted.
    #[error("network error: {0}")]
    Network(String),

    /// Client-side misconfiguration (missing API key, bad base URL).
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for an [`Error::Api`] carrying just a message.
    pub fn api(message: impl Into<String>) -> Self {
        Error::Api(ErrorDetail::new(message))
    }

    /// The structured detail, when the failure came from the server.
    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Error::Authentication(d)
            | Error::Validation(d)
            | Error::NotFound(d)
            | Error::Server(d)
            | Error::Api(d)
            | Error::RateLimited { detail: d, .. } => Some(d),
            _ => None,
        }
    }

    /// HTTP status the failure was classified from, if any.
    pub fn status(&self) -> Option<u16> {
        self.detail().and_then(|d| d.status)
    }

    /// Machine-readable error code, if any.
    pub fn code(&self) -> Option<&str> {
        self.detail().map(|d| d.code.as_str())
    }

    /// Server-advised wait before the next attempt (429 only).
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_from_structured_body() {
        let body = serde_json::json!({"message": "tier required", "code": "TIER_REQUIRED"});
        let detail = ErrorDetail::from_response(403, body.clone());
        assert_eq!(detail.message, "tier required");
        assert_eq!(detail.code, "TIER_REQUIRED");
        assert_eq!(detail.status, Some(403));
        assert_eq!(detail.payload, body);
    }

    #[test]
    fn detail_synthesized_when_body_is_opaque() {
        let detail = ErrorDetail::from_response(502, serde_json::json!("bad gateway"));
        assert_eq!(detail.message, "HTTP 502");
        assert_eq!(detail.code, "HTTP_502");
    }

    #[test]
    fn accessors_reach_through_variants() {
        let err = Error::RateLimited {
            detail: ErrorDetail::new("slow down")
                .with_status(429)
                .with_code("RATE_LIMIT"),
            retry_after: Duration::from_secs(17),
        };
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.code(), Some("RATE_LIMIT"));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(17)));
        assert!(Error::Configuration("no key".into()).detail().is_none());
    }
}
