use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidParameter,
    ValidationFailed,
    NotFound,
    InvalidTransition,
    BuildInProgress,
    SiteNotActive,
    Unauthorized,
    RateLimited,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn invalid_param(name: &str, reason: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidParameter,
            format!("invalid parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": reason}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn validation_failed(field_errors: Value) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "validation failed",
            json!({"field_errors": field_errors}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn not_found(kind: &str, identifier: &str) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{kind} not found"),
            json!({"kind": kind, "identifier": identifier}),
            "req-unknown",
        )
    }

    /// Rejected status transition: the caller sees the current status and
    /// the explicit allowed set.
    #[must_use]
    pub fn invalid_transition(current: &str, requested: &str, allowed: &[&str]) -> Self {
        Self::new(
            ApiErrorCode::InvalidTransition,
            format!("cannot transition from {current} to {requested}"),
            json!({"current": current, "requested": requested, "allowed": allowed}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn build_in_progress(age_ms: i64) -> Self {
        Self::new(
            ApiErrorCode::BuildInProgress,
            "a build is already running",
            json!({"last_progress_age_ms": age_ms}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn site_not_active(status: &str) -> Self {
        Self::new(
            ApiErrorCode::SiteNotActive,
            "site is not accepting submissions",
            json!({"status": status}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(
            ApiErrorCode::Unauthorized,
            "missing or invalid credentials",
            Value::Null,
            "req-unknown",
        )
    }

    #[must_use]
    pub fn internal(message: &str) -> Self {
        Self::new(ApiErrorCode::Internal, message, Value::Null, "req-unknown")
    }
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
    assert_traits::<ApiError>();
};
