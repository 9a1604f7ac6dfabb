use crate::dto::{LeadSubmission, TransitionRequest};
use crate::errors::ApiError;
use serde_json::json;
use silohost_model::{parse_site_status, SiteStatus};

const LEAD_NAME_MAX_LEN: usize = 200;
const LEAD_FIELD_MAX_LEN: usize = 500;
const LEAD_MESSAGE_MAX_LEN: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLead {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub service_slug: Option<String>,
}

pub fn validate_lead_submission(payload: &LeadSubmission) -> Result<ValidatedLead, ApiError> {
    let mut field_errors = Vec::new();
    let name = payload.name.trim();
    if name.is_empty() {
        field_errors.push(json!({"parameter": "name", "reason": "required"}));
    } else if name.len() > LEAD_NAME_MAX_LEN {
        field_errors.push(json!({"parameter": "name", "reason": "too_long"}));
    }
    for (field, value, cap) in [
        ("email", &payload.email, LEAD_FIELD_MAX_LEN),
        ("phone", &payload.phone, LEAD_FIELD_MAX_LEN),
        ("service_slug", &payload.service_slug, LEAD_FIELD_MAX_LEN),
        ("message", &payload.message, LEAD_MESSAGE_MAX_LEN),
    ] {
        if value.as_deref().is_some_and(|v| v.len() > cap) {
            field_errors.push(json!({"parameter": field, "reason": "too_long"}));
        }
    }
    if let Some(email) = payload.email.as_deref() {
        if !email.trim().is_empty() && !email.contains('@') {
            field_errors.push(json!({"parameter": "email", "reason": "invalid"}));
        }
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_failed(json!(field_errors)));
    }
    let clean = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    Ok(ValidatedLead {
        name: name.to_string(),
        email: clean(&payload.email),
        phone: clean(&payload.phone),
        message: clean(&payload.message),
        service_slug: clean(&payload.service_slug),
    })
}

pub fn validate_transition_request(payload: &TransitionRequest) -> Result<SiteStatus, ApiError> {
    parse_site_status(payload.status.trim())
        .map_err(|e| ApiError::invalid_param("status", &e.to_string()))
}
