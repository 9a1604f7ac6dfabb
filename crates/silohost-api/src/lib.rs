#![forbid(unsafe_code)]
//! Wire contract for the silohost HTTP surface: error envelope, request and
//! response DTOs, and payload validation. Transport-free; the server crate
//! maps these onto axum responses.

mod dto;
mod errors;
mod params;

pub use dto::{
    CategoryView, LeadStatusRequest, LeadSubmission, LeadView, NamedView, PageView,
    RevalidateRequest, RevalidateResponse, ServiceView, SiteSummary, TransitionRequest,
};
pub use errors::{ApiError, ApiErrorCode};
pub use params::{validate_lead_submission, validate_transition_request, ValidatedLead};

pub const CRATE_NAME: &str = "silohost-api";
