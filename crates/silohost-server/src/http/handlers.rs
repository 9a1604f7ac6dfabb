use crate::cache::render::{CachedPage, RenderCache};
use crate::http::render::render_resolved;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path as UrlPath, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, ETAG};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use silohost_api::{
    validate_lead_submission, validate_transition_request, ApiError, LeadStatusRequest, LeadView,
    LeadSubmission, PageView, RevalidateRequest, RevalidateResponse, SiteSummary,
    TransitionRequest,
};
use silohost_core::{sha256_hex, unix_millis};
use silohost_ingest::{content_plan, BuildPipeline, ImportDocument};
use silohost_model::{
    apply_user_transition, parse_website_type, retry_build, LeadId, LeadStatus, RetryError, Site,
    Slug,
};
use silohost_routing::{resolve_content, ResolvedPage, StoreError};
use silohost_store::{NewLead, NewSite};
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::error;

const STATUS_PAGES: &[&str] = &["coming-soon", "maintenance", "build-error", "suspended"];

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("req-unknown")
        .to_string()
}

pub(crate) fn api_error_response(status: StatusCode, err: ApiError) -> Response {
    (status, Json(json!({"error": err}))).into_response()
}

fn store_failure(headers: &HeaderMap, err: &StoreError) -> Response {
    error!(error = %err, "storage failure");
    api_error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::internal("storage failure").with_request_id(request_id(headers)),
    )
}

fn not_found_page(site: &Site, path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(PageView::NotFound {
            site: site.slug.to_string(),
            path: format!("/{path}"),
        }),
    )
        .into_response()
}

async fn load_site(state: &AppState, slug: &str, headers: &HeaderMap) -> Result<Site, Response> {
    let parsed = Slug::parse(slug).map_err(|_| {
        api_error_response(
            StatusCode::NOT_FOUND,
            ApiError::not_found("site", slug).with_request_id(request_id(headers)),
        )
    })?;
    match state.directory.site_by_slug(&parsed).await {
        Ok(Some(site)) => Ok(site),
        Ok(None) => Err(api_error_response(
            StatusCode::NOT_FOUND,
            ApiError::not_found("site", slug).with_request_id(request_id(headers)),
        )),
        Err(e) => Err(store_failure(headers, &e)),
    }
}

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    if state.ready.load(Ordering::Relaxed) {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
    }
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render_text().await
}

/// HTTP 200 by design: a visitor on a misconfigured domain gets an
/// explanation, not a bare error screen.
pub(crate) async fn domain_not_found_handler() -> Response {
    (StatusCode::OK, Json(PageView::DomainNotFound {})).into_response()
}

pub(crate) async fn site_home_handler(
    State(state): State<AppState>,
    UrlPath(slug): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    serve_site_path(state, slug, String::new(), headers).await
}

pub(crate) async fn site_path_handler(
    State(state): State<AppState>,
    UrlPath((slug, path)): UrlPath<(String, String)>,
    headers: HeaderMap,
) -> Response {
    serve_site_path(state, slug, path, headers).await
}

async fn serve_site_path(
    state: AppState,
    slug: String,
    path: String,
    headers: HeaderMap,
) -> Response {
    let site = match load_site(&state, &slug, &headers).await {
        Ok(site) => site,
        Err(response) => return response,
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.first() == Some(&"status") {
        return match segments.get(1) {
            Some(page) if segments.len() == 2 && STATUS_PAGES.contains(page) => (
                StatusCode::OK,
                Json(PageView::Status {
                    site: site.slug.to_string(),
                    status: site.status.as_str().to_string(),
                    status_page: (*page).to_string(),
                    message: site.status_message.clone(),
                }),
            )
                .into_response(),
            _ => not_found_page(&site, &path),
        };
    }

    let (location, rest) = if segments.first() == Some(&"locations") {
        let Some(location_slug) = segments.get(1) else {
            return not_found_page(&site, &path);
        };
        match state.content.location_by_slug(site.id, location_slug).await {
            Ok(Some(location)) => (Some(location), segments[2..].to_vec()),
            Ok(None) => return not_found_page(&site, &path),
            Err(e) => return store_failure(&headers, &e),
        }
    } else {
        (None, segments)
    };

    let resolved = match resolve_content(state.content.as_ref(), &site, location.as_ref(), &rest)
        .await
    {
        Ok(resolved) => resolved,
        Err(e) => return store_failure(&headers, &e),
    };

    // Addressing a multi-location site without a location prefix is only
    // valid for static/global paths; location-scoped content 404s.
    let resolved = if site.website_type.is_multi_location() && location.is_none() {
        match resolved {
            keep @ (ResolvedPage::Home { .. }
            | ResolvedPage::Static { .. }
            | ResolvedPage::NotFound) => keep,
            _ => ResolvedPage::NotFound,
        }
    } else {
        resolved
    };

    if matches!(resolved, ResolvedPage::NotFound) {
        return not_found_page(&site, &path);
    }

    let rendered =
        match render_resolved(state.content.as_ref(), &site, location.as_ref(), resolved, &path)
            .await
        {
            Ok(rendered) => rendered,
            Err(e) => return store_failure(&headers, &e),
        };

    let Some(canonical) = rendered.canonical_path else {
        return (StatusCode::OK, Json(rendered.view)).into_response();
    };

    let key = RenderCache::cache_key(site.slug.as_str(), &canonical);
    let if_none_match = headers
        .get("if-none-match")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    {
        let mut cache = state.render_cache.lock().await;
        if let Some(hit) = cache.get(&key) {
            if if_none_match.as_deref() == Some(hit.etag.as_str()) {
                return not_modified(&hit.etag);
            }
            return ok_json_bytes(hit.body, &hit.etag);
        }
    }

    let body = match serde_json::to_vec(&rendered.view) {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "render serialization failed");
            return api_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal("render failure").with_request_id(request_id(&headers)),
            );
        }
    };
    let etag = format!("\"{}\"", sha256_hex(&body));
    state.render_cache.lock().await.insert(
        key,
        CachedPage {
            body: body.clone(),
            etag: etag.clone(),
            created_at: Instant::now(),
        },
    );
    if if_none_match.as_deref() == Some(etag.as_str()) {
        return not_modified(&etag);
    }
    ok_json_bytes(body, &etag)
}

fn not_modified(etag: &str) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert(ETAG, value);
    }
    (StatusCode::NOT_MODIFIED, headers).into_response()
}

fn ok_json_bytes(body: Vec<u8>, etag: &str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert(ETAG, value);
    }
    (StatusCode::OK, headers, body).into_response()
}

pub(crate) async fn submit_lead_handler(
    State(state): State<AppState>,
    UrlPath(slug): UrlPath<String>,
    headers: HeaderMap,
    payload: Result<Json<LeadSubmission>, JsonRejection>,
) -> Response {
    let rid = request_id(&headers);
    let Ok(Json(payload)) = payload else {
        return api_error_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_param("body", "malformed json").with_request_id(rid),
        );
    };
    let lead = match validate_lead_submission(&payload) {
        Ok(lead) => lead,
        Err(err) => {
            return api_error_response(StatusCode::BAD_REQUEST, err.with_request_id(rid))
        }
    };
    let site = match load_site(&state, &slug, &headers).await {
        Ok(site) => site,
        Err(response) => return response,
    };
    if !site.status.is_active() {
        return api_error_response(
            StatusCode::CONFLICT,
            ApiError::site_not_active(site.status.as_str()).with_request_id(rid),
        );
    }
    match state
        .writer
        .insert_lead(NewLead {
            site_id: site.id,
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            message: lead.message,
            service_slug: lead.service_slug,
            created_at_ms: unix_millis(),
        })
        .await
    {
        Ok(created) => {
            (StatusCode::CREATED, Json(LeadView::from_lead(&created))).into_response()
        }
        Err(e) => store_failure(&headers, &e),
    }
}

pub(crate) async fn list_leads_handler(
    State(state): State<AppState>,
    UrlPath(slug): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    if !state.api.enable_lead_dashboard_api {
        return api_error_response(
            StatusCode::NOT_FOUND,
            ApiError::not_found("route", "leads").with_request_id(request_id(&headers)),
        );
    }
    let site = match load_site(&state, &slug, &headers).await {
        Ok(site) => site,
        Err(response) => return response,
    };
    match state.writer.leads_for_site(site.id).await {
        Ok(leads) => {
            let views: Vec<LeadView> = leads.iter().map(LeadView::from_lead).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(e) => store_failure(&headers, &e),
    }
}

pub(crate) async fn update_lead_handler(
    State(state): State<AppState>,
    UrlPath((slug, lead_id)): UrlPath<(String, i64)>,
    headers: HeaderMap,
    payload: Result<Json<LeadStatusRequest>, JsonRejection>,
) -> Response {
    let rid = request_id(&headers);
    if !state.api.enable_lead_dashboard_api {
        return api_error_response(
            StatusCode::NOT_FOUND,
            ApiError::not_found("route", "leads").with_request_id(rid),
        );
    }
    let Ok(Json(payload)) = payload else {
        return api_error_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_param("body", "malformed json").with_request_id(rid),
        );
    };
    let status = match LeadStatus::parse(payload.status.trim()) {
        Ok(status) => status,
        Err(e) => {
            return api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::invalid_param("status", &e.to_string()).with_request_id(rid),
            )
        }
    };
    let site = match load_site(&state, &slug, &headers).await {
        Ok(site) => site,
        Err(response) => return response,
    };
    match state
        .writer
        .update_lead_status(site.id, LeadId(lead_id), status)
        .await
    {
        Ok(Some(lead)) => (StatusCode::OK, Json(LeadView::from_lead(&lead))).into_response(),
        Ok(None) => api_error_response(
            StatusCode::NOT_FOUND,
            ApiError::not_found("lead", &lead_id.to_string()).with_request_id(rid),
        ),
        Err(e) => store_failure(&headers, &e),
    }
}

pub(crate) async fn transition_status_handler(
    State(state): State<AppState>,
    UrlPath(slug): UrlPath<String>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Response {
    let rid = request_id(&headers);
    let Ok(Json(payload)) = payload else {
        return api_error_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_param("body", "malformed json").with_request_id(rid),
        );
    };
    let requested = match validate_transition_request(&payload) {
        Ok(requested) => requested,
        Err(err) => {
            return api_error_response(StatusCode::BAD_REQUEST, err.with_request_id(rid))
        }
    };
    let mut site = match load_site(&state, &slug, &headers).await {
        Ok(site) => site,
        Err(response) => return response,
    };
    let change = match apply_user_transition(&site, requested, payload.message.clone(), unix_millis())
    {
        Ok(change) => change,
        Err(err) => {
            let allowed: Vec<&str> = err.allowed.iter().map(|s| s.as_str()).collect();
            return api_error_response(
                StatusCode::CONFLICT,
                ApiError::invalid_transition(
                    err.current.as_str(),
                    err.requested.as_str(),
                    &allowed,
                )
                .with_request_id(rid),
            );
        }
    };
    if let Err(e) = state.writer.apply_status_change(site.id, &change).await {
        return store_failure(&headers, &e);
    }
    site.status = change.status;
    site.status_message = change.message.clone();
    site.status_updated_at_ms = change.stamped_at_ms;
    (StatusCode::OK, Json(SiteSummary::from_site(&site))).into_response()
}

pub(crate) async fn retry_build_handler(
    State(state): State<AppState>,
    UrlPath(slug): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    let rid = request_id(&headers);
    let mut site = match load_site(&state, &slug, &headers).await {
        Ok(site) => site,
        Err(response) => return response,
    };
    let total_tasks = site.progress.total_tasks.max(1);
    let change = match retry_build(&site, total_tasks, unix_millis()) {
        Ok(change) => change,
        Err(RetryError::StillRunning { age_ms }) => {
            return api_error_response(
                StatusCode::CONFLICT,
                ApiError::build_in_progress(age_ms).with_request_id(rid),
            )
        }
        Err(RetryError::NotRetryable { current }) => {
            return api_error_response(
                StatusCode::CONFLICT,
                ApiError::invalid_transition(current.as_str(), "building", &[])
                    .with_request_id(rid),
            )
        }
        Err(_) => {
            return api_error_response(
                StatusCode::CONFLICT,
                ApiError::invalid_transition(site.status.as_str(), "building", &[])
                    .with_request_id(rid),
            )
        }
    };
    if let Err(e) = state.writer.apply_status_change(site.id, &change).await {
        return store_failure(&headers, &e);
    }
    site.status = change.status;
    site.status_message = change.message.clone();
    site.status_updated_at_ms = change.stamped_at_ms;
    if let Some(progress) = change.progress {
        site.progress = progress;
    }
    (StatusCode::ACCEPTED, Json(SiteSummary::from_site(&site))).into_response()
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CreateSiteRequest {
    slug: String,
    website_type: String,
    import: ImportDocument,
}

/// Setup wizard entry point. Creates the site in `building` status and runs
/// content generation in the background; the caller polls the status field.
pub(crate) async fn create_site_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateSiteRequest>, JsonRejection>,
) -> Response {
    let rid = request_id(&headers);
    let Ok(Json(payload)) = payload else {
        return api_error_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_param("body", "malformed json").with_request_id(rid),
        );
    };
    let slug = match Slug::parse(&payload.slug) {
        Ok(slug) => slug,
        Err(e) => {
            return api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::invalid_param("slug", &e.to_string()).with_request_id(rid),
            )
        }
    };
    let website_type = match parse_website_type(payload.website_type.trim()) {
        Ok(website_type) => website_type,
        Err(e) => {
            return api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::invalid_param("website_type", &e.to_string()).with_request_id(rid),
            )
        }
    };
    let plan = match content_plan(&payload.import) {
        Ok(plan) => plan,
        Err(e) => {
            return api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::invalid_param("import", &e.to_string()).with_request_id(rid),
            )
        }
    };
    if let Ok(Some(_)) = state.directory.site_by_slug(&slug).await {
        return api_error_response(
            StatusCode::CONFLICT,
            ApiError::invalid_param("slug", "already taken").with_request_id(rid),
        );
    }
    let site = match state
        .writer
        .insert_site(NewSite {
            slug,
            website_type,
            settings: payload.import.settings.clone(),
            created_at_ms: unix_millis(),
        })
        .await
    {
        Ok(site) => site,
        Err(e) => return store_failure(&headers, &e),
    };

    let writer = state.writer.clone();
    let site_id = site.id;
    tokio::spawn(async move {
        let pipeline = BuildPipeline::new(writer.as_ref(), site_id);
        // Failures land in the stored status; nothing to surface here.
        let _ = pipeline.run(&plan, unix_millis()).await;
    });

    (StatusCode::ACCEPTED, Json(SiteSummary::from_site(&site))).into_response()
}

pub(crate) async fn revalidate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RevalidateRequest>, JsonRejection>,
) -> Response {
    let rid = request_id(&headers);
    let Some(expected) = state.api.revalidate_token.as_deref() else {
        return api_error_response(
            StatusCode::UNAUTHORIZED,
            ApiError::unauthorized().with_request_id(rid),
        );
    };
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if presented != Some(expected) {
        return api_error_response(
            StatusCode::UNAUTHORIZED,
            ApiError::unauthorized().with_request_id(rid),
        );
    }
    let Ok(Json(payload)) = payload else {
        return api_error_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_param("body", "malformed json").with_request_id(rid),
        );
    };
    let mut cache = state.render_cache.lock().await;
    let invalidated = payload
        .paths
        .iter()
        .filter(|path| cache.invalidate(&RenderCache::cache_key(&payload.site, path)))
        .count();
    (
        StatusCode::OK,
        Json(RevalidateResponse { invalidated }),
    )
        .into_response()
}
