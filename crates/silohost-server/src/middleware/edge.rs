use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header::HOST, Request, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use silohost_api::ApiError;
use silohost_routing::{is_exempt_path, resolve_tenant, route_request, RouteAction};
use tracing::{debug, warn};

/// The entry point of the routing core: classifies the `Host` header,
/// resolves the tenant and its status, and rewrites the request path into
/// the internal canonical form. Rewrites are URI substitutions, never
/// redirects, so the visitor keeps the canonical URL.
pub(crate) async fn edge_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_exempt_path(&path) {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let resolution = match resolve_tenant(state.directory.as_ref(), &state.routing, &host).await {
        Ok(resolution) => resolution,
        Err(e) => {
            // Store outage: answer with a handled 503, never an unhandled
            // failure bubbling into a platform-default error page.
            warn!(host = %host, error = %e, "tenant lookup failed");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": ApiError::internal("tenant lookup unavailable")})),
            )
                .into_response();
        }
    };

    match route_request(&resolution, &path) {
        RouteAction::Next => next.run(request).await,
        RouteAction::Rewrite { target } => {
            debug!(host = %host, from = %path, to = %target, "edge rewrite");
            let rewritten = match request.uri().query() {
                Some(query) => format!("{target}?{query}"),
                None => target,
            };
            match rewritten.parse::<Uri>() {
                Ok(uri) => *request.uri_mut() = uri,
                Err(e) => {
                    warn!(target = %rewritten, error = %e, "rewrite target not a valid uri");
                }
            }
            next.run(request).await
        }
        // `RouteAction` is `#[non_exhaustive]`; no future variant exists today.
        // Pass through untouched, matching the `Next` contract.
        _ => next.run(request).await,
    }
}
