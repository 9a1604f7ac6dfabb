#![forbid(unsafe_code)]
//! The silohost service: one axum tree serving every tenant site.
//!
//! The edge middleware classifies the `Host` header, resolves the tenant,
//! gates on site status, and rewrites the request into the internal
//! `/sites/{slug}[/locations/{loc}]/...` form; the handlers then resolve
//! content and render JSON page models. Rewrites are internal only, so the
//! externally visible URL is always the canonical one the path builder made.

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::Router;
use silohost_routing::{ContentSource, RoutingConfig, TenantDirectory};
use silohost_store::SiteWriter;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;
use tokio::sync::Mutex;

mod cache;
pub mod config;
mod http;
mod middleware;

pub use cache::render::{CachedPage, RenderCache};
pub use config::{validate_startup_config_contract, ApiConfig};

pub const CRATE_NAME: &str = "silohost-server";

#[derive(Default)]
pub(crate) struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
}

impl RequestMetrics {
    pub(crate) async fn observe_request(&self, route: &str, status: StatusCode) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
    }

    pub(crate) async fn render_text(&self) -> String {
        let counts = self.counts.lock().await;
        let mut lines: Vec<String> = counts
            .iter()
            .map(|((route, status), count)| {
                format!("silohost_requests_total{{route=\"{route}\",status=\"{status}\"}} {count}")
            })
            .collect();
        lines.sort();
        lines.join("\n")
    }
}

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn TenantDirectory>,
    pub content: Arc<dyn ContentSource>,
    pub writer: Arc<dyn SiteWriter>,
    pub routing: Arc<RoutingConfig>,
    pub api: Arc<ApiConfig>,
    pub ready: Arc<AtomicBool>,
    pub(crate) render_cache: Arc<Mutex<RenderCache>>,
    pub(crate) metrics: Arc<RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, routing: RoutingConfig, api: ApiConfig) -> Self
    where
        S: TenantDirectory + ContentSource + SiteWriter + 'static,
    {
        let render_cache = RenderCache::new(api.render_cache_ttl, api.render_cache_entries);
        Self {
            directory: store.clone(),
            content: store.clone(),
            writer: store,
            routing: Arc::new(routing),
            api: Arc::new(api),
            ready: Arc::new(AtomicBool::new(true)),
            render_cache: Arc::new(Mutex::new(render_cache)),
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .route(
            "/domain-not-found",
            get(http::handlers::domain_not_found_handler),
        )
        .route("/sites/:slug", get(http::handlers::site_home_handler))
        .route("/sites/:slug/*path", get(http::handlers::site_path_handler))
        .route("/api/sites", post(http::handlers::create_site_handler))
        .route(
            "/api/sites/:slug/leads",
            post(http::handlers::submit_lead_handler).get(http::handlers::list_leads_handler),
        )
        .route(
            "/api/sites/:slug/leads/:lead_id",
            patch(http::handlers::update_lead_handler),
        )
        .route(
            "/api/sites/:slug/status",
            patch(http::handlers::transition_status_handler),
        )
        .route(
            "/api/sites/:slug/retry-build",
            post(http::handlers::retry_build_handler),
        )
        .route("/api/revalidate", post(http::handlers::revalidate_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::edge::edge_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
