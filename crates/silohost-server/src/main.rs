#![forbid(unsafe_code)]

use silohost_core::{ENV_SILOHOST_DB_PATH, ENV_SILOHOST_ROOT_DOMAIN};
use silohost_routing::RoutingConfig;
use silohost_server::{build_router, validate_startup_config_contract, ApiConfig, AppState};
use silohost_store::SqliteStore;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(
        env::var(name)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(default_ms),
    )
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let root_domain = env_string(ENV_SILOHOST_ROOT_DOMAIN, "silohost.dev");
    let mut routing = RoutingConfig::new(root_domain)
        .with_preview_domains(env_list("SILOHOST_PREVIEW_DOMAINS"));
    for label in env_list("SILOHOST_RESERVED_SUBDOMAINS") {
        routing.reserved_subdomains.insert(label.to_ascii_lowercase());
    }

    let api = ApiConfig {
        max_body_bytes: env_usize("SILOHOST_MAX_BODY_BYTES", 16 * 1024),
        request_timeout: env_duration_ms("SILOHOST_REQUEST_TIMEOUT_MS", 5_000),
        render_cache_ttl: env_duration_ms("SILOHOST_RENDER_CACHE_TTL_MS", 60_000),
        render_cache_entries: env_usize("SILOHOST_RENDER_CACHE_ENTRIES", 1024),
        revalidate_token: env::var("SILOHOST_REVALIDATE_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty()),
        enable_lead_dashboard_api: env_bool("SILOHOST_ENABLE_LEAD_DASHBOARD_API", true),
    };

    if let Err(e) = validate_startup_config_contract(&api, &routing) {
        eprintln!("invalid configuration: {e}");
        std::process::exit(silohost_core::ExitCode::Usage as i32);
    }

    let db_path = PathBuf::from(env_string(ENV_SILOHOST_DB_PATH, "silohost.sqlite"));
    let store = match SqliteStore::open(&db_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("cannot open database at {}: {e}", db_path.display());
            std::process::exit(silohost_core::ExitCode::DependencyFailure as i32);
        }
    };

    let state = AppState::new(store, routing.clone(), api);
    let app = build_router(state);

    let bind = env_string("SILOHOST_BIND", "0.0.0.0:8080");
    let listener = match TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("cannot bind {bind}: {e}");
            std::process::exit(silohost_core::ExitCode::DependencyFailure as i32);
        }
    };
    info!(bind = %bind, root_domain = %routing.root_domain, "silohost server listening");
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("server error: {e}");
        std::process::exit(silohost_core::ExitCode::Internal as i32);
    }
}
