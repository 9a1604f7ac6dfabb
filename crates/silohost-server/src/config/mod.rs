use silohost_routing::RoutingConfig;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub render_cache_ttl: Duration,
    pub render_cache_entries: usize,
    /// Bearer token for the internal revalidation endpoint. Unset disables
    /// the endpoint entirely.
    pub revalidate_token: Option<String>,
    pub enable_lead_dashboard_api: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 16 * 1024,
            request_timeout: Duration::from_secs(5),
            render_cache_ttl: Duration::from_secs(60),
            render_cache_entries: 1024,
            revalidate_token: None,
            enable_lead_dashboard_api: true,
        }
    }
}

pub fn validate_startup_config_contract(
    api: &ApiConfig,
    routing: &RoutingConfig,
) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("api size limits must be > 0".to_string());
    }
    if api.request_timeout.is_zero() {
        return Err("timeouts must be > 0".to_string());
    }
    if api.render_cache_entries == 0 || api.render_cache_ttl.is_zero() {
        return Err("render cache capacity and ttl must be > 0".to_string());
    }
    if routing.root_domain.trim().is_empty() || !routing.root_domain.contains('.') {
        return Err("root domain must be a registrable domain".to_string());
    }
    if routing.root_domain != routing.root_domain.to_ascii_lowercase() {
        return Err("root domain must be lowercase".to_string());
    }
    if api
        .revalidate_token
        .as_deref()
        .is_some_and(|t| t.trim().is_empty())
    {
        return Err("revalidate token must be non-empty when set".to_string());
    }
    Ok(())
}
