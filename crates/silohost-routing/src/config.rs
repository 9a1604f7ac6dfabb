use std::collections::HashSet;

/// Global routing state, injected rather than read from the environment so
/// the classifier stays testable without process-wide coupling.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Platform apex, e.g. `silohost.com`. Tenant subdomains hang off it.
    pub root_domain: String,
    /// Leftmost labels that never address a tenant.
    pub reserved_subdomains: HashSet<String>,
    /// Deployment-preview hosts (exact or suffix match) served by the
    /// platform app, never by a tenant.
    pub preview_domains: Vec<String>,
}

impl RoutingConfig {
    #[must_use]
    pub fn new(root_domain: impl Into<String>) -> Self {
        Self {
            root_domain: root_domain.into().to_ascii_lowercase(),
            reserved_subdomains: ["www", "admin", "app", "api"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            preview_domains: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_preview_domains(mut self, domains: Vec<String>) -> Self {
        self.preview_domains = domains
            .into_iter()
            .map(|d| d.to_ascii_lowercase())
            .collect();
        self
    }

    pub(crate) fn is_reserved(&self, label: &str) -> bool {
        self.reserved_subdomains.contains(label)
    }

    pub(crate) fn is_preview_host(&self, host: &str) -> bool {
        self.preview_domains
            .iter()
            .any(|d| host == d || host.ends_with(&format!(".{d}")))
    }
}
