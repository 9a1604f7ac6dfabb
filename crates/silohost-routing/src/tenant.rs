use crate::config::RoutingConfig;
use crate::host::{classify_host, HostClass};
use crate::ports::{StoreError, TenantDirectory};
use silohost_model::{Site, Slug};

/// Outcome of mapping a `Host` header to a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TenantResolution {
    /// The platform app's own traffic; no tenant involved.
    Platform,
    /// Host looked tenant-shaped but no site matched (bad subdomain, absent
    /// or unverified custom domain).
    NoMatch,
    Resolved {
        site: Site,
        /// Ordered location slugs, populated only for multi-location sites;
        /// the edge router uses them to detect a location prefix.
        location_slugs: Vec<Slug>,
    },
}

pub async fn resolve_tenant(
    dir: &dyn TenantDirectory,
    cfg: &RoutingConfig,
    host: &str,
) -> Result<TenantResolution, StoreError> {
    let site = match classify_host(cfg, host) {
        HostClass::MainApp => return Ok(TenantResolution::Platform),
        HostClass::Subdomain(label) => match Slug::parse(&label) {
            Ok(slug) => dir.site_by_slug(&slug).await?,
            // A label that is not even slug-shaped cannot name a site.
            Err(_) => None,
        },
        HostClass::CustomDomain(domain) => dir.site_by_verified_domain(&domain).await?,
    };
    let Some(site) = site else {
        return Ok(TenantResolution::NoMatch);
    };
    let location_slugs = if site.website_type.is_multi_location() {
        dir.location_slugs(site.id).await?
    } else {
        Vec::new()
    };
    Ok(TenantResolution::Resolved {
        site,
        location_slugs,
    })
}
