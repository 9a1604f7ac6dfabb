use crate::tenant::TenantResolution;
use serde::{Deserialize, Serialize};
use silohost_model::SiteStatus;

/// Global explanatory page for hosts that resolve to no tenant. Served with
/// HTTP 200: a misconfigured-DNS visitor gets told what is wrong instead of a
/// bare browser error.
pub const DOMAIN_NOT_FOUND_PATH: &str = "/domain-not-found";

/// Edge decision for one request. Every branch of the router terminates in
/// one of these; none may escape as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
#[non_exhaustive]
pub enum RouteAction {
    /// Pass through untouched (platform app, exempt paths).
    Next,
    /// Internal path substitution. Never an HTTP redirect: the externally
    /// visible URL must not change.
    Rewrite { target: String },
}

/// Paths the edge router never touches: build assets, API routes, the
/// dashboard/auth tree (session refresh happens elsewhere), health probes,
/// and already-canonicalized internal content paths.
#[must_use]
pub fn is_exempt_path(path: &str) -> bool {
    const EXEMPT_PREFIXES: &[&str] = &[
        "/_build/",
        "/static/",
        "/api/",
        "/dashboard",
        "/auth",
        "/sites/",
        "/healthz",
        "/readyz",
        "/metrics",
    ];
    path == DOMAIN_NOT_FOUND_PATH
        || path == "/favicon.ico"
        || path == "/robots.txt"
        || EXEMPT_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// The status page each non-active status gates to. `None` for active.
#[must_use]
pub fn status_page(status: SiteStatus) -> Option<&'static str> {
    match status {
        SiteStatus::Active => None,
        SiteStatus::Building => Some("coming-soon"),
        SiteStatus::Paused => Some("maintenance"),
        SiteStatus::Failed => Some("build-error"),
        SiteStatus::Suspended => Some("suspended"),
    }
}

/// Maps an inbound (tenant resolution, public path) pair to the internal
/// canonical form `/sites/{slug}[/locations/{loc}]/...` the rendering tree is
/// keyed by.
#[must_use]
pub fn route_request(resolution: &TenantResolution, path: &str) -> RouteAction {
    if is_exempt_path(path) {
        return RouteAction::Next;
    }
    let (site, location_slugs) = match resolution {
        TenantResolution::Platform => return RouteAction::Next,
        TenantResolution::NoMatch => {
            return RouteAction::Rewrite {
                target: DOMAIN_NOT_FOUND_PATH.to_string(),
            }
        }
        TenantResolution::Resolved {
            site,
            location_slugs,
        } => (site, location_slugs),
    };

    // Non-active sites gate every path to their status page.
    if let Some(page) = status_page(site.status) {
        return RouteAction::Rewrite {
            target: format!("/sites/{}/status/{page}", site.slug),
        };
    }

    let trimmed = path.trim_start_matches('/');
    if !trimmed.is_empty() {
        let (first, rest) = match trimmed.split_once('/') {
            Some((first, rest)) => (first, rest),
            None => (trimmed, ""),
        };
        if location_slugs.iter().any(|slug| slug.as_str() == first) {
            let target = if rest.is_empty() {
                format!("/sites/{}/locations/{first}", site.slug)
            } else {
                format!("/sites/{}/locations/{first}/{rest}", site.slug)
            };
            return RouteAction::Rewrite { target };
        }
    }

    // No location prefix: address the site directly. Unknown segments fall
    // through here and 404 downstream as site-scoped content.
    let target = if trimmed.is_empty() {
        format!("/sites/{}", site.slug)
    } else {
        format!("/sites/{}/{trimmed}", site.slug)
    };
    RouteAction::Rewrite { target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silohost_model::{
        BuildProgress, Site, SiteId, SiteSettings, SiteStatus, Slug, WebsiteType,
    };

    fn site(status: SiteStatus, website_type: WebsiteType) -> Site {
        Site {
            id: SiteId(1),
            slug: Slug::parse("acme").expect("slug"),
            custom_domain: None,
            custom_domain_verified: false,
            status,
            status_message: None,
            status_updated_at_ms: 0,
            website_type,
            progress: BuildProgress::default(),
            settings: SiteSettings::default(),
            created_at_ms: 0,
        }
    }

    fn resolved(status: SiteStatus, website_type: WebsiteType, locations: &[&str]) -> TenantResolution {
        TenantResolution::Resolved {
            site: site(status, website_type),
            location_slugs: locations
                .iter()
                .map(|l| Slug::parse(l).expect("slug"))
                .collect(),
        }
    }

    #[test]
    fn platform_traffic_and_exempt_paths_pass_through() {
        assert_eq!(
            route_request(&TenantResolution::Platform, "/pricing"),
            RouteAction::Next
        );
        let active = resolved(SiteStatus::Active, WebsiteType::SingleLocation, &[]);
        for path in [
            "/api/sites/acme/leads",
            "/dashboard/settings",
            "/auth/callback",
            "/sites/acme/about",
            "/_build/chunk.js",
            "/favicon.ico",
        ] {
            assert_eq!(route_request(&active, path), RouteAction::Next, "{path}");
        }
    }

    #[test]
    fn unmatched_hosts_rewrite_to_domain_not_found() {
        assert_eq!(
            route_request(&TenantResolution::NoMatch, "/anything"),
            RouteAction::Rewrite {
                target: DOMAIN_NOT_FOUND_PATH.to_string()
            }
        );
    }

    #[test]
    fn non_active_statuses_gate_every_path() {
        let cases = [
            (SiteStatus::Building, "coming-soon"),
            (SiteStatus::Paused, "maintenance"),
            (SiteStatus::Failed, "build-error"),
            (SiteStatus::Suspended, "suspended"),
        ];
        for (status, page) in cases {
            let resolution = resolved(status, WebsiteType::SingleLocation, &[]);
            for path in ["/", "/plumbing", "/areas/round-rock"] {
                assert_eq!(
                    route_request(&resolution, path),
                    RouteAction::Rewrite {
                        target: format!("/sites/acme/status/{page}")
                    },
                    "{status:?} {path}"
                );
            }
        }
    }

    #[test]
    fn active_single_location_rewrites_to_site_tree() {
        let resolution = resolved(SiteStatus::Active, WebsiteType::SingleLocation, &[]);
        assert_eq!(
            route_request(&resolution, "/"),
            RouteAction::Rewrite {
                target: "/sites/acme".to_string()
            }
        );
        assert_eq!(
            route_request(&resolution, "/plumbing/drain-cleaning"),
            RouteAction::Rewrite {
                target: "/sites/acme/plumbing/drain-cleaning".to_string()
            }
        );
    }

    #[test]
    fn multi_location_strips_a_matching_location_prefix() {
        let resolution = resolved(
            SiteStatus::Active,
            WebsiteType::MultiLocation,
            &["austin", "dallas"],
        );
        assert_eq!(
            route_request(&resolution, "/austin/plumbing"),
            RouteAction::Rewrite {
                target: "/sites/acme/locations/austin/plumbing".to_string()
            }
        );
        assert_eq!(
            route_request(&resolution, "/dallas"),
            RouteAction::Rewrite {
                target: "/sites/acme/locations/dallas".to_string()
            }
        );
        // No location match: pass the original path through to the default
        // rewrite, which 404s downstream.
        assert_eq!(
            route_request(&resolution, "/unknown-segment/plumbing"),
            RouteAction::Rewrite {
                target: "/sites/acme/unknown-segment/plumbing".to_string()
            }
        );
    }
}
