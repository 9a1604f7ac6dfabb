use crate::config::RoutingConfig;

/// What the `Host` header addresses, before any store lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostClass {
    /// Root domain, reserved subdomains, preview hosts, localhost, bare IPs:
    /// served by the platform app, not by a tenant.
    MainApp,
    /// `{label}.{root_domain}` with an unreserved label: candidate site slug.
    Subdomain(String),
    /// Any other host: candidate custom domain, verified-only at lookup time.
    CustomDomain(String),
}

#[must_use]
pub fn classify_host(cfg: &RoutingConfig, raw_host: &str) -> HostClass {
    let host = strip_port(raw_host.trim()).to_ascii_lowercase();
    if host.is_empty() {
        return HostClass::MainApp;
    }
    if host == cfg.root_domain {
        return HostClass::MainApp;
    }
    if let Some(rest) = host.strip_suffix(&format!(".{}", cfg.root_domain)) {
        // Leftmost label is the candidate slug; deeper labels never are.
        let label = rest.split('.').next().unwrap_or(rest);
        if label.is_empty() || cfg.is_reserved(label) || label == cfg.root_domain {
            return HostClass::MainApp;
        }
        return HostClass::Subdomain(label.to_string());
    }
    if host == "localhost" || host.parse::<std::net::IpAddr>().is_ok() || cfg.is_preview_host(&host)
    {
        return HostClass::MainApp;
    }
    HostClass::CustomDomain(host)
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // Bracketed IPv6 literal, possibly with a port after the bracket.
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) && !name.contains(':') => {
            name
        }
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> RoutingConfig {
        RoutingConfig::new("platform.com")
            .with_preview_domains(vec!["vercel.app".to_string()])
    }

    #[test]
    fn root_and_reserved_labels_are_main_app() {
        let cfg = cfg();
        for host in [
            "platform.com",
            "platform.com:3000",
            "www.platform.com",
            "admin.platform.com",
            "app.platform.com",
            "api.platform.com",
        ] {
            assert_eq!(classify_host(&cfg, host), HostClass::MainApp, "{host}");
        }
    }

    #[test]
    fn tenant_subdomains_yield_the_leftmost_label() {
        let cfg = cfg();
        assert_eq!(
            classify_host(&cfg, "acme.platform.com"),
            HostClass::Subdomain("acme".to_string())
        );
        assert_eq!(
            classify_host(&cfg, "Acme.Platform.Com:8080"),
            HostClass::Subdomain("acme".to_string())
        );
        assert_eq!(
            classify_host(&cfg, "a.b.platform.com"),
            HostClass::Subdomain("a".to_string())
        );
    }

    #[test]
    fn localhost_ips_and_previews_never_become_custom_domains() {
        let cfg = cfg();
        for host in [
            "localhost",
            "localhost:3000",
            "127.0.0.1",
            "127.0.0.1:8080",
            "[::1]:3000",
            "my-branch.vercel.app",
            "vercel.app",
        ] {
            assert_eq!(classify_host(&cfg, host), HostClass::MainApp, "{host}");
        }
    }

    #[test]
    fn other_hosts_are_custom_domain_candidates() {
        let cfg = cfg();
        assert_eq!(
            classify_host(&cfg, "www.acmehvac.com"),
            HostClass::CustomDomain("www.acmehvac.com".to_string())
        );
        assert_eq!(
            classify_host(&cfg, "acmehvac.com:443"),
            HostClass::CustomDomain("acmehvac.com".to_string())
        );
    }
}
