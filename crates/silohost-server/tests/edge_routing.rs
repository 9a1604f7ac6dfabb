mod support;

use serde_json::Value;
use silohost_model::{SiteStatus, StatusChange};
use silohost_server::ApiConfig;
use silohost_store::{MemoryStore, SiteWriter};
use std::sync::Arc;
use support::{header_value, seed_acme, seed_bigco, send, spawn_app};

async fn get_page(
    addr: std::net::SocketAddr,
    host: &str,
    path: &str,
) -> (u16, Value) {
    let (status, _, body) = send(addr, "GET", host, path, None, &[]).await;
    let json = serde_json::from_str(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn acme_scenario_serves_every_expected_page_through_the_edge() {
    let store = Arc::new(MemoryStore::new());
    seed_acme(&store).await;
    let addr = spawn_app(store, ApiConfig::default()).await;
    let host = "acme.platform.com";

    let (status, home) = get_page(addr, host, "/").await;
    assert_eq!(status, 200);
    assert_eq!(home["page"], "home");
    assert_eq!(home["category"]["name"], "HVAC Repair");
    assert_eq!(home["canonical_path"], "/");

    // The primary category's own segment is the same logical page.
    let (status, aliased) = get_page(addr, host, "/hvac-repair").await;
    assert_eq!(status, 200);
    assert_eq!(aliased["page"], "home");

    let (status, service) = get_page(addr, host, "/ac-repair").await;
    assert_eq!(status, 200);
    assert_eq!(service["page"], "service");
    assert_eq!(service["name"], "AC Repair");
    assert_eq!(service["canonical_path"], "/ac-repair");

    let (status, listing) = get_page(addr, host, "/plumbing").await;
    assert_eq!(status, 200);
    assert_eq!(listing["page"], "category");
    assert_eq!(listing["services"][0]["canonical_path"], "/plumbing/drain-cleaning");

    let (status, nested) = get_page(addr, host, "/plumbing/drain-cleaning").await;
    assert_eq!(status, 200);
    assert_eq!(nested["page"], "service");
    assert_eq!(nested["name"], "Drain Cleaning");

    let (status, missing) = get_page(addr, host, "/drain-cleaning").await;
    assert_eq!(status, 404);
    assert_eq!(missing["page"], "not-found");
}

#[tokio::test]
async fn unmatched_hosts_get_the_domain_not_found_page_with_200() {
    let store = Arc::new(MemoryStore::new());
    seed_acme(&store).await;
    let addr = spawn_app(store, ApiConfig::default()).await;

    for host in ["nobody.platform.com", "strangers.example.net"] {
        let (status, page) = get_page(addr, host, "/anything").await;
        assert_eq!(status, 200, "{host}");
        assert_eq!(page["page"], "domain-not-found", "{host}");
    }
}

#[tokio::test]
async fn custom_domains_resolve_only_once_verified() {
    let store = Arc::new(MemoryStore::new());
    let site = seed_acme(&store).await;
    store
        .set_custom_domain(site.id, Some("acmehvac.com".to_string()))
        .await
        .expect("set domain");
    let addr = spawn_app(store.clone(), ApiConfig::default()).await;

    let (status, page) = get_page(addr, "acmehvac.com", "/").await;
    assert_eq!(status, 200);
    assert_eq!(page["page"], "domain-not-found", "unverified must fail closed");

    store.mark_domain_verified(site.id).await.expect("verify");
    let (status, page) = get_page(addr, "acmehvac.com", "/").await;
    assert_eq!(status, 200);
    assert_eq!(page["page"], "home");
}

#[tokio::test]
async fn paused_sites_gate_every_path_to_the_maintenance_page() {
    let store = Arc::new(MemoryStore::new());
    let site = seed_acme(&store).await;
    store
        .apply_status_change(
            site.id,
            &StatusChange {
                status: SiteStatus::Paused,
                message: Some("Back soon.".to_string()),
                progress: None,
                stamped_at_ms: 50,
            },
        )
        .await
        .expect("pause");
    let addr = spawn_app(store, ApiConfig::default()).await;

    for path in ["/", "/plumbing", "/areas/round-rock", "/deep/nested/path"] {
        let (status, page) = get_page(addr, "acme.platform.com", path).await;
        assert_eq!(status, 200, "{path}");
        assert_eq!(page["page"], "status", "{path}");
        assert_eq!(page["status_page"], "maintenance", "{path}");
        assert_eq!(page["message"], "Back soon.", "{path}");
    }
}

#[tokio::test]
async fn bigco_location_prefixes_route_to_location_scoped_pages() {
    let store = Arc::new(MemoryStore::new());
    seed_bigco(&store).await;
    let addr = spawn_app(store, ApiConfig::default()).await;
    let host = "bigco.platform.com";

    let (status, page) = get_page(addr, host, "/austin").await;
    assert_eq!(status, 200);
    assert_eq!(page["page"], "home");
    assert_eq!(page["location"], "austin");
    assert_eq!(page["canonical_path"], "/austin");

    let (status, page) = get_page(addr, host, "/austin/plumbing").await;
    assert_eq!(status, 200);
    assert_eq!(page["page"], "category");
    assert_eq!(page["canonical_path"], "/austin/plumbing");
    assert_eq!(
        page["services"][0]["canonical_path"],
        "/austin/plumbing/drain-cleaning"
    );

    // No location match: the unmodified path falls through and 404s.
    let (status, page) = get_page(addr, host, "/unknown-segment/plumbing").await;
    assert_eq!(status, 404);
    assert_eq!(page["page"], "not-found");

    // Location-scoped content is not addressable without the prefix.
    let (status, _) = get_page(addr, host, "/plumbing").await;
    assert_eq!(status, 404);

    // Static pages are valid site-direct paths.
    let (status, page) = get_page(addr, host, "/about").await;
    assert_eq!(status, 200);
    assert_eq!(page["page"], "static-page");
}

#[tokio::test]
async fn repeated_renders_are_served_from_cache_with_etags() {
    let store = Arc::new(MemoryStore::new());
    seed_acme(&store).await;
    let addr = spawn_app(store, ApiConfig::default()).await;
    let host = "acme.platform.com";

    let (status, head, body) = send(addr, "GET", host, "/plumbing", None, &[]).await;
    assert_eq!(status, 200);
    let etag = header_value(&head, "etag").expect("etag header");
    assert!(!body.is_empty());

    let (status, head2, body2) =
        send(addr, "GET", host, "/plumbing", None, &[("If-None-Match", &etag)]).await;
    assert_eq!(status, 304);
    assert_eq!(header_value(&head2, "etag").as_deref(), Some(etag.as_str()));
    assert!(body2.is_empty());
}
