mod support;

use serde_json::{json, Value};
use silohost_core::unix_millis;
use silohost_model::{build_failed, build_started, SiteStatus, BUILD_STALE_AFTER_MS};
use silohost_server::ApiConfig;
use silohost_store::{MemoryStore, SiteWriter};
use std::sync::Arc;
use support::{seed_acme, send, spawn_app};

const API_HOST: &str = "app.platform.com";

async fn api(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> (u16, Value) {
    let (status, _, body) = send(addr, method, API_HOST, path, body, &[]).await;
    let json = serde_json::from_str(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn lead_submission_lifecycle() {
    let store = Arc::new(MemoryStore::new());
    seed_acme(&store).await;
    let addr = spawn_app(store, ApiConfig::default()).await;

    let payload = json!({
        "name": "Jo Smith",
        "email": "jo@example.com",
        "service_slug": "drain-cleaning"
    })
    .to_string();
    let (status, lead) = api(addr, "POST", "/api/sites/acme/leads", Some(&payload)).await;
    assert_eq!(status, 201);
    assert_eq!(lead["status"], "new");
    let lead_id = lead["id"].as_i64().expect("lead id");

    let (status, leads) = api(addr, "GET", "/api/sites/acme/leads", None).await;
    assert_eq!(status, 200);
    assert_eq!(leads.as_array().expect("list").len(), 1);

    let (status, updated) = api(
        addr,
        "PATCH",
        &format!("/api/sites/acme/leads/{lead_id}"),
        Some(&json!({"status": "contacted"}).to_string()),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["status"], "contacted");

    let (status, err) = api(
        addr,
        "POST",
        "/api/sites/acme/leads",
        Some(&json!({"name": "   "}).to_string()),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(err["error"]["code"], "ValidationFailed");
}

#[tokio::test]
async fn non_active_sites_reject_lead_writes() {
    let store = Arc::new(MemoryStore::new());
    let site = seed_acme(&store).await;
    store
        .apply_status_change(site.id, &build_failed("generation died", 10))
        .await
        .expect("fail site");
    let addr = spawn_app(store, ApiConfig::default()).await;

    let (status, err) = api(
        addr,
        "POST",
        "/api/sites/acme/leads",
        Some(&json!({"name": "Jo"}).to_string()),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(err["error"]["code"], "SiteNotActive");
    assert_eq!(err["error"]["details"]["status"], "failed");
}

#[tokio::test]
async fn pause_and_resume_are_accepted_and_gate_the_public_tree() {
    let store = Arc::new(MemoryStore::new());
    seed_acme(&store).await;
    let addr = spawn_app(store, ApiConfig::default()).await;

    let (status, summary) = api(
        addr,
        "PATCH",
        "/api/sites/acme/status",
        Some(&json!({"status": "paused"}).to_string()),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(summary["status"], "paused");
    assert!(summary["status_message"].as_str().is_some());

    let (status, _, body) = send(addr, "GET", "acme.platform.com", "/plumbing", None, &[]).await;
    assert_eq!(status, 200);
    let page: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(page["status_page"], "maintenance");

    let (status, summary) = api(
        addr,
        "PATCH",
        "/api/sites/acme/status",
        Some(&json!({"status": "active"}).to_string()),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(summary["status"], "active");
    assert_eq!(summary["status_message"], Value::Null);
}

#[tokio::test]
async fn illegal_transitions_surface_the_allowed_set() {
    let store = Arc::new(MemoryStore::new());
    seed_acme(&store).await;
    let addr = spawn_app(store, ApiConfig::default()).await;

    let (status, err) = api(
        addr,
        "PATCH",
        "/api/sites/acme/status",
        Some(&json!({"status": "building"}).to_string()),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(err["error"]["code"], "InvalidTransition");
    assert_eq!(err["error"]["details"]["current"], "active");
    assert_eq!(err["error"]["details"]["allowed"], json!(["paused"]));

    let (status, err) = api(
        addr,
        "PATCH",
        "/api/sites/acme/status",
        Some(&json!({"status": "torched"}).to_string()),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(err["error"]["code"], "InvalidParameter");
}

#[tokio::test]
async fn retry_is_allowed_for_failed_and_stuck_builds_only() {
    let store = Arc::new(MemoryStore::new());
    let site = seed_acme(&store).await;
    let addr = spawn_app(store.clone(), ApiConfig::default()).await;

    store
        .apply_status_change(site.id, &build_failed("generation died", 10))
        .await
        .expect("fail site");
    let (status, summary) = api(addr, "POST", "/api/sites/acme/retry-build", None).await;
    assert_eq!(status, 202);
    assert_eq!(summary["status"], "building");
    assert_eq!(summary["progress"]["completed_tasks"], 0);

    // The build we just started is fresh, so a second retry is rejected.
    let (status, err) = api(addr, "POST", "/api/sites/acme/retry-build", None).await;
    assert_eq!(status, 409);
    assert_eq!(err["error"]["code"], "BuildInProgress");

    // Backdate the stamp past the staleness window: now it is a stuck build.
    store
        .apply_status_change(
            site.id,
            &build_started(5, unix_millis() - BUILD_STALE_AFTER_MS - 1_000),
        )
        .await
        .expect("backdate");
    let (status, summary) = api(addr, "POST", "/api/sites/acme/retry-build", None).await;
    assert_eq!(status, 202);
    assert_eq!(summary["status"], "building");

    // Active sites have nothing to retry.
    store
        .apply_status_change(site.id, &silohost_model::build_succeeded(5, unix_millis()))
        .await
        .expect("activate");
    let (status, err) = api(addr, "POST", "/api/sites/acme/retry-build", None).await;
    assert_eq!(status, 409);
    assert_eq!(err["error"]["code"], "InvalidTransition");
}

#[tokio::test]
async fn wizard_created_sites_build_in_the_background_and_go_live() {
    let store = Arc::new(MemoryStore::new());
    let addr = spawn_app(store.clone(), ApiConfig::default()).await;

    let payload = json!({
        "slug": "fresh",
        "website_type": "single_location",
        "import": {
            "business_name": "Fresh Cleaners",
            "primary_category": {
                "taxonomy_name": "house_cleaning_service",
                "display_name": "House Cleaning",
                "services": [{"name": "Deep Clean"}]
            },
            "service_areas": ["Round Rock"]
        }
    })
    .to_string();
    let (status, summary) = api(addr, "POST", "/api/sites", Some(&payload)).await;
    assert_eq!(status, 202);
    assert_eq!(summary["status"], "building");

    // Generation runs in the background; poll until it flips the status.
    let mut live = None;
    for _ in 0..100 {
        let (_, _, body) = send(addr, "GET", "fresh.platform.com", "/", None, &[]).await;
        let page: Value = serde_json::from_str(&body).expect("json");
        if page["page"] == "home" {
            live = Some(page);
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    let home = live.expect("site should become active");
    assert_eq!(home["category"]["name"], "House Cleaning");
    assert_eq!(home["services"][0]["canonical_path"], "/deep-clean");

    let (status, err) = api(addr, "POST", "/api/sites", Some(&payload)).await;
    assert_eq!(status, 409, "slug is taken: {err}");
}

#[tokio::test]
async fn duplicate_status_edits_race_last_write_wins() {
    let store = Arc::new(MemoryStore::new());
    let site = seed_acme(&store).await;
    // A user pause racing a build-completion callback: whichever writes last
    // owns the stored status.
    store
        .apply_status_change(
            site.id,
            &silohost_model::StatusChange {
                status: SiteStatus::Paused,
                message: None,
                progress: None,
                stamped_at_ms: 1_000,
            },
        )
        .await
        .expect("pause");
    store
        .apply_status_change(site.id, &silohost_model::build_succeeded(3, 1_001))
        .await
        .expect("completion callback");
    let current = store.site_by_id(site.id).await.expect("query").expect("site");
    assert_eq!(current.status, SiteStatus::Active);
}
