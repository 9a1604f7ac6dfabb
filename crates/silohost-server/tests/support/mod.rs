use silohost_model::{build_succeeded, Site, Slug, WebsiteType};
use silohost_routing::RoutingConfig;
use silohost_server::{build_router, ApiConfig, AppState};
use silohost_store::{MemoryStore, NewCategory, NewLocation, NewService, NewSite, SiteWriter};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const ROOT_DOMAIN: &str = "platform.com";

pub fn slug(s: &str) -> Slug {
    Slug::parse(s).expect("slug")
}

pub async fn spawn_app(store: Arc<MemoryStore>, api: ApiConfig) -> SocketAddr {
    let state = AppState::new(store, RoutingConfig::new(ROOT_DOMAIN), api);
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });
    addr
}

/// One HTTP/1.1 exchange over a raw socket. Returns (status, head, body).
pub async fn send(
    addr: SocketAddr,
    method: &str,
    host: &str,
    path: &str,
    body: Option<&str>,
    extra_headers: &[(&str, &str)],
) -> (u16, String, String) {
    let mut request = format!("{method} {path} HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n");
    for (name, value) in extra_headers {
        request.push_str(&format!("{name}: {value}\r\n"));
    }
    if let Some(body) = body {
        request.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ));
    } else {
        request.push_str("\r\n");
    }

    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");

    let status: u16 = response
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .map(|(h, b)| (h.to_string(), b.to_string()))
        .unwrap_or((response.clone(), String::new()));
    (status, head, body)
}

pub fn header_value(head: &str, name: &str) -> Option<String> {
    head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name)
            .then(|| value.trim().to_string())
    })
}

pub async fn activate(store: &MemoryStore, site: &Site) {
    store
        .apply_status_change(site.id, &build_succeeded(0, 2))
        .await
        .expect("activate");
}

/// Single-location site `acme`: primary "HVAC Repair" with `ac-repair`,
/// secondary "Plumbing" with `drain-cleaning`.
pub async fn seed_acme(store: &MemoryStore) -> Site {
    let site = store
        .insert_site(NewSite {
            slug: slug("acme"),
            website_type: WebsiteType::SingleLocation,
            settings: Default::default(),
            created_at_ms: 1,
        })
        .await
        .expect("insert site");
    activate(store, &site).await;
    seed_categories(store, &site).await;
    site
}

/// Multi-location site `bigco` with locations `austin` and `dallas` and the
/// same category tree as `acme`.
pub async fn seed_bigco(store: &MemoryStore) -> Site {
    let site = store
        .insert_site(NewSite {
            slug: slug("bigco"),
            website_type: WebsiteType::MultiLocation,
            settings: Default::default(),
            created_at_ms: 1,
        })
        .await
        .expect("insert site");
    activate(store, &site).await;
    for (index, name) in ["Austin", "Dallas"].iter().enumerate() {
        store
            .insert_location(NewLocation {
                site_id: site.id,
                slug: slug(&name.to_lowercase()),
                name: (*name).to_string(),
                is_primary: index == 0,
                sort_index: index as i64,
            })
            .await
            .expect("location");
    }
    seed_categories(store, &site).await;
    site
}

async fn seed_categories(store: &MemoryStore, site: &Site) {
    let hvac = store
        .insert_category(NewCategory {
            site_id: site.id,
            taxonomy_name: "hvac_contractor".to_string(),
            display_name: "HVAC Repair".to_string(),
            is_primary: true,
            sort_index: 0,
        })
        .await
        .expect("primary category");
    let plumbing = store
        .insert_category(NewCategory {
            site_id: site.id,
            taxonomy_name: "plumber".to_string(),
            display_name: "Plumbing".to_string(),
            is_primary: false,
            sort_index: 1,
        })
        .await
        .expect("secondary category");
    store
        .insert_service(NewService {
            site_id: site.id,
            category_id: hvac.id,
            slug: slug("ac-repair"),
            name: "AC Repair".to_string(),
            description: None,
            active: true,
            sort_index: 0,
        })
        .await
        .expect("service");
    store
        .insert_service(NewService {
            site_id: site.id,
            category_id: plumbing.id,
            slug: slug("drain-cleaning"),
            name: "Drain Cleaning".to_string(),
            description: None,
            active: true,
            sort_index: 0,
        })
        .await
        .expect("service");
}
