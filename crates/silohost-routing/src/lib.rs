#![forbid(unsafe_code)]
//! Path construction and request resolution for tenant sites.
//!
//! Four layers, leaf first: the pure path builder ([`path`]), the host
//! classifier ([`host`]), the tenant and content resolvers ([`tenant`],
//! [`resolve`]) over narrow async store ports ([`ports`]), and the edge
//! routing decision ([`edge`]) the server middleware applies. Path building
//! and path resolution are bidirectional views of the same URL rules; any
//! change to one must be mirrored in the other.

mod config;
mod edge;
mod host;
mod path;
mod ports;
mod resolve;
mod tenant;

pub use config::RoutingConfig;
pub use edge::{is_exempt_path, route_request, status_page, RouteAction, DOMAIN_NOT_FOUND_PATH};
pub use host::{classify_host, HostClass};
pub use path::{PathScope, StaticPage};
pub use ports::{ContentSource, StoreError, TenantDirectory};
pub use resolve::{resolve_content, ResolvedPage};
pub use tenant::{resolve_tenant, TenantResolution};

pub const CRATE_NAME: &str = "silohost-routing";
