#![forbid(unsafe_code)]
//! Silohost model SSOT.
//!
//! Every tenant-facing entity (sites, locations, categories, services, areas,
//! neighborhoods, leads) and the site lifecycle rules live here. The routing
//! crate consumes these types; storage persists them; nothing else defines
//! domain shapes.

mod content;
mod lead;
mod site;
mod slug;
mod status;

pub use content::{
    Category, CategoryId, Location, LocationId, Neighborhood, NeighborhoodId, Service,
    ServiceArea, ServiceAreaId, ServiceId,
};
pub use lead::{Lead, LeadId, LeadStatus};
pub use site::{
    parse_site_status, parse_website_type, BuildProgress, Site, SiteId, SiteSettings, SiteStatus,
    WebsiteType,
};
pub use slug::{slugify, Slug, ValidationError, SLUG_MAX_LEN};
pub use status::{
    allowed_user_transitions, apply_user_transition, build_failed, build_started,
    build_succeeded, retry_build, RetryError, StatusChange, TransitionError,
    BUILD_STALE_AFTER_MS, PAUSED_DEFAULT_MESSAGE,
};

pub const CRATE_NAME: &str = "silohost-model";
