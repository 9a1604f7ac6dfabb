use async_trait::async_trait;
use silohost_model::{
    BuildProgress, Category, CategoryId, Lead, LeadId, LeadStatus, Location, LocationId,
    Neighborhood, Service, ServiceArea, Site, SiteId, SiteSettings, Slug, StatusChange,
    WebsiteType,
};
use silohost_routing::StoreError;

#[derive(Debug, Clone)]
pub struct NewSite {
    pub slug: Slug,
    pub website_type: WebsiteType,
    pub settings: SiteSettings,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub site_id: SiteId,
    pub slug: Slug,
    pub name: String,
    pub is_primary: bool,
    pub sort_index: i64,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub site_id: SiteId,
    pub taxonomy_name: String,
    pub display_name: String,
    pub is_primary: bool,
    pub sort_index: i64,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub site_id: SiteId,
    pub category_id: CategoryId,
    pub slug: Slug,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub sort_index: i64,
}

#[derive(Debug, Clone)]
pub struct NewServiceArea {
    pub site_id: SiteId,
    pub slug: Slug,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewNeighborhood {
    pub site_id: SiteId,
    pub location_id: Option<LocationId>,
    pub slug: Slug,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewLead {
    pub site_id: SiteId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub service_slug: Option<String>,
    pub created_at_ms: i64,
}

/// Mutations against the site tree. The dashboard, the build pipeline, and
/// the lead endpoint all write through this trait; nothing bypasses it.
#[async_trait]
pub trait SiteWriter: Send + Sync {
    /// Creates the site in `building` status with empty progress counters.
    async fn insert_site(&self, new: NewSite) -> Result<Site, StoreError>;

    async fn site_by_id(&self, site: SiteId) -> Result<Option<Site>, StoreError>;

    /// Persists a [`StatusChange`] as one write. Concurrent writers race
    /// last-write-wins; transitions are infrequent and operator-triggered.
    async fn apply_status_change(
        &self,
        site: SiteId,
        change: &StatusChange,
    ) -> Result<(), StoreError>;

    /// Updates the progress snapshot and the status stamp, so a live build
    /// never looks stuck.
    async fn record_build_progress(
        &self,
        site: SiteId,
        progress: &BuildProgress,
        now_ms: i64,
    ) -> Result<(), StoreError>;

    async fn insert_location(&self, new: NewLocation) -> Result<Location, StoreError>;
    async fn insert_category(&self, new: NewCategory) -> Result<Category, StoreError>;
    async fn insert_service(&self, new: NewService) -> Result<Service, StoreError>;
    async fn insert_area(&self, new: NewServiceArea) -> Result<ServiceArea, StoreError>;
    async fn insert_neighborhood(&self, new: NewNeighborhood) -> Result<Neighborhood, StoreError>;

    /// Rejects writes for sites that are not `active`.
    async fn insert_lead(&self, new: NewLead) -> Result<Lead, StoreError>;

    /// Status is the only lead field mutable after creation.
    async fn update_lead_status(
        &self,
        site: SiteId,
        lead: LeadId,
        status: LeadStatus,
    ) -> Result<Option<Lead>, StoreError>;

    async fn leads_for_site(&self, site: SiteId) -> Result<Vec<Lead>, StoreError>;

    /// Setting a new domain always clears the verified flag; verification is
    /// a separate, later write once DNS has been checked out-of-band.
    async fn set_custom_domain(
        &self,
        site: SiteId,
        domain: Option<String>,
    ) -> Result<(), StoreError>;

    async fn mark_domain_verified(&self, site: SiteId) -> Result<(), StoreError>;

    async fn update_settings(&self, site: SiteId, settings: &SiteSettings)
        -> Result<(), StoreError>;

    /// Deletes the site and, by cascade, every content entity it owns.
    async fn delete_site(&self, site: SiteId) -> Result<(), StoreError>;
}
