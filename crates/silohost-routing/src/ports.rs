use async_trait::async_trait;
use silohost_model::{
    Category, CategoryId, Location, LocationId, Neighborhood, Service, ServiceArea, Site, SiteId,
    Slug,
};
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub struct StoreError(pub String);

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Tenant lookups the site resolver needs. The data store behind it is
/// opaque; these are plain keyed reads.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn site_by_slug(&self, slug: &Slug) -> Result<Option<Site>, StoreError>;

    /// Must match only rows with `custom_domain_verified = true`. An
    /// unverified domain resolves as not found, by contract: serving it
    /// would hand the tenant's traffic to whoever claimed the name first.
    async fn site_by_verified_domain(&self, host: &str) -> Result<Option<Site>, StoreError>;

    /// Ordered location slugs, used to detect a location prefix in the path.
    async fn location_slugs(&self, site: SiteId) -> Result<Vec<Slug>, StoreError>;
}

/// Content lookups the content resolver needs, all scoped to one site.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn primary_category(&self, site: SiteId) -> Result<Option<Category>, StoreError>;

    /// Matches either spelling of a category segment (taxonomy machine name
    /// or normalized display name).
    async fn category_by_segment(
        &self,
        site: SiteId,
        segment: &str,
    ) -> Result<Option<Category>, StoreError>;

    /// Active services only, scoped to the given category id (not merely to
    /// the site) so slugs may repeat across categories.
    async fn service_in_category(
        &self,
        site: SiteId,
        category: CategoryId,
        slug: &str,
    ) -> Result<Option<Service>, StoreError>;

    async fn services_in_category(
        &self,
        site: SiteId,
        category: CategoryId,
    ) -> Result<Vec<Service>, StoreError>;

    async fn location_by_slug(
        &self,
        site: SiteId,
        slug: &str,
    ) -> Result<Option<Location>, StoreError>;

    async fn area_by_slug(
        &self,
        site: SiteId,
        slug: &str,
    ) -> Result<Option<ServiceArea>, StoreError>;

    async fn areas(&self, site: SiteId) -> Result<Vec<ServiceArea>, StoreError>;

    async fn neighborhood_by_slug(
        &self,
        site: SiteId,
        location: Option<LocationId>,
        slug: &str,
    ) -> Result<Option<Neighborhood>, StoreError>;

    async fn neighborhoods(
        &self,
        site: SiteId,
        location: Option<LocationId>,
    ) -> Result<Vec<Neighborhood>, StoreError>;
}
