use crate::writer::{
    NewCategory, NewLead, NewLocation, NewNeighborhood, NewService, NewServiceArea, NewSite,
    SiteWriter,
};
use async_trait::async_trait;
use silohost_model::{
    BuildProgress, Category, CategoryId, Lead, LeadId, LeadStatus, Location, LocationId,
    Neighborhood, NeighborhoodId, Service, ServiceArea, ServiceAreaId, ServiceId, Site, SiteId,
    SiteSettings, SiteStatus, Slug, StatusChange,
};
use silohost_routing::{ContentSource, StoreError, TenantDirectory};
use tokio::sync::Mutex;

#[derive(Default)]
struct Inner {
    sites: Vec<Site>,
    locations: Vec<Location>,
    categories: Vec<Category>,
    services: Vec<Service>,
    areas: Vec<ServiceArea>,
    neighborhoods: Vec<Neighborhood>,
    leads: Vec<Lead>,
    next_id: i64,
}

impl Inner {
    fn next(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory mirror of [`crate::SqliteStore`]'s surface, for tests. Shares
/// the same uniqueness rules where resolvers depend on them.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        let _ = self.inner.lock().await;
        Ok(())
    }
}

#[async_trait]
impl TenantDirectory for MemoryStore {
    async fn site_by_slug(&self, slug: &Slug) -> Result<Option<Site>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.sites.iter().find(|s| &s.slug == slug).cloned())
    }

    async fn site_by_verified_domain(&self, host: &str) -> Result<Option<Site>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .sites
            .iter()
            .find(|s| s.custom_domain_verified && s.custom_domain.as_deref() == Some(host))
            .cloned())
    }

    async fn location_slugs(&self, site: SiteId) -> Result<Vec<Slug>, StoreError> {
        let inner = self.inner.lock().await;
        let mut locations: Vec<&Location> = inner
            .locations
            .iter()
            .filter(|l| l.site_id == site)
            .collect();
        locations.sort_by_key(|l| (l.sort_index, l.id));
        Ok(locations.into_iter().map(|l| l.slug.clone()).collect())
    }
}

#[async_trait]
impl ContentSource for MemoryStore {
    async fn primary_category(&self, site: SiteId) -> Result<Option<Category>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .categories
            .iter()
            .find(|c| c.site_id == site && c.is_primary)
            .cloned())
    }

    async fn category_by_segment(
        &self,
        site: SiteId,
        segment: &str,
    ) -> Result<Option<Category>, StoreError> {
        let inner = self.inner.lock().await;
        let mut categories: Vec<&Category> = inner
            .categories
            .iter()
            .filter(|c| c.site_id == site)
            .collect();
        categories.sort_by_key(|c| (c.sort_index, c.id));
        Ok(categories
            .into_iter()
            .find(|c| c.matches_segment(segment))
            .cloned())
    }

    async fn service_in_category(
        &self,
        site: SiteId,
        category: CategoryId,
        slug: &str,
    ) -> Result<Option<Service>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .services
            .iter()
            .find(|s| {
                s.site_id == site
                    && s.category_id == category
                    && s.active
                    && s.slug.as_str() == slug
            })
            .cloned())
    }

    async fn services_in_category(
        &self,
        site: SiteId,
        category: CategoryId,
    ) -> Result<Vec<Service>, StoreError> {
        let inner = self.inner.lock().await;
        let mut services: Vec<Service> = inner
            .services
            .iter()
            .filter(|s| s.site_id == site && s.category_id == category && s.active)
            .cloned()
            .collect();
        services.sort_by_key(|s| (s.sort_index, s.id));
        Ok(services)
    }

    async fn location_by_slug(
        &self,
        site: SiteId,
        slug: &str,
    ) -> Result<Option<Location>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .locations
            .iter()
            .find(|l| l.site_id == site && l.slug.as_str() == slug)
            .cloned())
    }

    async fn area_by_slug(
        &self,
        site: SiteId,
        slug: &str,
    ) -> Result<Option<ServiceArea>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .areas
            .iter()
            .find(|a| a.site_id == site && a.slug.as_str() == slug)
            .cloned())
    }

    async fn areas(&self, site: SiteId) -> Result<Vec<ServiceArea>, StoreError> {
        let inner = self.inner.lock().await;
        let mut areas: Vec<ServiceArea> = inner
            .areas
            .iter()
            .filter(|a| a.site_id == site)
            .cloned()
            .collect();
        areas.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(areas)
    }

    async fn neighborhood_by_slug(
        &self,
        site: SiteId,
        location: Option<LocationId>,
        slug: &str,
    ) -> Result<Option<Neighborhood>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .neighborhoods
            .iter()
            .find(|n| n.site_id == site && n.location_id == location && n.slug.as_str() == slug)
            .cloned())
    }

    async fn neighborhoods(
        &self,
        site: SiteId,
        location: Option<LocationId>,
    ) -> Result<Vec<Neighborhood>, StoreError> {
        let inner = self.inner.lock().await;
        let mut neighborhoods: Vec<Neighborhood> = inner
            .neighborhoods
            .iter()
            .filter(|n| n.site_id == site && n.location_id == location)
            .cloned()
            .collect();
        neighborhoods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(neighborhoods)
    }
}

#[async_trait]
impl SiteWriter for MemoryStore {
    async fn insert_site(&self, new: NewSite) -> Result<Site, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.sites.iter().any(|s| s.slug == new.slug) {
            return Err(StoreError(format!("site slug already taken: {}", new.slug)));
        }
        let site = Site {
            id: SiteId(inner.next()),
            slug: new.slug,
            custom_domain: None,
            custom_domain_verified: false,
            status: SiteStatus::Building,
            status_message: None,
            status_updated_at_ms: new.created_at_ms,
            website_type: new.website_type,
            progress: BuildProgress::default(),
            settings: new.settings,
            created_at_ms: new.created_at_ms,
        };
        inner.sites.push(site.clone());
        Ok(site)
    }

    async fn site_by_id(&self, site: SiteId) -> Result<Option<Site>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.sites.iter().find(|s| s.id == site).cloned())
    }

    async fn apply_status_change(
        &self,
        site: SiteId,
        change: &StatusChange,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(row) = inner.sites.iter_mut().find(|s| s.id == site) else {
            return Err(StoreError("site not found".to_string()));
        };
        row.status = change.status;
        row.status_message = change.message.clone();
        row.status_updated_at_ms = change.stamped_at_ms;
        if let Some(progress) = &change.progress {
            row.progress = progress.clone();
        }
        Ok(())
    }

    async fn record_build_progress(
        &self,
        site: SiteId,
        progress: &BuildProgress,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(row) = inner.sites.iter_mut().find(|s| s.id == site) else {
            return Err(StoreError("site not found".to_string()));
        };
        row.progress = progress.clone();
        row.status_updated_at_ms = now_ms;
        Ok(())
    }

    async fn insert_location(&self, new: NewLocation) -> Result<Location, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner
            .locations
            .iter()
            .any(|l| l.site_id == new.site_id && l.slug == new.slug)
        {
            return Err(StoreError(format!("location slug already taken: {}", new.slug)));
        }
        let location = Location {
            id: LocationId(inner.next()),
            site_id: new.site_id,
            slug: new.slug,
            name: new.name,
            is_primary: new.is_primary,
            sort_index: new.sort_index,
        };
        inner.locations.push(location.clone());
        Ok(location)
    }

    async fn insert_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner
            .categories
            .iter()
            .any(|c| c.site_id == new.site_id && c.taxonomy_name == new.taxonomy_name)
        {
            return Err(StoreError(format!(
                "category already attached: {}",
                new.taxonomy_name
            )));
        }
        let category = Category {
            id: CategoryId(inner.next()),
            site_id: new.site_id,
            taxonomy_name: new.taxonomy_name,
            display_name: new.display_name,
            is_primary: new.is_primary,
            sort_index: new.sort_index,
        };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn insert_service(&self, new: NewService) -> Result<Service, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner
            .services
            .iter()
            .any(|s| s.category_id == new.category_id && s.slug == new.slug)
        {
            return Err(StoreError(format!("service slug already taken: {}", new.slug)));
        }
        let service = Service {
            id: ServiceId(inner.next()),
            site_id: new.site_id,
            category_id: new.category_id,
            slug: new.slug,
            name: new.name,
            description: new.description,
            active: new.active,
            sort_index: new.sort_index,
        };
        inner.services.push(service.clone());
        Ok(service)
    }

    async fn insert_area(&self, new: NewServiceArea) -> Result<ServiceArea, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner
            .areas
            .iter()
            .any(|a| a.site_id == new.site_id && a.slug == new.slug)
        {
            return Err(StoreError(format!("area slug already taken: {}", new.slug)));
        }
        let area = ServiceArea {
            id: ServiceAreaId(inner.next()),
            site_id: new.site_id,
            slug: new.slug,
            name: new.name,
        };
        inner.areas.push(area.clone());
        Ok(area)
    }

    async fn insert_neighborhood(&self, new: NewNeighborhood) -> Result<Neighborhood, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.neighborhoods.iter().any(|n| {
            n.site_id == new.site_id && n.location_id == new.location_id && n.slug == new.slug
        }) {
            return Err(StoreError(format!(
                "neighborhood slug already taken: {}",
                new.slug
            )));
        }
        let neighborhood = Neighborhood {
            id: NeighborhoodId(inner.next()),
            site_id: new.site_id,
            location_id: new.location_id,
            slug: new.slug,
            name: new.name,
        };
        inner.neighborhoods.push(neighborhood.clone());
        Ok(neighborhood)
    }

    async fn insert_lead(&self, new: NewLead) -> Result<Lead, StoreError> {
        let mut inner = self.inner.lock().await;
        match inner.sites.iter().find(|s| s.id == new.site_id) {
            Some(site) if site.status.is_active() => {}
            Some(site) => {
                return Err(StoreError(format!(
                    "leads are only accepted for active sites (status: {})",
                    site.status
                )))
            }
            None => return Err(StoreError("site not found".to_string())),
        }
        let lead = Lead {
            id: LeadId(inner.next()),
            site_id: new.site_id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            message: new.message,
            service_slug: new.service_slug,
            status: LeadStatus::New,
            created_at_ms: new.created_at_ms,
        };
        inner.leads.push(lead.clone());
        Ok(lead)
    }

    async fn update_lead_status(
        &self,
        site: SiteId,
        lead: LeadId,
        status: LeadStatus,
    ) -> Result<Option<Lead>, StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(row) = inner
            .leads
            .iter_mut()
            .find(|l| l.id == lead && l.site_id == site)
        else {
            return Ok(None);
        };
        row.status = status;
        Ok(Some(row.clone()))
    }

    async fn leads_for_site(&self, site: SiteId) -> Result<Vec<Lead>, StoreError> {
        let inner = self.inner.lock().await;
        let mut leads: Vec<Lead> = inner
            .leads
            .iter()
            .filter(|l| l.site_id == site)
            .cloned()
            .collect();
        leads.sort_by_key(|l| (std::cmp::Reverse(l.created_at_ms), std::cmp::Reverse(l.id.0)));
        Ok(leads)
    }

    async fn set_custom_domain(
        &self,
        site: SiteId,
        domain: Option<String>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(row) = inner.sites.iter_mut().find(|s| s.id == site) else {
            return Err(StoreError("site not found".to_string()));
        };
        row.custom_domain = domain;
        row.custom_domain_verified = false;
        Ok(())
    }

    async fn mark_domain_verified(&self, site: SiteId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(row) = inner.sites.iter_mut().find(|s| s.id == site) else {
            return Err(StoreError("site not found".to_string()));
        };
        if row.custom_domain.is_some() {
            row.custom_domain_verified = true;
        }
        Ok(())
    }

    async fn update_settings(
        &self,
        site: SiteId,
        settings: &SiteSettings,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(row) = inner.sites.iter_mut().find(|s| s.id == site) else {
            return Err(StoreError("site not found".to_string()));
        };
        row.settings = settings.clone();
        Ok(())
    }

    async fn delete_site(&self, site: SiteId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.sites.retain(|s| s.id != site);
        inner.locations.retain(|l| l.site_id != site);
        inner.categories.retain(|c| c.site_id != site);
        inner.services.retain(|s| s.site_id != site);
        inner.areas.retain(|a| a.site_id != site);
        inner.neighborhoods.retain(|n| n.site_id != site);
        inner.leads.retain(|l| l.site_id != site);
        Ok(())
    }
}
