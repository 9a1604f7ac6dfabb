use crate::path::StaticPage;
use crate::ports::{ContentSource, StoreError};
use silohost_model::{Category, Location, Neighborhood, Service, ServiceArea, Site, Slug};

/// What a site-relative path resolves to. A tagged result, so a caller can
/// never mistake a found category for a found service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolvedPage {
    /// The location home. Also reachable via the primary category's own
    /// segment: home and the primary category page are one URL, aliased
    /// here at the routing boundary rather than modeled as one entity.
    Home {
        primary_category: Option<Category>,
    },
    Category {
        category: Category,
        services: Vec<Service>,
    },
    Service {
        service: Service,
        category: Category,
        /// True when the service was reached as a top-level segment through
        /// the primary category.
        via_primary_category: bool,
    },
    AreaIndex {
        areas: Vec<ServiceArea>,
    },
    Area {
        area: ServiceArea,
    },
    NeighborhoodIndex {
        neighborhoods: Vec<Neighborhood>,
    },
    Neighborhood {
        neighborhood: Neighborhood,
    },
    Static {
        page: StaticPage,
    },
    NotFound,
}

/// Resolves the remaining path segments (after host, status, and location
/// handling) to a content entity.
///
/// Single ambiguous segment precedence: a service of the primary category
/// wins over a secondary category of the same name; everything else is a 404.
pub async fn resolve_content(
    src: &dyn ContentSource,
    site: &Site,
    location: Option<&Location>,
    segments: &[&str],
) -> Result<ResolvedPage, StoreError> {
    match segments {
        [] => {
            let primary_category = src.primary_category(site.id).await?;
            Ok(ResolvedPage::Home { primary_category })
        }
        ["about"] => Ok(ResolvedPage::Static {
            page: StaticPage::About,
        }),
        ["contact"] => Ok(ResolvedPage::Static {
            page: StaticPage::Contact,
        }),
        ["jobs"] => Ok(ResolvedPage::Static {
            page: StaticPage::Jobs,
        }),
        ["work"] => Ok(ResolvedPage::Static {
            page: StaticPage::Work,
        }),
        ["work", detail] => match Slug::parse(detail) {
            Ok(slug) => Ok(ResolvedPage::Static {
                page: StaticPage::WorkDetail(slug),
            }),
            Err(_) => Ok(ResolvedPage::NotFound),
        },
        ["areas"] => Ok(ResolvedPage::AreaIndex {
            areas: src.areas(site.id).await?,
        }),
        ["areas", slug] => match src.area_by_slug(site.id, slug).await? {
            Some(area) => Ok(ResolvedPage::Area { area }),
            None => Ok(ResolvedPage::NotFound),
        },
        ["neighborhoods"] => Ok(ResolvedPage::NeighborhoodIndex {
            neighborhoods: src.neighborhoods(site.id, location.map(|l| l.id)).await?,
        }),
        ["neighborhoods", slug] => {
            match src
                .neighborhood_by_slug(site.id, location.map(|l| l.id), slug)
                .await?
            {
                Some(neighborhood) => Ok(ResolvedPage::Neighborhood { neighborhood }),
                None => Ok(ResolvedPage::NotFound),
            }
        }
        [segment] => resolve_ambiguous_segment(src, site, segment).await,
        [category_segment, service_slug] => {
            // Both-category form: scope the service lookup to the resolved
            // category's id so slugs may repeat across categories.
            let Some(category) = src.category_by_segment(site.id, category_segment).await? else {
                return Ok(ResolvedPage::NotFound);
            };
            match src
                .service_in_category(site.id, category.id, service_slug)
                .await?
            {
                Some(service) => Ok(ResolvedPage::Service {
                    via_primary_category: category.is_primary,
                    service,
                    category,
                }),
                None => Ok(ResolvedPage::NotFound),
            }
        }
        _ => Ok(ResolvedPage::NotFound),
    }
}

async fn resolve_ambiguous_segment(
    src: &dyn ContentSource,
    site: &Site,
    segment: &str,
) -> Result<ResolvedPage, StoreError> {
    // 1. A service of the primary category claims the top-level segment.
    if let Some(primary) = src.primary_category(site.id).await? {
        if let Some(service) = src.service_in_category(site.id, primary.id, segment).await? {
            return Ok(ResolvedPage::Service {
                service,
                category: primary,
                via_primary_category: true,
            });
        }
    }
    // 2. Otherwise a category segment. The primary category's segment is an
    //    alias of home, not a standalone listing.
    if let Some(category) = src.category_by_segment(site.id, segment).await? {
        if category.is_primary {
            return Ok(ResolvedPage::Home {
                primary_category: Some(category),
            });
        }
        let services = src.services_in_category(site.id, category.id).await?;
        return Ok(ResolvedPage::Category { category, services });
    }
    Ok(ResolvedPage::NotFound)
}
