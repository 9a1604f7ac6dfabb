use silohost_api::{CategoryView, NamedView, PageView, ServiceView};
use silohost_model::{Category, Location, Service, Site};
use silohost_routing::{ContentSource, PathScope, ResolvedPage, StoreError};

pub(crate) struct RenderedPage {
    pub view: PageView,
    /// Canonical public path of the page; the render-cache key and the
    /// required input shape of the revalidation endpoint. `None` for pages
    /// that are never cached.
    pub canonical_path: Option<String>,
}

fn category_view(category: &Category) -> CategoryView {
    CategoryView {
        name: category.display_name.clone(),
        segment: category.url_segment(),
        primary: category.is_primary,
    }
}

fn service_views(scope: &PathScope, category: &Category, services: &[Service]) -> Vec<ServiceView> {
    services
        .iter()
        .map(|service| ServiceView {
            name: service.name.clone(),
            slug: service.slug.to_string(),
            description: service.description.clone(),
            canonical_path: scope.service_path(category, &service.slug),
        })
        .collect()
}

/// Builds the JSON render model for a resolved page, stamping every entity
/// with the canonical path the path builder assigns it.
pub(crate) async fn render_resolved(
    content: &dyn ContentSource,
    site: &Site,
    location: Option<&Location>,
    resolved: ResolvedPage,
    request_path: &str,
) -> Result<RenderedPage, StoreError> {
    let scope = match location {
        Some(loc) => PathScope::location(site.website_type, &loc.slug),
        None => PathScope::site(site.website_type),
    };
    let site_slug = site.slug.to_string();
    let location_slug = location.map(|l| l.slug.to_string());

    let rendered = match resolved {
        ResolvedPage::Home { primary_category } => {
            let services = match &primary_category {
                Some(category) => {
                    let rows = content.services_in_category(site.id, category.id).await?;
                    service_views(&scope, category, &rows)
                }
                None => Vec::new(),
            };
            RenderedPage {
                canonical_path: Some(scope.home()),
                view: PageView::Home {
                    site: site_slug,
                    location: location_slug,
                    category: primary_category.as_ref().map(category_view),
                    services,
                    canonical_path: scope.home(),
                },
            }
        }
        ResolvedPage::Category { category, services } => {
            let canonical = scope.category_path(&category);
            RenderedPage {
                view: PageView::Category {
                    site: site_slug,
                    location: location_slug,
                    services: service_views(&scope, &category, &services),
                    category: category_view(&category),
                    canonical_path: canonical.clone(),
                },
                canonical_path: Some(canonical),
            }
        }
        ResolvedPage::Service {
            service, category, ..
        } => {
            let canonical = scope.service_path(&category, &service.slug);
            RenderedPage {
                view: PageView::Service {
                    site: site_slug,
                    location: location_slug,
                    category: category_view(&category),
                    name: service.name,
                    slug: service.slug.to_string(),
                    description: service.description,
                    canonical_path: canonical.clone(),
                },
                canonical_path: Some(canonical),
            }
        }
        ResolvedPage::AreaIndex { areas } => {
            let canonical = scope.areas_index();
            RenderedPage {
                view: PageView::AreaIndex {
                    site: site_slug,
                    location: location_slug,
                    areas: areas
                        .iter()
                        .map(|area| NamedView {
                            name: area.name.clone(),
                            slug: area.slug.to_string(),
                            canonical_path: scope.area_path(&area.slug),
                        })
                        .collect(),
                    canonical_path: canonical.clone(),
                },
                canonical_path: Some(canonical),
            }
        }
        ResolvedPage::Area { area } => {
            let canonical = scope.area_path(&area.slug);
            RenderedPage {
                view: PageView::Area {
                    site: site_slug,
                    location: location_slug,
                    name: area.name,
                    slug: area.slug.to_string(),
                    canonical_path: canonical.clone(),
                },
                canonical_path: Some(canonical),
            }
        }
        ResolvedPage::NeighborhoodIndex { neighborhoods } => {
            let canonical = scope.neighborhoods_index();
            RenderedPage {
                view: PageView::NeighborhoodIndex {
                    site: site_slug,
                    location: location_slug,
                    neighborhoods: neighborhoods
                        .iter()
                        .map(|n| NamedView {
                            name: n.name.clone(),
                            slug: n.slug.to_string(),
                            canonical_path: scope.neighborhood_path(&n.slug),
                        })
                        .collect(),
                    canonical_path: canonical.clone(),
                },
                canonical_path: Some(canonical),
            }
        }
        ResolvedPage::Neighborhood { neighborhood } => {
            let canonical = scope.neighborhood_path(&neighborhood.slug);
            RenderedPage {
                view: PageView::Neighborhood {
                    site: site_slug,
                    location: location_slug,
                    name: neighborhood.name,
                    slug: neighborhood.slug.to_string(),
                    canonical_path: canonical.clone(),
                },
                canonical_path: Some(canonical),
            }
        }
        ResolvedPage::Static { page } => {
            let canonical = scope.static_path(&page);
            RenderedPage {
                view: PageView::StaticPage {
                    site: site_slug,
                    location: location_slug,
                    slug: page.suffix(),
                    canonical_path: canonical.clone(),
                },
                canonical_path: Some(canonical),
            }
        }
        ResolvedPage::NotFound => RenderedPage {
            view: PageView::NotFound {
                site: site_slug,
                path: request_path.to_string(),
            },
            canonical_path: None,
        },
        _ => RenderedPage {
            view: PageView::NotFound {
                site: site_slug,
                path: request_path.to_string(),
            },
            canonical_path: None,
        },
    };
    Ok(rendered)
}
