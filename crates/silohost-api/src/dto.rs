use serde::{Deserialize, Serialize};
use silohost_model::{BuildProgress, Lead, Site};

/// Public lead form payload. Name is the only required field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeadSubmission {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub service_slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionRequest {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeadStatusRequest {
    pub status: String,
}

/// Input to the revalidation trigger. `paths` must be canonical public paths
/// exactly as the path builder produces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevalidateRequest {
    pub site: String,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevalidateResponse {
    pub invalidated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSummary {
    pub slug: String,
    pub status: String,
    pub status_message: Option<String>,
    pub website_type: String,
    pub custom_domain: Option<String>,
    pub custom_domain_verified: bool,
    pub progress: BuildProgress,
}

impl SiteSummary {
    #[must_use]
    pub fn from_site(site: &Site) -> Self {
        Self {
            slug: site.slug.to_string(),
            status: site.status.as_str().to_string(),
            status_message: site.status_message.clone(),
            website_type: site.website_type.as_str().to_string(),
            custom_domain: site.custom_domain.clone(),
            custom_domain_verified: site.custom_domain_verified,
            progress: site.progress.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeadView {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub service_slug: Option<String>,
    pub status: String,
    pub created_at_ms: i64,
}

impl LeadView {
    #[must_use]
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            id: lead.id.0,
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            message: lead.message.clone(),
            service_slug: lead.service_slug.clone(),
            status: lead.status.as_str().to_string(),
            created_at_ms: lead.created_at_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    pub name: String,
    pub segment: String,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceView {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub canonical_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedView {
    pub name: String,
    pub slug: String,
    pub canonical_path: String,
}

/// Render model for one resolved page. Presentation is out of scope; the
/// rendering layer downstream consumes these JSON shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum PageView {
    Home {
        site: String,
        location: Option<String>,
        category: Option<CategoryView>,
        services: Vec<ServiceView>,
        canonical_path: String,
    },
    Category {
        site: String,
        location: Option<String>,
        category: CategoryView,
        services: Vec<ServiceView>,
        canonical_path: String,
    },
    Service {
        site: String,
        location: Option<String>,
        category: CategoryView,
        name: String,
        slug: String,
        description: Option<String>,
        canonical_path: String,
    },
    AreaIndex {
        site: String,
        location: Option<String>,
        areas: Vec<NamedView>,
        canonical_path: String,
    },
    Area {
        site: String,
        location: Option<String>,
        name: String,
        slug: String,
        canonical_path: String,
    },
    NeighborhoodIndex {
        site: String,
        location: Option<String>,
        neighborhoods: Vec<NamedView>,
        canonical_path: String,
    },
    Neighborhood {
        site: String,
        location: Option<String>,
        name: String,
        slug: String,
        canonical_path: String,
    },
    StaticPage {
        site: String,
        location: Option<String>,
        slug: String,
        canonical_path: String,
    },
    Status {
        site: String,
        status: String,
        status_page: String,
        message: Option<String>,
    },
    NotFound {
        site: String,
        path: String,
    },
    DomainNotFound {},
}
