use silohost_model::{Category, Slug, WebsiteType};

/// Fixed informational pages appended to a location base.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StaticPage {
    About,
    Contact,
    Jobs,
    Work,
    WorkDetail(Slug),
}

impl StaticPage {
    #[must_use]
    pub fn suffix(&self) -> String {
        match self {
            Self::About => "about".to_string(),
            Self::Contact => "contact".to_string(),
            Self::Jobs => "jobs".to_string(),
            Self::Work => "work".to_string(),
            Self::WorkDetail(slug) => format!("work/{slug}"),
        }
    }
}

/// Pure mapping from entity identity to canonical public path. Multi-location
/// sites prefix every path with the location slug; everything else leaves the
/// bare root as the sole implicit-primary location. No method special-cases a
/// slug value; output depends only on position and primary flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathScope {
    location: Option<Slug>,
}

impl PathScope {
    /// Scope for site-global paths: never prefixed, even on multi-location
    /// sites (only static/global paths are valid there without a location).
    #[must_use]
    pub fn site(_website_type: WebsiteType) -> Self {
        Self { location: None }
    }

    /// Scope for content under a location. The prefix only applies to
    /// multi-location sites; the sole location of a single-location or
    /// microsite site is implicit and never appears in URLs.
    #[must_use]
    pub fn location(website_type: WebsiteType, location: &Slug) -> Self {
        Self {
            location: website_type
                .is_multi_location()
                .then(|| location.clone()),
        }
    }

    #[must_use]
    pub fn location_slug(&self) -> Option<&Slug> {
        self.location.as_ref()
    }

    /// `/` for unprefixed scopes, `/{location}` for multi-location scopes.
    #[must_use]
    pub fn home(&self) -> String {
        match &self.location {
            Some(loc) => format!("/{loc}"),
            None => "/".to_string(),
        }
    }

    fn join(&self, suffix: &str) -> String {
        match &self.location {
            Some(loc) => format!("/{loc}/{suffix}"),
            None => format!("/{suffix}"),
        }
    }

    /// The primary category page IS the home page; only secondary categories
    /// get their own segment.
    #[must_use]
    pub fn category_path(&self, category: &Category) -> String {
        if category.is_primary {
            self.home()
        } else {
            self.join(&category.url_segment())
        }
    }

    /// Services of the primary category are top-level segments; services of
    /// secondary categories nest under their category segment.
    #[must_use]
    pub fn service_path(&self, category: &Category, service_slug: &Slug) -> String {
        if category.is_primary {
            self.join(service_slug.as_str())
        } else {
            self.join(&format!("{}/{}", category.url_segment(), service_slug))
        }
    }

    #[must_use]
    pub fn areas_index(&self) -> String {
        self.join("areas")
    }

    #[must_use]
    pub fn area_path(&self, area_slug: &Slug) -> String {
        self.join(&format!("areas/{area_slug}"))
    }

    #[must_use]
    pub fn neighborhoods_index(&self) -> String {
        self.join("neighborhoods")
    }

    #[must_use]
    pub fn neighborhood_path(&self, neighborhood_slug: &Slug) -> String {
        self.join(&format!("neighborhoods/{neighborhood_slug}"))
    }

    #[must_use]
    pub fn static_path(&self, page: &StaticPage) -> String {
        self.join(&page.suffix())
    }
}
