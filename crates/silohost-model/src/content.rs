use crate::site::SiteId;
use crate::slug::{slugify, Slug};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

macro_rules! content_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

content_id!(LocationId);
content_id!(CategoryId);
content_id!(ServiceId);
content_id!(ServiceAreaId);
content_id!(NeighborhoodId);

/// Physical location of a site. Slug is unique within the site; exactly one
/// location per multi-location site is primary. Single-location and microsite
/// sites have one implicit-primary location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub id: LocationId,
    pub site_id: SiteId,
    pub slug: Slug,
    pub name: String,
    pub is_primary: bool,
    pub sort_index: i64,
}

/// Site-scoped association to a GBP taxonomy entry. `taxonomy_name` is the
/// taxonomy's canonical machine name (e.g. `hvac_contractor`); `display_name`
/// is what the business shows. Exactly one category per site is primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub id: CategoryId,
    pub site_id: SiteId,
    pub taxonomy_name: String,
    pub display_name: String,
    pub is_primary: bool,
    pub sort_index: i64,
}

impl Category {
    /// The segment generated links use: the slugified display name, falling
    /// back to the machine name when the display name yields nothing.
    #[must_use]
    pub fn url_segment(&self) -> String {
        slugify(&self.display_name)
            .or_else(|_| slugify(&self.taxonomy_name))
            .map(Slug::into_inner)
            .unwrap_or_else(|_| self.taxonomy_name.clone())
    }

    /// Historical links exist under both spellings: the taxonomy machine name
    /// (verbatim or hyphenated) and the normalized display name. All must
    /// resolve to this category.
    #[must_use]
    pub fn matches_segment(&self, segment: &str) -> bool {
        if segment == self.taxonomy_name {
            return true;
        }
        if segment == self.taxonomy_name.replace('_', "-") {
            return true;
        }
        slugify(&self.display_name).is_ok_and(|s| s.as_str() == segment)
    }
}

/// A sellable service under exactly one category. Slug unique within the
/// category. Inactive services are soft-hidden, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    pub id: ServiceId,
    pub site_id: SiteId,
    pub category_id: CategoryId,
    pub slug: Slug,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub sort_index: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceArea {
    pub id: ServiceAreaId,
    pub site_id: SiteId,
    pub slug: Slug,
    pub name: String,
}

/// Neighborhood page, optionally scoped to one location of a multi-location
/// site. Slug unique within (site, location) scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Neighborhood {
    pub id: NeighborhoodId,
    pub site_id: SiteId,
    pub location_id: Option<LocationId>,
    pub slug: Slug,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(taxonomy: &str, display: &str) -> Category {
        Category {
            id: CategoryId(1),
            site_id: SiteId(1),
            taxonomy_name: taxonomy.to_string(),
            display_name: display.to_string(),
            is_primary: false,
            sort_index: 0,
        }
    }

    #[test]
    fn category_matches_machine_name_and_display_name() {
        let cat = category("hvac_contractor", "HVAC Repair");
        assert!(cat.matches_segment("hvac_contractor"));
        assert!(cat.matches_segment("hvac-contractor"));
        assert!(cat.matches_segment("hvac-repair"));
        assert!(!cat.matches_segment("plumbing"));
    }

    #[test]
    fn category_url_segment_prefers_display_name() {
        let cat = category("hvac_contractor", "HVAC Repair");
        assert_eq!(cat.url_segment(), "hvac-repair");
        let bare = category("plumber", "!!!");
        assert_eq!(bare.url_segment(), "plumber");
    }
}
