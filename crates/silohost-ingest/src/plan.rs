use crate::document::ImportDocument;
use silohost_model::{slugify, Slug};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanError(pub String);

impl Display for PlanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlanError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedService {
    pub slug: Slug,
    pub name: String,
    pub description: Option<String>,
    pub sort_index: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCategory {
    pub taxonomy_name: String,
    pub display_name: String,
    pub is_primary: bool,
    pub sort_index: i64,
    pub services: Vec<PlannedService>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLocation {
    pub slug: Slug,
    pub name: String,
    pub is_primary: bool,
    pub sort_index: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedNamed {
    pub slug: Slug,
    pub name: String,
}

/// Fully validated seeding input: slugs are final and unique within their
/// scope, exactly one category and one location are primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPlan {
    pub categories: Vec<PlannedCategory>,
    pub locations: Vec<PlannedLocation>,
    pub service_areas: Vec<PlannedNamed>,
    pub neighborhoods: Vec<PlannedNamed>,
}

impl ContentPlan {
    /// One task per seeded entity; the progress denominator.
    #[must_use]
    pub fn task_count(&self) -> u32 {
        let services: usize = self.categories.iter().map(|c| c.services.len()).sum();
        let total = self.categories.len()
            + services
            + self.locations.len()
            + self.service_areas.len()
            + self.neighborhoods.len();
        u32::try_from(total).unwrap_or(u32::MAX)
    }
}

/// Derives a slug from `name`, disambiguating duplicates within `taken` by
/// appending `-2`, `-3`, ... The original link-generation rules depend on
/// slugs staying unique within their scope.
fn unique_slug(name: &str, taken: &mut HashSet<String>) -> Result<Slug, PlanError> {
    let base = slugify(name).map_err(|e| PlanError(e.to_string()))?;
    if taken.insert(base.as_str().to_string()) {
        return Ok(base);
    }
    for n in 2..100 {
        let candidate = format!("{base}-{n}");
        if let Ok(slug) = Slug::parse(&candidate) {
            if taken.insert(candidate) {
                return Ok(slug);
            }
        }
    }
    Err(PlanError(format!("cannot find a free slug for {name:?}")))
}

pub fn content_plan(doc: &ImportDocument) -> Result<ContentPlan, PlanError> {
    let mut categories = Vec::new();
    let mut category_keys = HashSet::new();
    for (index, import) in std::iter::once(&doc.primary_category)
        .chain(doc.secondary_categories.iter())
        .enumerate()
    {
        if !category_keys.insert(import.taxonomy_name.clone()) {
            return Err(PlanError(format!(
                "category attached twice: {}",
                import.taxonomy_name
            )));
        }
        let mut service_slugs = HashSet::new();
        let mut services = Vec::new();
        for (sort, service) in import.services.iter().enumerate() {
            services.push(PlannedService {
                slug: unique_slug(&service.name, &mut service_slugs)?,
                name: service.name.trim().to_string(),
                description: service.description.clone(),
                sort_index: sort as i64,
            });
        }
        categories.push(PlannedCategory {
            taxonomy_name: import.taxonomy_name.clone(),
            display_name: import.display_name.trim().to_string(),
            is_primary: index == 0,
            sort_index: index as i64,
            services,
        });
    }

    let mut locations = Vec::new();
    let mut location_slugs = HashSet::new();
    if doc.locations.is_empty() {
        // The wizard may omit locations entirely; the business itself is the
        // sole, implicitly primary location.
        locations.push(PlannedLocation {
            slug: unique_slug(&doc.business_name, &mut location_slugs)?,
            name: doc.business_name.trim().to_string(),
            is_primary: true,
            sort_index: 0,
        });
    } else {
        let flagged = doc.locations.iter().filter(|l| l.primary).count();
        if flagged > 1 {
            return Err(PlanError(
                "at most one location may be marked primary".to_string(),
            ));
        }
        for (index, location) in doc.locations.iter().enumerate() {
            let is_primary = if flagged == 0 {
                index == 0
            } else {
                location.primary
            };
            locations.push(PlannedLocation {
                slug: unique_slug(&location.name, &mut location_slugs)?,
                name: location.name.trim().to_string(),
                is_primary,
                sort_index: index as i64,
            });
        }
    }

    let mut area_slugs = HashSet::new();
    let service_areas = doc
        .service_areas
        .iter()
        .map(|name| {
            Ok(PlannedNamed {
                slug: unique_slug(name, &mut area_slugs)?,
                name: name.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, PlanError>>()?;

    let mut neighborhood_slugs = HashSet::new();
    let neighborhoods = doc
        .neighborhoods
        .iter()
        .map(|name| {
            Ok(PlannedNamed {
                slug: unique_slug(name, &mut neighborhood_slugs)?,
                name: name.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, PlanError>>()?;

    Ok(ContentPlan {
        categories,
        locations,
        service_areas,
        neighborhoods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ImportCategory, ImportLocation, ImportService};
    use silohost_model::SiteSettings;

    fn doc() -> ImportDocument {
        ImportDocument {
            business_name: "Acme HVAC".to_string(),
            primary_category: ImportCategory {
                taxonomy_name: "hvac_contractor".to_string(),
                display_name: "HVAC Repair".to_string(),
                services: vec![
                    ImportService {
                        name: "AC Repair".to_string(),
                        description: None,
                    },
                    ImportService {
                        name: "AC Repair".to_string(),
                        description: Some("duplicate name".to_string()),
                    },
                ],
            },
            secondary_categories: vec![ImportCategory {
                taxonomy_name: "plumber".to_string(),
                display_name: "Plumbing".to_string(),
                services: vec![ImportService {
                    name: "Drain Cleaning".to_string(),
                    description: None,
                }],
            }],
            locations: Vec::new(),
            service_areas: vec!["Round Rock".to_string()],
            neighborhoods: vec!["Hyde Park".to_string()],
            settings: SiteSettings::default(),
        }
    }

    #[test]
    fn first_category_is_primary_and_duplicate_slugs_disambiguate() {
        let plan = content_plan(&doc()).expect("plan");
        assert!(plan.categories[0].is_primary);
        assert!(!plan.categories[1].is_primary);
        let slugs: Vec<&str> = plan.categories[0]
            .services
            .iter()
            .map(|s| s.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["ac-repair", "ac-repair-2"]);
    }

    #[test]
    fn missing_locations_synthesize_an_implicit_primary() {
        let plan = content_plan(&doc()).expect("plan");
        assert_eq!(plan.locations.len(), 1);
        assert!(plan.locations[0].is_primary);
        assert_eq!(plan.locations[0].slug.as_str(), "acme-hvac");
    }

    #[test]
    fn exactly_one_primary_location_is_enforced() {
        let mut document = doc();
        document.locations = vec![
            ImportLocation {
                name: "Austin".to_string(),
                primary: true,
            },
            ImportLocation {
                name: "Dallas".to_string(),
                primary: true,
            },
        ];
        assert!(content_plan(&document).is_err());

        document.locations[1].primary = false;
        let plan = content_plan(&document).expect("plan");
        assert!(plan.locations[0].is_primary);
        assert!(!plan.locations[1].is_primary);

        document.locations[0].primary = false;
        let plan = content_plan(&document).expect("plan");
        assert!(plan.locations[0].is_primary, "first wins when none flagged");
    }

    #[test]
    fn task_count_covers_every_seeded_entity() {
        let plan = content_plan(&doc()).expect("plan");
        // 2 categories + 3 services + 1 location + 1 area + 1 neighborhood
        assert_eq!(plan.task_count(), 8);
    }

    #[test]
    fn duplicate_category_attachment_is_rejected() {
        let mut document = doc();
        document.secondary_categories[0].taxonomy_name = "hvac_contractor".to_string();
        assert!(content_plan(&document).is_err());
    }
}
