use serde::{Deserialize, Serialize};
use silohost_model::SiteSettings;

/// What the GBP import or the setup wizard hands over. Names are free-form
/// display names; all slugs are generated during planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportDocument {
    pub business_name: String,
    pub primary_category: ImportCategory,
    #[serde(default)]
    pub secondary_categories: Vec<ImportCategory>,
    #[serde(default)]
    pub locations: Vec<ImportLocation>,
    #[serde(default)]
    pub service_areas: Vec<String>,
    #[serde(default)]
    pub neighborhoods: Vec<String>,
    #[serde(default)]
    pub settings: SiteSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportCategory {
    /// GBP taxonomy machine name, e.g. `hvac_contractor`.
    pub taxonomy_name: String,
    pub display_name: String,
    #[serde(default)]
    pub services: Vec<ImportService>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportService {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportLocation {
    pub name: String,
    #[serde(default)]
    pub primary: bool,
}
