use crate::slug::{Slug, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SiteId(pub i64);

impl Display for SiteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Site lifecycle. `Building` and the terminal `Failed` belong to the content
/// generation pipeline; `Active`/`Paused` are the only user-reachable pair;
/// `Suspended` is admin-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    Building,
    Active,
    Paused,
    Failed,
    Suspended,
}

impl SiteStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Failed => "failed",
            Self::Suspended => "suspended",
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Display for SiteStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn parse_site_status(input: &str) -> Result<SiteStatus, ValidationError> {
    match input {
        "building" => Ok(SiteStatus::Building),
        "active" => Ok(SiteStatus::Active),
        "paused" => Ok(SiteStatus::Paused),
        "failed" => Ok(SiteStatus::Failed),
        "suspended" => Ok(SiteStatus::Suspended),
        other => Err(ValidationError(format!("unknown site status: {other}"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteType {
    SingleLocation,
    MultiLocation,
    Microsite,
}

impl WebsiteType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleLocation => "single_location",
            Self::MultiLocation => "multi_location",
            Self::Microsite => "microsite",
        }
    }

    /// Only multi-location sites carry a location prefix in their URLs.
    #[must_use]
    pub const fn is_multi_location(self) -> bool {
        matches!(self, Self::MultiLocation)
    }
}

impl Display for WebsiteType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn parse_website_type(input: &str) -> Result<WebsiteType, ValidationError> {
    match input {
        "single_location" => Ok(WebsiteType::SingleLocation),
        "multi_location" => Ok(WebsiteType::MultiLocation),
        "microsite" => Ok(WebsiteType::Microsite),
        other => Err(ValidationError(format!("unknown website type: {other}"))),
    }
}

/// Snapshot of the background generation run, denormalized onto the site row
/// so the dashboard can poll a single record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildProgress {
    pub completed_tasks: u32,
    pub total_tasks: u32,
    pub current_task: Option<String>,
    pub started_at_ms: Option<i64>,
}

impl BuildProgress {
    #[must_use]
    pub fn fresh(total_tasks: u32, now_ms: i64) -> Self {
        Self {
            completed_tasks: 0,
            total_tasks,
            current_task: None,
            started_at_ms: Some(now_ms),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSettings {
    pub industry: Option<String>,
    pub phone: Option<String>,
    pub brand_color: Option<String>,
    pub logo_url: Option<String>,
}

/// Tenant record. The slug is the subdomain key: globally unique, immutable
/// after creation. A custom domain routes only once verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Site {
    pub id: SiteId,
    pub slug: Slug,
    pub custom_domain: Option<String>,
    pub custom_domain_verified: bool,
    pub status: SiteStatus,
    pub status_message: Option<String>,
    pub status_updated_at_ms: i64,
    pub website_type: WebsiteType,
    pub progress: BuildProgress,
    pub settings: SiteSettings,
    pub created_at_ms: i64,
}
