use crate::writer::{
    NewCategory, NewLead, NewLocation, NewNeighborhood, NewService, NewServiceArea, NewSite,
    SiteWriter,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use silohost_model::{
    parse_site_status, parse_website_type, BuildProgress, Category, CategoryId, Lead, LeadId,
    LeadStatus, Location, LocationId, Neighborhood, NeighborhoodId, Service, ServiceArea,
    ServiceAreaId, ServiceId, Site, SiteId, SiteSettings, Slug, StatusChange,
};
use silohost_routing::{ContentSource, StoreError, TenantDirectory};
use std::path::Path;
use tokio::sync::Mutex;

const SITE_COLS: &str = "id, slug, custom_domain, custom_domain_verified, status, \
     status_message, status_updated_at_ms, website_type, completed_tasks, total_tasks, \
     current_task, build_started_at_ms, industry, phone, brand_color, logo_url, created_at_ms";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(db_err)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(crate::schema::SCHEMA_SQL).map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Liveness probe for readiness checks.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(db_err)
    }
}

fn db_err(e: rusqlite::Error) -> StoreError {
    StoreError(e.to_string())
}

fn decode_err(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn row_to_site(row: &Row<'_>) -> rusqlite::Result<Site> {
    let slug: String = row.get(1)?;
    let status: String = row.get(4)?;
    let website_type: String = row.get(7)?;
    Ok(Site {
        id: SiteId(row.get(0)?),
        slug: Slug::parse(&slug).map_err(|e| decode_err(1, e))?,
        custom_domain: row.get(2)?,
        custom_domain_verified: row.get(3)?,
        status: parse_site_status(&status).map_err(|e| decode_err(4, e))?,
        status_message: row.get(5)?,
        status_updated_at_ms: row.get(6)?,
        website_type: parse_website_type(&website_type).map_err(|e| decode_err(7, e))?,
        progress: BuildProgress {
            completed_tasks: row.get(8)?,
            total_tasks: row.get(9)?,
            current_task: row.get(10)?,
            started_at_ms: row.get(11)?,
        },
        settings: SiteSettings {
            industry: row.get(12)?,
            phone: row.get(13)?,
            brand_color: row.get(14)?,
            logo_url: row.get(15)?,
        },
        created_at_ms: row.get(16)?,
    })
}

fn row_to_location(row: &Row<'_>) -> rusqlite::Result<Location> {
    let slug: String = row.get(2)?;
    Ok(Location {
        id: LocationId(row.get(0)?),
        site_id: SiteId(row.get(1)?),
        slug: Slug::parse(&slug).map_err(|e| decode_err(2, e))?,
        name: row.get(3)?,
        is_primary: row.get(4)?,
        sort_index: row.get(5)?,
    })
}

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: CategoryId(row.get(0)?),
        site_id: SiteId(row.get(1)?),
        taxonomy_name: row.get(2)?,
        display_name: row.get(3)?,
        is_primary: row.get(4)?,
        sort_index: row.get(5)?,
    })
}

fn row_to_service(row: &Row<'_>) -> rusqlite::Result<Service> {
    let slug: String = row.get(3)?;
    Ok(Service {
        id: ServiceId(row.get(0)?),
        site_id: SiteId(row.get(1)?),
        category_id: CategoryId(row.get(2)?),
        slug: Slug::parse(&slug).map_err(|e| decode_err(3, e))?,
        name: row.get(4)?,
        description: row.get(5)?,
        active: row.get(6)?,
        sort_index: row.get(7)?,
    })
}

fn row_to_area(row: &Row<'_>) -> rusqlite::Result<ServiceArea> {
    let slug: String = row.get(2)?;
    Ok(ServiceArea {
        id: ServiceAreaId(row.get(0)?),
        site_id: SiteId(row.get(1)?),
        slug: Slug::parse(&slug).map_err(|e| decode_err(2, e))?,
        name: row.get(3)?,
    })
}

fn row_to_neighborhood(row: &Row<'_>) -> rusqlite::Result<Neighborhood> {
    let slug: String = row.get(3)?;
    Ok(Neighborhood {
        id: NeighborhoodId(row.get(0)?),
        site_id: SiteId(row.get(1)?),
        location_id: row.get::<_, Option<i64>>(2)?.map(LocationId),
        slug: Slug::parse(&slug).map_err(|e| decode_err(3, e))?,
        name: row.get(4)?,
    })
}

fn row_to_lead(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let status: String = row.get(7)?;
    Ok(Lead {
        id: LeadId(row.get(0)?),
        site_id: SiteId(row.get(1)?),
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        message: row.get(5)?,
        service_slug: row.get(6)?,
        status: LeadStatus::parse(&status).map_err(|e| decode_err(7, e))?,
        created_at_ms: row.get(8)?,
    })
}

#[async_trait]
impl TenantDirectory for SqliteStore {
    async fn site_by_slug(&self, slug: &Slug) -> Result<Option<Site>, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {SITE_COLS} FROM sites WHERE slug = ?1"),
            params![slug.as_str()],
            row_to_site,
        )
        .optional()
        .map_err(db_err)
    }

    async fn site_by_verified_domain(&self, host: &str) -> Result<Option<Site>, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!(
                "SELECT {SITE_COLS} FROM sites \
                 WHERE custom_domain = ?1 AND custom_domain_verified = 1"
            ),
            params![host],
            row_to_site,
        )
        .optional()
        .map_err(db_err)
    }

    async fn location_slugs(&self, site: SiteId) -> Result<Vec<Slug>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT slug FROM locations WHERE site_id = ?1 ORDER BY sort_index, id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![site.0], |row| {
                let raw: String = row.get(0)?;
                Slug::parse(&raw).map_err(|e| decode_err(0, e))
            })
            .map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }
}

#[async_trait]
impl ContentSource for SqliteStore {
    async fn primary_category(&self, site: SiteId) -> Result<Option<Category>, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, site_id, taxonomy_name, display_name, is_primary, sort_index \
             FROM categories WHERE site_id = ?1 AND is_primary = 1",
            params![site.0],
            row_to_category,
        )
        .optional()
        .map_err(db_err)
    }

    async fn category_by_segment(
        &self,
        site: SiteId,
        segment: &str,
    ) -> Result<Option<Category>, StoreError> {
        // Segment matching accepts two spellings (machine name, normalized
        // display name); the rule lives on the model, so filter in memory.
        // Sites carry a handful of categories at most.
        let categories = {
            let conn = self.conn.lock().await;
            let mut stmt = conn
                .prepare(
                    "SELECT id, site_id, taxonomy_name, display_name, is_primary, sort_index \
                     FROM categories WHERE site_id = ?1 ORDER BY sort_index, id",
                )
                .map_err(db_err)?;
            let rows = stmt
                .query_map(params![site.0], row_to_category)
                .map_err(db_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(db_err)?
        };
        Ok(categories.into_iter().find(|c| c.matches_segment(segment)))
    }

    async fn service_in_category(
        &self,
        site: SiteId,
        category: CategoryId,
        slug: &str,
    ) -> Result<Option<Service>, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, site_id, category_id, slug, name, description, active, sort_index \
             FROM services \
             WHERE site_id = ?1 AND category_id = ?2 AND slug = ?3 AND active = 1",
            params![site.0, category.0, slug],
            row_to_service,
        )
        .optional()
        .map_err(db_err)
    }

    async fn services_in_category(
        &self,
        site: SiteId,
        category: CategoryId,
    ) -> Result<Vec<Service>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT id, site_id, category_id, slug, name, description, active, sort_index \
                 FROM services \
                 WHERE site_id = ?1 AND category_id = ?2 AND active = 1 \
                 ORDER BY sort_index, id",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![site.0, category.0], row_to_service)
            .map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    async fn location_by_slug(
        &self,
        site: SiteId,
        slug: &str,
    ) -> Result<Option<Location>, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, site_id, slug, name, is_primary, sort_index \
             FROM locations WHERE site_id = ?1 AND slug = ?2",
            params![site.0, slug],
            row_to_location,
        )
        .optional()
        .map_err(db_err)
    }

    async fn area_by_slug(
        &self,
        site: SiteId,
        slug: &str,
    ) -> Result<Option<ServiceArea>, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, site_id, slug, name FROM service_areas \
             WHERE site_id = ?1 AND slug = ?2",
            params![site.0, slug],
            row_to_area,
        )
        .optional()
        .map_err(db_err)
    }

    async fn areas(&self, site: SiteId) -> Result<Vec<ServiceArea>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, site_id, slug, name FROM service_areas WHERE site_id = ?1 ORDER BY name")
            .map_err(db_err)?;
        let rows = stmt.query_map(params![site.0], row_to_area).map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    async fn neighborhood_by_slug(
        &self,
        site: SiteId,
        location: Option<LocationId>,
        slug: &str,
    ) -> Result<Option<Neighborhood>, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, site_id, location_id, slug, name FROM neighborhoods \
             WHERE site_id = ?1 AND location_id IS ?2 AND slug = ?3",
            params![site.0, location.map(|l| l.0), slug],
            row_to_neighborhood,
        )
        .optional()
        .map_err(db_err)
    }

    async fn neighborhoods(
        &self,
        site: SiteId,
        location: Option<LocationId>,
    ) -> Result<Vec<Neighborhood>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT id, site_id, location_id, slug, name FROM neighborhoods \
                 WHERE site_id = ?1 AND location_id IS ?2 ORDER BY name",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![site.0, location.map(|l| l.0)], row_to_neighborhood)
            .map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }
}

#[async_trait]
impl SiteWriter for SqliteStore {
    async fn insert_site(&self, new: NewSite) -> Result<Site, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO sites (slug, status, status_updated_at_ms, website_type, \
             industry, phone, brand_color, logo_url, created_at_ms) \
             VALUES (?1, 'building', ?2, ?3, ?4, ?5, ?6, ?7, ?2)",
            params![
                new.slug.as_str(),
                new.created_at_ms,
                new.website_type.as_str(),
                new.settings.industry,
                new.settings.phone,
                new.settings.brand_color,
                new.settings.logo_url,
            ],
        )
        .map_err(db_err)?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {SITE_COLS} FROM sites WHERE id = ?1"),
            params![id],
            row_to_site,
        )
        .map_err(db_err)
    }

    async fn site_by_id(&self, site: SiteId) -> Result<Option<Site>, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {SITE_COLS} FROM sites WHERE id = ?1"),
            params![site.0],
            row_to_site,
        )
        .optional()
        .map_err(db_err)
    }

    async fn apply_status_change(
        &self,
        site: SiteId,
        change: &StatusChange,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        match &change.progress {
            Some(progress) => conn.execute(
                "UPDATE sites SET status = ?1, status_message = ?2, status_updated_at_ms = ?3, \
                 completed_tasks = ?4, total_tasks = ?5, current_task = ?6, \
                 build_started_at_ms = ?7 WHERE id = ?8",
                params![
                    change.status.as_str(),
                    change.message,
                    change.stamped_at_ms,
                    progress.completed_tasks,
                    progress.total_tasks,
                    progress.current_task,
                    progress.started_at_ms,
                    site.0,
                ],
            ),
            None => conn.execute(
                "UPDATE sites SET status = ?1, status_message = ?2, status_updated_at_ms = ?3 \
                 WHERE id = ?4",
                params![
                    change.status.as_str(),
                    change.message,
                    change.stamped_at_ms,
                    site.0,
                ],
            ),
        }
        .map_err(db_err)?;
        Ok(())
    }

    async fn record_build_progress(
        &self,
        site: SiteId,
        progress: &BuildProgress,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE sites SET completed_tasks = ?1, total_tasks = ?2, current_task = ?3, \
             build_started_at_ms = ?4, status_updated_at_ms = ?5 WHERE id = ?6",
            params![
                progress.completed_tasks,
                progress.total_tasks,
                progress.current_task,
                progress.started_at_ms,
                now_ms,
                site.0,
            ],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn insert_location(&self, new: NewLocation) -> Result<Location, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO locations (site_id, slug, name, is_primary, sort_index) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.site_id.0,
                new.slug.as_str(),
                new.name,
                new.is_primary,
                new.sort_index
            ],
        )
        .map_err(db_err)?;
        Ok(Location {
            id: LocationId(conn.last_insert_rowid()),
            site_id: new.site_id,
            slug: new.slug,
            name: new.name,
            is_primary: new.is_primary,
            sort_index: new.sort_index,
        })
    }

    async fn insert_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO categories (site_id, taxonomy_name, display_name, is_primary, sort_index) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.site_id.0,
                new.taxonomy_name,
                new.display_name,
                new.is_primary,
                new.sort_index
            ],
        )
        .map_err(db_err)?;
        Ok(Category {
            id: CategoryId(conn.last_insert_rowid()),
            site_id: new.site_id,
            taxonomy_name: new.taxonomy_name,
            display_name: new.display_name,
            is_primary: new.is_primary,
            sort_index: new.sort_index,
        })
    }

    async fn insert_service(&self, new: NewService) -> Result<Service, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO services (site_id, category_id, slug, name, description, active, sort_index) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.site_id.0,
                new.category_id.0,
                new.slug.as_str(),
                new.name,
                new.description,
                new.active,
                new.sort_index
            ],
        )
        .map_err(db_err)?;
        Ok(Service {
            id: ServiceId(conn.last_insert_rowid()),
            site_id: new.site_id,
            category_id: new.category_id,
            slug: new.slug,
            name: new.name,
            description: new.description,
            active: new.active,
            sort_index: new.sort_index,
        })
    }

    async fn insert_area(&self, new: NewServiceArea) -> Result<ServiceArea, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO service_areas (site_id, slug, name) VALUES (?1, ?2, ?3)",
            params![new.site_id.0, new.slug.as_str(), new.name],
        )
        .map_err(db_err)?;
        Ok(ServiceArea {
            id: ServiceAreaId(conn.last_insert_rowid()),
            site_id: new.site_id,
            slug: new.slug,
            name: new.name,
        })
    }

    async fn insert_neighborhood(&self, new: NewNeighborhood) -> Result<Neighborhood, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO neighborhoods (site_id, location_id, slug, name) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                new.site_id.0,
                new.location_id.map(|l| l.0),
                new.slug.as_str(),
                new.name
            ],
        )
        .map_err(db_err)?;
        Ok(Neighborhood {
            id: NeighborhoodId(conn.last_insert_rowid()),
            site_id: new.site_id,
            location_id: new.location_id,
            slug: new.slug,
            name: new.name,
        })
    }

    async fn insert_lead(&self, new: NewLead) -> Result<Lead, StoreError> {
        let conn = self.conn.lock().await;
        let status: Option<String> = conn
            .query_row(
                "SELECT status FROM sites WHERE id = ?1",
                params![new.site_id.0],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        match status.as_deref() {
            Some("active") => {}
            Some(other) => {
                return Err(StoreError(format!(
                    "leads are only accepted for active sites (status: {other})"
                )))
            }
            None => return Err(StoreError("site not found".to_string())),
        }
        conn.execute(
            "INSERT INTO leads (site_id, name, email, phone, message, service_slug, status, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'new', ?7)",
            params![
                new.site_id.0,
                new.name,
                new.email,
                new.phone,
                new.message,
                new.service_slug,
                new.created_at_ms
            ],
        )
        .map_err(db_err)?;
        Ok(Lead {
            id: LeadId(conn.last_insert_rowid()),
            site_id: new.site_id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            message: new.message,
            service_slug: new.service_slug,
            status: LeadStatus::New,
            created_at_ms: new.created_at_ms,
        })
    }

    async fn update_lead_status(
        &self,
        site: SiteId,
        lead: LeadId,
        status: LeadStatus,
    ) -> Result<Option<Lead>, StoreError> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE leads SET status = ?1 WHERE id = ?2 AND site_id = ?3",
                params![status.as_str(), lead.0, site.0],
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Ok(None);
        }
        conn.query_row(
            "SELECT id, site_id, name, email, phone, message, service_slug, status, created_at_ms \
             FROM leads WHERE id = ?1",
            params![lead.0],
            row_to_lead,
        )
        .optional()
        .map_err(db_err)
    }

    async fn leads_for_site(&self, site: SiteId) -> Result<Vec<Lead>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT id, site_id, name, email, phone, message, service_slug, status, created_at_ms \
                 FROM leads WHERE site_id = ?1 ORDER BY created_at_ms DESC, id DESC",
            )
            .map_err(db_err)?;
        let rows = stmt.query_map(params![site.0], row_to_lead).map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    async fn set_custom_domain(
        &self,
        site: SiteId,
        domain: Option<String>,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE sites SET custom_domain = ?1, custom_domain_verified = 0 WHERE id = ?2",
            params![domain, site.0],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn mark_domain_verified(&self, site: SiteId) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE sites SET custom_domain_verified = 1 \
             WHERE id = ?1 AND custom_domain IS NOT NULL",
            params![site.0],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn update_settings(
        &self,
        site: SiteId,
        settings: &SiteSettings,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE sites SET industry = ?1, phone = ?2, brand_color = ?3, logo_url = ?4 \
             WHERE id = ?5",
            params![
                settings.industry,
                settings.phone,
                settings.brand_color,
                settings.logo_url,
                site.0
            ],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn delete_site(&self, site: SiteId) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM sites WHERE id = ?1", params![site.0])
            .map_err(db_err)?;
        Ok(())
    }
}
