use crate::plan::ContentPlan;
use silohost_model::{build_failed, build_started, build_succeeded, BuildProgress, SiteId};
use silohost_store::{
    NewCategory, NewLocation, NewNeighborhood, NewService, NewServiceArea, SiteWriter, StoreError,
};
use tracing::{error, info};

/// Executes a [`ContentPlan`] against the store. One task per entity;
/// progress is persisted after every task so a watching dashboard (and the
/// staleness window) always see a live stamp.
pub struct BuildPipeline<'a> {
    writer: &'a dyn SiteWriter,
    site: SiteId,
}

impl<'a> BuildPipeline<'a> {
    #[must_use]
    pub fn new(writer: &'a dyn SiteWriter, site: SiteId) -> Self {
        Self { writer, site }
    }

    /// Runs the whole plan. Flips the site `building -> active` on success
    /// and `building -> failed` (with the error as the status message) on
    /// the first failing task.
    pub async fn run(&self, plan: &ContentPlan, now_ms: i64) -> Result<(), StoreError> {
        let total = plan.task_count();
        self.writer
            .apply_status_change(self.site, &build_started(total, now_ms))
            .await?;
        info!(site = %self.site, tasks = total, "site build started");

        match self.seed(plan, total, now_ms).await {
            Ok(()) => {
                self.writer
                    .apply_status_change(self.site, &build_succeeded(total, now_ms))
                    .await?;
                info!(site = %self.site, "site build complete");
                Ok(())
            }
            Err(e) => {
                error!(site = %self.site, error = %e, "site build failed");
                self.writer
                    .apply_status_change(self.site, &build_failed(&e.to_string(), now_ms))
                    .await?;
                Err(e)
            }
        }
    }

    async fn seed(&self, plan: &ContentPlan, total: u32, now_ms: i64) -> Result<(), StoreError> {
        let mut completed = 0u32;

        for location in &plan.locations {
            self.progress(completed, total, &format!("location: {}", location.name), now_ms)
                .await?;
            self.writer
                .insert_location(NewLocation {
                    site_id: self.site,
                    slug: location.slug.clone(),
                    name: location.name.clone(),
                    is_primary: location.is_primary,
                    sort_index: location.sort_index,
                })
                .await?;
            completed += 1;
        }

        for category in &plan.categories {
            self.progress(
                completed,
                total,
                &format!("category: {}", category.display_name),
                now_ms,
            )
            .await?;
            let inserted = self
                .writer
                .insert_category(NewCategory {
                    site_id: self.site,
                    taxonomy_name: category.taxonomy_name.clone(),
                    display_name: category.display_name.clone(),
                    is_primary: category.is_primary,
                    sort_index: category.sort_index,
                })
                .await?;
            completed += 1;

            for service in &category.services {
                self.progress(completed, total, &format!("service: {}", service.name), now_ms)
                    .await?;
                self.writer
                    .insert_service(NewService {
                        site_id: self.site,
                        category_id: inserted.id,
                        slug: service.slug.clone(),
                        name: service.name.clone(),
                        description: service.description.clone(),
                        active: true,
                        sort_index: service.sort_index,
                    })
                    .await?;
                completed += 1;
            }
        }

        for area in &plan.service_areas {
            self.progress(completed, total, &format!("service area: {}", area.name), now_ms)
                .await?;
            self.writer
                .insert_area(NewServiceArea {
                    site_id: self.site,
                    slug: area.slug.clone(),
                    name: area.name.clone(),
                })
                .await?;
            completed += 1;
        }

        for neighborhood in &plan.neighborhoods {
            self.progress(
                completed,
                total,
                &format!("neighborhood: {}", neighborhood.name),
                now_ms,
            )
            .await?;
            self.writer
                .insert_neighborhood(NewNeighborhood {
                    site_id: self.site,
                    location_id: None,
                    slug: neighborhood.slug.clone(),
                    name: neighborhood.name.clone(),
                })
                .await?;
            completed += 1;
        }

        Ok(())
    }

    async fn progress(
        &self,
        completed: u32,
        total: u32,
        task: &str,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        self.writer
            .record_build_progress(
                self.site,
                &BuildProgress {
                    completed_tasks: completed,
                    total_tasks: total,
                    current_task: Some(task.to_string()),
                    started_at_ms: Some(now_ms),
                },
                now_ms,
            )
            .await
    }
}
