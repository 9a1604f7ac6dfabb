#![forbid(unsafe_code)]
//! Content generation for new sites.
//!
//! A GBP-shaped [`ImportDocument`] (from the GBP import or the manual setup
//! wizard) is first validated into a [`ContentPlan`] with final slugs, then
//! executed by the [`BuildPipeline`], which seeds the store task by task,
//! records progress after each task, and performs the system transitions
//! `building -> active` or `building -> failed`. The pipeline runs out of
//! process relative to request routing; routers observe it only through the
//! stored status.

mod document;
mod pipeline;
mod plan;

pub use document::{ImportCategory, ImportDocument, ImportLocation, ImportService};
pub use pipeline::BuildPipeline;
pub use plan::{
    content_plan, ContentPlan, PlanError, PlannedCategory, PlannedLocation, PlannedNamed,
    PlannedService,
};

pub const CRATE_NAME: &str = "silohost-ingest";
