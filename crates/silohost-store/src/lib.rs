#![forbid(unsafe_code)]
//! Storage for tenant sites and their content.
//!
//! Two implementations of the same surface: [`SqliteStore`] for the service
//! and [`MemoryStore`] for tests. Both implement the routing crate's read
//! ports ([`TenantDirectory`], [`ContentSource`]) plus the [`SiteWriter`]
//! mutation trait defined here. Status updates are last-write-wins; the
//! transition rules themselves live in `silohost-model`.

mod memory;
mod schema;
mod sqlite;
mod writer;

pub use memory::MemoryStore;
pub use schema::SCHEMA_SQL;
pub use silohost_routing::{ContentSource, StoreError, TenantDirectory};
pub use sqlite::SqliteStore;
pub use writer::{
    NewCategory, NewLead, NewLocation, NewNeighborhood, NewService, NewServiceArea, NewSite,
    SiteWriter,
};

pub const CRATE_NAME: &str = "silohost-store";
