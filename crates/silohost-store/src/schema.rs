/// Relational schema. Uniqueness scopes mirror the model: site slugs are
/// global; location and area slugs are per-site; service slugs are
/// per-category; a custom domain is unique only among verified rows. All
/// content rows cascade away with their site.
pub const SCHEMA_SQL: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS sites (
  id                     INTEGER PRIMARY KEY,
  slug                   TEXT NOT NULL UNIQUE,
  custom_domain          TEXT,
  custom_domain_verified INTEGER NOT NULL DEFAULT 0,
  status                 TEXT NOT NULL,
  status_message         TEXT,
  status_updated_at_ms   INTEGER NOT NULL,
  website_type           TEXT NOT NULL,
  completed_tasks        INTEGER NOT NULL DEFAULT 0,
  total_tasks            INTEGER NOT NULL DEFAULT 0,
  current_task           TEXT,
  build_started_at_ms    INTEGER,
  industry               TEXT,
  phone                  TEXT,
  brand_color            TEXT,
  logo_url               TEXT,
  created_at_ms          INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_sites_verified_domain
  ON sites (custom_domain) WHERE custom_domain_verified = 1;

CREATE TABLE IF NOT EXISTS locations (
  id         INTEGER PRIMARY KEY,
  site_id    INTEGER NOT NULL REFERENCES sites (id) ON DELETE CASCADE,
  slug       TEXT NOT NULL,
  name       TEXT NOT NULL,
  is_primary INTEGER NOT NULL DEFAULT 0,
  sort_index INTEGER NOT NULL DEFAULT 0,
  UNIQUE (site_id, slug)
);

CREATE TABLE IF NOT EXISTS categories (
  id            INTEGER PRIMARY KEY,
  site_id       INTEGER NOT NULL REFERENCES sites (id) ON DELETE CASCADE,
  taxonomy_name TEXT NOT NULL,
  display_name  TEXT NOT NULL,
  is_primary    INTEGER NOT NULL DEFAULT 0,
  sort_index    INTEGER NOT NULL DEFAULT 0,
  UNIQUE (site_id, taxonomy_name)
);

CREATE TABLE IF NOT EXISTS services (
  id          INTEGER PRIMARY KEY,
  site_id     INTEGER NOT NULL REFERENCES sites (id) ON DELETE CASCADE,
  category_id INTEGER NOT NULL REFERENCES categories (id) ON DELETE CASCADE,
  slug        TEXT NOT NULL,
  name        TEXT NOT NULL,
  description TEXT,
  active      INTEGER NOT NULL DEFAULT 1,
  sort_index  INTEGER NOT NULL DEFAULT 0,
  UNIQUE (category_id, slug)
);

CREATE TABLE IF NOT EXISTS service_areas (
  id      INTEGER PRIMARY KEY,
  site_id INTEGER NOT NULL REFERENCES sites (id) ON DELETE CASCADE,
  slug    TEXT NOT NULL,
  name    TEXT NOT NULL,
  UNIQUE (site_id, slug)
);

CREATE TABLE IF NOT EXISTS neighborhoods (
  id          INTEGER PRIMARY KEY,
  site_id     INTEGER NOT NULL REFERENCES sites (id) ON DELETE CASCADE,
  location_id INTEGER REFERENCES locations (id) ON DELETE CASCADE,
  slug        TEXT NOT NULL,
  name        TEXT NOT NULL,
  UNIQUE (site_id, location_id, slug)
);

CREATE TABLE IF NOT EXISTS leads (
  id            INTEGER PRIMARY KEY,
  site_id       INTEGER NOT NULL REFERENCES sites (id) ON DELETE CASCADE,
  name          TEXT NOT NULL,
  email         TEXT,
  phone         TEXT,
  message       TEXT,
  service_slug  TEXT,
  status        TEXT NOT NULL DEFAULT 'new',
  created_at_ms INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_leads_site ON leads (site_id, created_at_ms);
";
