//! SQLite schema definitions for the city catalog.
//!
//! The catalog is a single table of city records plus a small metadata
//! table carrying the schema version. Name and country are indexed because
//! they back the store-side prefix fallback queries.

/// Schema version for catalog databases
pub const CATALOG_SCHEMA_VERSION: &str = "1.0";

/// SQL to create the cities table
///
/// `id` is the stable external identifier from the dataset; re-ingesting a
/// record with an existing id replaces it (upsert).
pub const SCHEMA_CREATE_CITIES: &str = r#"
CREATE TABLE IF NOT EXISTS cities (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    country TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL
)
"#;

/// SQL to create indexes for the prefix fallback queries
pub const SCHEMA_CREATE_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_city_name ON cities(name);
CREATE INDEX IF NOT EXISTS idx_city_country ON cities(country);
"#;

/// SQL to create the metadata table
pub const SCHEMA_CREATE_METADATA: &str = r#"
CREATE TABLE IF NOT EXISTS catalog_metadata (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)
"#;

/// Upsert a single city record (batched inside one transaction per batch)
pub const SQL_INSERT_CITY: &str = r#"
INSERT OR REPLACE INTO cities (id, name, country, latitude, longitude)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

/// Full listing, bounded, in the contractual (name, country) order
pub const SQL_SELECT_ALL: &str =
    "SELECT id, name, country, latitude, longitude FROM cities ORDER BY name, country LIMIT ?1";

/// Case-insensitive name-prefix lookup, same ordering
pub const SQL_SELECT_BY_PREFIX: &str = r#"
SELECT id, name, country, latitude, longitude FROM cities
WHERE name LIKE ?1 || '%' COLLATE NOCASE
ORDER BY name, country LIMIT ?2
"#;

/// Point lookup by id
pub const SQL_SELECT_BY_ID: &str =
    "SELECT id, name, country, latitude, longitude FROM cities WHERE id = ?1";

/// Total record count
pub const SQL_COUNT: &str = "SELECT COUNT(*) FROM cities";

/// Wipe the catalog
pub const SQL_DELETE_ALL: &str = "DELETE FROM cities";
