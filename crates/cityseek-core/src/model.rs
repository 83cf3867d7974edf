//! Canonical city record.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A city as persisted in the catalog store.
///
/// Favorite status is deliberately not a field here: it lives in a separate
/// overlay keyed by stringified id and is joined onto results at query time
/// (see `cityseek-backend`). Records are immutable after ingestion except
/// for full replacement when a later ingestion run upserts the same `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Stable external identifier (`_id` on the wire), unique in the store
    pub id: i64,
    /// Sanitized display name; blank names never reach the store
    pub name: String,
    /// Sanitized country name or code
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    /// "Name, Country" display line.
    pub fn title(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// Coordinate display line.
    pub fn subtitle(&self) -> String {
        format!("Lat: {}, Long: {}", self.latitude, self.longitude)
    }
}

/// The one ordering discipline used everywhere results are sorted:
/// name first (case-sensitive, lexicographic), then country.
pub fn by_name_country(a: &City, b: &City) -> Ordering {
    a.name.cmp(&b.name).then_with(|| a.country.cmp(&b.country))
}
