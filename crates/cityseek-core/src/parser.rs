//! Streaming parser for the raw city dataset.
//!
//! The wire format is a single JSON array of city objects. The array is
//! consumed element by element through a serde seq visitor, so peak memory
//! is bounded by the batch size rather than the dataset size. Each element
//! is first read as a [`serde_json::Value`] and only then converted to a
//! typed record: a type mismatch inside one record drops that record and
//! parsing continues, while a malformed stream (truncated array, unreadable
//! reader) aborts the remaining parse with [`ParseError::Stream`].

use crate::model::City;
use crate::store::StoreError;
use crate::text::remove_special_characters;
use serde::de::{DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::io::Read;
use thiserror::Error;
use tracing::warn;

/// Errors that can abort a parse pass
#[derive(Debug, Error)]
pub enum ParseError {
    /// The stream itself was unreadable or the array was malformed.
    /// Batches flushed before the failure have already been persisted.
    #[error("dataset stream error: {0}")]
    Stream(#[source] serde_json::Error),

    /// The batch sink (catalog insert) rejected a flush.
    #[error("batch sink error: {0}")]
    Sink(#[source] StoreError),
}

/// Outcome counters for one parse pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    /// Records accepted into batches
    pub parsed: usize,
    /// Malformed or blank-name records dropped
    pub skipped: usize,
    /// Sink flushes issued (`ceil(parsed / batch_size)`)
    pub batches: usize,
}

/// A city record as it appears on the wire.
///
/// Unknown fields are ignored; a missing `name` or `country` defaults to
/// an empty string rather than failing the record.
#[derive(Debug, Deserialize)]
struct RawCity {
    #[serde(rename = "_id", default)]
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    coord: RawCoord,
}

#[derive(Debug, Default, Deserialize)]
struct RawCoord {
    #[serde(default)]
    lon: f64,
    #[serde(default)]
    lat: f64,
}

impl RawCity {
    /// Sanitize text fields and build the canonical record.
    ///
    /// Returns `None` when the name is blank after sanitization; such
    /// records are never persisted and never indexed.
    fn into_city(self) -> Option<City> {
        let name = remove_special_characters(&self.name);
        if name.trim().is_empty() {
            return None;
        }
        Some(City {
            id: self.id,
            name,
            country: remove_special_characters(&self.country),
            latitude: self.coord.lat,
            longitude: self.coord.lon,
        })
    }
}

/// Parse a JSON-array dataset from `reader`, flushing fixed-size batches of
/// validated cities through `sink`.
///
/// The sink is called once per full batch and once for the final partial
/// batch; it is never called with an empty slice, so ingesting `N` records
/// with batch size `B` issues exactly `ceil(N / B)` sink calls.
pub fn parse_dataset<R, F>(
    reader: R,
    batch_size: usize,
    mut sink: F,
) -> Result<ParseStats, ParseError>
where
    R: Read,
    F: FnMut(&[City]) -> Result<(), StoreError>,
{
    let mut sink_error: Option<StoreError> = None;
    let mut de = serde_json::Deserializer::from_reader(reader);

    let seed = DatasetSeed {
        batch_size: batch_size.max(1),
        sink: &mut sink,
        sink_error: &mut sink_error,
    };
    let result = seed.deserialize(&mut de);

    // A sink failure aborts the serde walk with a custom error; report it
    // under its own variant instead of as a stream error.
    if let Some(err) = sink_error {
        return Err(ParseError::Sink(err));
    }
    result.map_err(ParseError::Stream)
}

struct DatasetSeed<'a, F> {
    batch_size: usize,
    sink: &'a mut F,
    sink_error: &'a mut Option<StoreError>,
}

impl<'de, F> DeserializeSeed<'de> for DatasetSeed<'_, F>
where
    F: FnMut(&[City]) -> Result<(), StoreError>,
{
    type Value = ParseStats;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(BatchingVisitor {
            batch_size: self.batch_size,
            sink: self.sink,
            sink_error: self.sink_error,
            batch: Vec::new(),
            stats: ParseStats::default(),
        })
    }
}

struct BatchingVisitor<'a, F> {
    batch_size: usize,
    sink: &'a mut F,
    sink_error: &'a mut Option<StoreError>,
    batch: Vec<City>,
    stats: ParseStats,
}

impl<F> BatchingVisitor<'_, F>
where
    F: FnMut(&[City]) -> Result<(), StoreError>,
{
    fn flush<E: serde::de::Error>(&mut self) -> Result<(), E> {
        if self.batch.is_empty() {
            return Ok(());
        }
        if let Err(err) = (self.sink)(&self.batch) {
            *self.sink_error = Some(err);
            return Err(E::custom("batch sink failed"));
        }
        self.stats.batches += 1;
        self.batch.clear();
        Ok(())
    }
}

impl<'de, F> Visitor<'de> for BatchingVisitor<'_, F>
where
    F: FnMut(&[City]) -> Result<(), StoreError>,
{
    type Value = ParseStats;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON array of city records")
    }

    fn visit_seq<A>(mut self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while let Some(value) = seq.next_element::<Value>()? {
            match serde_json::from_value::<RawCity>(value) {
                Ok(raw) => match raw.into_city() {
                    Some(city) => {
                        self.batch.push(city);
                        self.stats.parsed += 1;
                        if self.batch.len() >= self.batch_size {
                            self.flush()?;
                        }
                    }
                    None => self.stats.skipped += 1,
                },
                Err(err) => {
                    warn!("skipping malformed city record: {err}");
                    self.stats.skipped += 1;
                }
            }
        }
        self.flush()?;
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect_all(json: &str, batch_size: usize) -> (Vec<City>, ParseStats) {
        let mut out = Vec::new();
        let stats = parse_dataset(json.as_bytes(), batch_size, |batch| {
            out.extend_from_slice(batch);
            Ok(())
        })
        .expect("parse should succeed");
        (out, stats)
    }

    #[test]
    fn test_parses_well_formed_records() {
        let json = r#"[
            {"_id":1,"name":"Mendoza","country":"AR","coord":{"lon":-68.9,"lat":-32.9}},
            {"_id":2,"name":"San Juan","country":"AR","coord":{"lon":-68.5,"lat":-31.5}}
        ]"#;
        let (cities, stats) = collect_all(json, 100);
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].name, "Mendoza");
        assert_eq!(cities[0].latitude, -32.9);
        assert_eq!(cities[0].longitude, -68.9);
        assert_eq!(stats.parsed, 2);
        assert_eq!(stats.skipped, 0);
        assert_eq!(stats.batches, 1);
    }

    #[test]
    fn test_blank_name_record_is_discarded() {
        let json = r#"[{"_id":3,"name":"","country":"US","coord":{"lon":0,"lat":0}}]"#;
        let (cities, stats) = collect_all(json, 100);
        assert!(cities.is_empty());
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.batches, 0);
    }

    #[test]
    fn test_name_blank_after_sanitization_is_discarded() {
        let json = r#"[{"_id":4,"name":"@#$","country":"US","coord":{"lon":0,"lat":0}}]"#;
        let (cities, stats) = collect_all(json, 100);
        assert!(cities.is_empty());
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_missing_fields_default_not_error() {
        // No country, no coord: record survives with empty country and
        // zeroed coordinates.
        let json = r#"[{"_id":5,"name":"Lima"}]"#;
        let (cities, _) = collect_all(json, 100);
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].country, "");
        assert_eq!(cities[0].latitude, 0.0);
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let json = r#"[{"_id":6,"name":"Quito","country":"EC","elevation":2850,"coord":{"lon":-78.5,"lat":-0.2}}]"#;
        let (cities, stats) = collect_all(json, 100);
        assert_eq!(cities.len(), 1);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn test_malformed_record_is_skipped_parse_continues() {
        let json = r#"[
            {"_id":"not-a-number","name":"Bad","country":"XX","coord":{"lon":0,"lat":0}},
            {"_id":7,"name":"Good","country":"AR","coord":{"lon":1,"lat":2}}
        ]"#;
        let (cities, stats) = collect_all(json, 100);
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name, "Good");
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_truncated_stream_is_a_stream_error() {
        let json = r#"[{"_id":8,"name":"Half","country":"AR","coord":{"lon":0,"lat":0}},"#;
        let result = parse_dataset(json.as_bytes(), 100, |_| Ok(()));
        assert!(matches!(result, Err(ParseError::Stream(_))));
    }

    #[test]
    fn test_batch_flush_counts() {
        // 25 records, batch size 10: 3 flushes of 10, 10, 5.
        let records: Vec<String> = (1..=25)
            .map(|i| format!(r#"{{"_id":{i},"name":"City{i}","country":"AR","coord":{{"lon":0,"lat":0}}}}"#))
            .collect();
        let json = format!("[{}]", records.join(","));

        let mut sizes = Vec::new();
        let stats = parse_dataset(json.as_bytes(), 10, |batch| {
            sizes.push(batch.len());
            Ok(())
        })
        .expect("parse should succeed");

        assert_eq!(sizes, vec![10, 10, 5]);
        assert_eq!(stats.parsed, 25);
        assert_eq!(stats.batches, 3);
    }

    #[test]
    fn test_exact_multiple_issues_no_empty_flush() {
        let records: Vec<String> = (1..=20)
            .map(|i| format!(r#"{{"_id":{i},"name":"City{i}","country":"AR","coord":{{"lon":0,"lat":0}}}}"#))
            .collect();
        let json = format!("[{}]", records.join(","));

        let mut sizes = Vec::new();
        parse_dataset(json.as_bytes(), 10, |batch| {
            sizes.push(batch.len());
            Ok(())
        })
        .expect("parse should succeed");

        assert_eq!(sizes, vec![10, 10]);
    }

    #[test]
    fn test_sink_failure_surfaces_as_sink_error() {
        let json = r#"[{"_id":9,"name":"Any","country":"AR","coord":{"lon":0,"lat":0}}]"#;
        let result = parse_dataset(json.as_bytes(), 1, |_| {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        });
        assert!(matches!(result, Err(ParseError::Sink(_))));
    }

    #[test]
    fn test_names_are_sanitized() {
        let json = r#"[{"_id":10,"name":"San@ Juan!","country":"A.R","coord":{"lon":0,"lat":0}}]"#;
        let (cities, _) = collect_all(json, 100);
        assert_eq!(cities[0].name, "San Juan");
        assert_eq!(cities[0].country, "AR");
    }
}
