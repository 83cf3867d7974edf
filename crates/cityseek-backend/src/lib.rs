//! CitySeek Backend
//!
//! The async layer over `cityseek-core`: the ingestion pipeline that
//! guarantees a queryable catalog exists, the favorites overlay store, the
//! dataset fetcher, and the [`CitySearcher`] façade that routes queries
//! between the in-memory prefix index and the catalog store.
//!
//! Every public operation here is best-effort: failures are logged and
//! degrade to empty results, they never reach the caller as panics or
//! uncaught errors.

mod error;
mod favorites;
mod fetch;
mod ingest;
mod search;
mod traits;
mod types;

pub use error::BackendError;
pub use favorites::JsonFavoriteStore;
pub use fetch::HttpDatasetFetcher;
pub use ingest::{IngestionPipeline, BUNDLED_CITIES};
pub use search::CitySearcher;
pub use traits::{DatasetFetcher, FavoriteStore};
pub use types::{CityMatch, CityPage};
