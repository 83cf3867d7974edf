//! CitySeek Core
//!
//! The synchronous heart of CitySeek: the canonical [`City`] record, a
//! streaming parser for the raw dataset, the SQLite-backed [`CatalogStore`],
//! and the in-memory [`CityTrie`] prefix index.
//!
//! Everything async (ingestion pipeline, favorites overlay, search façade)
//! lives in `cityseek-backend` and is built on top of this crate.

pub mod model;
pub mod parser;
pub mod schema;
pub mod store;
pub mod text;
pub mod trie;

pub use model::City;
pub use parser::{parse_dataset, ParseError, ParseStats};
pub use store::{CatalogStore, StoreError};
pub use trie::CityTrie;
