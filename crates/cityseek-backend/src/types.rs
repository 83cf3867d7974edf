//! Result types returned by the search façade.

use cityseek_core::City;
use serde::Serialize;

/// A catalog record joined with its favorite overlay flag.
///
/// `favorite` comes from the overlay store at query time; it is never part
/// of the persisted record, so toggling it cannot corrupt the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMatch {
    pub city: City,
    pub favorite: bool,
}

/// One page of results from the paging adapter.
///
/// Keys are integer cursors: `prev_key` is `page - 1` unless this is the
/// first page, `next_key` is `page + 1` unless the page came back empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityPage {
    pub items: Vec<CityMatch>,
    pub prev_key: Option<u32>,
    pub next_key: Option<u32>,
}
