//! Search façade: routes queries between the prefix index and the catalog
//! store, joins the favorite overlay, and adapts results into pages.

use crate::ingest::IngestionPipeline;
use crate::traits::FavoriteStore;
use crate::types::{CityMatch, CityPage};
use cityseek_core::{CatalogStore, City, CityTrie};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// The query entry point.
///
/// Holds the at-most-once index-build gate: the first blank query triggers
/// ingestion plus trie construction through a [`OnceCell`], so concurrent
/// first-time callers await the same build and later callers see the
/// published index without locking. The trie is never rebuilt implicitly;
/// a catalog change after the build is invisible until a new searcher is
/// constructed.
pub struct CitySearcher {
    store: Arc<CatalogStore>,
    favorites: Arc<dyn FavoriteStore>,
    pipeline: IngestionPipeline,
    index: OnceCell<CityTrie>,
    query_limit: usize,
    page_size: usize,
}

impl CitySearcher {
    pub fn new(
        store: Arc<CatalogStore>,
        favorites: Arc<dyn FavoriteStore>,
        pipeline: IngestionPipeline,
        query_limit: usize,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            favorites,
            pipeline,
            index: OnceCell::new(),
            query_limit,
            page_size: page_size.max(1),
        }
    }

    /// Whether the prefix index has been built.
    ///
    /// Kept explicit rather than inferred from empty results: an empty trie
    /// answer for a non-blank prefix is a legitimate "no matches" once the
    /// index is ready.
    pub fn index_ready(&self) -> bool {
        self.index.initialized()
    }

    /// Run ingestion and build the index up front. Returns the number of
    /// cities indexed. Concurrent callers share one build.
    pub async fn warm_up(&self) -> usize {
        self.index.get_or_init(|| self.build_index()).await.len()
    }

    /// Search for cities matching `text`, overlaid with favorite flags.
    ///
    /// A blank query means "show everything" and doubles as the lazy
    /// warm-up trigger. Results are deduplicated by id and ordered by
    /// (name, country); with `favorites_only` the list is filtered after
    /// the overlay join. Failures degrade to an empty vec.
    pub async fn query(&self, text: &str, favorites_only: bool) -> Vec<CityMatch> {
        if text.trim().is_empty() {
            self.index.get_or_init(|| self.build_index()).await;
        }

        let cities = match self.index.get() {
            // Index ready: trust its answer, including a legitimately
            // empty one for a non-blank prefix.
            Some(trie) => trie.search(text),
            // Index not built yet (non-blank first query): serve from the
            // store directly.
            None => self.store_search(text),
        };

        let favorites = self.favorites.get_all().await;
        let matches = join_overlay(dedup_by_id(cities), &favorites);

        if favorites_only {
            matches.into_iter().filter(|m| m.favorite).collect()
        } else {
            matches
        }
    }

    /// One page of query results.
    ///
    /// Each call re-runs the full query; there is no page cache. Pages are
    /// 1-based; a key of 0 is treated as the first page.
    pub async fn page(&self, text: &str, favorites_only: bool, page: u32) -> CityPage {
        let page = page.max(1);
        let all = self.query(text, favorites_only).await;

        let start = (page as usize - 1) * self.page_size;
        let items: Vec<CityMatch> = all.into_iter().skip(start).take(self.page_size).collect();

        CityPage {
            prev_key: if page == 1 { None } else { Some(page - 1) },
            next_key: if items.is_empty() { None } else { Some(page + 1) },
            items,
        }
    }

    /// Point lookup by id, joined with the favorite flag.
    pub async fn city_by_id(&self, id: i64) -> Option<CityMatch> {
        match self.store.query_by_id(id) {
            Ok(Some(city)) => {
                let favorite = self.favorites.contains(&city.id.to_string()).await;
                Some(CityMatch { city, favorite })
            }
            Ok(None) => None,
            Err(err) => {
                warn!("catalog lookup failed: {err}");
                None
            }
        }
    }

    /// Flip the favorite flag for a city id. This is the only write path
    /// into the overlay; the canonical record is untouched.
    pub async fn toggle_favorite(&self, id: i64) -> Result<(), crate::BackendError> {
        self.favorites.toggle(&id.to_string()).await
    }

    async fn build_index(&self) -> CityTrie {
        let cities = self.pipeline.ensure_catalog_populated().await;
        let mut trie = CityTrie::new();
        for city in cities {
            trie.insert(city);
        }
        info!(cities = trie.len(), "prefix index built");
        trie
    }

    fn store_search(&self, text: &str) -> Vec<City> {
        let result = if text.trim().is_empty() {
            self.store.query_all(self.query_limit)
        } else {
            self.store.query_by_prefix(text, self.query_limit)
        };
        result.unwrap_or_else(|err| {
            warn!("catalog query failed: {err}");
            Vec::new()
        })
    }
}

/// Drop later duplicates of the same id, preserving order.
fn dedup_by_id(cities: Vec<City>) -> Vec<City> {
    let mut seen = HashSet::with_capacity(cities.len());
    cities
        .into_iter()
        .filter(|city| seen.insert(city.id))
        .collect()
}

/// Left-join the favorite overlay onto the result set.
fn join_overlay(cities: Vec<City>, favorites: &HashSet<String>) -> Vec<CityMatch> {
    cities
        .into_iter()
        .map(|city| {
            let favorite = favorites.contains(&city.id.to_string());
            CityMatch { city, favorite }
        })
        .collect()
}
