//! In-memory prefix index over city names and countries.
//!
//! Each city is indexed twice, under its lowercased name and its lowercased
//! country, so a single structure answers both "cities starting with Men"
//! and "cities in AR" with one ordering discipline. Nodes hold id sets and
//! the records themselves live once in an id-keyed arena at the root, which
//! makes per-node deduplication structural.
//!
//! The trie is built once from a catalog snapshot and is read-only
//! afterwards; it does not follow later catalog changes. Concurrent reads
//! need no locking once the build is published.

use crate::model::{by_name_country, City};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, Node>,
    /// Ids of every city reachable through this prefix
    ids: HashSet<i64>,
}

/// Prefix index answering "all cities whose name or country starts with P"
/// in time proportional to |P|.
#[derive(Debug, Default)]
pub struct CityTrie {
    root: Node,
    cities: HashMap<i64, City>,
}

impl CityTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct cities indexed.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Index a city under both its name and its country.
    ///
    /// Key characters are lowercased at insertion so lookups and insertions
    /// agree on normalization.
    pub fn insert(&mut self, city: City) {
        let id = city.id;
        let name = city.name.to_lowercase();
        let country = city.country.to_lowercase();
        self.cities.insert(id, city);

        Self::insert_word(&mut self.root, &name, id);
        Self::insert_word(&mut self.root, &country, id);
    }

    fn insert_word(root: &mut Node, word: &str, id: i64) {
        let mut current = root;
        for ch in word.chars() {
            current = current.children.entry(ch).or_default();
            current.ids.insert(id);
        }
    }

    /// Cities matching `prefix`, sorted by (name, country).
    ///
    /// A blank prefix returns every indexed city. A prefix with no matching
    /// edge is not an error; it returns an empty vec.
    pub fn search(&self, prefix: &str) -> Vec<City> {
        if prefix.trim().is_empty() {
            return self.sorted(self.cities.keys().copied());
        }

        let normalized = prefix.to_lowercase();
        let mut current = &self.root;
        for ch in normalized.chars() {
            match current.children.get(&ch) {
                Some(child) => current = child,
                None => return Vec::new(),
            }
        }
        self.sorted(current.ids.iter().copied())
    }

    fn sorted(&self, ids: impl Iterator<Item = i64>) -> Vec<City> {
        let mut cities: Vec<City> = ids
            .filter_map(|id| self.cities.get(&id).cloned())
            .collect();
        cities.sort_by(by_name_country);
        cities
    }
}
