// ---------------------------------------------------------------------------
// SharedCatalog: one lock around the whole search engine
// ---------------------------------------------------------------------------
//
// The hash index, the backing sequence and the sort state change together,
// so they sit behind a single `RwLock`. Name search takes the write lock
// because it may re-sort the sequence; ranking and recommendations only
// read and run under the read lock.
// ---------------------------------------------------------------------------

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::EngineConfig;
use crate::error::CatalogError;
use crate::item::Item;
use crate::recommendation::RecommendationEngine;
use crate::search_engine::{CatalogStats, SearchEngine};
use crate::sorting::{SortAlgorithm, SortKey, SortOrder};

/// Thread-safe handle for embedding the catalog in a multi-threaded host.
///
/// Library API only. The stdio server runs a single request loop and owns
/// its [`SearchEngine`] directly, so it never goes through this type.
#[derive(Clone)]
pub struct SharedCatalog {
	inner: Arc<RwLock<SearchEngine>>,
}

impl SharedCatalog {
	pub fn new(config: &EngineConfig) -> Self {
		Self::from_engine(SearchEngine::new(config))
	}

	pub fn from_engine(engine: SearchEngine) -> Self {
		Self {
			inner: Arc::new(RwLock::new(engine)),
		}
	}

	pub fn add(&self, item: Item) -> Result<(), CatalogError> {
		self.inner.write().add(item)
	}

	pub fn remove(&self, id: i64) -> bool {
		self.inner.write().remove(id)
	}

	pub fn lookup_by_id(&self, id: i64) -> Option<Item> {
		self.inner.read().lookup_by_id(id).cloned()
	}

	pub fn search_by_name(&self, fragment: &str, prefer_binary: bool) -> Vec<Item> {
		self.inner.write().search_by_name(fragment, prefer_binary)
	}

	pub fn rank(&self, sort_by: SortKey, order: SortOrder, algorithm: SortAlgorithm) -> Vec<Item> {
		self.inner.read().rank(sort_by, order, algorithm)
	}

	pub fn count(&self) -> usize {
		self.inner.read().count()
	}

	pub fn stats(&self) -> CatalogStats {
		self.inner.read().stats()
	}

	/// Run `f` against a recommendation view while holding the read lock.
	pub fn recommend<R>(&self, f: impl FnOnce(&RecommendationEngine<'_>) -> R) -> R {
		let engine = self.inner.read();
		f(&RecommendationEngine::new(&engine))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::thread;

	fn item(id: i64) -> Item {
		Item::new(id, format!("Widget {id}"), 10.0 + id as f64, 4.0, id as u64)
			.unwrap()
			.with_category("Accessories")
	}

	#[test]
	fn concurrent_writers_and_readers_agree_on_count() {
		let catalog = SharedCatalog::new(&EngineConfig::default());
		let writers: Vec<_> = (0..4)
			.map(|t| {
				let catalog = catalog.clone();
				thread::spawn(move || {
					for i in 0..50 {
						catalog.add(item(t * 1000 + i)).unwrap();
					}
				})
			})
			.collect();
		let readers: Vec<_> = (0..2)
			.map(|_| {
				let catalog = catalog.clone();
				thread::spawn(move || {
					for _ in 0..50 {
						let ranked = catalog.rank(SortKey::Price, SortOrder::Asc, SortAlgorithm::Merge);
						assert!(ranked.len() <= 200);
						let _ = catalog.search_by_name("widget 1", true);
					}
				})
			})
			.collect();

		for handle in writers.into_iter().chain(readers) {
			handle.join().unwrap();
		}

		assert_eq!(catalog.count(), 200);
		assert_eq!(catalog.stats().item_count, 200);
		assert!(catalog.lookup_by_id(3049).is_some());
	}

	#[test]
	fn recommendations_run_under_read_lock() {
		let catalog = SharedCatalog::new(&EngineConfig::default());
		for id in 1..=6 {
			catalog.add(item(id)).unwrap();
		}
		let recs = catalog.recommend(|r| r.get_recommendations(1, 3));
		assert_eq!(recs.len(), 3);
		assert!(catalog.remove(1));
		assert!(catalog.recommend(|r| r.get_recommendations(1, 3)).is_empty());
	}
}
