// ---------------------------------------------------------------------------
// SearchEngine: hash index plus an ordered item sequence
// ---------------------------------------------------------------------------
//
// Mutations go through both the hash index and the backing sequence. Name
// lookups sort the sequence lazily and remember which order it is in; any
// mutation forgets that order. Ranking always works on a copy.
// ---------------------------------------------------------------------------

use serde::Serialize;

use crate::binary_search;
use crate::config::EngineConfig;
use crate::error::CatalogError;
use crate::hash_index::{new_table, IndexKind, ItemTable};
use crate::item::{Item, ItemDraft};
use crate::sorting::{sort_items, SortAlgorithm, SortKey, SortOrder};

// ---------------------------------------------------------------------------
// Sort state
// ---------------------------------------------------------------------------

/// Which order the backing sequence is known to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortState {
	#[default]
	Unsorted,
	SortedById,
	SortedByName,
}

/// Snapshot of catalog and index size.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
	pub item_count: usize,
	pub index_kind: IndexKind,
	pub index_capacity: usize,
	pub load_factor: f64,
	pub sort_state: SortState,
}

// ---------------------------------------------------------------------------
// SearchEngine
// ---------------------------------------------------------------------------

pub struct SearchEngine {
	index: Box<dyn ItemTable>,
	items: Vec<Item>,
	sort_state: SortState,
	binary_search_threshold: usize,
}

impl SearchEngine {
	pub fn new(config: &EngineConfig) -> Self {
		Self {
			index: new_table(config.index_kind, config.initial_capacity),
			items: Vec::new(),
			sort_state: SortState::Unsorted,
			binary_search_threshold: config.binary_search_threshold,
		}
	}

	/// Engine with default settings and the given index variant.
	pub fn with_kind(kind: IndexKind) -> Self {
		Self::new(&EngineConfig {
			index_kind: kind,
			..EngineConfig::default()
		})
	}

	// -- Mutation ------------------------------------------------------------

	/// Add `item`, replacing any item with the same id.
	///
	/// The index is updated first; if it fails nothing else changes.
	pub fn add(&mut self, item: Item) -> Result<(), CatalogError> {
		let id = item.id();
		let existed = self.index.get(id).is_some();
		self.index.insert(item.clone())?;

		let position = if existed {
			self.items.iter().position(|existing| existing.id() == id)
		} else {
			None
		};
		match position {
			Some(pos) => self.items[pos] = item,
			None => self.items.push(item),
		}
		self.sort_state = SortState::Unsorted;
		tracing::trace!(id, replaced = existed, "Item added");
		Ok(())
	}

	/// Validate a draft and add the resulting item.
	pub fn add_draft(&mut self, draft: ItemDraft) -> Result<Item, CatalogError> {
		let item = draft.validate()?;
		self.add(item.clone())?;
		Ok(item)
	}

	/// Remove the item with `id`. Returns `true` iff it was present.
	pub fn remove(&mut self, id: i64) -> bool {
		let removed = self.index.remove(id);
		if removed {
			self.items.retain(|item| item.id() != id);
			self.sort_state = SortState::Unsorted;
			tracing::trace!(id, "Item removed");
		}
		removed
	}

	// -- Lookup --------------------------------------------------------------

	/// O(1) lookup through the hash index.
	pub fn lookup_by_id(&self, id: i64) -> Option<&Item> {
		self.index.get(id)
	}

	/// Lookup by binary search over the sequence sorted by id.
	pub fn lookup_by_id_binary(&mut self, id: i64) -> Option<&Item> {
		self.ensure_sorted(SortState::SortedById);
		binary_search::search_by_id(&self.items, id)
	}

	/// Items whose name contains `fragment`, case-insensitively.
	///
	/// With `prefer_binary` and a catalog above the binary-search threshold
	/// the sequence is sorted by name (once) and binary searched; otherwise
	/// the hash index is scanned. Blank text matches nothing.
	pub fn search_by_name(&mut self, fragment: &str, prefer_binary: bool) -> Vec<Item> {
		if fragment.trim().is_empty() {
			return Vec::new();
		}

		if prefer_binary && self.items.len() > self.binary_search_threshold {
			self.ensure_sorted(SortState::SortedByName);
			binary_search::search_by_name_partial(&self.items, fragment)
				.into_iter()
				.cloned()
				.collect()
		} else {
			self.index
				.search_by_name(fragment)
				.into_iter()
				.cloned()
				.collect()
		}
	}

	/// Exact, case-insensitive name lookup by binary search.
	pub fn search_by_name_exact(&mut self, name: &str) -> Option<&Item> {
		self.ensure_sorted(SortState::SortedByName);
		binary_search::search_by_name_exact(&self.items, name)
	}

	/// Items whose name starts with `prefix`, case-insensitively.
	pub fn search_by_name_prefix(&mut self, prefix: &str) -> Vec<Item> {
		if prefix.trim().is_empty() {
			return Vec::new();
		}
		self.ensure_sorted(SortState::SortedByName);
		binary_search::search_by_name_prefix(&self.items, prefix)
			.into_iter()
			.cloned()
			.collect()
	}

	// -- Ranking -------------------------------------------------------------

	/// A sorted copy of the catalog. Leaves the backing sequence and its
	/// sort state alone.
	pub fn rank(&self, sort_by: SortKey, order: SortOrder, algorithm: SortAlgorithm) -> Vec<Item> {
		sort_items(&self.items, sort_by, order, algorithm)
	}

	// -- Introspection -------------------------------------------------------

	pub fn count(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// The backing sequence as it currently stands.
	pub fn items(&self) -> &[Item] {
		&self.items
	}

	pub fn sort_state(&self) -> SortState {
		self.sort_state
	}

	pub fn stats(&self) -> CatalogStats {
		CatalogStats {
			item_count: self.items.len(),
			index_kind: self.index.kind(),
			index_capacity: self.index.capacity(),
			load_factor: self.index.load_factor(),
			sort_state: self.sort_state,
		}
	}

	fn ensure_sorted(&mut self, wanted: SortState) {
		if self.sort_state == wanted {
			return;
		}
		let key = match wanted {
			SortState::SortedById => SortKey::Id,
			SortState::SortedByName => SortKey::Name,
			SortState::Unsorted => return,
		};
		tracing::debug!(?wanted, count = self.items.len(), "Sorting catalog for binary search");
		self.items = sort_items(&self.items, key, SortOrder::Asc, SortAlgorithm::Merge);
		self.sort_state = wanted;
	}
}

impl Default for SearchEngine {
	fn default() -> Self {
		Self::new(&EngineConfig::default())
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn item(id: i64, name: &str, price: f64) -> Item {
		Item::new(id, name, price, 4.0, 100).unwrap()
	}

	const NAMES: [&str; 12] = [
		"Laptop Pro 15",
		"Wireless Mouse",
		"Mechanical Keyboard",
		"Gaming Laptop",
		"USB-C Cable",
		"Monitor 27 inch",
		"Webcam HD",
		"Laptop Stand",
		"External SSD 1TB",
		"Noise Cancelling Headphones",
		"Smartphone Case",
		"Tablet 10 inch",
	];

	fn seeded(kind: IndexKind) -> SearchEngine {
		let mut engine = SearchEngine::with_kind(kind);
		for (i, name) in NAMES.iter().enumerate() {
			engine.add(item(i as i64 + 1, name, 10.0 * (i + 1) as f64)).unwrap();
		}
		engine
	}

	#[test]
	fn add_and_lookup() {
		for kind in [IndexKind::Chaining, IndexKind::Open] {
			let engine = seeded(kind);
			assert_eq!(engine.count(), 12);
			assert_eq!(engine.lookup_by_id(3).map(Item::name), Some("Mechanical Keyboard"));
			assert!(engine.lookup_by_id(99).is_none());
		}
	}

	#[test]
	fn remove_updates_index_and_sequence() {
		let mut engine = seeded(IndexKind::Open);
		assert!(engine.remove(2));
		assert!(!engine.remove(2));
		assert_eq!(engine.count(), 11);
		assert!(engine.lookup_by_id(2).is_none());
		assert!(engine.items().iter().all(|i| i.id() != 2));
	}

	#[test]
	fn upsert_keeps_count_and_position() {
		let mut engine = seeded(IndexKind::Chaining);
		engine.add(item(3, "Mechanical Keyboard v2", 95.0)).unwrap();
		assert_eq!(engine.count(), 12);
		assert_eq!(engine.items()[2].name(), "Mechanical Keyboard v2");
		assert_eq!(engine.lookup_by_id(3).map(Item::price), Some(95.0));
	}

	#[test]
	fn add_draft_rejects_invalid_without_mutation() {
		let mut engine = seeded(IndexKind::Chaining);
		let draft = ItemDraft {
			id: Some(50),
			name: Some("Broken".into()),
			price: None,
			..Default::default()
		};
		assert!(matches!(engine.add_draft(draft), Err(CatalogError::Validation(_))));
		assert_eq!(engine.count(), 12);
		assert!(engine.lookup_by_id(50).is_none());
	}

	#[test]
	fn binary_name_search_sorts_lazily() {
		let mut engine = seeded(IndexKind::Chaining);
		assert_eq!(engine.sort_state(), SortState::Unsorted);

		let found = engine.search_by_name("laptop", true);
		assert!(!found.is_empty());
		assert!(found.iter().all(|i| i.folded_name().contains("laptop")));
		assert_eq!(engine.sort_state(), SortState::SortedByName);

		engine.add(item(100, "Laptop Sleeve", 25.0)).unwrap();
		assert_eq!(engine.sort_state(), SortState::Unsorted);
	}

	#[test]
	fn small_catalog_uses_linear_scan() {
		let mut engine = SearchEngine::default();
		engine.add(item(1, "Desktop Tower", 900.0)).unwrap();
		engine.add(item(2, "Gaming Laptop", 1999.0)).unwrap();
		engine.add(item(3, "Keyboard", 80.0)).unwrap();

		let found = engine.search_by_name("top", true);
		assert_eq!(found.len(), 2);
		assert_eq!(engine.sort_state(), SortState::Unsorted);
	}

	#[test]
	fn blank_query_matches_nothing() {
		let mut engine = seeded(IndexKind::Chaining);
		assert!(engine.search_by_name("", true).is_empty());
		assert!(engine.search_by_name("   ", false).is_empty());
	}

	#[test]
	fn rank_leaves_sort_state_alone() {
		let mut engine = seeded(IndexKind::Chaining);
		engine.search_by_name("mouse", true);
		assert_eq!(engine.sort_state(), SortState::SortedByName);

		let before: Vec<i64> = engine.items().iter().map(Item::id).collect();
		let ranked = engine.rank(SortKey::Price, SortOrder::Desc, SortAlgorithm::Quick);
		assert_eq!(ranked.first().map(Item::id), Some(12));
		assert_eq!(engine.sort_state(), SortState::SortedByName);
		let after: Vec<i64> = engine.items().iter().map(Item::id).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn binary_id_lookup_switches_order() {
		let mut engine = seeded(IndexKind::Open);
		engine.search_by_name("cable", true);
		assert_eq!(engine.lookup_by_id_binary(9).map(Item::id), Some(9));
		assert_eq!(engine.sort_state(), SortState::SortedById);
		assert!(engine.lookup_by_id_binary(999).is_none());
	}

	#[test]
	fn exact_and_prefix_name_lookups() {
		let mut engine = seeded(IndexKind::Chaining);
		assert_eq!(engine.search_by_name_exact("webcam hd").map(Item::id), Some(7));
		assert!(engine.search_by_name_exact("webcam").is_none());

		let laptops = engine.search_by_name_prefix("laptop");
		let mut ids: Vec<i64> = laptops.iter().map(Item::id).collect();
		ids.sort();
		assert_eq!(ids, vec![1, 8]);
	}

	#[test]
	fn stats_reflect_index() {
		let engine = seeded(IndexKind::Open);
		let stats = engine.stats();
		assert_eq!(stats.item_count, 12);
		assert_eq!(stats.index_kind, IndexKind::Open);
		assert_eq!(stats.index_capacity, 101);
		assert!((stats.load_factor - 12.0 / 101.0).abs() < 1e-12);
	}
}
