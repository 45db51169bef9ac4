use std::collections::BTreeSet;

use catalog_engine::config::EngineConfig;
use catalog_engine::hash_index::{is_prime, new_table, IndexKind, ItemTable};
use catalog_engine::item::Item;
use catalog_engine::recommendation::RecommendationEngine;
use catalog_engine::search_engine::{SearchEngine, SortState};
use catalog_engine::sorting::{merge_sort, quick_sort, SortAlgorithm, SortKey, SortOrder};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
	Add(i64),
	Remove(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
	prop_oneof![
		3 => (0i64..200).prop_map(Op::Add),
		1 => (0i64..200).prop_map(Op::Remove),
	]
}

const NAMES: [&str; 8] = [
	"Laptop Stand",
	"laptop sleeve",
	"USB Hub",
	"usb cable",
	"Desk Lamp",
	"Monitor Arm",
	"zebra Mouse",
	"Audio Interface",
];

#[derive(Debug, Clone)]
enum EngineOp {
	Upsert(i64, usize),
	Remove(i64),
	SearchBinary(usize),
	LookupBinary(i64),
	Rank(SortKey, SortOrder, SortAlgorithm),
}

fn engine_op_strategy() -> impl Strategy<Value = EngineOp> {
	let key = prop_oneof![
		Just(SortKey::Id),
		Just(SortKey::Name),
		Just(SortKey::Price),
		Just(SortKey::Rating),
		Just(SortKey::Popularity),
	];
	let order = prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)];
	let algorithm = prop_oneof![Just(SortAlgorithm::Quick), Just(SortAlgorithm::Merge)];
	prop_oneof![
		4 => (0i64..40, 0..NAMES.len()).prop_map(|(id, n)| EngineOp::Upsert(id, n)),
		1 => (0i64..40).prop_map(EngineOp::Remove),
		2 => (0..NAMES.len()).prop_map(EngineOp::SearchBinary),
		2 => (0i64..40).prop_map(EngineOp::LookupBinary),
		1 => (key, order, algorithm).prop_map(|(k, o, a)| EngineOp::Rank(k, o, a)),
	]
}

fn named_item(id: i64, name: usize) -> Item {
	Item::new(id, NAMES[name], 10.0 + id as f64, 3.5, id as u64).unwrap()
}

fn kind_strategy() -> impl Strategy<Value = IndexKind> {
	prop_oneof![Just(IndexKind::Chaining), Just(IndexKind::Open)]
}

fn item(id: i64) -> Item {
	Item::new(id, format!("Item {id}"), (id % 50) as f64 * 10.0, (id % 6) as f64 * 0.8, id as u64)
		.unwrap()
		.with_category(["Laptops", "Audio", "Cables", "Storage"][(id % 4) as usize])
}

proptest! {
	#[test]
	fn table_tracks_distinct_ids(kind in kind_strategy(), ops in prop::collection::vec(op_strategy(), 0..300)) {
		let mut table = new_table(kind, 3);
		let mut model = BTreeSet::new();

		for op in ops {
			match op {
				Op::Add(id) => {
					table.insert(item(id)).unwrap();
					model.insert(id);
				}
				Op::Remove(id) => {
					prop_assert_eq!(table.remove(id), model.remove(&id));
				}
			}
			prop_assert!(is_prime(table.capacity()));
			prop_assert!(table.load_factor() <= 0.75);
		}

		prop_assert_eq!(table.len(), model.len());
		for id in 0..200 {
			prop_assert_eq!(table.get(id).is_some(), model.contains(&id));
		}
	}

	#[test]
	fn engine_count_matches_index(kind in kind_strategy(), ops in prop::collection::vec(op_strategy(), 0..200)) {
		let mut engine = SearchEngine::with_kind(kind);
		let mut model = BTreeSet::new();
		for op in ops {
			match op {
				Op::Add(id) => {
					engine.add(item(id)).unwrap();
					model.insert(id);
				}
				Op::Remove(id) => {
					engine.remove(id);
					model.remove(&id);
				}
			}
		}
		prop_assert_eq!(engine.count(), model.len());
		prop_assert_eq!(engine.stats().item_count, model.len());
	}

	#[test]
	fn sort_state_matches_sequence_order(
		kind in kind_strategy(),
		ops in prop::collection::vec(engine_op_strategy(), 0..150),
	) {
		let mut engine = SearchEngine::new(&EngineConfig {
			index_kind: kind,
			binary_search_threshold: 0,
			..EngineConfig::default()
		});

		for op in ops {
			match op {
				EngineOp::Upsert(id, name) => {
					engine.add(named_item(id, name)).unwrap();
				}
				EngineOp::Remove(id) => {
					engine.remove(id);
				}
				EngineOp::SearchBinary(name) => {
					let fragment = &NAMES[name][..3];
					engine.search_by_name(fragment, true);
				}
				EngineOp::LookupBinary(id) => {
					let found = engine.lookup_by_id_binary(id).map(Item::id);
					let expected = engine.lookup_by_id(id).map(Item::id);
					prop_assert_eq!(found, expected);
				}
				EngineOp::Rank(key, order, algorithm) => {
					let before = engine.sort_state();
					let ranked = engine.rank(key, order, algorithm);
					prop_assert_eq!(ranked.len(), engine.count());
					prop_assert_eq!(engine.sort_state(), before);
				}
			}

			let items = engine.items();
			match engine.sort_state() {
				SortState::SortedByName => {
					prop_assert!(items.windows(2).all(|w| w[0].folded_name() <= w[1].folded_name()));
				}
				SortState::SortedById => {
					prop_assert!(items.windows(2).all(|w| w[0].id() <= w[1].id()));
				}
				SortState::Unsorted => {}
			}
			prop_assert_eq!(items.len(), engine.stats().item_count);
		}
	}

	#[test]
	fn both_sorts_agree_with_std(values in prop::collection::vec(-1000i32..1000, 0..200)) {
		let mut expected = values.clone();
		expected.sort();
		prop_assert_eq!(quick_sort(&values, |a, b| a.cmp(b)), expected.clone());
		prop_assert_eq!(merge_sort(&values, |a, b| a.cmp(b)), expected);
	}

	#[test]
	fn merge_sort_is_stable(keys in prop::collection::vec(0u8..5, 0..150)) {
		let tagged: Vec<(u8, usize)> = keys.into_iter().enumerate().map(|(i, k)| (k, i)).collect();
		let sorted = merge_sort(&tagged, |a, b| a.0.cmp(&b.0));
		for pair in sorted.windows(2) {
			prop_assert!(pair[0].0 < pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
		}

		let descending = merge_sort(&tagged, |a, b| a.0.cmp(&b.0).reverse());
		for pair in descending.windows(2) {
			prop_assert!(pair[0].0 > pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
		}
	}

	#[test]
	fn recommendations_stay_within_limit(
		ids in prop::collection::btree_set(0i64..100, 1..40),
		pick in 0usize..40,
		limit in 0usize..15,
	) {
		let mut engine = SearchEngine::with_kind(IndexKind::Chaining);
		for &id in &ids {
			engine.add(item(id)).unwrap();
		}
		let target = *ids.iter().nth(pick % ids.len()).unwrap();

		let recs = RecommendationEngine::new(&engine).get_recommendations(target, limit);
		prop_assert!(recs.len() <= limit);
		prop_assert_eq!(recs.len(), limit.min(ids.len() - 1));
		prop_assert!(recs.iter().all(|r| r.id() != target));

		let distinct: BTreeSet<i64> = recs.iter().map(Item::id).collect();
		prop_assert_eq!(distinct.len(), recs.len());
	}
}
