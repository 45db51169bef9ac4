// ---------------------------------------------------------------------------
// Sort Library: quicksort and stable mergesort for ranking
// ---------------------------------------------------------------------------
//
// The algorithms are generic over any `Clone` element and a comparator;
// the item layer on top turns a (key, order) pair into that comparator.
// Descending order flips the comparison itself, so mergesort keeps equal
// keys in their original order in both directions.
// ---------------------------------------------------------------------------

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::item::Item;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
	Price,
	Rating,
	Popularity,
	Name,
	#[default]
	Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	#[default]
	Asc,
	Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
	Quick,
	/// Stable; the default so that ties do not jitter between calls.
	#[default]
	Merge,
}

// ---------------------------------------------------------------------------
// Generic algorithms
// ---------------------------------------------------------------------------

/// Quicksort with the Lomuto partition scheme (last element as pivot).
/// Sorts a working copy; not stable.
pub fn quick_sort<T, F>(items: &[T], compare: F) -> Vec<T>
where
	T: Clone,
	F: Fn(&T, &T) -> Ordering,
{
	let mut working = items.to_vec();
	quick_sort_in_place(&mut working, &compare);
	working
}

fn quick_sort_in_place<T, F>(slice: &mut [T], compare: &F)
where
	F: Fn(&T, &T) -> Ordering,
{
	if slice.len() <= 1 {
		return;
	}
	let pivot = partition(slice, compare);
	let (left, right) = slice.split_at_mut(pivot);
	quick_sort_in_place(left, compare);
	quick_sort_in_place(&mut right[1..], compare);
}

fn partition<T, F>(slice: &mut [T], compare: &F) -> usize
where
	F: Fn(&T, &T) -> Ordering,
{
	let high = slice.len() - 1;
	let mut store = 0;
	for j in 0..high {
		if compare(&slice[j], &slice[high]) != Ordering::Greater {
			slice.swap(store, j);
			store += 1;
		}
	}
	slice.swap(store, high);
	store
}

/// Top-down mergesort. Stable: on equal keys the element from the left
/// run is taken first.
pub fn merge_sort<T, F>(items: &[T], compare: F) -> Vec<T>
where
	T: Clone,
	F: Fn(&T, &T) -> Ordering,
{
	merge_sort_owned(items.to_vec(), &compare)
}

fn merge_sort_owned<T, F>(mut items: Vec<T>, compare: &F) -> Vec<T>
where
	F: Fn(&T, &T) -> Ordering,
{
	if items.len() <= 1 {
		return items;
	}
	let right = items.split_off(items.len() / 2);
	let left = merge_sort_owned(items, compare);
	let right = merge_sort_owned(right, compare);
	merge(left, right, compare)
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, compare: &F) -> Vec<T>
where
	F: Fn(&T, &T) -> Ordering,
{
	let mut merged = Vec::with_capacity(left.len() + right.len());
	let mut left = left.into_iter().peekable();
	let mut right = right.into_iter().peekable();

	while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
		let next = if compare(l, r) != Ordering::Greater {
			left.next()
		} else {
			right.next()
		};
		merged.extend(next);
	}
	merged.extend(left);
	merged.extend(right);
	merged
}

// ---------------------------------------------------------------------------
// Item ranking
// ---------------------------------------------------------------------------

/// Comparator for items by `key` in `order`.
pub fn compare_items(key: SortKey, order: SortOrder) -> impl Fn(&Item, &Item) -> Ordering {
	move |a, b| {
		let ordering = match key {
			SortKey::Price => a.price().total_cmp(&b.price()),
			SortKey::Rating => a.rating().total_cmp(&b.rating()),
			SortKey::Popularity => a.popularity().cmp(&b.popularity()),
			SortKey::Name => a.folded_name().cmp(b.folded_name()),
			SortKey::Id => a.id().cmp(&b.id()),
		};
		match order {
			SortOrder::Asc => ordering,
			SortOrder::Desc => ordering.reverse(),
		}
	}
}

/// Sort a copy of `items` by `key` using the chosen algorithm.
pub fn sort_items(
	items: &[Item],
	key: SortKey,
	order: SortOrder,
	algorithm: SortAlgorithm,
) -> Vec<Item> {
	let compare = compare_items(key, order);
	match algorithm {
		SortAlgorithm::Quick => quick_sort(items, compare),
		SortAlgorithm::Merge => merge_sort(items, compare),
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
