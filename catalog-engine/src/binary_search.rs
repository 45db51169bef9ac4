// ---------------------------------------------------------------------------
// Binary Search: lookups over sequences already sorted by id or name
// ---------------------------------------------------------------------------
//
// Callers guarantee the slice is sorted ascending by the key being searched
// (id, or case-folded name). Nothing here sorts or checks sortedness.
// ---------------------------------------------------------------------------

use std::cmp::Ordering;

use crate::item::Item;

/// Classic binary search on id.
pub fn search_by_id(items: &[Item], id: i64) -> Option<&Item> {
	let (mut left, mut right) = (0usize, items.len());
	while left < right {
		let mid = left + (right - left) / 2;
		match items[mid].id().cmp(&id) {
			Ordering::Equal => return Some(&items[mid]),
			Ordering::Less => left = mid + 1,
			Ordering::Greater => right = mid,
		}
	}
	None
}

/// Binary search on case-folded name. With several equal folded names the
/// first one the search path lands on is returned.
pub fn search_by_name_exact<'a>(items: &'a [Item], name: &str) -> Option<&'a Item> {
	let needle = name.to_lowercase();
	let (mut left, mut right) = (0usize, items.len());
	while left < right {
		let mid = left + (right - left) / 2;
		match items[mid].folded_name().cmp(needle.as_str()) {
			Ordering::Equal => return Some(&items[mid]),
			Ordering::Less => left = mid + 1,
			Ordering::Greater => right = mid,
		}
	}
	None
}

/// Find every item whose folded name contains `fragment`.
///
/// A binary search picks an anchor index whose name contains the fragment,
/// preferring the leftmost one the search path reaches, then the run of
/// matches around the anchor is collected in both directions.
///
/// This assumes matches sit next to each other in name order, which only
/// holds approximately for substrings: "top" matches both "Desktop" and
/// "Laptop", and anything sorted between them breaks the run. Use
/// [`search_by_name_prefix`] when the query is a prefix, or a linear scan
/// when every match matters.
pub fn search_by_name_partial<'a>(items: &'a [Item], fragment: &str) -> Vec<&'a Item> {
	let needle = fragment.to_lowercase();
	let matches = |item: &Item| item.folded_name().contains(&needle);

	let mut anchor = None;
	let (mut left, mut right) = (0usize, items.len());
	while left < right {
		let mid = left + (right - left) / 2;
		let mid_name = items[mid].folded_name();
		if mid_name.contains(&needle) {
			anchor = Some(mid);
			right = mid;
		} else if mid_name < needle.as_str() {
			left = mid + 1;
		} else {
			right = mid;
		}
	}

	let Some(anchor) = anchor else {
		return Vec::new();
	};

	let start = items[..anchor]
		.iter()
		.rposition(|item| !matches(item))
		.map_or(0, |pos| pos + 1);
	let end = items[anchor..]
		.iter()
		.position(|item| !matches(item))
		.map_or(items.len(), |pos| anchor + pos);

	items[start..end].iter().collect()
}

/// Every item whose folded name starts with `prefix`. Prefix matches are
/// contiguous in name order, so this never misses one.
pub fn search_by_name_prefix<'a>(items: &'a [Item], prefix: &str) -> Vec<&'a Item> {
	let needle = prefix.to_lowercase();
	let start = items.partition_point(|item| item.folded_name() < needle.as_str());
	items[start..]
		.iter()
		.take_while(|item| item.folded_name().starts_with(&needle))
		.collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
