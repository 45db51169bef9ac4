// ---------------------------------------------------------------------------
// Hash Index: id -> item tables with prime-sized, self-resizing storage
// ---------------------------------------------------------------------------
//
// Two interchangeable variants share the `ItemTable` trait:
//
//   - `ChainingTable`: each bucket is an unordered run of colliding items.
//   - `OpenAddressingTable`: one item per slot, linear probing, tombstones.
//
// Both hash the decimal form of the id with a base-31 polynomial fold and
// grow to the next prime >= 2x capacity once the load factor passes 0.75.
// ---------------------------------------------------------------------------

mod chaining;
mod open_addressing;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::item::Item;

pub use chaining::ChainingTable;
pub use open_addressing::OpenAddressingTable;

/// Capacity a table starts with when the caller does not pick one.
pub const DEFAULT_CAPACITY: usize = 101;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Operations every hash index variant provides.
pub trait ItemTable: Send + Sync {
	/// Insert `item`, replacing any item with the same id in place.
	fn insert(&mut self, item: Item) -> Result<(), CatalogError>;

	fn get(&self, id: i64) -> Option<&Item>;

	/// Remove the item with `id`. Returns `true` iff one was present.
	fn remove(&mut self, id: i64) -> bool;

	/// Every stored item in bucket/slot order.
	fn items(&self) -> Vec<&Item>;

	/// Case-insensitive substring scan over every stored name.
	fn search_by_name(&self, fragment: &str) -> Vec<&Item> {
		let needle = fragment.to_lowercase();
		self.items()
			.into_iter()
			.filter(|item| item.folded_name().contains(&needle))
			.collect()
	}

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of buckets/slots. Always prime.
	fn capacity(&self) -> usize;

	fn load_factor(&self) -> f64 {
		self.len() as f64 / self.capacity() as f64
	}

	fn kind(&self) -> IndexKind;
}

// ---------------------------------------------------------------------------
// Variant selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
	#[default]
	Chaining,
	#[value(alias = "open-addressing")]
	Open,
}

impl fmt::Display for IndexKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Chaining => f.write_str("chaining"),
			Self::Open => f.write_str("open"),
		}
	}
}

/// Build an empty table of the requested variant.
pub fn new_table(kind: IndexKind, capacity: usize) -> Box<dyn ItemTable> {
	match kind {
		IndexKind::Chaining => Box::new(ChainingTable::with_capacity(capacity)),
		IndexKind::Open => Box::new(OpenAddressingTable::with_capacity(capacity)),
	}
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Fold the decimal representation of `id` into a slot index:
/// `h = (h * 31 + code(ch)) mod size` for every character.
pub fn hash_id(id: i64, size: usize) -> usize {
	let size = size as u64;
	id.to_string()
		.chars()
		.fold(0u64, |h, ch| (h * 31 + ch as u64) % size) as usize
}

/// Trial division up to sqrt(n).
pub fn is_prime(n: usize) -> bool {
	if n < 2 {
		return false;
	}
	if n % 2 == 0 {
		return n == 2;
	}
	let mut i = 3;
	while i * i <= n {
		if n % i == 0 {
			return false;
		}
		i += 2;
	}
	true
}

/// Smallest prime >= `n`.
pub fn next_prime(n: usize) -> usize {
	if n <= 2 {
		return 2;
	}
	let mut candidate = if n % 2 == 0 { n + 1 } else { n };
	while !is_prime(candidate) {
		candidate += 2;
	}
	candidate
}

/// True once `count / size` passes 0.75.
pub(crate) fn over_load_limit(count: usize, size: usize) -> bool {
	count * 4 > size * 3
}

/// Capacity a table grows to from `size`.
pub(crate) fn grown_capacity(size: usize) -> usize {
	next_prime(size * 2)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
