use crate::error::CatalogError;
use crate::item::Item;

use super::{grown_capacity, hash_id, next_prime, over_load_limit, IndexKind, ItemTable};

/// Hash table resolving collisions with per-bucket chains.
pub struct ChainingTable {
	buckets: Vec<Vec<Item>>,
	count: usize,
}

impl ChainingTable {
	/// Create a table with at least `capacity` buckets (rounded up to a prime).
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			buckets: empty_buckets(next_prime(capacity)),
			count: 0,
		}
	}

	fn bucket_of(&self, id: i64) -> usize {
		hash_id(id, self.buckets.len())
	}

	fn resize(&mut self) {
		let new_size = grown_capacity(self.buckets.len());
		tracing::debug!(
			from = self.buckets.len(),
			to = new_size,
			count = self.count,
			"Resizing chaining table"
		);
		let old = std::mem::replace(&mut self.buckets, empty_buckets(new_size));
		self.count = 0;
		for item in old.into_iter().flatten() {
			self.place(item);
		}
	}

	/// Upsert without checking the load factor.
	fn place(&mut self, item: Item) {
		let index = self.bucket_of(item.id());
		let bucket = &mut self.buckets[index];
		match bucket.iter_mut().find(|existing| existing.id() == item.id()) {
			Some(existing) => *existing = item,
			None => {
				bucket.push(item);
				self.count += 1;
			}
		}
	}
}

impl Default for ChainingTable {
	fn default() -> Self {
		Self::with_capacity(super::DEFAULT_CAPACITY)
	}
}

impl ItemTable for ChainingTable {
	fn insert(&mut self, item: Item) -> Result<(), CatalogError> {
		self.place(item);
		if over_load_limit(self.count, self.buckets.len()) {
			self.resize();
		}
		Ok(())
	}

	fn get(&self, id: i64) -> Option<&Item> {
		self.buckets[self.bucket_of(id)]
			.iter()
			.find(|item| item.id() == id)
	}

	fn remove(&mut self, id: i64) -> bool {
		let index = self.bucket_of(id);
		let bucket = &mut self.buckets[index];
		match bucket.iter().position(|item| item.id() == id) {
			Some(pos) => {
				bucket.swap_remove(pos);
				self.count -= 1;
				true
			}
			None => false,
		}
	}

	fn items(&self) -> Vec<&Item> {
		self.buckets.iter().flatten().collect()
	}

	fn len(&self) -> usize {
		self.count
	}

	fn capacity(&self) -> usize {
		self.buckets.len()
	}

	fn kind(&self) -> IndexKind {
		IndexKind::Chaining
	}
}

fn empty_buckets(size: usize) -> Vec<Vec<Item>> {
	(0..size).map(|_| Vec::new()).collect()
}
