use crate::error::CatalogError;
use crate::item::Item;

use super::{grown_capacity, hash_id, next_prime, over_load_limit, IndexKind, ItemTable};

#[derive(Debug, Clone)]
enum Slot {
	Empty,
	Tombstone,
	Occupied(Item),
}

/// Result of walking the probe sequence for an insert.
enum Probe {
	/// The id already lives at this slot.
	Existing(usize),
	/// First reusable slot (tombstone or empty) for a new id.
	Free(usize),
}

/// Hash table with linear probing. Deleted slots become tombstones so
/// later probes keep walking past them.
pub struct OpenAddressingTable {
	slots: Vec<Slot>,
	count: usize,
}

impl OpenAddressingTable {
	/// Create a table with at least `capacity` slots (rounded up to a prime).
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			slots: vec![Slot::Empty; next_prime(capacity)],
			count: 0,
		}
	}

	/// Number of tombstones awaiting the next rehash.
	pub fn tombstones(&self) -> usize {
		self.slots
			.iter()
			.filter(|slot| matches!(slot, Slot::Tombstone))
			.count()
	}

	fn probe_for_insert(&self, id: i64) -> Result<Probe, CatalogError> {
		let size = self.slots.len();
		let mut index = hash_id(id, size);
		let mut first_tombstone = None;

		for _ in 0..size {
			match &self.slots[index] {
				Slot::Empty => return Ok(Probe::Free(first_tombstone.unwrap_or(index))),
				Slot::Tombstone => {
					first_tombstone.get_or_insert(index);
				}
				Slot::Occupied(item) if item.id() == id => return Ok(Probe::Existing(index)),
				Slot::Occupied(_) => {}
			}
			index = (index + 1) % size;
		}

		first_tombstone
			.map(Probe::Free)
			.ok_or(CatalogError::CapacityExhausted { capacity: size })
	}

	fn find(&self, id: i64) -> Option<usize> {
		let size = self.slots.len();
		let mut index = hash_id(id, size);
		for _ in 0..size {
			match &self.slots[index] {
				Slot::Empty => return None,
				Slot::Occupied(item) if item.id() == id => return Some(index),
				_ => {}
			}
			index = (index + 1) % size;
		}
		None
	}

	fn resize(&mut self) -> Result<(), CatalogError> {
		let new_size = grown_capacity(self.slots.len());
		tracing::debug!(
			from = self.slots.len(),
			to = new_size,
			count = self.count,
			"Resizing open-addressing table"
		);
		let old = std::mem::replace(&mut self.slots, vec![Slot::Empty; new_size]);
		self.count = 0;
		for slot in old {
			if let Slot::Occupied(item) = slot {
				self.insert(item)?;
			}
		}
		Ok(())
	}
}

impl Default for OpenAddressingTable {
	fn default() -> Self {
		Self::with_capacity(super::DEFAULT_CAPACITY)
	}
}

impl ItemTable for OpenAddressingTable {
	fn insert(&mut self, item: Item) -> Result<(), CatalogError> {
		match self.probe_for_insert(item.id())? {
			Probe::Existing(index) => self.slots[index] = Slot::Occupied(item),
			Probe::Free(index) => {
				self.slots[index] = Slot::Occupied(item);
				self.count += 1;
			}
		}
		if over_load_limit(self.count, self.slots.len()) {
			self.resize()?;
		}
		Ok(())
	}

	fn get(&self, id: i64) -> Option<&Item> {
		match &self.slots[self.find(id)?] {
			Slot::Occupied(item) => Some(item),
			_ => None,
		}
	}

	fn remove(&mut self, id: i64) -> bool {
		match self.find(id) {
			Some(index) => {
				self.slots[index] = Slot::Tombstone;
				self.count -= 1;
				true
			}
			None => false,
		}
	}

	fn items(&self) -> Vec<&Item> {
		self.slots
			.iter()
			.filter_map(|slot| match slot {
				Slot::Occupied(item) => Some(item),
				_ => None,
			})
			.collect()
	}

	fn len(&self) -> usize {
		self.count
	}

	fn capacity(&self) -> usize {
		self.slots.len()
	}

	fn kind(&self) -> IndexKind {
		IndexKind::Open
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hash_index::{hash_id, is_prime};

	fn item(id: i64, name: &str) -> Item {
		Item::new(id, name, 25.0, 4.2, 10).unwrap()
	}

	/// Ids that all hash to the same slot in a table of `size`.
	fn colliding_ids(size: usize, n: usize) -> Vec<i64> {
		let target = hash_id(1, size);
		(1..10_000)
			.filter(|&id| hash_id(id, size) == target)
			.take(n)
			.collect()
	}

	#[test]
	fn insert_get_remove() {
		let mut table = OpenAddressingTable::with_capacity(11);
		table.insert(item(1, "Laptop")).unwrap();
		table.insert(item(2, "Mouse")).unwrap();
		assert_eq!(table.get(1).map(Item::name), Some("Laptop"));
		assert!(table.remove(1));
		assert!(!table.remove(1));
		assert!(table.get(1).is_none());
		assert_eq!(table.len(), 1);
	}

	#[test]
	fn delete_leaves_tombstone_that_keeps_probe_chain_intact() {
		let mut table = OpenAddressingTable::with_capacity(101);
		let ids = colliding_ids(101, 3);
		for &id in &ids {
			table.insert(item(id, "x")).unwrap();
		}
		assert!(table.remove(ids[0]));
		assert_eq!(table.tombstones(), 1);
		// ids[1] and ids[2] sit past the tombstone in the probe sequence.
		assert!(table.get(ids[1]).is_some());
		assert!(table.get(ids[2]).is_some());
		assert!(table.get(ids[0]).is_none());
	}

	#[test]
	fn upsert_past_tombstone_does_not_duplicate() {
		let mut table = OpenAddressingTable::with_capacity(101);
		let ids = colliding_ids(101, 2);
		table.insert(item(ids[0], "first")).unwrap();
		table.insert(item(ids[1], "second")).unwrap();
		table.remove(ids[0]);

		table.insert(item(ids[1], "second v2")).unwrap();
		assert_eq!(table.len(), 1);
		assert_eq!(table.items().len(), 1);
		assert_eq!(table.get(ids[1]).map(Item::name), Some("second v2"));
	}

	#[test]
	fn new_key_reuses_first_tombstone() {
		let mut table = OpenAddressingTable::with_capacity(101);
		let ids = colliding_ids(101, 3);
		table.insert(item(ids[0], "a")).unwrap();
		table.insert(item(ids[1], "b")).unwrap();
		table.remove(ids[0]);
		table.insert(item(ids[2], "c")).unwrap();
		assert_eq!(table.tombstones(), 0);
		assert_eq!(table.len(), 2);
	}

	#[test]
	fn resize_reclaims_tombstones() {
		let mut table = OpenAddressingTable::with_capacity(11);
		for id in 1..=8 {
			table.insert(item(id, "x")).unwrap();
		}
		table.remove(1);
		table.remove(2);
		assert_eq!(table.tombstones(), 2);
		for id in 20..=22 {
			table.insert(item(id, "y")).unwrap();
		}
		assert!(is_prime(table.capacity()));
		assert_eq!(table.capacity(), 23);
		assert_eq!(table.tombstones(), 0);
		assert_eq!(table.len(), 9);
		assert!(table.load_factor() <= 0.75);
	}

	#[test]
	fn tiny_table_never_exhausts() {
		let mut table = OpenAddressingTable::with_capacity(2);
		for id in 0..100 {
			table.insert(item(id, "z")).unwrap();
		}
		assert_eq!(table.len(), 100);
		assert!(table.load_factor() <= 0.75);
	}
}
