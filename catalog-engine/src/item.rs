// ---------------------------------------------------------------------------
// Item: immutable catalog record
// ---------------------------------------------------------------------------
//
// An `Item` can only be built through validation, so every value the index
// holds has a non-blank name, a finite non-negative price and a rating in
// [0, 5]. Equality and hashing look at the id alone.
// ---------------------------------------------------------------------------

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Image reference used when an item is created without one.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x300?text=No+Image";

/// Category used when an item is created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Highest rating an item may carry.
pub const MAX_RATING: f64 = 5.0;

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
	id: i64,
	name: String,
	price: f64,
	rating: f64,
	popularity: u64,
	image_ref: String,
	category: String,
	#[serde(skip)]
	folded_name: String,
}

impl Item {
	/// Build an item with the default image and category.
	pub fn new(
		id: i64,
		name: impl Into<String>,
		price: f64,
		rating: f64,
		popularity: u64,
	) -> Result<Self, CatalogError> {
		ItemDraft {
			id: Some(id),
			name: Some(name.into()),
			price: Some(price),
			rating: Some(rating),
			popularity: Some(popularity),
			image_ref: None,
			category: None,
		}
		.validate()
	}

	/// Return a copy of this item filed under `category`.
	///
	/// A blank category falls back to [`DEFAULT_CATEGORY`].
	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = or_default(Some(category.into()), DEFAULT_CATEGORY);
		self
	}

	/// Return a copy of this item pointing at `image_ref`.
	pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
		self.image_ref = or_default(Some(image_ref.into()), PLACEHOLDER_IMAGE);
		self
	}

	pub fn id(&self) -> i64 {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn price(&self) -> f64 {
		self.price
	}

	pub fn rating(&self) -> f64 {
		self.rating
	}

	pub fn popularity(&self) -> u64 {
		self.popularity
	}

	pub fn image_ref(&self) -> &str {
		&self.image_ref
	}

	pub fn category(&self) -> &str {
		&self.category
	}

	/// Case-folded name, the key both name sorting and name search use.
	/// Computed once when the item is built.
	pub fn folded_name(&self) -> &str {
		&self.folded_name
	}
}

impl PartialEq for Item {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for Item {}

impl Hash for Item {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

// ---------------------------------------------------------------------------
// ItemDraft: unvalidated input
// ---------------------------------------------------------------------------

/// Item fields as a caller supplies them, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
	pub id: Option<i64>,
	pub name: Option<String>,
	pub price: Option<f64>,
	pub rating: Option<f64>,
	pub popularity: Option<u64>,
	pub image_ref: Option<String>,
	pub category: Option<String>,
}

impl ItemDraft {
	/// Check every required field and build the immutable [`Item`].
	pub fn validate(self) -> Result<Item, CatalogError> {
		let id = self.id.ok_or_else(|| missing("id"))?;
		let name = self.name.ok_or_else(|| missing("name"))?;
		let price = self.price.ok_or_else(|| missing("price"))?;
		let rating = self.rating.ok_or_else(|| missing("rating"))?;
		let popularity = self.popularity.ok_or_else(|| missing("popularity"))?;

		if name.trim().is_empty() {
			return Err(CatalogError::Validation(format!(
				"item {id}: name must not be blank"
			)));
		}
		if !price.is_finite() || price < 0.0 {
			return Err(CatalogError::Validation(format!(
				"item {id}: price must be a non-negative number, got {price}"
			)));
		}
		if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
			return Err(CatalogError::Validation(format!(
				"item {id}: rating must be within [0, {MAX_RATING}], got {rating}"
			)));
		}

		Ok(Item {
			id,
			folded_name: name.to_lowercase(),
			name,
			price,
			rating,
			popularity,
			image_ref: or_default(self.image_ref, PLACEHOLDER_IMAGE),
			category: or_default(self.category, DEFAULT_CATEGORY),
		})
	}
}

impl TryFrom<ItemDraft> for Item {
	type Error = CatalogError;

	fn try_from(draft: ItemDraft) -> Result<Self, Self::Error> {
		draft.validate()
	}
}

fn missing(field: &str) -> CatalogError {
	CatalogError::Validation(format!("missing required field `{field}`"))
}

fn or_default(value: Option<String>, default: &str) -> String {
	match value {
		Some(v) if !v.trim().is_empty() => v,
		_ => default.to_string(),
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
