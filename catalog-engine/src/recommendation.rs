// ---------------------------------------------------------------------------
// Recommendation Engine: similarity scoring and diversified selection
// ---------------------------------------------------------------------------
//
// Pure functions over a point-in-time snapshot of the catalog. Similarity
// blends five signals (category relationship, name keywords, price tier,
// rating, popularity); a greedy diversity pass then caps how many results
// share a category or price tier.
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::item::Item;
use crate::search_engine::SearchEngine;
use crate::sorting::merge_sort;

// ---------------------------------------------------------------------------
// Static tables
// ---------------------------------------------------------------------------

/// Fixed category relationships used by the category signal.
pub struct CategoryRelations {
	/// Category -> categories that pair well with it. Looked up both ways.
	pub complementary: &'static [(&'static str, &'static [&'static str])],
	/// Categories that count as loosely related to each other.
	pub technology: &'static [&'static str],
}

pub static CATEGORY_RELATIONS: CategoryRelations = CategoryRelations {
	complementary: &[
		("Laptops", &["Accessories", "Monitors", "Cables", "Storage"]),
		("Monitors", &["Laptops", "Accessories", "Cables"]),
		("Accessories", &["Laptops", "Monitors", "Cables"]),
		("Audio", &["Accessories", "Smartphones", "Tablets"]),
		("Smartphones", &["Accessories", "Audio", "Storage"]),
		("Tablets", &["Accessories", "Audio", "Storage"]),
		("Storage", &["Laptops", "Smartphones", "Tablets", "Accessories"]),
		("Cables", &["Laptops", "Monitors", "Accessories", "Smartphones"]),
		("Cameras", &["Accessories", "Storage"]),
		("Networking", &["Accessories", "Cables"]),
	],
	technology: &[
		"Laptops",
		"Monitors",
		"Accessories",
		"Smartphones",
		"Tablets",
		"Storage",
		"Cables",
		"Networking",
		"Audio",
		"Cameras",
	],
};

impl CategoryRelations {
	fn complements(&self, category: &str) -> &'static [&'static str] {
		self.complementary
			.iter()
			.find(|(name, _)| *name == category)
			.map(|(_, list)| *list)
			.unwrap_or(&[])
	}

	/// 1.0 same category, 0.6 complementary, 0.3 both technology, else 0.1.
	pub fn score(&self, a: &str, b: &str) -> f64 {
		if a == b {
			1.0
		} else if self.complements(a).contains(&b) || self.complements(b).contains(&a) {
			0.6
		} else if self.technology.contains(&a) && self.technology.contains(&b) {
			0.3
		} else {
			0.1
		}
	}
}

const STOP_WORDS: &[&str] = &[
	"the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"[\p{Alphabetic}\p{N}]+").expect("word pattern is valid")
});

/// Upper bounds of every price tier except the last.
pub const PRICE_TIER_BOUNDARIES: [f64; 6] = [20.0, 50.0, 100.0, 300.0, 800.0, 1500.0];

// ---------------------------------------------------------------------------
// Price tiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceTier {
	Budget,
	Low,
	MidLow,
	Mid,
	MidHigh,
	High,
	Premium,
}

impl PriceTier {
	const ORDERED: [PriceTier; 7] = [
		Self::Budget,
		Self::Low,
		Self::MidLow,
		Self::Mid,
		Self::MidHigh,
		Self::High,
		Self::Premium,
	];

	pub fn from_price(price: f64) -> Self {
		let index = PRICE_TIER_BOUNDARIES
			.iter()
			.position(|&bound| price < bound)
			.unwrap_or(PRICE_TIER_BOUNDARIES.len());
		Self::ORDERED[index]
	}

	fn rank(self) -> usize {
		self as usize
	}

	/// Number of tiers between `self` and `other`.
	pub fn distance(self, other: Self) -> usize {
		self.rank().abs_diff(other.rank())
	}
}

// ---------------------------------------------------------------------------
// Individual signals
// ---------------------------------------------------------------------------

/// Lowercase keyword set of a name, without short tokens or stop words.
pub fn name_keywords(name: &str) -> HashSet<String> {
	let lower = name.to_lowercase();
	WORD_PATTERN
		.find_iter(&lower)
		.map(|m| m.as_str())
		.filter(|token| token.chars().count() > 2 && !STOP_WORDS.contains(token))
		.map(str::to_string)
		.collect()
}

/// Jaccard similarity of the two keyword sets; 0.0 if either is empty.
pub fn name_similarity(a: &str, b: &str) -> f64 {
	let ka = name_keywords(a);
	let kb = name_keywords(b);
	if ka.is_empty() || kb.is_empty() {
		return 0.0;
	}
	let intersection = ka.intersection(&kb).count();
	let union = ka.union(&kb).count();
	intersection as f64 / union as f64
}

pub fn price_tier_similarity(a: f64, b: f64) -> f64 {
	match PriceTier::from_price(a).distance(PriceTier::from_price(b)) {
		0 => 1.0,
		1 => 0.7,
		2 => 0.4,
		_ => 0.1,
	}
}

pub fn rating_similarity(a: f64, b: f64) -> f64 {
	(1.0 - (a - b).abs() / 2.5).max(0.0)
}

/// Min-max bounds of popularity across a snapshot.
#[derive(Debug, Clone, Copy)]
struct PopularityRange {
	min: f64,
	span: f64,
}

impl PopularityRange {
	fn of(items: &[Item]) -> Option<Self> {
		let min = items.iter().map(Item::popularity).min()?;
		let max = items.iter().map(Item::popularity).max()?;
		let span = if max > min { (max - min) as f64 } else { 1.0 };
		Some(Self {
			min: min as f64,
			span,
		})
	}

	fn normalize(&self, popularity: u64) -> f64 {
		(popularity as f64 - self.min) / self.span
	}
}

fn popularity_similarity(range: Option<PopularityRange>, a: u64, b: u64) -> f64 {
	match range {
		Some(range) => 1.0 - (range.normalize(a) - range.normalize(b)).abs(),
		None => 0.5,
	}
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Weights of the five similarity signals plus the same-category boost.
#[derive(Debug, Clone)]
pub struct RecommendationWeights {
	pub category: f64,
	pub name: f64,
	pub price_tier: f64,
	pub rating: f64,
	pub popularity: f64,
	/// Applied when categories match and price tiers are at most one apart.
	pub same_category_boost: f64,
}

impl Default for RecommendationWeights {
	fn default() -> Self {
		Self {
			category: 0.35,
			name: 0.25,
			price_tier: 0.20,
			rating: 0.15,
			popularity: 0.05,
			same_category_boost: 1.1,
		}
	}
}

/// Caps for the greedy diversity pass.
#[derive(Debug, Clone)]
pub struct DiversityLimits {
	pub max_per_category: usize,
	pub max_per_price_tier: usize,
	/// Below this fraction of `limit`, capped candidates are taken anyway.
	pub lenient_fraction: f64,
}

impl Default for DiversityLimits {
	fn default() -> Self {
		Self {
			max_per_category: 3,
			max_per_price_tier: 2,
			lenient_fraction: 0.7,
		}
	}
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A candidate item with its similarity to the target.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredItem {
	pub item: Item,
	pub score: f64,
}

/// Read-only view over a [`SearchEngine`] that produces recommendations.
pub struct RecommendationEngine<'a> {
	search: &'a SearchEngine,
	relations: &'static CategoryRelations,
	weights: RecommendationWeights,
	limits: DiversityLimits,
}

impl<'a> RecommendationEngine<'a> {
	pub fn new(search: &'a SearchEngine) -> Self {
		Self {
			search,
			relations: &CATEGORY_RELATIONS,
			weights: RecommendationWeights::default(),
			limits: DiversityLimits::default(),
		}
	}

	pub fn with_weights(mut self, weights: RecommendationWeights) -> Self {
		self.weights = weights;
		self
	}

	pub fn with_limits(mut self, limits: DiversityLimits) -> Self {
		self.limits = limits;
		self
	}

	fn snapshot(&self) -> &'a [Item] {
		self.search.items()
	}

	/// Similarity of `candidate` to `target` in [0, 1].
	pub fn calculate_similarity(&self, target: &Item, candidate: &Item) -> f64 {
		let range = PopularityRange::of(self.snapshot());
		self.similarity_in(range, target, candidate)
	}

	fn similarity_in(&self, range: Option<PopularityRange>, target: &Item, candidate: &Item) -> f64 {
		let w = &self.weights;
		let cs = self.relations.score(target.category(), candidate.category());
		let ns = name_similarity(target.name(), candidate.name());
		let ps = price_tier_similarity(target.price(), candidate.price());
		let rs = rating_similarity(target.rating(), candidate.rating());
		let pops = popularity_similarity(range, target.popularity(), candidate.popularity());

		let mut score =
			w.category * cs + w.name * ns + w.price_tier * ps + w.rating * rs + w.popularity * pops;
		if cs == 1.0 && ps >= 0.7 {
			score *= w.same_category_boost;
		}
		score.min(1.0)
	}

	/// Every item other than `id`, scored against it, most similar first.
	/// Equal scores keep catalog order. Empty if `id` is unknown.
	pub fn score_candidates(&self, id: i64) -> Vec<ScoredItem> {
		let Some(target) = self.search.lookup_by_id(id) else {
			return Vec::new();
		};
		let snapshot = self.snapshot();
		let range = PopularityRange::of(snapshot);

		let scored: Vec<ScoredItem> = snapshot
			.iter()
			.filter(|candidate| candidate.id() != id)
			.map(|candidate| ScoredItem {
				item: candidate.clone(),
				score: self.similarity_in(range, target, candidate),
			})
			.collect();

		merge_sort(&scored, |a, b| b.score.total_cmp(&a.score))
	}

	/// Up to `limit` items similar to `id`, diversified across categories
	/// and price tiers.
	pub fn get_recommendations(&self, id: i64, limit: usize) -> Vec<Item> {
		let scored = self.score_candidates(id);
		self.diversify(&scored, limit)
	}

	fn diversify(&self, scored: &[ScoredItem], limit: usize) -> Vec<Item> {
		if limit == 0 || scored.is_empty() {
			return Vec::new();
		}

		let lenient_below = self.limits.lenient_fraction * limit as f64;
		let mut selected: Vec<&Item> = Vec::with_capacity(limit.min(scored.len()));
		let mut chosen: HashSet<i64> = HashSet::new();
		let mut per_category: HashMap<&str, usize> = HashMap::new();
		let mut per_tier: HashMap<PriceTier, usize> = HashMap::new();

		for candidate in scored {
			let item = &candidate.item;
			let tier = PriceTier::from_price(item.price());
			let category_count = per_category.get(item.category()).copied().unwrap_or(0);
			let tier_count = per_tier.get(&tier).copied().unwrap_or(0);

			let within_caps = category_count < self.limits.max_per_category
				&& tier_count < self.limits.max_per_price_tier;
			if !within_caps && selected.len() as f64 >= lenient_below {
				continue;
			}

			per_category.insert(item.category(), category_count + 1);
			per_tier.insert(tier, tier_count + 1);
			chosen.insert(item.id());
			selected.push(item);
			if selected.len() >= limit {
				break;
			}
		}

		if selected.len() < limit {
			for candidate in scored {
				if chosen.insert(candidate.item.id()) {
					selected.push(&candidate.item);
					if selected.len() >= limit {
						break;
					}
				}
			}
		}

		selected.into_iter().cloned().collect()
	}

	/// Items in `category` (case-insensitive), highest rated first.
	pub fn get_recommendations_by_category(&self, category: &str, limit: usize) -> Vec<Item> {
		let wanted = category.to_lowercase();
		let matching: Vec<Item> = self
			.snapshot()
			.iter()
			.filter(|item| item.category().to_lowercase() == wanted)
			.cloned()
			.collect();
		top_rated(matching, limit)
	}

	/// Items ranked by `0.6 * rating + 0.4 * popularity / max_popularity`.
	pub fn get_trending_products(&self, limit: usize) -> Vec<Item> {
		let snapshot = self.snapshot();
		let max_popularity = match snapshot.iter().map(Item::popularity).max() {
			Some(max) if max > 0 => max as f64,
			_ => 1.0,
		};

		let scored: Vec<ScoredItem> = snapshot
			.iter()
			.map(|item| ScoredItem {
				item: item.clone(),
				score: 0.6 * item.rating() + 0.4 * (item.popularity() as f64 / max_popularity),
			})
			.collect();

		merge_sort(&scored, |a, b| b.score.total_cmp(&a.score))
			.into_iter()
			.take(limit)
			.map(|scored| scored.item)
			.collect()
	}

	/// Items priced within `tolerance` (a fraction) of `price`, highest
	/// rated first.
	pub fn get_similar_price_range(&self, price: f64, tolerance: f64, limit: usize) -> Vec<Item> {
		let low = price * (1.0 - tolerance);
		let high = price * (1.0 + tolerance);
		let matching: Vec<Item> = self
			.snapshot()
			.iter()
			.filter(|item| (low..=high).contains(&item.price()))
			.cloned()
			.collect();
		top_rated(matching, limit)
	}
}

fn top_rated(items: Vec<Item>, limit: usize) -> Vec<Item> {
	let mut sorted = merge_sort(&items, |a: &Item, b: &Item| b.rating().total_cmp(&a.rating()));
	sorted.truncate(limit);
	sorted
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
