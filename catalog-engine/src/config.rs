use clap::Parser;

use crate::hash_index::{IndexKind, DEFAULT_CAPACITY};

/// Catalogs at or below this size use the linear name scan.
pub const DEFAULT_BINARY_SEARCH_THRESHOLD: usize = 10;

#[derive(Parser, Debug)]
#[command(
	name = "catalog-engine",
	about = "Catalog index, ranking and recommendation server over JSON-RPC 2.0 / NDJSON stdio"
)]
pub struct CliArgs {
	/// Hash index variant: "chaining" or "open"
	#[arg(long, value_enum, default_value_t = IndexKind::Chaining, env = "CATALOG_ENGINE_INDEX")]
	pub index: IndexKind,

	/// Initial hash index capacity (rounded up to the next prime)
	#[arg(long, default_value_t = DEFAULT_CAPACITY, env = "CATALOG_ENGINE_CAPACITY")]
	pub capacity: usize,

	/// Catalog size above which name search switches to binary search
	#[arg(long, default_value_t = DEFAULT_BINARY_SEARCH_THRESHOLD, env = "CATALOG_ENGINE_BINARY_THRESHOLD")]
	pub binary_threshold: usize,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info", env = "CATALOG_ENGINE_LOG_LEVEL")]
	pub log_level: String,
}

impl CliArgs {
	pub fn engine_config(&self) -> EngineConfig {
		EngineConfig {
			index_kind: self.index,
			initial_capacity: self.capacity,
			binary_search_threshold: self.binary_threshold,
		}
	}
}

/// Construction options for a [`crate::search_engine::SearchEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
	pub index_kind: IndexKind,
	pub initial_capacity: usize,
	pub binary_search_threshold: usize,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			index_kind: IndexKind::Chaining,
			initial_capacity: DEFAULT_CAPACITY,
			binary_search_threshold: DEFAULT_BINARY_SEARCH_THRESHOLD,
		}
	}
}
