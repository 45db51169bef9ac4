use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("Invalid item: {0}")]
	Validation(String),
	#[error("Hash table is full: no free slot among {capacity} slots")]
	CapacityExhausted { capacity: usize },
	#[error("Invalid params: {0}")]
	InvalidParams(String),
	#[error("Empty query: search text is required")]
	EmptyQuery,
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl CatalogError {
	pub fn code(&self) -> &str {
		match self {
			Self::Validation(_) => "CATALOG_INVALID_ITEM",
			Self::CapacityExhausted { .. } => "CATALOG_CAPACITY_EXHAUSTED",
			Self::InvalidParams(_) => "CATALOG_INVALID_PARAMS",
			Self::EmptyQuery => "CATALOG_EMPTY_QUERY",
			Self::Io(_) => "CATALOG_IO",
		}
	}

	/// True for errors that indicate a broken internal invariant rather
	/// than a bad request.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::CapacityExhausted { .. })
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		serde_json::json!({
			"catalogCode": self.code(),
			"message": self.to_string(),
		})
	}
}
