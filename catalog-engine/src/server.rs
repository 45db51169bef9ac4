// ---------------------------------------------------------------------------
// CatalogServer: JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes incoming JSON-RPC 2.0 requests (NDJSON, one per line) to the
// search and recommendation engines: a `run()` loop, a `dispatch()` match,
// and free-standing handler functions for each method.
// ---------------------------------------------------------------------------

use std::io::{BufRead, Write};

use crate::config::EngineConfig;
use crate::error::CatalogError;
use crate::protocol::*;
use crate::recommendation::RecommendationEngine;
use crate::search_engine::SearchEngine;
use crate::transport::NdjsonTransport;

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// JSON-RPC server that owns a [`SearchEngine`].
pub struct CatalogServer<W: Write> {
	transport: NdjsonTransport<W>,
	engine: SearchEngine,
}

impl<W: Write> CatalogServer<W> {
	pub fn new(config: &EngineConfig, transport: NdjsonTransport<W>) -> Self {
		Self {
			transport,
			engine: SearchEngine::new(config),
		}
	}

	/// Read requests line by line until EOF.
	pub fn run(&mut self, reader: impl BufRead) -> Result<(), CatalogError> {
		for line_result in reader.lines() {
			let line = line_result?;
			self.handle_line(&line);
		}
		Ok(())
	}

	/// Parse and answer a single request line. Blank lines are ignored.
	pub fn handle_line(&mut self, line: &str) {
		let trimmed = line.trim();
		if trimmed.is_empty() {
			return;
		}

		match serde_json::from_str::<JsonRpcRequest>(trimmed) {
			Ok(request) => self.dispatch(request),
			Err(e) => {
				tracing::warn!("Parse error: {}", e);
				self.transport
					.write_error(0, PARSE_ERROR, "Parse error: invalid JSON-RPC request", None);
			}
		}
	}

	pub fn engine(&self) -> &SearchEngine {
		&self.engine
	}

	pub fn into_transport(self) -> NdjsonTransport<W> {
		self.transport
	}

	// ── Dispatch ──────────────────────────────────────────────────────────

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		let engine = &mut self.engine;
		let result = match req.method.as_str() {
			// -- Catalog -------------------------------------------------
			"catalog/add" => handle_add(engine, req.params),
			"catalog/addBatch" => handle_add_batch(engine, req.params),
			"catalog/remove" => handle_remove(engine, req.params),
			"catalog/get" => handle_get(engine, req.params),
			"catalog/search" => handle_search(engine, req.params),
			"catalog/rank" => handle_rank(engine, req.params),
			"catalog/count" => Ok(serde_json::json!({ "count": engine.count() })),
			"catalog/stats" => Ok(serde_json::json!(engine.stats())),

			// -- Recommendation ------------------------------------------
			"recommend/similar" => handle_similar(engine, req.params),
			"recommend/trending" => handle_trending(engine, req.params),
			"recommend/category" => handle_category(engine, req.params),
			"recommend/priceRange" => handle_price_range(engine, req.params),

			// -- Unknown -------------------------------------------------
			_ => {
				self.transport.write_error(
					id,
					METHOD_NOT_FOUND,
					format!("Unknown method: {}", req.method),
					None,
				);
				return;
			}
		};

		match result {
			Ok(value) => self.transport.write_response(id, value),
			Err(e) => {
				let code = match &e {
					CatalogError::InvalidParams(_) => INVALID_PARAMS,
					e if e.is_fatal() => {
						tracing::error!(method = %req.method, "Invariant violation: {}", e);
						INTERNAL_ERROR
					}
					_ => CATALOG_ERROR,
				};
				self.transport
					.write_error(id, code, e.to_string(), Some(e.to_json_rpc_error()));
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn parse_params<T: serde::de::DeserializeOwned>(
	params: serde_json::Value,
) -> Result<T, CatalogError> {
	serde_json::from_value(params).map_err(|e| CatalogError::InvalidParams(e.to_string()))
}

/// Like [`parse_params`], but a missing `params` member means defaults.
fn parse_optional_params<T: serde::de::DeserializeOwned + Default>(
	params: serde_json::Value,
) -> Result<T, CatalogError> {
	if params.is_null() {
		return Ok(T::default());
	}
	parse_params(params)
}

fn handle_add(
	engine: &mut SearchEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let draft = parse_params(params)?;
	let item = engine.add_draft(draft).inspect_err(|e| {
		tracing::warn!("Rejected item: {}", e);
	})?;
	Ok(serde_json::json!({ "item": item }))
}

fn handle_add_batch(
	engine: &mut SearchEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: AddBatchParams = parse_params(params)?;
	// Validate everything before touching the catalog.
	let items = p
		.items
		.into_iter()
		.map(|draft| draft.validate())
		.collect::<Result<Vec<_>, _>>()
		.inspect_err(|e| tracing::warn!("Rejected batch: {}", e))?;
	let count = items.len();
	for item in items {
		engine.add(item)?;
	}
	tracing::info!(count, total = engine.count(), "Batch added");
	Ok(serde_json::json!({ "count": count }))
}

fn handle_remove(
	engine: &mut SearchEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: IdParams = parse_params(params)?;
	let removed = engine.remove(p.id);
	Ok(serde_json::json!({ "removed": removed }))
}

fn handle_get(
	engine: &mut SearchEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: IdParams = parse_params(params)?;
	let item = engine.lookup_by_id(p.id);
	Ok(serde_json::json!({ "item": item }))
}

/// A numeric query is tried as an id first; otherwise, or when no item has
/// that id, the query is matched against names.
fn handle_search(
	engine: &mut SearchEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: SearchParams = parse_params(params)?;
	let query = p.query.trim();
	if query.is_empty() {
		return Err(CatalogError::EmptyQuery);
	}

	let by_id = query
		.parse::<i64>()
		.ok()
		.and_then(|id| engine.lookup_by_id(id))
		.cloned();
	let items = match by_id {
		Some(item) => vec![item],
		None => engine.search_by_name(query, p.prefer_binary.unwrap_or(true)),
	};
	Ok(serde_json::json!({ "count": items.len(), "items": items }))
}

fn handle_rank(
	engine: &mut SearchEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: RankParams = parse_optional_params(params)?;
	let items = engine.rank(p.sort_by, p.order, p.algorithm);
	Ok(serde_json::json!({ "count": items.len(), "items": items }))
}

fn handle_similar(
	engine: &mut SearchEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: SimilarParams = parse_params(params)?;
	let limit = p.limit.unwrap_or(DEFAULT_RECOMMEND_LIMIT);
	let items = RecommendationEngine::new(engine).get_recommendations(p.id, limit);
	Ok(serde_json::json!({ "id": p.id, "count": items.len(), "items": items }))
}

fn handle_trending(
	engine: &mut SearchEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: LimitParams = parse_optional_params(params)?;
	let limit = p.limit.unwrap_or(DEFAULT_LIST_LIMIT);
	let items = RecommendationEngine::new(engine).get_trending_products(limit);
	Ok(serde_json::json!({ "count": items.len(), "items": items }))
}

fn handle_category(
	engine: &mut SearchEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: CategoryParams = parse_params(params)?;
	let limit = p.limit.unwrap_or(DEFAULT_LIST_LIMIT);
	let items = RecommendationEngine::new(engine).get_recommendations_by_category(&p.category, limit);
	Ok(serde_json::json!({ "category": p.category, "count": items.len(), "items": items }))
}

fn handle_price_range(
	engine: &mut SearchEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, CatalogError> {
	let p: PriceRangeParams = parse_params(params)?;
	let tolerance = p.tolerance.unwrap_or(DEFAULT_PRICE_TOLERANCE);
	let limit = p.limit.unwrap_or(DEFAULT_LIST_LIMIT);
	let items = RecommendationEngine::new(engine).get_similar_price_range(p.price, tolerance, limit);
	Ok(serde_json::json!({ "count": items.len(), "items": items }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
