use serde::Deserialize;

use crate::item::ItemDraft;
use crate::sorting::{SortAlgorithm, SortKey, SortOrder};

// ── JSON-RPC 2.0 error codes ────────────────────────────────────────────────

pub const PARSE_ERROR: i32 = -32700;
pub const INTERNAL_ERROR: i32 = -32603;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const CATALOG_ERROR: i32 = -32000;

// ── Default limits ──────────────────────────────────────────────────────────

pub const DEFAULT_RECOMMEND_LIMIT: usize = 12;
pub const DEFAULT_LIST_LIMIT: usize = 5;
pub const DEFAULT_PRICE_TOLERANCE: f64 = 0.3;

// ── Incoming request ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
	pub id: u64,
	pub method: String,
	#[serde(default)]
	pub params: serde_json::Value,
}

// ── Params ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBatchParams {
	pub items: Vec<ItemDraft>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdParams {
	pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
	pub query: String,
	pub prefer_binary: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankParams {
	pub sort_by: SortKey,
	pub order: SortOrder,
	pub algorithm: SortAlgorithm,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarParams {
	pub id: i64,
	pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitParams {
	pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryParams {
	pub category: String,
	pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeParams {
	pub price: f64,
	pub tolerance: Option<f64>,
	pub limit: Option<usize>,
}
