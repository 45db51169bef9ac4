pub mod binary_search;
pub mod config;
pub mod error;
pub mod hash_index;
pub mod item;
pub mod protocol;
pub mod recommendation;
pub mod search_engine;
pub mod server;
pub mod shared;
pub mod sorting;
pub mod transport;

pub use error::CatalogError;
pub use item::{Item, ItemDraft};
pub use recommendation::RecommendationEngine;
pub use search_engine::SearchEngine;
pub use shared::SharedCatalog;
