//! Shopify Admin GraphQL inventory connector.
//!
//! A thin client for reading and adjusting inventory levels across warehouse
//! locations:
//! - Paginated inventory listings with GID normalization.
//! - Delta adjustments and absolute-target updates via the
//!   `inventoryAdjustQuantities` mutation.
//! - Bounded concurrent fan-out of independent updates with per-item
//!   success/failure collection.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gid;
pub mod graphql;
pub mod pagination;
pub mod queries;
pub mod types;

pub use client::{InventoryClient, VariantSelector};
pub use config::{ShopifyConfig, DEFAULT_API_VERSION};
pub use dispatch::{
    apply_updates, parallel_map, DispatchError, QuantityChange, UpdateCommand, UpdateReport,
    DEFAULT_CONCURRENCY,
};
pub use error::{InventoryError, InventoryResult};
pub use gid::EntityKind;
pub use pagination::{paginate_cursor, CursorPage, CursorPageInfo, Paginated};
pub use types::{
    AdjustmentOutcome, AdjustmentReason, AppliedChange, InventoryRecord, Location,
    LocationSummary, ProductInventoryRecord, Quantities, StockLevel, UserError, VariantStock,
};
