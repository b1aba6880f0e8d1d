//! Domain records returned by the inventory client.
//!
//! These are the flattened, language-native shapes the client produces from
//! the nested GraphQL responses. Identifiers are carried in both short and
//! fully-qualified form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Quantity name used for adjustments and availability checks.
pub const AVAILABLE: &str = "available";

/// Warehouse or store that holds inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Short numeric id.
    pub id: String,
    /// Fully-qualified GID.
    pub gid: String,
    /// Display name.
    pub name: String,
    /// City, `"N/A"` when the address carries none.
    pub city: String,
}

/// Per-location stock level for one inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Short location id.
    pub location_id: String,
    /// Fully-qualified location GID.
    pub location_gid: String,
    /// Location display name.
    pub location_name: String,
    /// Available quantity at this location.
    pub available: i64,
}

/// Sparse mapping from quantity name to count; absent names read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantities(BTreeMap<String, i64>);

impl Quantities {
    /// Look up a named quantity, defaulting to zero.
    #[must_use]
    pub fn get(&self, name: &str) -> i64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    /// Shorthand for the `available` quantity.
    #[must_use]
    pub fn available(&self) -> i64 {
        self.get(AVAILABLE)
    }

    /// Iterate over the present (name, count) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl FromIterator<(String, i64)> for Quantities {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One inventory level row at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Short inventory level id.
    pub level_id: String,
    /// Fully-qualified inventory level GID.
    pub level_gid: String,
    /// Short inventory item id.
    pub item_id: String,
    /// Fully-qualified inventory item GID.
    pub item_gid: String,
    /// Stock keeping unit, absent for untracked items.
    pub sku: Option<String>,
    /// Whether Shopify tracks quantities for this item.
    pub tracked: bool,
    /// Location display name.
    pub location_name: String,
    /// Named quantities reported for this level.
    pub quantities: Quantities,
}

impl InventoryRecord {
    /// The available quantity at this level.
    #[must_use]
    pub fn available(&self) -> i64 {
        self.quantities.available()
    }
}

/// Inventory level joined with its product and variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInventoryRecord {
    /// Short inventory level id.
    pub level_id: String,
    /// Fully-qualified inventory level GID.
    pub level_gid: String,
    /// Short inventory item id.
    pub item_id: String,
    /// Fully-qualified inventory item GID.
    pub item_gid: String,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Whether Shopify tracks quantities for this item.
    pub tracked: bool,
    /// Named quantities at the target location.
    pub quantities: Quantities,
    /// Short product id.
    pub product_id: String,
    /// Product title.
    pub product_title: String,
    /// Product handle.
    pub product_handle: String,
    /// Short variant id.
    pub variant_id: String,
    /// Variant title.
    pub variant_title: String,
    /// Variant price as reported by the API.
    pub variant_price: String,
}

impl ProductInventoryRecord {
    /// The available quantity at the target location.
    #[must_use]
    pub fn available(&self) -> i64 {
        self.quantities.available()
    }
}

/// Variant located by product handle or SKU search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantStock {
    /// Short variant id.
    pub variant_id: String,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Short inventory item id.
    pub inventory_item_id: String,
    /// Fully-qualified inventory item GID.
    pub inventory_item_gid: String,
    /// Owning product's title.
    pub product_title: String,
}

/// Field-level validation error echoed by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path of the rejected input field.
    #[serde(default)]
    pub field: Vec<String>,
    /// Server-provided message.
    pub message: String,
}

/// Applied delta echoed by the adjustment mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedChange {
    /// Quantity name the delta applied to.
    pub name: String,
    /// Signed change.
    pub delta: i64,
}

/// Outcome of an inventory adjustment.
///
/// Server-side validation failures are reported here (`success == false`
/// with the field/message pairs), never raised as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentOutcome {
    /// Whether the mutation was accepted.
    pub success: bool,
    /// Validation errors reported by the server.
    pub user_errors: Vec<UserError>,
    /// Deltas the server echoed back as applied.
    pub changes: Vec<AppliedChange>,
}

impl AdjustmentOutcome {
    /// An outcome for an update that required no mutation.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }
}

/// Reason code accepted by the adjustment mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// Manual correction.
    #[default]
    Correction,
    /// Cycle count of available stock.
    CycleCountAvailable,
    /// Stock written off as damaged.
    Damaged,
    /// Stock received from a supplier.
    Received,
    /// Returned stock put back on the shelf.
    Restock,
    /// Unexplained loss.
    Shrinkage,
    /// Catch-all.
    Other,
}

impl AdjustmentReason {
    /// The wire string Shopify expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Correction => "correction",
            Self::CycleCountAvailable => "cycle_count_available",
            Self::Damaged => "damaged",
            Self::Received => "received",
            Self::Restock => "restock",
            Self::Shrinkage => "shrinkage",
            Self::Other => "other",
        }
    }
}

/// Aggregate totals over one location's full inventory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    /// Location display name, `"Unknown"` when no records exist.
    pub location_name: String,
    /// Number of inventory records.
    pub total_items: usize,
    /// Records with available stock.
    pub items_with_stock: usize,
    /// Records with zero or negative availability.
    pub items_out_of_stock: usize,
    /// Sum of available quantities.
    pub total_available: i64,
    /// Sum of on-hand quantities.
    pub total_on_hand: i64,
    /// Sum of committed quantities.
    pub total_committed: i64,
    /// Sum of incoming quantities.
    pub total_incoming: i64,
    /// Percentage of records with stock, rounded to two decimals.
    pub stock_percentage: f64,
    /// Set when the underlying listing stopped early on a failure.
    pub incomplete: bool,
}

impl LocationSummary {
    /// Aggregate a flat inventory listing.
    #[must_use]
    pub fn from_records(
        location_name: String,
        records: &[InventoryRecord],
        incomplete: bool,
    ) -> Self {
        let total_items = records.len();
        let items_with_stock = records.iter().filter(|r| r.available() > 0).count();
        let stock_percentage = if total_items > 0 {
            #[allow(clippy::cast_precision_loss)]
            let ratio = items_with_stock as f64 / total_items as f64;
            (ratio * 10_000.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            location_name,
            total_items,
            items_with_stock,
            items_out_of_stock: total_items - items_with_stock,
            total_available: records.iter().map(InventoryRecord::available).sum(),
            total_on_hand: records.iter().map(|r| r.quantities.get("on_hand")).sum(),
            total_committed: records.iter().map(|r| r.quantities.get("committed")).sum(),
            total_incoming: records.iter().map(|r| r.quantities.get("incoming")).sum(),
            stock_percentage,
            incomplete,
        }
    }
}
