//! High-level inventory operations against the Shopify Admin API.

use tracing::{debug, instrument, warn};

use crate::config::ShopifyConfig;
use crate::error::{InventoryError, InventoryResult};
use crate::gid::{self, EntityKind};
use crate::graphql::GraphqlClient;
use crate::pagination::{paginate_cursor, CursorPage, CursorPageInfo, Paginated};
use crate::queries::{
    AdjustQuantitiesInput, AdjustQuantitiesMutation, AdjustQuantitiesVars, HandleVars,
    InventoryByLocationQuery, InventoryByLocationVars, InventoryLevelsQuery, InventoryLevelsVars,
    LocationsQuery, NoVariables, ProductByHandleQuery, ProductsWithInventoryQuery,
    ProductsWithInventoryVars, QuantityChangeInput, SkuVars, VariantsBySkuQuery,
};
use crate::types::{
    AdjustmentOutcome, AdjustmentReason, InventoryRecord, Location, LocationSummary,
    ProductInventoryRecord, Quantities, StockLevel, VariantStock, AVAILABLE,
};

/// Shopify caps inventory-level pages at 250 items.
const MAX_LEVEL_PAGE: i64 = 250;
/// Product listings cap at 50 per page.
const MAX_PRODUCT_PAGE: i64 = 50;

/// Selector for variant lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantSelector {
    /// Look up by product handle.
    Handle(String),
    /// Look up by SKU search.
    Sku(String),
}

/// Client for reading and adjusting inventory levels.
///
/// All identifier parameters accept either short numeric ids or full GIDs;
/// they are normalized before any network call.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    graphql: GraphqlClient,
}

impl InventoryClient {
    /// Build a client from connector configuration.
    pub fn new(config: &ShopifyConfig) -> InventoryResult<Self> {
        Ok(Self {
            graphql: GraphqlClient::new(config)?,
        })
    }

    /// Point the client at a different endpoint (for tests).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graphql = self.graphql.with_endpoint(endpoint);
        self
    }

    /// List the shop's locations.
    #[instrument(skip(self))]
    pub async fn list_locations(&self) -> InventoryResult<Vec<Location>> {
        let data = self
            .graphql
            .execute_strict::<LocationsQuery>(NoVariables {})
            .await?;

        let locations = data
            .locations
            .into_nodes()
            .into_iter()
            .map(|node| Location {
                id: gid::short_id(&node.id).to_string(),
                name: node.name,
                city: node
                    .address
                    .and_then(|address| address.city)
                    .unwrap_or_else(|| "N/A".to_string()),
                gid: node.id,
            })
            .collect();
        Ok(locations)
    }

    /// Walk every inventory level at one location.
    ///
    /// Pages are fetched sequentially until the server reports no next page;
    /// a mid-walk failure returns the pages already collected with the error
    /// recorded on the result. An unknown location yields an empty, complete
    /// result.
    #[instrument(skip(self))]
    pub async fn list_inventory(
        &self,
        location_id: &str,
        page_size: i64,
    ) -> Paginated<InventoryRecord> {
        let location_gid = gid::normalize(EntityKind::Location, location_id);
        let first = page_size.clamp(1, MAX_LEVEL_PAGE);

        let result = paginate_cursor(move |cursor| {
            let location_gid = location_gid.clone();
            async move {
                let data = self
                    .graphql
                    .execute_strict::<InventoryByLocationQuery>(InventoryByLocationVars {
                        location_id: location_gid,
                        first,
                        after: cursor,
                    })
                    .await?;

                let Some(location) = data.location else {
                    // Unknown location is "not found", not a fault.
                    return Ok(CursorPage {
                        items: Vec::new(),
                        page_info: CursorPageInfo::default(),
                    });
                };

                let page_info = location.inventory_levels.cursor_info();
                let location_name = location.name;
                let items = location
                    .inventory_levels
                    .into_nodes()
                    .into_iter()
                    .map(|node| InventoryRecord {
                        level_id: gid::short_id(&node.id).to_string(),
                        item_id: gid::short_id(&node.item.id).to_string(),
                        item_gid: node.item.id,
                        sku: node.item.sku,
                        tracked: node.item.tracked,
                        location_name: location_name.clone(),
                        quantities: node
                            .quantities
                            .into_iter()
                            .map(|entry| (entry.name, entry.quantity))
                            .collect::<Quantities>(),
                        level_gid: node.id,
                    })
                    .collect();

                Ok(CursorPage { items, page_info })
            }
        })
        .await;

        debug!(
            items = result.items.len(),
            pages = result.pages,
            complete = result.is_complete(),
            "inventory listing finished"
        );
        result
    }

    /// Walk products, joining each variant's inventory level at one location.
    ///
    /// Variants with no inventory item or no level at the location are
    /// skipped.
    #[instrument(skip(self))]
    pub async fn list_inventory_with_products(
        &self,
        location_id: &str,
        page_size: i64,
    ) -> Paginated<ProductInventoryRecord> {
        let location_gid = gid::normalize(EntityKind::Location, location_id);
        let first = page_size.clamp(1, MAX_PRODUCT_PAGE);

        paginate_cursor(move |cursor| {
            let location_gid = location_gid.clone();
            async move {
                let data = self
                    .graphql
                    .execute_strict::<ProductsWithInventoryQuery>(ProductsWithInventoryVars {
                        location_id: location_gid,
                        first,
                        after: cursor,
                    })
                    .await?;

                let page_info = data.products.cursor_info();
                let mut items = Vec::new();
                for product in data.products.into_nodes() {
                    let product_id = gid::short_id(&product.id).to_string();
                    for variant in product.variants.into_nodes() {
                        let Some(item) = variant.inventory_item else {
                            continue;
                        };
                        let Some(level) = item.inventory_level else {
                            continue;
                        };
                        items.push(ProductInventoryRecord {
                            level_id: gid::short_id(&level.id).to_string(),
                            item_id: gid::short_id(&item.id).to_string(),
                            item_gid: item.id,
                            sku: variant.sku,
                            tracked: item.tracked,
                            quantities: level
                                .quantities
                                .into_iter()
                                .map(|entry| (entry.name, entry.quantity))
                                .collect::<Quantities>(),
                            product_id: product_id.clone(),
                            product_title: product.title.clone(),
                            product_handle: product.handle.clone(),
                            variant_id: gid::short_id(&variant.id).to_string(),
                            variant_title: variant.title,
                            variant_price: variant.price,
                            level_gid: level.id,
                        });
                    }
                }

                Ok(CursorPage { items, page_info })
            }
        })
        .await
    }

    /// Resolve variants and their inventory item ids by handle or SKU.
    ///
    /// Unknown handles and SKUs yield an empty list.
    #[instrument(skip(self))]
    pub async fn find_variants(
        &self,
        selector: &VariantSelector,
    ) -> InventoryResult<Vec<VariantStock>> {
        match selector {
            VariantSelector::Handle(handle) => {
                let data = self
                    .graphql
                    .execute_strict::<ProductByHandleQuery>(HandleVars {
                        handle: handle.clone(),
                    })
                    .await?;
                let Some(product) = data.product_by_handle else {
                    return Ok(Vec::new());
                };
                let product_title = product.title;
                Ok(product
                    .variants
                    .into_nodes()
                    .into_iter()
                    .map(|variant| VariantStock {
                        variant_id: gid::short_id(&variant.id).to_string(),
                        sku: variant.sku,
                        inventory_item_id: gid::short_id(&variant.inventory_item.id).to_string(),
                        inventory_item_gid: variant.inventory_item.id,
                        product_title: product_title.clone(),
                    })
                    .collect())
            }
            VariantSelector::Sku(sku) => {
                let data = self
                    .graphql
                    .execute_strict::<VariantsBySkuQuery>(SkuVars {
                        query: format!("sku:{sku}"),
                    })
                    .await?;
                Ok(data
                    .product_variants
                    .into_nodes()
                    .into_iter()
                    .map(|variant| VariantStock {
                        variant_id: gid::short_id(&variant.id).to_string(),
                        sku: variant.sku,
                        inventory_item_id: gid::short_id(&variant.inventory_item.id).to_string(),
                        inventory_item_gid: variant.inventory_item.id,
                        product_title: variant.product.title,
                    })
                    .collect())
            }
        }
    }

    /// Fetch per-location stock levels for one inventory item.
    ///
    /// An unknown item yields an empty list.
    #[instrument(skip(self))]
    pub async fn get_levels(&self, inventory_item_id: &str) -> InventoryResult<Vec<StockLevel>> {
        let item_gid = gid::normalize(EntityKind::InventoryItem, inventory_item_id);
        let data = self
            .graphql
            .execute_strict::<InventoryLevelsQuery>(InventoryLevelsVars {
                inventory_item_id: item_gid,
            })
            .await?;

        let Some(item) = data.inventory_item else {
            return Ok(Vec::new());
        };

        Ok(item
            .inventory_levels
            .into_nodes()
            .into_iter()
            .map(|node| StockLevel {
                location_id: gid::short_id(&node.location.id).to_string(),
                location_name: node.location.name,
                available: node.available,
                location_gid: node.location.id,
            })
            .collect())
    }

    /// Adjust the `available` quantity by an explicit delta.
    ///
    /// Server-side validation failures surface as an unsuccessful outcome
    /// with the field/message pairs, not as an error.
    #[instrument(skip(self))]
    pub async fn adjust_quantity(
        &self,
        inventory_item_id: &str,
        location_id: &str,
        delta: i64,
        reason: AdjustmentReason,
    ) -> InventoryResult<AdjustmentOutcome> {
        let input = AdjustQuantitiesInput {
            reason: reason.as_str(),
            name: AVAILABLE,
            changes: vec![QuantityChangeInput {
                delta,
                inventory_item_id: gid::normalize(EntityKind::InventoryItem, inventory_item_id),
                location_id: gid::normalize(EntityKind::Location, location_id),
            }],
        };

        let data = self
            .graphql
            .execute_strict::<AdjustQuantitiesMutation>(AdjustQuantitiesVars { input })
            .await?;
        let payload = data
            .inventory_adjust_quantities
            .ok_or_else(|| InventoryError::MissingData("inventoryAdjustQuantities".into()))?;

        if !payload.user_errors.is_empty() {
            for error in &payload.user_errors {
                warn!(
                    field = ?error.field,
                    message = %error.message,
                    "inventory adjustment rejected"
                );
            }
            return Ok(AdjustmentOutcome {
                success: false,
                user_errors: payload.user_errors,
                changes: Vec::new(),
            });
        }

        let changes = payload
            .inventory_adjustment_group
            .map(|group| group.changes)
            .unwrap_or_default();
        debug!(delta, applied = changes.len(), "inventory adjusted");
        Ok(AdjustmentOutcome {
            success: true,
            user_errors: Vec::new(),
            changes,
        })
    }

    /// Set the `available` quantity at a location to an absolute target.
    ///
    /// Reads the current level, then issues the delta needed to reach
    /// `target` under the given reason code; a zero delta succeeds
    /// immediately with no mutation call. The read and the adjustment are
    /// two separate requests: a concurrent external change in between is
    /// silently overwritten.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        inventory_item_id: &str,
        location_id: &str,
        target: i64,
        reason: AdjustmentReason,
    ) -> InventoryResult<AdjustmentOutcome> {
        let location_gid = gid::normalize(EntityKind::Location, location_id);
        let location_short = gid::short_id(&location_gid);

        let levels = self.get_levels(inventory_item_id).await?;
        let current = levels
            .iter()
            .find(|level| level.location_gid == location_gid || level.location_id == location_short)
            .map_or(0, |level| level.available);

        let delta = target - current;
        if delta == 0 {
            debug!(target, "quantity already at target, no mutation needed");
            return Ok(AdjustmentOutcome::noop());
        }

        debug!(current, target, delta, "adjusting quantity to target");
        self.adjust_quantity(inventory_item_id, location_id, delta, reason)
            .await
    }

    /// Aggregate totals for one location's full inventory.
    ///
    /// Walks the complete listing at the maximum page size. A listing that
    /// failed before yielding any records propagates the error; a partially
    /// collected listing is summarized and marked incomplete.
    #[instrument(skip(self))]
    pub async fn location_summary(&self, location_id: &str) -> InventoryResult<LocationSummary> {
        let listing = self.list_inventory(location_id, MAX_LEVEL_PAGE).await;
        if listing.items.is_empty() {
            if let Some(error) = listing.error {
                return Err(error);
            }
        }

        let location_name = listing
            .items
            .first()
            .map_or_else(|| "Unknown".to_string(), |r| r.location_name.clone());
        Ok(LocationSummary::from_records(
            location_name,
            &listing.items,
            !listing.is_complete(),
        ))
    }
}
