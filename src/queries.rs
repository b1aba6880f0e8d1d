//! Shopify Admin API operations: query text and wire shapes.
//!
//! One [`GraphqlOperation`] per query/mutation, with serde types mirroring
//! the nested connection shapes the API returns. The high-level client in
//! [`crate::client`] flattens these into domain records.

use serde::{Deserialize, Serialize};

use crate::graphql::GraphqlOperation;
use crate::pagination::CursorPageInfo;

/// Connection edge wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    /// Wrapped node.
    pub node: T,
}

/// Relay-style connection wrapper.
///
/// The explicit bound keeps the derive from also requiring `T: Default`
/// for the defaulted `edges` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    /// Edges in this page.
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
    /// Page info, present only when the query requests it.
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

impl<T> Connection<T> {
    /// Unwrap the edges into their nodes.
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }

    /// Page info for the cursor loop, defaulting to "no next page".
    #[must_use]
    pub fn cursor_info(&self) -> CursorPageInfo {
        self.page_info
            .clone()
            .map(Into::into)
            .unwrap_or_default()
    }
}

/// Wire shape of `pageInfo`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether there is another page.
    #[serde(default)]
    pub has_next_page: bool,
    /// Continuation cursor.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

impl From<PageInfo> for CursorPageInfo {
    fn from(info: PageInfo) -> Self {
        Self {
            has_next_page: info.has_next_page,
            end_cursor: info.end_cursor,
        }
    }
}

/// Empty variables payload.
#[derive(Debug, Clone, Serialize)]
pub struct NoVariables {}

/// Named quantity entry.
#[derive(Debug, Clone, Deserialize)]
pub struct QuantityEntry {
    /// Quantity name (`available`, `on_hand`, ...).
    pub name: String,
    /// Count.
    pub quantity: i64,
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// Lists the shop's locations (first 50).
pub struct LocationsQuery;

/// `locations` response data.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationsData {
    /// Locations connection.
    pub locations: Connection<LocationNode>,
}

/// Location node.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationNode {
    /// Fully-qualified location GID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Address block, absent for some location types.
    #[serde(default)]
    pub address: Option<LocationAddress>,
}

/// Location address subset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationAddress {
    /// City.
    #[serde(default)]
    pub city: Option<String>,
}

impl GraphqlOperation for LocationsQuery {
    type Variables = NoVariables;
    type ResponseData = LocationsData;

    const QUERY: &'static str = r"
        query getLocations {
          locations(first: 50) {
            edges {
              node {
                id
                name
                address {
                  city
                  country
                }
              }
            }
          }
        }";
    const OPERATION_NAME: &'static str = "getLocations";
}

// ---------------------------------------------------------------------------
// Inventory levels at a location
// ---------------------------------------------------------------------------

/// Pages through every inventory level at one location.
pub struct InventoryByLocationQuery;

/// Variables for [`InventoryByLocationQuery`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryByLocationVars {
    /// Fully-qualified location GID.
    pub location_id: String,
    /// Page size.
    pub first: i64,
    /// Continuation cursor, absent on the first request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// `location` response data.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryByLocationData {
    /// The requested location, `null` when unknown.
    pub location: Option<LocationInventoryNode>,
}

/// Location with its inventory-levels connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInventoryNode {
    /// Fully-qualified location GID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Inventory levels page.
    pub inventory_levels: Connection<InventoryLevelNode>,
}

/// Inventory level node.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryLevelNode {
    /// Fully-qualified inventory level GID.
    pub id: String,
    /// Named quantities.
    #[serde(default)]
    pub quantities: Vec<QuantityEntry>,
    /// Owning inventory item.
    pub item: InventoryItemNode,
}

/// Inventory item subset.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryItemNode {
    /// Fully-qualified inventory item GID.
    pub id: String,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Whether quantities are tracked.
    #[serde(default)]
    pub tracked: bool,
}

impl GraphqlOperation for InventoryByLocationQuery {
    type Variables = InventoryByLocationVars;
    type ResponseData = InventoryByLocationData;

    const QUERY: &'static str = r#"
        query getInventoryByLocation($locationId: ID!, $first: Int!, $after: String) {
          location(id: $locationId) {
            id
            name
            inventoryLevels(first: $first, after: $after) {
              edges {
                node {
                  id
                  quantities(names: ["available", "on_hand", "committed", "incoming", "reserved"]) {
                    name
                    quantity
                  }
                  item {
                    id
                    sku
                    tracked
                  }
                }
              }
              pageInfo {
                hasNextPage
                endCursor
              }
            }
          }
        }"#;
    const OPERATION_NAME: &'static str = "getInventoryByLocation";
}

// ---------------------------------------------------------------------------
// Products with inventory at a location
// ---------------------------------------------------------------------------

/// Pages through products, joining each variant's level at one location.
pub struct ProductsWithInventoryQuery;

/// Variables for [`ProductsWithInventoryQuery`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsWithInventoryVars {
    /// Fully-qualified location GID.
    pub location_id: String,
    /// Page size.
    pub first: i64,
    /// Continuation cursor, absent on the first request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// `products` response data.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsWithInventoryData {
    /// Products connection.
    pub products: Connection<ProductNode>,
}

/// Product node with its variants.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductNode {
    /// Fully-qualified product GID.
    pub id: String,
    /// Product title.
    pub title: String,
    /// Product handle.
    pub handle: String,
    /// Variants page (first 50).
    pub variants: Connection<VariantNode>,
}

/// Variant node with its inventory item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    /// Fully-qualified variant GID.
    pub id: String,
    /// Variant title.
    #[serde(default)]
    pub title: String,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Price as a decimal string.
    #[serde(default)]
    pub price: String,
    /// Inventory item, `null` for variants without one.
    #[serde(default)]
    pub inventory_item: Option<VariantInventoryItemNode>,
}

/// Variant inventory item with its level at the target location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInventoryItemNode {
    /// Fully-qualified inventory item GID.
    pub id: String,
    /// Whether quantities are tracked.
    #[serde(default)]
    pub tracked: bool,
    /// Level at the target location, `null` when the item is not stocked
    /// there.
    #[serde(default)]
    pub inventory_level: Option<VariantInventoryLevelNode>,
}

/// Inventory level subset on the variant path.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantInventoryLevelNode {
    /// Fully-qualified inventory level GID.
    pub id: String,
    /// Named quantities.
    #[serde(default)]
    pub quantities: Vec<QuantityEntry>,
}

impl GraphqlOperation for ProductsWithInventoryQuery {
    type Variables = ProductsWithInventoryVars;
    type ResponseData = ProductsWithInventoryData;

    const QUERY: &'static str = r#"
        query getProductsWithInventory($locationId: ID!, $first: Int!, $after: String) {
          products(first: $first, after: $after) {
            edges {
              node {
                id
                title
                handle
                variants(first: 50) {
                  edges {
                    node {
                      id
                      title
                      sku
                      price
                      inventoryItem {
                        id
                        tracked
                        inventoryLevel(locationId: $locationId) {
                          id
                          quantities(names: ["available", "on_hand", "committed"]) {
                            name
                            quantity
                          }
                        }
                      }
                    }
                  }
                }
              }
            }
            pageInfo {
              hasNextPage
              endCursor
            }
          }
        }"#;
    const OPERATION_NAME: &'static str = "getProductsWithInventory";
}

// ---------------------------------------------------------------------------
// Levels for one inventory item
// ---------------------------------------------------------------------------

/// Fetches per-location levels for one inventory item.
pub struct InventoryLevelsQuery;

/// Variables for [`InventoryLevelsQuery`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevelsVars {
    /// Fully-qualified inventory item GID.
    pub inventory_item_id: String,
}

/// `inventoryItem` response data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevelsData {
    /// The requested item, `null` when unknown.
    pub inventory_item: Option<ItemLevelsNode>,
}

/// Inventory item with its per-location levels.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLevelsNode {
    /// Fully-qualified inventory item GID.
    pub id: String,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Levels connection (first 50).
    pub inventory_levels: Connection<LevelAtLocationNode>,
}

/// Level at one location.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelAtLocationNode {
    /// Fully-qualified inventory level GID.
    pub id: String,
    /// Available quantity.
    #[serde(default)]
    pub available: i64,
    /// Holding location.
    pub location: LocationRefNode,
}

/// Location reference.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRefNode {
    /// Fully-qualified location GID.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl GraphqlOperation for InventoryLevelsQuery {
    type Variables = InventoryLevelsVars;
    type ResponseData = InventoryLevelsData;

    const QUERY: &'static str = r"
        query getInventoryLevels($inventoryItemId: ID!) {
          inventoryItem(id: $inventoryItemId) {
            id
            sku
            inventoryLevels(first: 50) {
              edges {
                node {
                  id
                  available
                  location {
                    id
                    name
                  }
                }
              }
            }
          }
        }";
    const OPERATION_NAME: &'static str = "getInventoryLevels";
}

// ---------------------------------------------------------------------------
// Variant lookup by handle or SKU
// ---------------------------------------------------------------------------

/// Resolves a product's variants and inventory item ids by handle.
pub struct ProductByHandleQuery;

/// Variables for [`ProductByHandleQuery`].
#[derive(Debug, Clone, Serialize)]
pub struct HandleVars {
    /// Product handle.
    pub handle: String,
}

/// `productByHandle` response data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductByHandleData {
    /// The product, `null` when the handle is unknown.
    pub product_by_handle: Option<HandleProductNode>,
}

/// Product with variant inventory-item references.
#[derive(Debug, Clone, Deserialize)]
pub struct HandleProductNode {
    /// Fully-qualified product GID.
    pub id: String,
    /// Product title.
    pub title: String,
    /// Variants page (first 50).
    pub variants: Connection<HandleVariantNode>,
}

/// Variant with its inventory item reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleVariantNode {
    /// Fully-qualified variant GID.
    pub id: String,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Inventory item reference.
    pub inventory_item: ItemRefNode,
}

/// Bare inventory item reference.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRefNode {
    /// Fully-qualified inventory item GID.
    pub id: String,
}

impl GraphqlOperation for ProductByHandleQuery {
    type Variables = HandleVars;
    type ResponseData = ProductByHandleData;

    const QUERY: &'static str = r"
        query getProductByHandle($handle: String!) {
          productByHandle(handle: $handle) {
            id
            title
            variants(first: 50) {
              edges {
                node {
                  id
                  sku
                  inventoryItem {
                    id
                  }
                }
              }
            }
          }
        }";
    const OPERATION_NAME: &'static str = "getProductByHandle";
}

/// Resolves variants and inventory item ids by SKU search.
pub struct VariantsBySkuQuery;

/// Variables for [`VariantsBySkuQuery`].
#[derive(Debug, Clone, Serialize)]
pub struct SkuVars {
    /// Search query, e.g. `sku:ABC-1`.
    pub query: String,
}

/// `productVariants` response data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsBySkuData {
    /// Matching variants (first 10).
    pub product_variants: Connection<SkuVariantNode>,
}

/// Variant with product and inventory item references.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuVariantNode {
    /// Fully-qualified variant GID.
    pub id: String,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Owning product.
    pub product: ProductRefNode,
    /// Inventory item reference.
    pub inventory_item: ItemRefNode,
}

/// Product reference.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRefNode {
    /// Fully-qualified product GID.
    pub id: String,
    /// Product title.
    pub title: String,
}

impl GraphqlOperation for VariantsBySkuQuery {
    type Variables = SkuVars;
    type ResponseData = VariantsBySkuData;

    const QUERY: &'static str = r"
        query getProductVariantBySku($query: String!) {
          productVariants(first: 10, query: $query) {
            edges {
              node {
                id
                sku
                product {
                  id
                  title
                }
                inventoryItem {
                  id
                }
              }
            }
          }
        }";
    const OPERATION_NAME: &'static str = "getProductVariantBySku";
}

// ---------------------------------------------------------------------------
// Quantity adjustment
// ---------------------------------------------------------------------------

/// Adjusts named quantities by explicit deltas.
pub struct AdjustQuantitiesMutation;

/// Variables for [`AdjustQuantitiesMutation`].
#[derive(Debug, Clone, Serialize)]
pub struct AdjustQuantitiesVars {
    /// Mutation input.
    pub input: AdjustQuantitiesInput,
}

/// `inventoryAdjustQuantities` input.
#[derive(Debug, Clone, Serialize)]
pub struct AdjustQuantitiesInput {
    /// Reason code.
    pub reason: &'static str,
    /// Quantity name to adjust.
    pub name: &'static str,
    /// Changes to apply.
    pub changes: Vec<QuantityChangeInput>,
}

/// One delta in an adjustment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityChangeInput {
    /// Signed change.
    pub delta: i64,
    /// Fully-qualified inventory item GID.
    pub inventory_item_id: String,
    /// Fully-qualified location GID.
    pub location_id: String,
}

/// `inventoryAdjustQuantities` response data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustQuantitiesData {
    /// Mutation payload.
    pub inventory_adjust_quantities: Option<AdjustQuantitiesPayload>,
}

/// Mutation payload: either an adjustment group or user errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustQuantitiesPayload {
    /// Applied adjustment group, absent on validation failure.
    #[serde(default)]
    pub inventory_adjustment_group: Option<AdjustmentGroupNode>,
    /// Field-level validation errors.
    #[serde(default)]
    pub user_errors: Vec<crate::types::UserError>,
}

/// Applied adjustment group.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentGroupNode {
    /// Echoed reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// Echoed changes.
    #[serde(default)]
    pub changes: Vec<crate::types::AppliedChange>,
}

impl GraphqlOperation for AdjustQuantitiesMutation {
    type Variables = AdjustQuantitiesVars;
    type ResponseData = AdjustQuantitiesData;

    const QUERY: &'static str = r"
        mutation inventoryAdjustQuantities($input: InventoryAdjustQuantitiesInput!) {
          inventoryAdjustQuantities(input: $input) {
            inventoryAdjustmentGroup {
              reason
              changes {
                name
                delta
              }
            }
            userErrors {
              field
              message
            }
          }
        }";
    const OPERATION_NAME: &'static str = "inventoryAdjustQuantities";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_defaults_to_no_next_page() {
        let raw = r#"{"edges": [{"node": {"id": "gid://shopify/Location/1", "name": "Main"}}]}"#;
        let connection: Connection<LocationNode> = serde_json::from_str(raw).unwrap();
        let info = connection.cursor_info();
        assert!(!info.has_next_page);
        assert!(info.end_cursor.is_none());
        assert_eq!(connection.into_nodes().len(), 1);
    }

    // Node types carry no Default impl; the connection must still parse.
    #[test]
    fn nested_connections_parse_without_default_nodes() {
        let raw = r#"{"products": {"edges": [{"node": {
            "id": "gid://shopify/Product/1",
            "title": "Shirt",
            "handle": "shirt",
            "variants": {"edges": []}
        }}]}}"#;
        let data: ProductsWithInventoryData = serde_json::from_str(raw).unwrap();
        let products = data.products.into_nodes();
        assert_eq!(products.len(), 1);
        assert!(products[0].variants.edges.is_empty());
    }

    #[test]
    fn page_info_parses_camel_case() {
        let raw = r#"{"hasNextPage": true, "endCursor": "abc"}"#;
        let info: PageInfo = serde_json::from_str(raw).unwrap();
        assert!(info.has_next_page);
        assert_eq!(info.end_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn adjust_input_serializes_camel_case() {
        let vars = AdjustQuantitiesVars {
            input: AdjustQuantitiesInput {
                reason: "correction",
                name: "available",
                changes: vec![QuantityChangeInput {
                    delta: 5,
                    inventory_item_id: "gid://shopify/InventoryItem/1".into(),
                    location_id: "gid://shopify/Location/2".into(),
                }],
            },
        };
        let value = serde_json::to_value(&vars).unwrap();
        let change = &value["input"]["changes"][0];
        assert_eq!(change["delta"], 5);
        assert_eq!(change["inventoryItemId"], "gid://shopify/InventoryItem/1");
        assert_eq!(change["locationId"], "gid://shopify/Location/2");
    }

    #[test]
    fn cursor_vars_omit_absent_cursor() {
        let vars = InventoryByLocationVars {
            location_id: "gid://shopify/Location/2".into(),
            first: 250,
            after: None,
        };
        let value = serde_json::to_value(&vars).unwrap();
        assert!(value.get("after").is_none());
        assert_eq!(value["locationId"], "gid://shopify/Location/2");
    }
}
