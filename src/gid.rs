//! Shopify GID normalization.
//!
//! The Admin API addresses every entity by a fully-qualified global id of the
//! form `gid://shopify/<EntityKind>/<numeric id>`. Callers may pass either the
//! short numeric form or the full GID; everything is normalized before it goes
//! on the wire.

use std::fmt;

/// Prefix shared by every fully-qualified Shopify id.
const GID_SCHEME: &str = "gid://";

/// Entity kinds addressable by a GID in this connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Sellable unit tracked per location.
    InventoryItem,
    /// Warehouse or store holding inventory.
    Location,
    /// Product record.
    Product,
    /// Product variant record.
    ProductVariant,
}

impl EntityKind {
    /// The type segment used inside a GID.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InventoryItem => "InventoryItem",
            Self::Location => "Location",
            Self::Product => "Product",
            Self::ProductVariant => "ProductVariant",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrite a short numeric id into fully-qualified GID form.
///
/// Already-qualified ids pass through unchanged, so normalizing twice is a
/// no-op.
#[must_use]
pub fn normalize(kind: EntityKind, id: &str) -> String {
    if id.starts_with(GID_SCHEME) {
        id.to_string()
    } else {
        format!("gid://shopify/{}/{id}", kind.as_str())
    }
}

/// Extract the short id from a fully-qualified GID.
///
/// Returns the input unchanged when it contains no separator.
#[must_use]
pub fn short_id(gid: &str) -> &str {
    gid.rsplit('/').next().unwrap_or(gid)
}
