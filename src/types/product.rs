//! Product-related types for the IAP storefront facade
//!
//! This module defines product descriptors, resolved catalog entries, and
//! the published store state observed by UI-facing callers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier
///
/// An opaque string naming a purchasable item. The set of identifiers of
/// interest is supplied once at construction and is immutable for the
/// lifetime of the storefront.
pub type ProductId = String;

/// Product descriptor returned by the external purchase service
///
/// The storefront never constructs these itself; they are fetched from the
/// service during a catalog load and paired with a derived activity flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque product identifier
    pub id: ProductId,

    /// Localized display name
    pub display_name: String,

    /// Localized marketing description
    pub description: String,

    /// Price in the storefront currency
    pub price: Decimal,
}

/// A product resolved against the caller's current entitlements
///
/// Recomputed on every catalog load and never mutated in place; the
/// published list is always replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// The product descriptor as returned by the service
    pub product: Product,

    /// Whether the caller currently holds an active entitlement
    pub is_active: bool,
}

/// Published storefront state
///
/// The only shared mutable state the facade owns. Written exclusively by
/// the facade's operations and observed by callers through a watch channel,
/// so readers never see a partially updated catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// Resolved catalog from the last successful load
    pub catalog: Vec<CatalogEntry>,

    /// True while a load, purchase, or restore is in flight
    pub loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_empty_and_idle() {
        let state = StoreState::default();
        assert!(state.catalog.is_empty());
        assert!(!state.loading);
    }

    #[test]
    fn test_price_uses_fixed_point_decimal() {
        let product = Product {
            id: "pro.monthly".to_string(),
            display_name: "Pro Monthly".to_string(),
            description: "Monthly subscription".to_string(),
            price: Decimal::new(499, 2),
        };
        assert_eq!(product.price.to_string(), "4.99");
    }
}
