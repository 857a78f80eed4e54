//! Error types for the IAP storefront facade
//!
//! This module defines the transport-level errors that can surface from
//! calls into the external purchase service.
//!
//! # Error Categories
//!
//! - **Service Errors**: the external service was unreachable or rejected
//!   a call during load, restore, or purchase.
//! - **Purchase Errors**: the purchase flow itself failed for a specific
//!   product.
//!
//! Verification failures are deliberately not errors: an unverified
//! transaction is silently dropped by the classifier and observable only
//! as the absence of a notification. Revoked, expired, and missing
//! entitlements are classification outcomes, not errors.

use thiserror::Error;

use crate::types::ProductId;

/// Main error type for the storefront facade
///
/// Every variant represents a transport-level failure talking to the
/// external purchase service. Catalog loads swallow these (the previous
/// catalog stays published); restore and purchase propagate them to the
/// caller. No operation retries internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The external service failed during a round trip
    ///
    /// Covers connectivity loss, timeouts, and service-side rejections
    /// for any operation other than the purchase flow itself.
    #[error("Purchase service unavailable during {operation}: {message}")]
    ServiceUnavailable {
        /// Operation that was in flight (e.g. "fetch_products", "sync")
        operation: String,
        /// Description of the underlying failure
        message: String,
    },

    /// The purchase flow failed for a specific product
    #[error("Purchase failed for product '{product_id}': {message}")]
    PurchaseFailed {
        /// The product whose purchase was attempted
        product_id: ProductId,
        /// Description of the underlying failure
        message: String,
    },

    /// Restoring purchases with the external service failed
    #[error("Restore failed: {message}")]
    RestoreFailed {
        /// Description of the underlying failure
        message: String,
    },
}

// Helper functions for creating common errors

impl StoreError {
    /// Create a ServiceUnavailable error
    pub fn service_unavailable(operation: &str, message: &str) -> Self {
        StoreError::ServiceUnavailable {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a PurchaseFailed error
    pub fn purchase_failed(product_id: &str, message: &str) -> Self {
        StoreError::PurchaseFailed {
            product_id: product_id.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a RestoreFailed error
    pub fn restore_failed(message: &str) -> Self {
        StoreError::RestoreFailed {
            message: message.to_string(),
        }
    }
}
