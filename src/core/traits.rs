//! Core traits for the purchase service seam and the notification sink
//!
//! This module defines the trait abstractions that separate the facade's
//! classification and orchestration logic from the platform purchase
//! service it wraps. Production code implements [`PurchaseService`] over
//! the real platform API; tests implement it with in-memory mocks.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::types::{Product, ProductId, PurchaseOutcome, StoreError, Transaction, VerificationResult};

/// Interface to the external platform purchase service
///
/// Every method that performs a network/service round trip suspends. The
/// service owns verification, transaction encoding, and reconnection of
/// the update stream; the facade treats all of that as opaque.
#[async_trait]
pub trait PurchaseService: Send + Sync + 'static {
    /// Fetch product descriptors for the given identifiers
    async fn fetch_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError>;

    /// Fetch the caller's current entitlement for a product, if any
    ///
    /// Returns `None` when the service holds no entitlement at all for
    /// the product (never purchased, or fully expired from its records).
    async fn current_entitlement(&self, id: &ProductId) -> Option<VerificationResult>;

    /// Start the purchase flow for one product
    async fn purchase(&self, product: &Product) -> Result<PurchaseOutcome, StoreError>;

    /// Finalize a transaction so the service stops redelivering it
    async fn finish(&self, transaction: &Transaction);

    /// Synchronize entitlements with the service (restore purchases)
    async fn sync(&self) -> Result<(), StoreError>;

    /// The service's unbounded feed of transaction updates
    ///
    /// Events are delivered in ascending chronological order for any
    /// backlog replayed at stream start. The stream is single-reader:
    /// one observer per service instance, otherwise transactions get
    /// finalized twice.
    fn transaction_updates(&self) -> BoxStream<'static, VerificationResult>;
}

/// Notification sink informed of entitlement changes
///
/// Implemented by the caller and referenced weakly by the classifier, so
/// the facade never extends the sink's lifetime; once the caller drops
/// its sink, notifications become no-ops. Each classified event produces
/// at most one call.
pub trait EntitlementSink: Send + Sync {
    /// A verified, currently active entitlement was observed
    fn verified(&self, product_id: &ProductId);

    /// An entitlement was revoked (or absent during a catalog refresh)
    fn revoked(&self, product_id: &ProductId);

    /// An entitlement's expiration date has passed
    fn expired(&self, product_id: &ProductId);
}
