//! Storefront facade
//!
//! This module provides the `Storefront`, the UI-facing entry point that
//! ties the catalog loader, the purchase initiator, and the background
//! transaction observer together over one purchase service.
//!
//! # Architecture
//!
//! ```text
//! Storefront
//!     ├── Arc<S: PurchaseService>       (platform adapter)
//!     ├── Arc<EntitlementClassifier>    (shared classification point)
//!     ├── watch::Sender<StoreState>     (published catalog + loading flag)
//!     └── TransactionObserver           (background listener, abort-on-drop)
//! ```
//!
//! # Published state
//!
//! The catalog list and loading flag are the only shared mutable state
//! and are written exclusively by the facade's operations. Callers
//! observe them through [`Storefront::subscribe`]; the catalog is always
//! replaced in a single modification, so readers never see a partial mix
//! of old and new entries.

use std::sync::{Arc, Weak};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::core::classifier::EntitlementClassifier;
use crate::core::observer::TransactionObserver;
use crate::core::traits::{EntitlementSink, PurchaseService};
use crate::types::{
    CatalogEntry, Product, ProductId, PurchaseOutcome, StoreError, StoreState, Transaction,
};

/// Raises the loading flag for the duration of one facade operation
///
/// The flag is reset when the guard drops, so every exit path of an
/// operation, including error propagation, leaves the store idle.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<StoreState>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a watch::Sender<StoreState>) -> Self {
        state.send_modify(|state| state.loading = true);
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|state| state.loading = false);
    }
}

/// Client-side facade over a platform in-app-purchase service
///
/// Construction takes the set of product identifiers of interest (fixed
/// for the facade's lifetime) and a weak reference to the caller's
/// notification sink, and starts the background transaction observer.
/// Dropping the facade cancels the observer; any load or purchase still
/// in flight completes or fails on its own, with its state mutation
/// discarded along with the channel.
///
/// All operations are expected to be invoked from one logical caller
/// context; they interleave with the observer's notifications but the
/// published state is only ever written by the operations themselves.
pub struct Storefront<S: PurchaseService> {
    /// The platform purchase service adapter
    service: Arc<S>,

    /// Classification point shared with the background observer
    classifier: Arc<EntitlementClassifier>,

    /// Configured identifiers, in the order supplied at construction
    product_ids: Vec<ProductId>,

    /// Published catalog and loading flag
    state: watch::Sender<StoreState>,

    /// Background listener; aborted when the facade drops
    _observer: TransactionObserver,
}

impl<S: PurchaseService> Storefront<S> {
    /// Create a storefront for the given identifiers and start listening
    /// for transaction updates
    ///
    /// An empty identifier set is allowed; loads then publish an empty
    /// catalog.
    ///
    /// # Panics
    ///
    /// Spawning the background observer requires a tokio runtime, so the
    /// storefront must be constructed from within one.
    pub fn new(
        service: Arc<S>,
        product_ids: Vec<ProductId>,
        sink: Weak<dyn EntitlementSink>,
    ) -> Self {
        let classifier = Arc::new(EntitlementClassifier::new(product_ids.iter().cloned(), sink));
        let observer = TransactionObserver::spawn(Arc::clone(&service), Arc::clone(&classifier));
        let (state, _) = watch::channel(StoreState::default());

        Self {
            service,
            classifier,
            product_ids,
            state,
            _observer: observer,
        }
    }

    /// Subscribe to published-state changes
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// Snapshot of the current published state
    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Refresh the published catalog
    ///
    /// Transport failures are swallowed: the error is logged, the
    /// previous catalog stays published unchanged, and the loading flag
    /// returns to false. On success the entire list is replaced with the
    /// newly resolved entries.
    pub async fn load_catalog(&self) {
        let _loading = LoadingGuard::begin(&self.state);
        self.refresh_catalog().await;
    }

    /// Drive a single purchase attempt to completion
    ///
    /// On a successful, verified purchase the catalog is reloaded once
    /// and the transaction is finalized with the service, in that order;
    /// the finalized transaction is returned. Cancelled, pending, and
    /// unverified outcomes return `Ok(None)` with no further action.
    /// Transport errors propagate to the caller without retry.
    // PurchaseOutcome is non-exhaustive for downstream crates; the local
    // wildcard arm mirrors how future service outcomes are handled.
    #[allow(unreachable_patterns)]
    pub async fn purchase(&self, product: &Product) -> Result<Option<Transaction>, StoreError> {
        let _loading = LoadingGuard::begin(&self.state);

        let outcome = self.service.purchase(product).await?;

        match outcome {
            PurchaseOutcome::Success(result) => {
                let Some(classification) = self.classifier.classify(&result, Utc::now()) else {
                    // Unverified payload: no reload, no finalization.
                    return Ok(None);
                };

                self.refresh_catalog().await;
                self.service.finish(&classification.transaction).await;
                Ok(Some(classification.transaction))
            }
            PurchaseOutcome::UserCancelled => {
                debug!(product_id = %product.id, "purchase cancelled by user");
                Ok(None)
            }
            PurchaseOutcome::Pending => {
                debug!(product_id = %product.id, "purchase pending external approval");
                Ok(None)
            }
            other => {
                warn!(?other, "unrecognized purchase outcome");
                Ok(None)
            }
        }
    }

    /// Synchronize entitlements with the external service
    ///
    /// Transport errors propagate to the caller; the loading flag is
    /// reset on every exit path.
    pub async fn restore(&self) -> Result<(), StoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        self.service.sync().await
    }

    /// Fetch and resolve the catalog, replacing the published list on
    /// success
    ///
    /// Runs inside whichever loading guard the caller holds, so a reload
    /// triggered mid-purchase keeps the flag raised throughout.
    async fn refresh_catalog(&self) {
        let products = match self.service.fetch_products(&self.product_ids).await {
            Ok(products) => products,
            Err(error) => {
                warn!(%error, "catalog load failed; keeping previous catalog");
                return;
            }
        };

        let mut catalog = Vec::with_capacity(products.len());
        for product in products {
            let is_active = match self.service.current_entitlement(&product.id).await {
                Some(result) => self
                    .classifier
                    .classify(&result, Utc::now())
                    .map(|classification| classification.is_active)
                    .unwrap_or(false),
                // Absence of entitlement is reported as a revocation.
                None => self.classifier.classify_absent(&product.id),
            };
            catalog.push(CatalogEntry { product, is_active });
        }

        // Single modification: readers never observe a partial catalog.
        self.state.send_modify(|state| state.catalog = catalog);
    }
}
