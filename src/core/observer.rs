//! Background transaction observer
//!
//! This module provides the `TransactionObserver`, a long-lived listener
//! that drains the purchase service's unbounded feed of transaction
//! updates for the lifetime of the owning storefront.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──spawn()──▶ Listening ──drop()──▶ Cancelled (terminal)
//! ```
//!
//! The listener never exits on its own; it only stops when the observer
//! is dropped. Events are processed strictly in delivery order on a
//! single task, so the service's chronological ordering guarantee is
//! preserved in the sink notifications. Unverified events are dropped by
//! the classifier and never terminate the loop; the service owns stream
//! reconnection, so the loop carries no retry logic.

use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::classifier::EntitlementClassifier;
use crate::core::traits::PurchaseService;

/// Handle to the background update-listening task
///
/// Created on storefront construction and tied 1:1 to its lifetime; the
/// task is aborted exactly once when the observer is dropped. One
/// observer per service stream: constructing several against the same
/// stream would finalize each transaction more than once.
pub struct TransactionObserver {
    /// The spawned listener task
    handle: JoinHandle<()>,
}

impl TransactionObserver {
    /// Spawn the listener task over the service's update stream
    ///
    /// Each incoming event is classified; any event that yields a
    /// classification has its transaction finalized with the service
    /// immediately afterwards, before the next event is taken.
    ///
    /// # Panics
    ///
    /// Panics if called from outside a tokio runtime.
    pub fn spawn<S: PurchaseService>(
        service: Arc<S>,
        classifier: Arc<EntitlementClassifier>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut updates = service.transaction_updates();
            debug!("transaction observer listening");

            while let Some(update) = updates.next().await {
                let Some(classification) = classifier.classify(&update, Utc::now()) else {
                    continue;
                };

                service.finish(&classification.transaction).await;
                debug!(
                    transaction_id = classification.transaction.id,
                    product_id = %classification.product_id,
                    is_active = classification.is_active,
                    "finalized transaction update"
                );
            }

            debug!("transaction update stream ended");
        });

        Self { handle }
    }

    /// Whether the listener task is still running
    pub fn is_listening(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for TransactionObserver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
