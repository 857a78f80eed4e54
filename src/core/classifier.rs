//! Transaction classification
//!
//! This module provides the `EntitlementClassifier`, which decides whether
//! one externally issued transaction grants entitlement and which sink
//! notification to raise. It is the single classification point shared by
//! the catalog loader, the purchase initiator, and the background
//! transaction observer.
//!
//! # Precedence
//!
//! For a verified transaction whose product is configured, exactly one of
//! the following applies, evaluated in order:
//!
//! 1. **Revoked** - a revocation date is present: inactive, `revoked`.
//! 2. **Expired** - no revocation date, but the expiration date lies
//!    strictly in the past: inactive, `expired`.
//! 3. **Upgraded / Default** - everything else, including transactions
//!    superseded by a higher tier: active, `verified`.
//!
//! Unverified transactions and transactions for unconfigured products are
//! dropped: no notification, no classification.

use std::collections::HashSet;
use std::sync::Weak;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::traits::EntitlementSink;
use crate::types::{Classification, ProductId, VerificationResult};

/// Classifies externally issued transactions against the configured
/// product set and raises sink notifications
///
/// The classifier holds the sink weakly: it never extends the sink's
/// lifetime, and a dead sink silently drops notifications while the
/// classification result is still returned. Classification never errors
/// and never finalizes a transaction; finalization is the caller's
/// responsibility.
pub struct EntitlementClassifier {
    /// Identifiers the storefront was configured with
    ///
    /// Immutable for the classifier's lifetime. Transactions for any
    /// other identifier are ignored.
    product_ids: HashSet<ProductId>,

    /// Non-owning reference to the caller's notification sink
    sink: Weak<dyn EntitlementSink>,
}

impl EntitlementClassifier {
    /// Create a classifier for the given identifier set and sink
    pub fn new(product_ids: impl IntoIterator<Item = ProductId>, sink: Weak<dyn EntitlementSink>) -> Self {
        Self {
            product_ids: product_ids.into_iter().collect(),
            sink,
        }
    }

    /// Whether the identifier belongs to the configured set
    pub fn is_configured(&self, product_id: &ProductId) -> bool {
        self.product_ids.contains(product_id)
    }

    /// Classify one transaction update
    ///
    /// Returns `None` for unverified payloads and for products outside
    /// the configured set; neither raises a notification. Otherwise
    /// returns the classification and raises exactly one notification.
    ///
    /// # Arguments
    ///
    /// * `result` - The verification-wrapped transaction from the service
    /// * `now` - Reference instant for the expiration check
    pub fn classify(
        &self,
        result: &VerificationResult,
        now: DateTime<Utc>,
    ) -> Option<Classification> {
        let transaction = match result {
            VerificationResult::Verified(transaction) => transaction,
            VerificationResult::Unverified {
                transaction_id,
                reason,
            } => {
                debug!(?transaction_id, reason, "dropping unverified transaction");
                return None;
            }
        };

        if !self.is_configured(&transaction.product_id) {
            debug!(
                product_id = %transaction.product_id,
                "ignoring transaction for unconfigured product"
            );
            return None;
        }

        let is_active = if transaction.revocation_date.is_some() {
            self.notify(|sink| sink.revoked(&transaction.product_id));
            false
        } else if matches!(transaction.expiration_date, Some(expiration) if expiration < now) {
            self.notify(|sink| sink.expired(&transaction.product_id));
            false
        } else {
            // Upgraded transactions stay active: access is still granted
            // through the superseding product.
            self.notify(|sink| sink.verified(&transaction.product_id));
            true
        };

        Some(Classification {
            product_id: transaction.product_id.clone(),
            transaction: transaction.clone(),
            is_active,
        })
    }

    /// Classify a product with no current entitlement at all
    ///
    /// Catalog-refresh policy: absence of entitlement is reported the
    /// same way as an explicit revocation. "Never purchased" and
    /// "revoked" are distinct conditions upstream, but the storefront
    /// deliberately conflates them here; tests pin this as a named
    /// scenario. Returns the activity flag (always `false`).
    pub fn classify_absent(&self, product_id: &ProductId) -> bool {
        if self.is_configured(product_id) {
            self.notify(|sink| sink.revoked(product_id));
        }
        false
    }

    /// Run a notification against the sink, if it is still alive
    fn notify(&self, raise: impl FnOnce(&dyn EntitlementSink)) {
        if let Some(sink) = self.sink.upgrade() {
            raise(sink.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Transaction, TransactionId};
    use chrono::{Duration, TimeZone};
    use rstest::rstest;
    use std::sync::{Arc, Mutex};

    /// Sink that records every notification in arrival order
    struct RecordingSink {
        calls: Mutex<Vec<(String, ProductId)>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, ProductId)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl EntitlementSink for RecordingSink {
        fn verified(&self, product_id: &ProductId) {
            self.calls
                .lock()
                .unwrap()
                .push(("verified".to_string(), product_id.clone()));
        }

        fn revoked(&self, product_id: &ProductId) {
            self.calls
                .lock()
                .unwrap()
                .push(("revoked".to_string(), product_id.clone()));
        }

        fn expired(&self, product_id: &ProductId) {
            self.calls
                .lock()
                .unwrap()
                .push(("expired".to_string(), product_id.clone()));
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn transaction(id: TransactionId, product_id: &str) -> Transaction {
        Transaction {
            id,
            product_id: product_id.to_string(),
            purchase_date: now() - Duration::days(30),
            revocation_date: None,
            expiration_date: None,
            is_upgraded: false,
        }
    }

    fn classifier_with_sink(sink: &Arc<RecordingSink>) -> EntitlementClassifier {
        let weak = Arc::downgrade(sink);
        let weak: Weak<dyn EntitlementSink> = weak;
        EntitlementClassifier::new(vec!["pro.monthly".to_string()], weak)
    }

    #[test]
    fn test_unverified_is_dropped_without_notification() {
        let sink = RecordingSink::new();
        let classifier = classifier_with_sink(&sink);

        let result = classifier.classify(
            &VerificationResult::Unverified {
                transaction_id: Some(1),
                reason: "bad signature".to_string(),
            },
            now(),
        );

        assert!(result.is_none());
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_unconfigured_product_is_ignored() {
        let sink = RecordingSink::new();
        let classifier = classifier_with_sink(&sink);

        let result = classifier.classify(
            &VerificationResult::Verified(transaction(1, "other.product")),
            now(),
        );

        assert!(result.is_none());
        assert!(sink.calls().is_empty());
    }

    #[rstest]
    #[case::revoked_plain(Some(now() - Duration::days(1)), None, false)]
    #[case::revoked_wins_over_future_expiry(
        Some(now() - Duration::days(1)),
        Some(now() + Duration::days(30)),
        false
    )]
    #[case::revoked_wins_over_past_expiry(
        Some(now() - Duration::days(1)),
        Some(now() - Duration::days(1)),
        true
    )]
    fn test_revocation_takes_precedence(
        #[case] revocation_date: Option<DateTime<Utc>>,
        #[case] expiration_date: Option<DateTime<Utc>>,
        #[case] is_upgraded: bool,
    ) {
        let sink = RecordingSink::new();
        let classifier = classifier_with_sink(&sink);

        let mut tx = transaction(1, "pro.monthly");
        tx.revocation_date = revocation_date;
        tx.expiration_date = expiration_date;
        tx.is_upgraded = is_upgraded;

        let result = classifier
            .classify(&VerificationResult::Verified(tx), now())
            .unwrap();

        assert!(!result.is_active);
        assert_eq!(sink.calls(), vec![("revoked".to_string(), "pro.monthly".to_string())]);
    }

    #[test]
    fn test_past_expiration_classifies_expired() {
        let sink = RecordingSink::new();
        let classifier = classifier_with_sink(&sink);

        let mut tx = transaction(1, "pro.monthly");
        tx.expiration_date = Some(now() - Duration::seconds(1));

        let result = classifier
            .classify(&VerificationResult::Verified(tx), now())
            .unwrap();

        assert!(!result.is_active);
        assert_eq!(sink.calls(), vec![("expired".to_string(), "pro.monthly".to_string())]);
    }

    #[test]
    fn test_expiration_exactly_now_is_still_active() {
        // Expiration must lie strictly in the past to classify as expired.
        let sink = RecordingSink::new();
        let classifier = classifier_with_sink(&sink);

        let mut tx = transaction(1, "pro.monthly");
        tx.expiration_date = Some(now());

        let result = classifier
            .classify(&VerificationResult::Verified(tx), now())
            .unwrap();

        assert!(result.is_active);
        assert_eq!(sink.calls(), vec![("verified".to_string(), "pro.monthly".to_string())]);
    }

    #[rstest]
    #[case::plain(false, None)]
    #[case::upgraded(true, None)]
    #[case::future_expiry(false, Some(30))]
    #[case::upgraded_with_future_expiry(true, Some(30))]
    fn test_active_transactions_classify_verified(
        #[case] is_upgraded: bool,
        #[case] expires_in_days: Option<i64>,
    ) {
        let sink = RecordingSink::new();
        let classifier = classifier_with_sink(&sink);

        let mut tx = transaction(1, "pro.monthly");
        tx.is_upgraded = is_upgraded;
        tx.expiration_date = expires_in_days.map(|days| now() + Duration::days(days));

        let result = classifier
            .classify(&VerificationResult::Verified(tx), now())
            .unwrap();

        assert!(result.is_active);
        assert_eq!(sink.calls(), vec![("verified".to_string(), "pro.monthly".to_string())]);
    }

    #[test]
    fn test_absent_entitlement_is_reported_as_revoked() {
        // Named scenario: a product with no entitlement at all is reported
        // identically to an explicitly revoked one during catalog refresh.
        let sink = RecordingSink::new();
        let classifier = classifier_with_sink(&sink);

        let is_active = classifier.classify_absent(&"pro.monthly".to_string());

        assert!(!is_active);
        assert_eq!(sink.calls(), vec![("revoked".to_string(), "pro.monthly".to_string())]);
    }

    #[test]
    fn test_absent_entitlement_for_unconfigured_product_is_silent() {
        let sink = RecordingSink::new();
        let classifier = classifier_with_sink(&sink);

        let is_active = classifier.classify_absent(&"other.product".to_string());

        assert!(!is_active);
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_dead_sink_is_a_noop_but_still_classifies() {
        let sink = RecordingSink::new();
        let classifier = classifier_with_sink(&sink);
        drop(sink);

        let result = classifier.classify(
            &VerificationResult::Verified(transaction(1, "pro.monthly")),
            now(),
        );

        assert!(result.unwrap().is_active);
    }

    #[test]
    fn test_exactly_one_notification_per_classified_event() {
        let sink = RecordingSink::new();
        let classifier = classifier_with_sink(&sink);

        let mut tx = transaction(1, "pro.monthly");
        tx.revocation_date = Some(now() - Duration::days(1));
        tx.expiration_date = Some(now() - Duration::days(2));
        tx.is_upgraded = true;

        classifier.classify(&VerificationResult::Verified(tx), now());

        assert_eq!(sink.calls().len(), 1);
    }
}
