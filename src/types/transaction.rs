//! Transaction-related types for the IAP storefront facade
//!
//! This module defines the externally issued transaction records, the
//! verification wrapper the purchase service delivers them in, purchase
//! outcomes, and the ephemeral classification result derived from them.
//! The facade never constructs transactions itself; it only classifies
//! and reacts to records issued by the external service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Transaction identifier
///
/// Assigned by the external purchase service.
pub type TransactionId = u64;

/// An externally issued entitlement transaction
///
/// Carries everything the classifier needs: which product the transaction
/// grants, whether the grant was revoked or has expired, and whether a
/// higher-tier entitlement has superseded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: TransactionId,

    /// The product this transaction grants entitlement to
    pub product_id: ProductId,

    /// When the purchase was made
    pub purchase_date: DateTime<Utc>,

    /// Set when the service has refunded or revoked the purchase
    ///
    /// A present revocation date always classifies the entitlement as
    /// inactive, regardless of any other field.
    pub revocation_date: Option<DateTime<Utc>>,

    /// Set for subscriptions; the entitlement lapses once this passes
    pub expiration_date: Option<DateTime<Utc>>,

    /// True when a higher-tier entitlement supersedes this transaction
    ///
    /// Access remains granted through the superseding product, so an
    /// upgraded transaction still classifies as active.
    pub is_upgraded: bool,
}

/// Verification status of a transaction as reported by the service
///
/// The cryptographic authenticity check is performed entirely by the
/// external platform; this type only records its outcome. Unverified
/// records are silently dropped by the classifier and never produce a
/// notification or an active entitlement.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationResult {
    /// The payload passed the service's authenticity check
    Verified(Transaction),

    /// The payload failed verification
    Unverified {
        /// Transaction identifier, when the service could still parse one
        transaction_id: Option<TransactionId>,
        /// Service-provided failure description, for logging only
        reason: String,
    },
}

impl VerificationResult {
    /// The verified transaction, if the payload passed verification
    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            VerificationResult::Verified(transaction) => Some(transaction),
            VerificationResult::Unverified { .. } => None,
        }
    }
}

/// Outcome of a single purchase attempt
///
/// The external service may grow additional cases over time, so this enum
/// is non-exhaustive; the facade treats unknown variants as a no-op.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PurchaseOutcome {
    /// The purchase completed; the payload still needs classification
    Success(VerificationResult),

    /// The user backed out of the purchase flow
    UserCancelled,

    /// The purchase awaits external approval (e.g. ask-to-buy)
    Pending,
}

/// Result of classifying one verified, in-scope transaction
///
/// Ephemeral and never persisted. Carries the transaction so the caller
/// can finalize it with the service after acting on the classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// The product the classified transaction refers to
    pub product_id: ProductId,

    /// The classified transaction, ready for finalization
    pub transaction: Transaction,

    /// Whether the transaction grants a currently active entitlement
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn verified_transaction(id: TransactionId) -> Transaction {
        Transaction {
            id,
            product_id: "pro.monthly".to_string(),
            purchase_date: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
            revocation_date: None,
            expiration_date: None,
            is_upgraded: false,
        }
    }

    #[test]
    fn test_transaction_accessor_on_verified() {
        let result = VerificationResult::Verified(verified_transaction(7));
        assert_eq!(result.transaction().map(|t| t.id), Some(7));
    }

    #[test]
    fn test_transaction_accessor_on_unverified() {
        let result = VerificationResult::Unverified {
            transaction_id: Some(7),
            reason: "invalid signature".to_string(),
        };
        assert!(result.transaction().is_none());
    }
}
