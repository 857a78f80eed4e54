//! IAP Storefront Facade Library
//! # Overview
//!
//! This library provides a thin client-side facade over a platform
//! in-app-purchase service: it loads purchasable product definitions,
//! initiates purchases, observes asynchronous transaction updates pushed
//! by the platform, and classifies each transaction as verified/active,
//! revoked, or expired, notifying an observer sink.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Product, Transaction, StoreState, etc.)
//! - [`core`] - Business logic components:
//!   - [`core::classifier`] - Transaction classification and sink notification
//!   - [`core::observer`] - Background listener over the service's update feed
//!   - [`core::store`] - The storefront facade (catalog loads, purchases, restore)
//!   - [`core::traits`] - Seams for the platform service and the notification sink
//!
//! # Classification
//!
//! Each verified transaction for a configured product resolves to exactly
//! one outcome, in fixed precedence order:
//!
//! - **Revoked**: a revocation date is present (inactive)
//! - **Expired**: the expiration date lies strictly in the past (inactive)
//! - **Verified**: everything else, including upgraded transactions (active)
//!
//! Unverified transactions and transactions for unconfigured products are
//! silently dropped.
//!
//! # Ownership boundaries
//!
//! Cryptographic verification, product catalog storage, and billing are
//! owned entirely by the external platform service; this crate only
//! classifies and reacts to the records that service issues.

// Module declarations
pub mod core;
pub mod types;

pub use core::{EntitlementClassifier, EntitlementSink, PurchaseService, Storefront, TransactionObserver};
pub use types::{
    CatalogEntry, Classification, Product, ProductId, PurchaseOutcome, StoreError, StoreState,
    Transaction, TransactionId, VerificationResult,
};
