//! Types module
//!
//! Contains core data structures used throughout the facade.

pub mod error;
pub mod product;
pub mod transaction;

pub use error::StoreError;
pub use product::{CatalogEntry, Product, ProductId, StoreState};
pub use transaction::{
    Classification, PurchaseOutcome, Transaction, TransactionId, VerificationResult,
};
