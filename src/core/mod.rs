//! Core module
//!
//! Contains the classification logic, the background transaction
//! observer, the storefront facade, and the traits that connect them to
//! the platform purchase service and the caller's notification sink.

pub mod classifier;
pub mod observer;
pub mod store;
pub mod traits;

pub use classifier::EntitlementClassifier;
pub use observer::TransactionObserver;
pub use store::Storefront;
pub use traits::{EntitlementSink, PurchaseService};
