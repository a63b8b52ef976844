//! Core domain types and abstractions

pub mod config;
pub mod connectivity;
pub mod error;
pub mod log;
pub mod model;
pub mod range;
pub mod remote;
pub mod store;

// Re-export main types for cleaner imports
pub use connectivity::ConnectivityCheck;
pub use error::SyncError;
pub use model::{DataOrigin, Expense, FinancialSnapshot, Recipient, Transaction};
pub use range::TimeRange;
pub use remote::RemoteSource;
pub use store::SnapshotStore;
