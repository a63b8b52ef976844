//! Local snapshot storage abstractions

use crate::core::model::FinancialSnapshot;
use anyhow::Result;
use async_trait::async_trait;

/// Holds at most one cached snapshot.
///
/// Implementations must make `write` atomic with respect to `read`: a reader
/// sees either the complete previous snapshot or the complete new one.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns the cached snapshot, or `None` when nothing is stored or the
    /// store cannot be read.
    async fn read(&self) -> Option<FinancialSnapshot>;

    /// Replaces the stored snapshot wholesale.
    async fn write(&self, snapshot: &FinancialSnapshot) -> Result<()>;
}
