use crate::core::model::FinancialSnapshot;
use crate::core::store::SnapshotStore;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory snapshot store. Contents are lost when the process exits.
pub struct MemoryStore {
    inner: RwLock<Option<FinancialSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Creates a store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: FinancialSnapshot) -> Self {
        Self {
            inner: RwLock::new(Some(snapshot)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn read(&self) -> Option<FinancialSnapshot> {
        let snapshot = self.inner.read().await.clone();
        if snapshot.is_some() {
            debug!("Store HIT");
        } else {
            debug!("Store MISS");
        }
        snapshot
    }

    async fn write(&self, snapshot: &FinancialSnapshot) -> Result<()> {
        let mut inner = self.inner.write().await;
        debug!("Store PUT");
        *inner = Some(snapshot.clone());
        Ok(())
    }
}
