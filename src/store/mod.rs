pub mod disk;
pub mod memory;
pub mod seed;

use crate::core::config::{AppConfig, StoreKind};
use crate::core::store::SnapshotStore;
use anyhow::Result;
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::debug;

/// Opens the snapshot store selected in the configuration.
pub fn open_store(config: &AppConfig) -> Result<Arc<dyn SnapshotStore>> {
    match config.store.kind {
        StoreKind::Memory => {
            debug!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Disk => {
            let path = config.store_path()?;
            debug!("Using disk store at {}", path.display());
            Ok(Arc::new(DiskStore::open(&path)?))
        }
    }
}
