//! Network availability abstractions

use anyhow::Result;
use async_trait::async_trait;

/// Reports whether outbound network access is usable right now.
///
/// Callers treat an `Err` the same as `Ok(false)`.
#[async_trait]
pub trait ConnectivityCheck: Send + Sync {
    async fn is_available(&self) -> Result<bool>;
}
