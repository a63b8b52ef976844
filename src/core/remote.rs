//! Remote snapshot abstractions

use crate::core::model::FinancialSnapshot;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch(&self) -> Result<FinancialSnapshot>;
}
