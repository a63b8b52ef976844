/// Failures delivered as values through the repository stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("No network connection and no local data available")]
    NoDataNoNetwork,

    #[error("{0}")]
    RemoteFetchFailed(String),
}

impl SyncError {
    pub fn remote(err: &anyhow::Error) -> Self {
        SyncError::RemoteFetchFailed(format!("{err:#}"))
    }
}
