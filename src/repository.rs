//! Offline-first access to the home snapshot

use crate::core::{
    ConnectivityCheck, DataOrigin, FinancialSnapshot, RemoteSource, SnapshotStore, SyncError,
};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// A snapshot together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub snapshot: FinancialSnapshot,
    pub origin: DataOrigin,
}

pub type FetchResult = Result<Fetched, SyncError>;

enum Step {
    ReadLocal { force_local_only: bool },
    Refresh { had_local: bool },
    Done,
}

/// Combines the local store, the remote source and the connectivity check.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn SnapshotStore>,
    remote: Arc<dyn RemoteSource>,
    connectivity: Arc<dyn ConnectivityCheck>,
}

impl Repository {
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        remote: Arc<dyn RemoteSource>,
        connectivity: Arc<dyn ConnectivityCheck>,
    ) -> Self {
        Self {
            store,
            remote,
            connectivity,
        }
    }

    /// Streams the cached snapshot first, then a refreshed one.
    ///
    /// Yields at most one `Local` and one `Remote` item. Nothing runs until the
    /// stream is polled and each step waits for the previous one. Errors are
    /// only yielded when there was no cached snapshot to show; with
    /// `force_local_only` the stream ends after the store read.
    pub fn fetch_snapshot(&self, force_local_only: bool) -> BoxStream<'static, FetchResult> {
        let repository = self.clone();
        stream::unfold(Step::ReadLocal { force_local_only }, move |step| {
            let repository = repository.clone();
            async move {
                match step {
                    Step::ReadLocal { force_local_only } => match repository.store.read().await {
                        Some(snapshot) => {
                            debug!("Emitting cached snapshot");
                            let next = if force_local_only {
                                Step::Done
                            } else {
                                Step::Refresh { had_local: true }
                            };
                            let local = Fetched {
                                snapshot,
                                origin: DataOrigin::Local,
                            };
                            Some((Ok(local), next))
                        }
                        None if force_local_only => {
                            debug!("No cached snapshot and refresh not requested");
                            None
                        }
                        None => repository
                            .refresh(false)
                            .await
                            .map(|item| (item, Step::Done)),
                    },
                    Step::Refresh { had_local } => repository
                        .refresh(had_local)
                        .await
                        .map(|item| (item, Step::Done)),
                    Step::Done => None,
                }
            }
        })
        .boxed()
    }

    #[instrument(name = "RepositoryRefresh", skip(self))]
    async fn refresh(&self, had_local: bool) -> Option<FetchResult> {
        let available = match self.connectivity.is_available().await {
            Ok(available) => available,
            Err(e) => {
                debug!("Connectivity check failed, assuming offline: {:#}", e);
                false
            }
        };

        if !available {
            if had_local {
                debug!("Offline, keeping cached snapshot");
                return None;
            }
            return Some(Err(SyncError::NoDataNoNetwork));
        }

        match self.remote.fetch().await {
            Ok(snapshot) => {
                if let Err(e) = self.store.write(&snapshot).await {
                    warn!("Failed to cache refreshed snapshot: {:#}", e);
                }
                Some(Ok(Fetched {
                    snapshot,
                    origin: DataOrigin::Remote,
                }))
            }
            Err(e) if had_local => {
                warn!("Refresh failed, keeping cached snapshot: {:#}", e);
                None
            }
            Err(e) => Some(Err(SyncError::remote(&e))),
        }
    }
}
