pub mod connectivity;
pub mod http_remote;
pub mod mock_remote;
pub mod util;

use crate::core::config::{AppConfig, ConnectivityConfig, RemoteConfig};
use crate::core::{ConnectivityCheck, RemoteSource};
use anyhow::Result;
use connectivity::{StaticConnectivity, TcpProbe};
use http_remote::HttpRemoteSource;
use mock_remote::MockRemoteSource;
use std::sync::Arc;
use std::time::Duration;

/// Builds the remote source selected in the configuration.
pub fn remote_source(config: &AppConfig) -> Result<Arc<dyn RemoteSource>> {
    Ok(match &config.remote {
        RemoteConfig::Mock { latency_ms, fail } => {
            let latency = Duration::from_millis(*latency_ms);
            if *fail {
                Arc::new(MockRemoteSource::failing(latency))
            } else {
                Arc::new(MockRemoteSource::new(latency))
            }
        }
        RemoteConfig::Http { base_url } => Arc::new(HttpRemoteSource::new(base_url)?),
    })
}

/// Builds the connectivity check selected in the configuration.
pub fn connectivity_check(config: &AppConfig) -> Arc<dyn ConnectivityCheck> {
    match &config.connectivity {
        ConnectivityConfig::Probe {
            address,
            timeout_ms,
        } => Arc::new(TcpProbe::new(address, Duration::from_millis(*timeout_ms))),
        ConnectivityConfig::Online => Arc::new(StaticConnectivity(true)),
        ConnectivityConfig::Offline => Arc::new(StaticConnectivity(false)),
    }
}
