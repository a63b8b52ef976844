use crate::core::connectivity::ConnectivityCheck;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{debug, instrument};

/// Considers the network usable when a TCP connection to `address` opens
/// within the timeout.
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: &str, timeout: Duration) -> Self {
        TcpProbe {
            address: address.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl ConnectivityCheck for TcpProbe {
    #[instrument(name = "TcpProbe", skip(self), fields(address = %self.address))]
    async fn is_available(&self) -> Result<bool> {
        let connect = TcpStream::connect(self.address.as_str());
        match tokio::time::timeout(self.timeout, connect).await {
            Ok(stream) => {
                stream.with_context(|| format!("Failed to connect to {}", self.address))?;
                debug!("Network is reachable");
                Ok(true)
            }
            Err(_) => {
                debug!("Probe timed out after {:?}", self.timeout);
                Ok(false)
            }
        }
    }
}

/// Fixed answer, for forced offline mode and for environments without a probe target.
pub struct StaticConnectivity(pub bool);

#[async_trait]
impl ConnectivityCheck for StaticConnectivity {
    async fn is_available(&self) -> Result<bool> {
        Ok(self.0)
    }
}
