use crate::core::range::TimeRange;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    #[default]
    Disk,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,
    /// Directory for the on-disk store. Defaults to `<data dir>/store`.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RemoteConfig {
    Mock {
        #[serde(default = "default_mock_latency_ms")]
        latency_ms: u64,
        #[serde(default)]
        fail: bool,
    },
    Http {
        base_url: String,
    },
}

fn default_mock_latency_ms() -> u64 {
    500
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig::Mock {
            latency_ms: default_mock_latency_ms(),
            fail: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConnectivityConfig {
    /// Available when a TCP connection to `address` succeeds within the timeout.
    Probe {
        address: String,
        #[serde(default = "default_probe_timeout_ms")]
        timeout_ms: u64,
    },
    Online,
    Offline,
}

fn default_probe_timeout_ms() -> u64 {
    1500
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig::Probe {
            address: "1.1.1.1:443".to_string(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

fn default_grace_period_ms() -> u64 {
    5000
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    #[serde(default)]
    pub default_range: TimeRange,
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store: StoreConfig::default(),
            remote: RemoteConfig::default(),
            connectivity: ConnectivityConfig::default(),
            default_range: TimeRange::default(),
            grace_period_ms: default_grace_period_ms(),
            data_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "expense-tracker", "expense-tracker")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "expense-tracker", "expense-tracker")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(self.default_data_path()?.join("store")),
        }
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
store:
  kind: memory
remote:
  kind: http
  base_url: "http://example.com/api"
connectivity:
  kind: probe
  address: "example.com:80"
default_range: 3M
grace_period_ms: 100
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.store.kind, StoreKind::Memory);
        assert_eq!(
            config.remote,
            RemoteConfig::Http {
                base_url: "http://example.com/api".to_string()
            }
        );
        assert_eq!(
            config.connectivity,
            ConnectivityConfig::Probe {
                address: "example.com:80".to_string(),
                timeout_ms: 1500
            }
        );
        assert_eq!(config.default_range, TimeRange::ThreeMonths);
        assert_eq!(config.grace_period(), Duration::from_millis(100));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("data_path: /tmp/expenses").unwrap();
        assert_eq!(config.store.kind, StoreKind::Disk);
        assert_eq!(
            config.remote,
            RemoteConfig::Mock {
                latency_ms: 500,
                fail: false
            }
        );
        assert_eq!(config.default_range, TimeRange::OneMonth);
        assert_eq!(config.grace_period_ms, 5000);
        assert_eq!(
            config.store_path().unwrap(),
            PathBuf::from("/tmp/expenses").join("store")
        );
    }

    #[test]
    fn test_offline_connectivity() {
        let yaml_str = r#"
connectivity:
  kind: offline
remote:
  kind: mock
  fail: true
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.connectivity, ConnectivityConfig::Offline);
        assert_eq!(
            config.remote,
            RemoteConfig::Mock {
                latency_ms: 500,
                fail: true
            }
        );
    }
}
