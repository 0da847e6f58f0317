//! `fairplay.toml` loading.
//!
//! ```toml
//! [server]
//! port = 8080
//! data_dir = "./data"
//! remainder = "truncate"   # or "reject"
//!
//! [balance]
//! scheme = "intensity"
//!
//! [balance.search]
//! attempt_budget = 100000
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use fairplay_api::RemainderPolicy;
use fairplay_core::BalanceConfig;
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "fairplay.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub remainder: RemainderPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            data_dir: PathBuf::from("./data"),
            remainder: RemainderPolicy::Truncate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub server: ServerConfig,
    pub balance: BalanceConfig,
}

impl DaemonConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: DaemonConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Load an explicit config file, or `fairplay.toml` from the working
    /// directory when present, or defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, port: Option<u16>, data_dir: Option<PathBuf>) -> Self {
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(data_dir) = data_dir {
            self.server.data_dir = data_dir;
        }
        self
    }

    pub fn roster_path(&self) -> PathBuf {
        self.server.data_dir.join("roster.redb")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairplay_core::Scheme;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[server]
port = 9000
data_dir = "/var/lib/fairplay"
remainder = "reject"

[balance]
scheme = "position"

[balance.tiers]
good = 4

[balance.search]
attempt_budget = 500
position_quota = 3

[balance.diversity]
run_budget = 10
"#;
        let config: DaemonConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.data_dir, PathBuf::from("/var/lib/fairplay"));
        assert_eq!(config.server.remainder, RemainderPolicy::Reject);
        assert_eq!(config.balance.scheme, Scheme::Position);
        assert_eq!(config.balance.tiers.good, 4);
        assert_eq!(config.balance.tiers.elite, 6);
        assert_eq!(config.balance.search.attempt_budget, 500);
        assert_eq!(config.balance.search.position_quota, 3);
        assert_eq!(config.balance.diversity.run_budget, 10);
        assert_eq!(config.balance.diversity.target_distinct, 6);
    }

    #[test]
    fn empty_config_is_default() {
        let config: DaemonConfig = toml::from_str("").unwrap();
        assert_eq!(config, DaemonConfig::default());
        assert_eq!(config.server.remainder, RemainderPolicy::Truncate);
    }

    #[test]
    fn overrides_win_over_file() {
        let config = DaemonConfig::default()
            .with_overrides(Some(7000), Some(PathBuf::from("/tmp/fp")));
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.roster_path(), PathBuf::from("/tmp/fp/roster.redb"));

        let config = DaemonConfig::default().with_overrides(None, None);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fairplay.toml");
        std::fs::write(&path, "[server]\nport = 1234\n").unwrap();

        let config = DaemonConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 1234);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DaemonConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn invalid_remainder_is_rejected() {
        let err = toml::from_str::<DaemonConfig>("[server]\nremainder = \"spread\"\n");
        assert!(err.is_err());
    }
}
