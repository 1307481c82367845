//! SDK configuration. Applications build this directly or from the
//! environment.

use crate::core::constants::{
    DEFAULT_CONFIRM_POLL_INTERVAL, DEFAULT_CONFIRM_TIMEOUT, DEFAULT_DISCONNECT_TIMEOUT,
    DEFAULT_LOG_FILTER, SOLANA_CHAIN_TYPE,
};
use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    Custom(String),
}

impl Cluster {
    pub fn rpc_url(&self) -> String {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com".to_string(),
            Cluster::Testnet => "https://api.testnet.solana.com".to_string(),
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com".to_string(),
            Cluster::Localnet => "http://localhost:8899".to_string(),
            Cluster::Custom(url) => url.clone(),
        }
    }

    /// Block explorer link for a transaction on this cluster
    pub fn explorer_tx_url(&self, signature: &Signature) -> String {
        let base = format!("https://explorer.solana.com/tx/{}", signature);
        match self {
            Cluster::MainnetBeta => base,
            Cluster::Devnet => format!("{}?cluster=devnet", base),
            Cluster::Testnet => format!("{}?cluster=testnet", base),
            Cluster::Localnet | Cluster::Custom(_) => {
                format!("{}?cluster=custom&customUrl={}", base, self.rpc_url())
            },
        }
    }

}

/// Parses a cluster name; anything that looks like a URL is `Custom`.
impl FromStr for Cluster {
    type Err = SdkError;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "mainnet" | "mainnet-beta" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            lower if lower.starts_with("http://") || lower.starts_with("https://") => {
                Ok(Cluster::Custom(value.to_string()))
            },
            _ => Err(SdkError::Config(format!("unknown cluster {:?}", value))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_config(&self) -> CommitmentConfig {
        match self {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }

}

impl FromStr for Commitment {
    type Err = SdkError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            _ => Err(SdkError::Config(format!("unknown commitment {:?}", value))),
        }
    }
}

/// Output format of [`init_logging`](crate::logging::init_logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = SdkError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(SdkError::Config(format!("unknown log format {:?}", value))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    pub cluster: Cluster,
    /// Overrides the cluster's default RPC endpoint
    pub rpc_url: Option<String>,
    pub commitment: Commitment,
    /// Chain family accepted from the delegated provider
    pub chain_type: String,
    pub confirm_poll_interval: Duration,
    /// Longest stretch without a readable block height before confirmation
    /// gives up
    pub confirm_timeout: Duration,
    /// Bound on each best-effort call made while disconnecting
    pub disconnect_timeout: Duration,
    /// Filter directives used when `RUST_LOG` is unset
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::default(),
            rpc_url: None,
            commitment: Commitment::default(),
            chain_type: SOLANA_CHAIN_TYPE.to_string(),
            confirm_poll_interval: DEFAULT_CONFIRM_POLL_INTERVAL,
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
            disconnect_timeout: DEFAULT_DISCONNECT_TIMEOUT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl SdkConfig {
    pub fn new(cluster: Cluster) -> Self {
        Self {
            cluster,
            ..Default::default()
        }
    }

    /// Defaults overlaid with `DUALWALLET_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("DUALWALLET_CLUSTER") {
            config.cluster = value.parse()?;
        }
        if let Some(value) = lookup("DUALWALLET_RPC_URL") {
            config.rpc_url = Some(value);
        }
        if let Some(value) = lookup("DUALWALLET_COMMITMENT") {
            config.commitment = value.parse()?;
        }
        if let Some(value) = lookup("DUALWALLET_CONFIRM_POLL_MS") {
            config.confirm_poll_interval = parse_millis("DUALWALLET_CONFIRM_POLL_MS", &value)?;
        }
        if let Some(value) = lookup("DUALWALLET_CONFIRM_TIMEOUT_MS") {
            config.confirm_timeout = parse_millis("DUALWALLET_CONFIRM_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("DUALWALLET_DISCONNECT_TIMEOUT_MS") {
            config.disconnect_timeout = parse_millis("DUALWALLET_DISCONNECT_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("DUALWALLET_LOG") {
            config.log_filter = value;
        }
        if let Some(value) = lookup("DUALWALLET_LOG_FORMAT") {
            config.log_format = value.parse()?;
        }

        Ok(config)
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_chain_type(mut self, chain_type: impl Into<String>) -> Self {
        self.chain_type = chain_type.into();
        self
    }

    pub fn with_confirm_poll_interval(mut self, interval: Duration) -> Self {
        self.confirm_poll_interval = interval;
        self
    }

    pub fn with_confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = timeout;
        self
    }

    pub fn with_disconnect_timeout(mut self, timeout: Duration) -> Self {
        self.disconnect_timeout = timeout;
        self
    }

    pub fn with_log_filter(mut self, directives: impl Into<String>) -> Self {
        self.log_filter = directives.into();
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Effective RPC endpoint
    pub fn endpoint(&self) -> String {
        self.rpc_url.clone().unwrap_or_else(|| self.cluster.rpc_url())
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| SdkError::Config(format!("{} must be milliseconds, got {:?}", key, value)))
}
