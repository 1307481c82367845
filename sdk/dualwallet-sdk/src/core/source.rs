//! Capability providers for the two connection sources.
//!
//! The wire protocols behind these traits (wallet adapter, auth provider)
//! live outside the SDK. Each source reports only settled connection state
//! through `wallets()`; an in-flight handshake is not a connection.

use crate::core::constants::SOLANA_CHAIN_TYPE;
use crate::core::signer::TransactionSigner;
use crate::error::{SdkError, SignerError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One entry of the external wallet registry.
#[derive(Clone)]
pub struct ExternalConnection {
    /// Adapter name, e.g. "Phantom"
    pub name: String,
    /// Base58 public key, absent while the adapter has not exposed it
    pub address: Option<String>,
    pub connected: bool,
    /// When the adapter last entered the connected state, if known
    pub connected_at: Option<DateTime<Utc>>,
    pub signer: Option<Arc<dyn TransactionSigner>>,
}

impl fmt::Debug for ExternalConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalConnection")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("connected", &self.connected)
            .field("connected_at", &self.connected_at)
            .field("has_signer", &self.signer.is_some())
            .finish()
    }
}

/// Metadata attached to a delegated wallet by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletMeta {
    pub name: Option<String>,
    pub wallet_client_type: Option<String>,
}

/// One wallet linked to the delegated (identity-provider) session.
#[derive(Clone)]
pub struct DelegatedConnection {
    pub address: String,
    pub meta: WalletMeta,
    /// Chain family reported by the provider, e.g. "solana" or "ethereum"
    pub chain_type: String,
    pub connected_at: Option<DateTime<Utc>>,
    pub signer: Option<Arc<dyn TransactionSigner>>,
}

impl fmt::Debug for DelegatedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedConnection")
            .field("address", &self.address)
            .field("meta", &self.meta)
            .field("chain_type", &self.chain_type)
            .field("connected_at", &self.connected_at)
            .field("has_signer", &self.signer.is_some())
            .finish()
    }
}

/// External wallets the delegated provider can link on our behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletClientType {
    Phantom,
    Solflare,
    Backpack,
    Glow,
}

impl WalletClientType {
    pub const ALL: [WalletClientType; 4] = [
        WalletClientType::Phantom,
        WalletClientType::Solflare,
        WalletClientType::Backpack,
        WalletClientType::Glow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletClientType::Phantom => "phantom",
            WalletClientType::Solflare => "solflare",
            WalletClientType::Backpack => "backpack",
            WalletClientType::Glow => "glow",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WalletClientType::Phantom => "Phantom",
            WalletClientType::Solflare => "Solflare",
            WalletClientType::Backpack => "Backpack",
            WalletClientType::Glow => "Glow",
        }
    }
}

impl FromStr for WalletClientType {
    type Err = SdkError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|client| client.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| SdkError::Config(format!("unknown wallet client {:?}", value)))
    }
}

/// Restricts which wallets `connect_wallet` offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletFilter {
    pub chain_type: String,
    pub wallet_list: Vec<WalletClientType>,
}

impl WalletFilter {
    /// Solana-only filter narrowed to a single wallet client
    pub fn solana_only(client: WalletClientType) -> Self {
        Self {
            chain_type: SOLANA_CHAIN_TYPE.to_string(),
            wallet_list: vec![client],
        }
    }
}

#[async_trait]
pub trait ExternalWalletSource: Send + Sync {
    fn wallets(&self) -> Vec<ExternalConnection>;

    async fn select(&self, name: &str) -> Result<(), SignerError>;

    async fn disconnect(&self) -> Result<(), SignerError>;
}

#[async_trait]
pub trait DelegatedWalletSource: Send + Sync {
    fn wallets(&self) -> Vec<DelegatedConnection>;

    async fn connect_wallet(&self, filter: WalletFilter) -> Result<(), SignerError>;

    async fn logout(&self) -> Result<(), SignerError>;
}
