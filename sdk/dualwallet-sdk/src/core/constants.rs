use std::time::Duration;

pub use solana_sdk::native_token::LAMPORTS_PER_SOL;

/// Number of fractional digits representable in lamports
pub const SOL_DECIMALS: usize = 9;

/// Chain identifier reported by delegated wallet providers for Solana wallets
pub const SOLANA_CHAIN_TYPE: &str = "solana";

/// Display name used when a delegated wallet carries no metadata
pub const FALLBACK_WALLET_NAME: &str = "Wallet";

// Storage keys cleared on disconnect
pub const CACHED_ADDRESS_KEY: &str = "dualwallet:address";
pub const CACHED_DISPLAY_NAME_KEY: &str = "dualwallet:display-name";
pub const WALLET_SELECTION_KEY: &str = "@solana/wallet-adapter-base:walletName";
pub const DELEGATED_TOKEN_KEY: &str = "privy:token";
pub const DELEGATED_REFRESH_TOKEN_KEY: &str = "privy:refresh_token";
pub const DELEGATED_ID_TOKEN_KEY: &str = "privy:id_token";
pub const DELEGATED_CONNECTIONS_KEY: &str = "privy:connections";

pub const DEFAULT_CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(90);
pub const DEFAULT_DISCONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_LOG_FILTER: &str = "info";
