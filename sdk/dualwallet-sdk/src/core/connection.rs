use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::error::Error;

/// Status of a broadcast transaction at the configured commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// Not seen yet, or not at the commitment level yet
    Pending,
    Confirmed,
    /// Landed but its execution failed; polling further cannot change that
    Failed(String),
}

/// Network boundary used by the transfer pipeline.
#[async_trait]
pub trait SolConnection: Send + Sync {
    /// Fetch a fresh blockhash together with the last block height at which
    /// a transaction carrying it is still accepted.
    async fn get_latest_blockhash_with_height(
        &self,
    ) -> Result<(Hash, u64), Box<dyn Error + Send + Sync>>;

    async fn send_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>>;

    /// Current status of `signature`. `last_valid_block_height` is the
    /// deadline of the window the transaction was bound to. An `Err` is a
    /// failed lookup and is retried.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        last_valid_block_height: u64,
    ) -> Result<Confirmation, Box<dyn Error + Send + Sync>>;

    async fn get_block_height(&self) -> Result<u64, Box<dyn Error + Send + Sync>>;
}
