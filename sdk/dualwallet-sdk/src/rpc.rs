use crate::config::SdkConfig;
use crate::core::connection::{Confirmation, SolConnection};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::error::Error;

/// [`SolConnection`] over a JSON-RPC endpoint.
///
/// A transaction that landed with an execution error is reported as
/// [`Confirmation::Failed`] as soon as the node has it at the configured
/// commitment.
pub struct RpcConnection {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcConnection {
    pub fn new(config: &SdkConfig) -> Self {
        let commitment = config.commitment.as_config();
        Self {
            client: RpcClient::new_with_commitment(config.endpoint(), commitment),
            commitment,
        }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }
}

#[async_trait]
impl SolConnection for RpcConnection {
    async fn get_latest_blockhash_with_height(
        &self,
    ) -> Result<(Hash, u64), Box<dyn Error + Send + Sync>> {
        Ok(self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await?)
    }

    async fn send_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>> {
        Ok(self.client.send_transaction(tx).await?)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        _last_valid_block_height: u64,
    ) -> Result<Confirmation, Box<dyn Error + Send + Sync>> {
        let status = self
            .client
            .get_signature_status_with_commitment(signature, self.commitment)
            .await?;
        Ok(match status {
            None => Confirmation::Pending,
            Some(Ok(())) => Confirmation::Confirmed,
            Some(Err(e)) => Confirmation::Failed(e.to_string()),
        })
    }

    async fn get_block_height(&self) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(self
            .client
            .get_block_height_with_commitment(self.commitment)
            .await?)
    }
}
