use crate::error::SignerError;
use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::signer::SignerError as KeypairSignError;
use solana_sdk::transaction::Transaction;

/// Signing capability handed out by a wallet source.
///
/// The capability is owned by the source that produced it. Sessions keep an
/// `Arc` to it for as long as they are active and never persist it.
/// Implementations include:
/// 1. Local keypairs (backend/CLI)
/// 2. Browser-extension wallets behind a wallet adapter
/// 3. Delegated (MPC) wallets provisioned by an identity provider
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    /// Sign a transaction whose message already carries the recent blockhash
    /// and fee payer. Returns the signed transaction.
    async fn sign_transaction(&self, tx: Transaction) -> Result<Transaction, SignerError>;

    /// Release the capability. Not every signer supports this.
    async fn disconnect(&self) -> Result<(), SignerError> {
        Err(SignerError::Unsupported)
    }
}

/// Signer backed by an in-process keypair.
pub struct KeypairSigner {
    keypair: Keypair,
}

impl KeypairSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl TransactionSigner for KeypairSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, SignerError> {
        let blockhash: Hash = tx.message.recent_blockhash;
        tx.try_sign(&[&self.keypair], blockhash)
            .map_err(|e| match e {
                KeypairSignError::KeypairPubkeyMismatch | KeypairSignError::NotEnoughSigners => {
                    SignerError::KeyMismatch(e.to_string())
                },
                _ => SignerError::Transport(e.to_string()),
            })?;
        Ok(tx)
    }

    async fn disconnect(&self) -> Result<(), SignerError> {
        Ok(())
    }
}
