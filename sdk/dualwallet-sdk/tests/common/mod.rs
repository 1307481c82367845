#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use dualwallet_sdk::core::connection::{Confirmation, SolConnection};
use dualwallet_sdk::{
    DelegatedConnection, DelegatedWalletSource, ExternalConnection, ExternalWalletSource,
    KeyValueStore, MemoryStore, SdkConfig, SignerError, StorageError, TransactionSigner,
    WalletFilter, WalletMeta,
};
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use std::collections::VecDeque;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub fn test_config() -> SdkConfig {
    SdkConfig::default()
        .with_confirm_poll_interval(Duration::from_millis(1))
        .with_confirm_timeout(Duration::from_millis(200))
        .with_disconnect_timeout(Duration::from_millis(50))
}

pub fn at_minute(minute: i64) -> Option<DateTime<Utc>> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single()?;
    Some(base + ChronoDuration::minutes(minute))
}

//=============================================================================
// Network boundary
//=============================================================================

/// Scripted network boundary that counts every call.
///
/// Block heights and confirmation answers are consumed from their queues;
/// once a queue is empty the fallback value is returned.
pub struct MockConnection {
    pub last_valid_block_height: u64,
    pub fail_window: bool,
    pub fail_send: bool,
    /// Execution error reported for every broadcast transaction
    pub chain_error: Option<String>,
    pub window_gate: Option<Arc<Notify>>,

    heights: Mutex<VecDeque<Result<u64, String>>>,
    fallback_height: u64,
    confirmations: Mutex<VecDeque<Result<bool, String>>>,
    fallback_confirmation: bool,

    pub window_fetches: AtomicUsize,
    pub sends: AtomicUsize,
    pub confirm_calls: AtomicUsize,
    pub height_calls: AtomicUsize,
    pub issued_blockhashes: Mutex<Vec<Hash>>,
    pub sent: Mutex<Vec<Transaction>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            last_valid_block_height: 300,
            fail_window: false,
            fail_send: false,
            chain_error: None,
            window_gate: None,
            heights: Mutex::new(VecDeque::new()),
            fallback_height: 150,
            confirmations: Mutex::new(VecDeque::new()),
            fallback_confirmation: true,
            window_fetches: AtomicUsize::new(0),
            sends: AtomicUsize::new(0),
            confirm_calls: AtomicUsize::new(0),
            height_calls: AtomicUsize::new(0),
            issued_blockhashes: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_last_valid_block_height(mut self, height: u64) -> Self {
        self.last_valid_block_height = height;
        self
    }

    pub fn with_heights(self, heights: Vec<Result<u64, String>>, fallback: u64) -> Self {
        *self.heights.lock().unwrap() = heights.into();
        Self {
            fallback_height: fallback,
            ..self
        }
    }

    pub fn with_confirmations(self, answers: Vec<Result<bool, String>>, fallback: bool) -> Self {
        *self.confirmations.lock().unwrap() = answers.into();
        Self {
            fallback_confirmation: fallback,
            ..self
        }
    }

    pub fn failing_window(mut self) -> Self {
        self.fail_window = true;
        self
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn failing_on_chain(mut self, reason: &str) -> Self {
        self.chain_error = Some(reason.to_string());
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.window_gate = Some(gate);
        self
    }

    pub fn network_calls(&self) -> usize {
        self.window_fetches.load(Ordering::SeqCst)
            + self.sends.load(Ordering::SeqCst)
            + self.confirm_calls.load(Ordering::SeqCst)
            + self.height_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SolConnection for MockConnection {
    async fn get_latest_blockhash_with_height(
        &self,
    ) -> Result<(Hash, u64), Box<dyn Error + Send + Sync>> {
        self.window_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.window_gate {
            gate.notified().await;
        }
        if self.fail_window {
            return Err("rpc unavailable".into());
        }
        let blockhash = Hash::new_unique();
        self.issued_blockhashes.lock().unwrap().push(blockhash);
        Ok((blockhash, self.last_valid_block_height))
    }

    async fn send_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        if self.fail_send {
            return Err("connection reset".into());
        }
        let signature = *tx.signatures.first().ok_or("No signature")?;
        self.sent.lock().unwrap().push(tx.clone());
        Ok(signature)
    }

    async fn confirm_transaction(
        &self,
        _signature: &Signature,
        _last_valid_block_height: u64,
    ) -> Result<Confirmation, Box<dyn Error + Send + Sync>> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        let answer = match self.confirmations.lock().unwrap().pop_front() {
            Some(answer) => answer?,
            None => self.fallback_confirmation,
        };
        Ok(match (&self.chain_error, answer) {
            (Some(reason), true) => Confirmation::Failed(reason.clone()),
            (None, true) => Confirmation::Confirmed,
            (_, false) => Confirmation::Pending,
        })
    }

    async fn get_block_height(&self) -> Result<u64, Box<dyn Error + Send + Sync>> {
        self.height_calls.fetch_add(1, Ordering::SeqCst);
        match self.heights.lock().unwrap().pop_front() {
            Some(height) => height.map_err(Into::into),
            None => Ok(self.fallback_height),
        }
    }
}

//=============================================================================
// Signers
//=============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignBehavior {
    Sign,
    Reject,
    Revoked,
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectBehavior {
    Succeed,
    Fail,
    Hang,
}

pub struct MockSigner {
    keypair: Keypair,
    sign_behavior: SignBehavior,
    disconnect_behavior: DisconnectBehavior,
    pub sign_calls: AtomicUsize,
    pub disconnect_calls: AtomicUsize,
}

impl MockSigner {
    pub fn new() -> Self {
        Self::with_behavior(SignBehavior::Sign, DisconnectBehavior::Succeed)
    }

    pub fn with_behavior(sign: SignBehavior, disconnect: DisconnectBehavior) -> Self {
        Self {
            keypair: Keypair::new(),
            sign_behavior: sign,
            disconnect_behavior: disconnect,
            sign_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl TransactionSigner for MockSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, SignerError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        match self.sign_behavior {
            SignBehavior::Sign => {
                let blockhash = tx.message.recent_blockhash;
                tx.try_sign(&[&self.keypair], blockhash)
                    .map_err(|e| SignerError::Transport(e.to_string()))?;
                Ok(tx)
            },
            SignBehavior::Reject => Err(SignerError::Rejected("user declined".to_string())),
            SignBehavior::Revoked => Err(SignerError::Revoked),
            SignBehavior::Transport => Err(SignerError::Transport("extension unreachable".into())),
        }
    }

    async fn disconnect(&self) -> Result<(), SignerError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        match self.disconnect_behavior {
            DisconnectBehavior::Succeed => Ok(()),
            DisconnectBehavior::Fail => Err(SignerError::Transport("wallet went away".into())),
            DisconnectBehavior::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            },
        }
    }
}

//=============================================================================
// Snapshots & sources
//=============================================================================

pub fn external(
    name: &str,
    signer: &Arc<MockSigner>,
    connected_at: Option<DateTime<Utc>>,
) -> ExternalConnection {
    ExternalConnection {
        name: name.to_string(),
        address: Some(signer.pubkey().to_string()),
        connected: true,
        connected_at,
        signer: Some(signer.clone() as Arc<dyn TransactionSigner>),
    }
}

pub fn delegated(signer: &Arc<MockSigner>, connected_at: Option<DateTime<Utc>>) -> DelegatedConnection {
    DelegatedConnection {
        address: signer.pubkey().to_string(),
        meta: WalletMeta {
            name: Some("Privy".to_string()),
            wallet_client_type: Some("privy".to_string()),
        },
        chain_type: "solana".to_string(),
        connected_at,
        signer: Some(signer.clone() as Arc<dyn TransactionSigner>),
    }
}

#[derive(Default)]
pub struct MockExternalSource {
    pub wallets: Mutex<Vec<ExternalConnection>>,
    pub selected: Mutex<Vec<String>>,
    pub disconnects: AtomicUsize,
}

#[async_trait]
impl ExternalWalletSource for MockExternalSource {
    fn wallets(&self) -> Vec<ExternalConnection> {
        self.wallets.lock().unwrap().clone()
    }

    async fn select(&self, name: &str) -> Result<(), SignerError> {
        self.selected.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), SignerError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.wallets.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
pub struct MockDelegatedSource {
    pub wallets: Mutex<Vec<DelegatedConnection>>,
    pub filters: Mutex<Vec<WalletFilter>>,
    pub logouts: AtomicUsize,
    pub fail_logout: bool,
}

#[async_trait]
impl DelegatedWalletSource for MockDelegatedSource {
    fn wallets(&self) -> Vec<DelegatedConnection> {
        self.wallets.lock().unwrap().clone()
    }

    async fn connect_wallet(&self, filter: WalletFilter) -> Result<(), SignerError> {
        self.filters.lock().unwrap().push(filter);
        Ok(())
    }

    async fn logout(&self) -> Result<(), SignerError> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        if self.fail_logout {
            return Err(SignerError::Transport("auth provider offline".into()));
        }
        self.wallets.lock().unwrap().clear();
        Ok(())
    }
}

//=============================================================================
// Storage
//=============================================================================

/// Memory store that counts `clear` calls.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub clears: AtomicUsize,
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}
