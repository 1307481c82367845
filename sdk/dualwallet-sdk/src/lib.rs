pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod rpc;
pub mod session;
pub mod transfer;

pub use crate::config::{Cluster, Commitment, LogFormat, SdkConfig};
pub use crate::core::connection::{Confirmation, SolConnection};
pub use crate::core::signer::{KeypairSigner, TransactionSigner};
pub use crate::core::source::{
    DelegatedConnection, DelegatedWalletSource, ExternalConnection, ExternalWalletSource,
    WalletClientType, WalletFilter, WalletMeta,
};
pub use crate::core::storage::{KeyValueStore, MemoryStore, SessionKey};
pub use crate::error::{Result, SdkError, SignerError, StorageError, TransferError};
pub use crate::logging::init_logging;
pub use crate::rpc::RpcConnection;
pub use crate::session::{observe, ActiveSession, Session, SessionReconciler, SessionSource};
pub use crate::transfer::{
    FailureStage, TransferOutcome, TransferPipeline, TransferProgress, TransferRequest,
};
