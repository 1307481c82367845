use thiserror::Error;

/// SDK-level error types (configuration, storage)
#[derive(Debug, Error)]
pub enum SdkError {
    /// Invalid or unparsable configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Key-value store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// Failure taxonomy of a transfer attempt.
///
/// `InvalidInput` and `Build` are caller mistakes and are never retried.
/// `Network` and `Expired` are environment conditions; retrying is left to
/// the caller. `Rejected` means the signer declined, or the cluster executed
/// the transaction and it failed; a UI presents it apart from faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to build transaction: {0}")]
    Build(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Blockhash window expired before confirmation")]
    Expired,
}

impl TransferError {
    /// Stable short code, used as the `reason` of a failed outcome.
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidInput(_) => "invalid-input",
            TransferError::Build(_) => "build",
            TransferError::Network(_) => "network",
            TransferError::Rejected(_) => "rejected",
            TransferError::Expired => "expired",
        }
    }

    pub fn is_caller_error(&self) -> bool {
        matches!(self, TransferError::InvalidInput(_) | TransferError::Build(_))
    }

    /// Whether a fresh attempt may succeed without the caller changing input.
    /// After `Expired` the caller must first check the signature, the
    /// transaction may have landed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransferError::Network(_) | TransferError::Rejected(_) | TransferError::Expired
        )
    }
}

/// Errors reported by a signing capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// The user declined the signing request
    #[error("User rejected the request: {0}")]
    Rejected(String),

    /// The capability was revoked (wallet locked, session torn down)
    #[error("Signer capability revoked")]
    Revoked,

    /// The signer could not be reached
    #[error("Signer transport failure: {0}")]
    Transport(String),

    #[error("Operation not supported by this signer")]
    Unsupported,

    /// The signer's key is not a required signer of the transaction.
    /// A configuration fault, not a user decision.
    #[error("Signer key mismatch: {0}")]
    KeyMismatch(String),
}

impl From<SignerError> for TransferError {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::Rejected(msg) => TransferError::Rejected(msg),
            SignerError::Revoked => TransferError::Rejected("signer revoked".to_string()),
            SignerError::Transport(msg) => TransferError::Network(msg),
            SignerError::Unsupported => {
                TransferError::Rejected("signer cannot sign transactions".to_string())
            },
            SignerError::KeyMismatch(msg) => {
                TransferError::Rejected(format!("signer does not match fee payer: {}", msg))
            },
        }
    }
}

/// Errors reported by a key-value backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
}
