use crate::core::signer::TransactionSigner;
use crate::error::TransferError;
use crate::session::{ActiveSession, Session};
use crate::transfer::amount::MajorUnits;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;
use std::str::FromStr;
use std::sync::Arc;

/// A native SOL transfer as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Base58 recipient address
    pub recipient_address: String,

    /// Amount in SOL, as a decimal string (e.g. "1.5")
    pub amount_major_units: String,
}

impl TransferRequest {
    pub fn new(recipient_address: impl Into<String>, amount_major_units: impl Into<String>) -> Self {
        Self {
            recipient_address: recipient_address.into(),
            amount_major_units: amount_major_units.into(),
        }
    }
}

/// A request that passed validation, bound to the session it was
/// validated against.
///
/// The session (and with it the signer) is captured here, so an attempt
/// keeps signing with the same capability even if the live session is
/// torn down while it is suspended.
#[derive(Debug, Clone)]
pub struct ValidatedTransfer {
    session: ActiveSession,
    recipient: Pubkey,
    amount: MajorUnits,
}

impl ValidatedTransfer {
    /// Synchronous, side-effect free validation.
    pub fn new(session: &Session, request: &TransferRequest) -> Result<Self, TransferError> {
        let session = session
            .active()
            .cloned()
            .ok_or_else(|| TransferError::InvalidInput("no active session".to_string()))?;

        let recipient = Pubkey::from_str(request.recipient_address.trim()).map_err(|_| {
            TransferError::InvalidInput(format!(
                "recipient {:?} is not a valid address",
                request.recipient_address
            ))
        })?;

        let amount = MajorUnits::parse(&request.amount_major_units)?;

        Ok(Self {
            session,
            recipient,
            amount,
        })
    }

    pub fn sender(&self) -> Pubkey {
        self.session.address()
    }

    pub fn recipient(&self) -> Pubkey {
        self.recipient
    }

    pub fn amount(&self) -> &MajorUnits {
        &self.amount
    }

    pub fn signer(&self) -> &Arc<dyn TransactionSigner> {
        self.session.signer()
    }

    /// System-program transfer from the session address to the recipient.
    pub fn build_instruction(&self) -> Result<Instruction, TransferError> {
        let lamports = self.amount.to_lamports()?;
        Ok(system_instruction::transfer(
            &self.sender(),
            &self.recipient,
            lamports,
        ))
    }
}
