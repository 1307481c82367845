use crate::config::SdkConfig;
use crate::core::connection::{Confirmation, SolConnection};
use crate::core::signer::TransactionSigner;
use crate::error::TransferError;
use crate::session::Session;
use crate::transfer::outcome::{FailureStage, TransferOutcome, TransferProgress};
use crate::transfer::request::{TransferRequest, ValidatedTransfer};
use crate::transfer::window::{BlockhashWindow, BoundTransaction};
use solana_sdk::signature::Signature;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

struct StageFailure {
    stage: FailureStage,
    error: TransferError,
}

fn at(stage: FailureStage) -> impl FnOnce(TransferError) -> StageFailure {
    move |error| StageFailure { stage, error }
}

/// Executes single transfer attempts: validate, build, acquire a blockhash
/// window, sign and broadcast, then confirm.
///
/// The pipeline never retries a failed step and never deduplicates
/// attempts; both are left to the caller.
pub struct TransferPipeline<C: SolConnection + ?Sized> {
    connection: Arc<C>,
    poll_interval: Duration,
    confirm_timeout: Duration,
}

impl<C: SolConnection + ?Sized> TransferPipeline<C> {
    pub fn new(connection: Arc<C>, config: &SdkConfig) -> Self {
        Self {
            connection,
            poll_interval: config.confirm_poll_interval,
            confirm_timeout: config.confirm_timeout,
        }
    }

    pub fn connection(&self) -> &Arc<C> {
        &self.connection
    }

    /// Run one attempt to completion and return its terminal outcome.
    pub async fn submit(&self, session: &Session, request: TransferRequest) -> TransferOutcome {
        let progress = TransferProgress::new();
        self.submit_with_progress(session, request, &progress).await
    }

    /// Like [`submit`](Self::submit), publishing every transition to
    /// `progress` as it happens.
    pub async fn submit_with_progress(
        &self,
        session: &Session,
        request: TransferRequest,
        progress: &TransferProgress,
    ) -> TransferOutcome {
        let span = info_span!(
            "transfer",
            recipient = %request.recipient_address,
            amount = %request.amount_major_units
        );

        async {
            let terminal = match self.execute(session, &request, progress).await {
                Ok(signature) => TransferOutcome::Confirmed { signature },
                Err(StageFailure { stage, error }) => {
                    if error.is_caller_error() {
                        info!(stage = stage.as_str(), reason = error.code(), error = %error, "transfer refused");
                    } else {
                        warn!(
                            stage = stage.as_str(),
                            reason = error.code(),
                            retryable = error.is_retryable(),
                            error = %error,
                            "transfer failed"
                        );
                    }
                    TransferOutcome::Failed {
                        stage,
                        reason: error,
                    }
                },
            };

            progress.advance(terminal.clone());
            terminal
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        session: &Session,
        request: &TransferRequest,
        progress: &TransferProgress,
    ) -> Result<Signature, StageFailure> {
        let transfer = ValidatedTransfer::new(session, request).map_err(at(FailureStage::Validate))?;
        let instruction = transfer
            .build_instruction()
            .map_err(at(FailureStage::Build))?;
        debug!(from = %transfer.sender(), to = %transfer.recipient(), "built transfer instruction");

        let window = self
            .acquire_window()
            .await
            .map_err(at(FailureStage::AcquireWindow))?;
        let bound = window.bind(instruction, &transfer.sender());

        let BoundTransaction {
            transaction,
            last_valid_block_height,
        } = bound;

        let signature = self
            .sign_and_send(transfer.signer().as_ref(), transaction)
            .await
            .map_err(at(FailureStage::Submit))?;
        info!(%signature, "transfer submitted");
        progress.advance(TransferOutcome::Submitted { signature });

        self.await_confirmation(&signature, last_valid_block_height)
            .await
            .map_err(at(FailureStage::Confirm))?;
        info!(%signature, "transfer confirmed");

        Ok(signature)
    }

    async fn acquire_window(&self) -> Result<BlockhashWindow, TransferError> {
        let (blockhash, last_valid_block_height) = self
            .connection
            .get_latest_blockhash_with_height()
            .await
            .map_err(|e| TransferError::Network(e.to_string()))?;
        debug!(%blockhash, last_valid_block_height, "acquired blockhash window");
        Ok(BlockhashWindow::new(blockhash, last_valid_block_height))
    }

    async fn sign_and_send(
        &self,
        signer: &dyn TransactionSigner,
        transaction: solana_sdk::transaction::Transaction,
    ) -> Result<Signature, TransferError> {
        let signed = signer.sign_transaction(transaction).await?;
        self.connection
            .send_transaction(&signed)
            .await
            .map_err(|e| TransferError::Network(e.to_string()))
    }

    /// Poll until the transaction is confirmed or the block height passes
    /// `last_valid_block_height`.
    ///
    /// The height is read before every confirmation check, so a confirmation
    /// is only accepted while the window is still open. Failed confirmation
    /// checks are retried; a transaction that landed with an execution error
    /// ends the attempt as `Rejected` right away. If the block height itself cannot be read for
    /// longer than `confirm_timeout`, the attempt gives up with a network
    /// error since the deadline can no longer be evaluated.
    async fn await_confirmation(
        &self,
        signature: &Signature,
        last_valid_block_height: u64,
    ) -> Result<(), TransferError> {
        let mut last_height_seen = Instant::now();

        loop {
            match self.connection.get_block_height().await {
                Ok(height) if height > last_valid_block_height => {
                    warn!(%signature, height, last_valid_block_height, "blockhash window expired");
                    return Err(TransferError::Expired);
                },
                Ok(_) => last_height_seen = Instant::now(),
                Err(e) => {
                    if last_height_seen.elapsed() >= self.confirm_timeout {
                        return Err(TransferError::Network(format!(
                            "block height unavailable: {}",
                            e
                        )));
                    }
                    warn!(error = %e, "failed to read block height, retrying");
                    tokio::time::sleep(self.poll_interval).await;
                    continue;
                },
            }

            match self
                .connection
                .confirm_transaction(signature, last_valid_block_height)
                .await
            {
                Ok(Confirmation::Confirmed) => return Ok(()),
                Ok(Confirmation::Pending) => debug!(%signature, "not confirmed yet"),
                Ok(Confirmation::Failed(reason)) => {
                    return Err(TransferError::Rejected(format!(
                        "transaction failed on chain: {}",
                        reason
                    )));
                },
                Err(e) => warn!(%signature, error = %e, "confirmation check failed, retrying"),
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
