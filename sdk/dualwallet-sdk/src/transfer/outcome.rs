use crate::error::TransferError;
use solana_sdk::signature::Signature;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::warn;

/// Pipeline step at which an attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    Validate,
    Build,
    AcquireWindow,
    Submit,
    Confirm,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Validate => "validate",
            FailureStage::Build => "build",
            FailureStage::AcquireWindow => "acquire-window",
            FailureStage::Submit => "submit",
            FailureStage::Confirm => "confirm",
        }
    }
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one transfer attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Pending,
    Submitted {
        signature: Signature,
    },
    Confirmed {
        signature: Signature,
    },
    Failed {
        stage: FailureStage,
        reason: TransferError,
    },
}

impl TransferOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferOutcome::Confirmed { .. } | TransferOutcome::Failed { .. }
        )
    }

    pub fn signature(&self) -> Option<&Signature> {
        match self {
            TransferOutcome::Submitted { signature } | TransferOutcome::Confirmed { signature } => {
                Some(signature)
            },
            TransferOutcome::Pending | TransferOutcome::Failed { .. } => None,
        }
    }

    /// `(stage, reason code)` of a failure, e.g. `("submit", "rejected")`
    pub fn failure(&self) -> Option<(&'static str, &'static str)> {
        match self {
            TransferOutcome::Failed { stage, reason } => Some((stage.as_str(), reason.code())),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            TransferOutcome::Pending => 0,
            TransferOutcome::Submitted { .. } => 1,
            TransferOutcome::Confirmed { .. } | TransferOutcome::Failed { .. } => 2,
        }
    }
}

/// Observable progress of one attempt. Transitions only move forward and
/// stop at the first terminal state.
pub struct TransferProgress {
    state: watch::Sender<TransferOutcome>,
    history: Mutex<Vec<TransferOutcome>>,
}

impl TransferProgress {
    pub fn new() -> Self {
        let (state, _) = watch::channel(TransferOutcome::Pending);
        Self {
            state,
            history: Mutex::new(vec![TransferOutcome::Pending]),
        }
    }

    pub fn current(&self) -> TransferOutcome {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransferOutcome> {
        self.state.subscribe()
    }

    /// Every state this attempt has been in, oldest first.
    pub fn history(&self) -> Vec<TransferOutcome> {
        self.lock_history().clone()
    }

    /// Move to `next`. Backward or post-terminal transitions are refused and
    /// return `false`.
    pub(crate) fn advance(&self, next: TransferOutcome) -> bool {
        let mut history = self.lock_history();
        let accepted = self.state.send_if_modified(|current| {
            if current.is_terminal() || next.rank() <= current.rank() {
                false
            } else {
                *current = next.clone();
                true
            }
        });

        if accepted {
            history.push(next);
        } else {
            warn!(next = ?next, current = ?*self.state.borrow(), "refused outcome transition");
        }
        accepted
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<TransferOutcome>> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for TransferProgress {
    fn default() -> Self {
        Self::new()
    }
}
