use crate::core::signer::TransactionSigner;
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::sync::Arc;

/// Which connection source produced a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionSource {
    ExternalWallet,
    DelegatedWallet,
}

impl SessionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionSource::ExternalWallet => "external",
            SessionSource::DelegatedWallet => "delegated",
        }
    }
}

/// A usable identity: address, display name and signing capability.
///
/// Fields are private so address and display name can only come out of
/// [`observe`](crate::session::observe).
#[derive(Clone)]
pub struct ActiveSession {
    address: Pubkey,
    display_name: String,
    signer: Arc<dyn TransactionSigner>,
    source: SessionSource,
}

impl ActiveSession {
    pub(crate) fn new(
        address: Pubkey,
        display_name: String,
        signer: Arc<dyn TransactionSigner>,
        source: SessionSource,
    ) -> Self {
        Self {
            address,
            display_name,
            signer,
            source,
        }
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn source(&self) -> SessionSource {
        self.source
    }

    pub fn signer(&self) -> &Arc<dyn TransactionSigner> {
        &self.signer
    }

    /// `AbCd...WxYz` form of the address for compact display
    pub fn short_address(&self) -> String {
        truncate_address(&self.address.to_string())
    }
}

impl PartialEq for ActiveSession {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
            && self.display_name == other.display_name
            && self.source == other.source
            && Arc::ptr_eq(&self.signer, &other.signer)
    }
}

impl Eq for ActiveSession {}

impl fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveSession")
            .field("address", &self.address)
            .field("display_name", &self.display_name)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// The unified current session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    None,
    Active(ActiveSession),
}

impl Session {
    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            Session::Active(active) => Some(active),
            Session::None => None,
        }
    }

    pub fn address(&self) -> Option<Pubkey> {
        self.active().map(ActiveSession::address)
    }
}

pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
