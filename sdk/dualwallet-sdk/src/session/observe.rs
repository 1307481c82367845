use crate::core::constants::{FALLBACK_WALLET_NAME, SOLANA_CHAIN_TYPE};
use crate::core::signer::TransactionSigner;
use crate::core::source::{DelegatedConnection, ExternalConnection};
use crate::session::state::{ActiveSession, Session, SessionSource};
use chrono::{DateTime, Utc};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;

struct Candidate {
    address: Pubkey,
    display_name: String,
    signer: Arc<dyn TransactionSigner>,
    connected_at: Option<DateTime<Utc>>,
    source: SessionSource,
}

impl Candidate {
    fn into_session(self) -> Session {
        Session::Active(ActiveSession::new(
            self.address,
            self.display_name,
            self.signer,
            self.source,
        ))
    }
}

/// Map the latest snapshot of both sources to the unified session, for
/// Solana wallets.
///
/// Pure: no I/O, no clock reads. Identical input yields an equal `Session`,
/// so this can run on every poll tick.
pub fn observe(external: &[ExternalConnection], delegated: &[DelegatedConnection]) -> Session {
    observe_chain(SOLANA_CHAIN_TYPE, external, delegated)
}

/// [`observe`] for an arbitrary target chain family.
///
/// Entries that are not connected, lack a signer, or carry an address that
/// does not parse are treated as absent. When both sources offer a
/// candidate, the external wallet wins only if it is known to have connected
/// strictly later than the delegated one.
pub fn observe_chain(
    chain_type: &str,
    external: &[ExternalConnection],
    delegated: &[DelegatedConnection],
) -> Session {
    let external = external_candidate(external);
    let delegated = delegated_candidate(chain_type, delegated);

    let selected = match (external, delegated) {
        (Some(ext), Some(del)) => {
            if more_recent(ext.connected_at, del.connected_at) {
                Some(ext)
            } else {
                Some(del)
            }
        },
        (Some(ext), None) => Some(ext),
        (None, Some(del)) => Some(del),
        (None, None) => None,
    };

    selected.map_or(Session::None, Candidate::into_session)
}

/// `true` only when both timestamps are known and `a` is strictly later.
fn more_recent(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn parse_address(raw: &str) -> Option<Pubkey> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Pubkey::from_str(raw).ok()
}

fn external_candidate(connections: &[ExternalConnection]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for conn in connections.iter().filter(|c| c.connected) {
        let Some(address) = conn.address.as_deref().and_then(parse_address) else {
            continue;
        };
        let Some(signer) = conn.signer.clone() else {
            continue;
        };

        // First entry wins ties, so a stable registry order gives a stable result
        if let Some(current) = &best {
            if conn.connected_at <= current.connected_at {
                continue;
            }
        }

        let display_name = if conn.name.trim().is_empty() {
            FALLBACK_WALLET_NAME.to_string()
        } else {
            conn.name.clone()
        };

        best = Some(Candidate {
            address,
            display_name,
            signer,
            connected_at: conn.connected_at,
            source: SessionSource::ExternalWallet,
        });
    }

    best
}

fn delegated_candidate(chain_type: &str, connections: &[DelegatedConnection]) -> Option<Candidate> {
    connections
        .iter()
        .filter(|c| c.chain_type.eq_ignore_ascii_case(chain_type))
        .find_map(|conn| {
            let address = parse_address(&conn.address)?;
            let signer = conn.signer.clone()?;
            Some(Candidate {
                address,
                display_name: delegated_display_name(conn),
                signer,
                connected_at: conn.connected_at,
                source: SessionSource::DelegatedWallet,
            })
        })
}

fn delegated_display_name(conn: &DelegatedConnection) -> String {
    [&conn.meta.name, &conn.meta.wallet_client_type]
        .into_iter()
        .flatten()
        .map(|name| name.trim())
        .find(|name| !name.is_empty())
        .unwrap_or(FALLBACK_WALLET_NAME)
        .to_string()
}
