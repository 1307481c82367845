use crate::config::SdkConfig;
use crate::core::constants::FALLBACK_WALLET_NAME;
use crate::core::source::{
    DelegatedConnection, DelegatedWalletSource, ExternalConnection, ExternalWalletSource,
    WalletClientType, WalletFilter,
};
use crate::core::storage::{KeyValueStore, SessionKey};
use crate::error::{SdkError, SignerError};
use crate::session::observe::observe_chain;
use crate::session::state::Session;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Owns the unified [`Session`] and is its only writer.
///
/// `local` is the persistent store shared with other parts of the app;
/// only the keys in [`SessionKey::ALL`] are touched there. `scoped` is
/// storage that lives exactly as long as a session and is wiped whole on
/// disconnect.
pub struct SessionReconciler {
    chain_type: String,
    disconnect_timeout: Duration,
    local: Arc<dyn KeyValueStore>,
    scoped: Arc<dyn KeyValueStore>,
    external_source: Option<Arc<dyn ExternalWalletSource>>,
    delegated_source: Option<Arc<dyn DelegatedWalletSource>>,
    state: watch::Sender<Session>,
}

impl SessionReconciler {
    pub fn new(
        config: &SdkConfig,
        local: Arc<dyn KeyValueStore>,
        scoped: Arc<dyn KeyValueStore>,
    ) -> Self {
        let (state, _) = watch::channel(Session::None);
        Self {
            chain_type: config.chain_type.clone(),
            disconnect_timeout: config.disconnect_timeout,
            local,
            scoped,
            external_source: None,
            delegated_source: None,
            state,
        }
    }

    pub fn with_external_source(mut self, source: Arc<dyn ExternalWalletSource>) -> Self {
        self.external_source = Some(source);
        self
    }

    pub fn with_delegated_source(mut self, source: Arc<dyn DelegatedWalletSource>) -> Self {
        self.delegated_source = Some(source);
        self
    }

    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that sees every session transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Reconcile a snapshot of both sources and publish the result if it
    /// differs from the current session.
    pub fn apply(
        &self,
        external: &[ExternalConnection],
        delegated: &[DelegatedConnection],
    ) -> Session {
        let next = observe_chain(&self.chain_type, external, delegated);

        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });

        if changed {
            match &next {
                Session::Active(active) => info!(
                    address = %active.address(),
                    source = active.source().as_str(),
                    "session active"
                ),
                Session::None => info!("session cleared by sources"),
            }
            self.write_cached_identity(&next);
        }

        next
    }

    /// Address and display name written by the last active session.
    ///
    /// Lets a UI show the previous identity while the sources are still
    /// settling. The cache is never turned back into a `Session`; only
    /// [`apply`](Self::apply) does that.
    pub fn cached_identity(&self) -> Result<Option<(String, String)>, SdkError> {
        let Some(address) = self.local.get(SessionKey::CachedAddress.as_str())? else {
            return Ok(None);
        };
        let display_name = self
            .local
            .get(SessionKey::CachedDisplayName.as_str())?
            .unwrap_or_else(|| FALLBACK_WALLET_NAME.to_string());
        Ok(Some((address, display_name)))
    }

    /// Read both registered sources and [`apply`](Self::apply) their snapshot.
    pub fn refresh_from_sources(&self) -> Session {
        let external = self
            .external_source
            .as_ref()
            .map(|source| source.wallets())
            .unwrap_or_default();
        let delegated = self
            .delegated_source
            .as_ref()
            .map(|source| source.wallets())
            .unwrap_or_default();
        self.apply(&external, &delegated)
    }

    /// Select an adapter in the external wallet registry and remember the
    /// choice so the adapter can reconnect it later.
    pub async fn select_external(&self, name: &str) -> Result<(), SignerError> {
        let source = self
            .external_source
            .as_ref()
            .ok_or(SignerError::Unsupported)?;
        source.select(name).await?;
        if let Err(e) = self.local.set(SessionKey::WalletSelection.as_str(), name) {
            warn!(error = %e, "failed to persist wallet selection");
        }
        Ok(())
    }

    /// Ask the delegated provider to link one external wallet client.
    pub async fn connect_external(&self, client: WalletClientType) -> Result<(), SignerError> {
        let source = self
            .delegated_source
            .as_ref()
            .ok_or(SignerError::Unsupported)?;
        debug!(client = client.as_str(), "requesting delegated wallet link");
        source.connect_wallet(WalletFilter::solana_only(client)).await
    }

    /// Tear down the current session.
    ///
    /// The signer and both sources are asked to disconnect on a best-effort
    /// basis; their failures and timeouts are logged and dropped. Local
    /// session state is cleared exactly once on every exit path, including
    /// when this future is dropped before completion.
    pub async fn disconnect(&self) {
        let session = self.current();
        let teardown = Teardown::begin(self);

        if let Session::Active(active) = &session {
            info!(address = %active.address(), "disconnecting session");
            self.best_effort("signer disconnect", active.signer().disconnect())
                .await;
        }
        if let Some(source) = &self.delegated_source {
            self.best_effort("delegated logout", source.logout()).await;
        }
        if let Some(source) = &self.external_source {
            self.best_effort("external disconnect", source.disconnect())
                .await;
        }

        teardown.complete();
    }

    async fn best_effort<F>(&self, step: &'static str, call: F)
    where
        F: Future<Output = Result<(), SignerError>>,
    {
        match tokio::time::timeout(self.disconnect_timeout, call).await {
            Ok(Ok(())) => debug!(step, "completed"),
            Ok(Err(SignerError::Unsupported)) => debug!(step, "not supported"),
            Ok(Err(e)) => warn!(step, error = %e, "ignored failure"),
            Err(_) => warn!(step, timeout = ?self.disconnect_timeout, "timed out"),
        }
    }

    fn write_cached_identity(&self, session: &Session) {
        let result = match session {
            Session::Active(active) => self
                .local
                .set(
                    SessionKey::CachedAddress.as_str(),
                    &active.address().to_string(),
                )
                .and_then(|_| {
                    self.local
                        .set(SessionKey::CachedDisplayName.as_str(), active.display_name())
                }),
            Session::None => self
                .local
                .remove(SessionKey::CachedAddress.as_str())
                .and_then(|_| self.local.remove(SessionKey::CachedDisplayName.as_str())),
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to update cached identity");
        }
    }

    fn clear_session_state(&self) {
        for key in SessionKey::ALL {
            if let Err(e) = self.local.remove(key.as_str()) {
                warn!(key = key.as_str(), error = %e, "failed to remove session key");
            }
        }
        if let Err(e) = self.scoped.clear() {
            warn!(error = %e, "failed to clear session-scoped storage");
        }
        self.state.send_replace(Session::None);
        info!("session state cleared");
    }
}

/// Runs [`SessionReconciler::clear_session_state`] once, either when
/// completed explicitly or when dropped.
struct Teardown<'a> {
    reconciler: &'a SessionReconciler,
    done: bool,
}

impl<'a> Teardown<'a> {
    fn begin(reconciler: &'a SessionReconciler) -> Self {
        Self {
            reconciler,
            done: false,
        }
    }

    fn complete(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if !self.done {
            self.done = true;
            self.reconciler.clear_session_state();
        }
    }
}

impl Drop for Teardown<'_> {
    fn drop(&mut self) {
        self.run();
    }
}
